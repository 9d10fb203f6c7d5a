//! Client cache layer - per-context reactive mirrors of the vault
//! Mutate via RPC, re-fetch the authoritative list, compute views locally

pub mod drawings;
pub mod folders;

pub use drawings::DrawingsCache;
pub use folders::{FoldersCache, SortBy, SortOrder};

use crate::error::Result;
use crate::rpc::{Background, Request, Response};
use async_trait::async_trait;
use std::sync::Arc;

/// Request/response call into the background context. A transport error
/// here is the host messaging layer failing, distinct from a domain
/// `Response::Error`.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Transport for contexts living in the same process as the background.
pub struct LocalTransport {
    background: Arc<Background>,
}

impl LocalTransport {
    pub fn new(background: Arc<Background>) -> Self {
        Self { background }
    }
}

#[async_trait]
impl RpcTransport for LocalTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        Ok(self.background.handle(request).await)
    }
}

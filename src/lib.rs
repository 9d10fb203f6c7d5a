//! sketchvault - persistence and sync core for a personal drawing vault
//!
//! One always-resident background context owns the drawing and folder
//! collections in host key-value storage; transient UI contexts mirror
//! that state through a tagged request/response protocol and per-context
//! caches. A reserved storage slot carries the one-shot handoff that
//! injects a saved drawing into the foreign drawing page.

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod inject;
pub mod rpc;
pub mod storage;
pub mod vault;

pub use client::{DrawingsCache, FoldersCache, LocalTransport, RpcTransport};
pub use config::VaultConfig;
pub use error::VaultError;
pub use host::{PageHost, PageLocalState, Telemetry, TracingTelemetry};
pub use rpc::{Background, Request, Response};
pub use storage::{MemoryStorage, SledStorage, StorageArea};
pub use vault::{Drawing, DrawingSnapshot, Folder, VaultStore, Workspace};

/// Initialize logging for a host process embedding the vault core.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sketchvault=debug"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

//! Sled-backed storage gateway
//! Persistent key-value storage with crash safety

use crate::error::{Result, VaultError};
use crate::storage::StorageArea;
use async_trait::async_trait;
use serde_json::Value;
use sled::Db;
use std::path::PathBuf;
use std::sync::Arc;

const VAULT_TREE: &str = "vault";

/// Durable storage area backed by sled. Values are stored as JSON bytes.
pub struct SledStorage {
    db: Arc<Db>,
}

impl SledStorage {
    /// Open (or create) a store at a specific path.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let db = sled::open(&path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn tree(&self) -> Result<sled::Tree> {
        self.db.open_tree(VAULT_TREE).map_err(VaultError::storage)
    }
}

impl Clone for SledStorage {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

#[async_trait]
impl StorageArea for SledStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let tree = self.tree()?;
        match tree.get(key.as_bytes()).map_err(VaultError::storage)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(VaultError::storage)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let tree = self.tree()?;
        let bytes = serde_json::to_vec(&value).map_err(VaultError::storage)?;
        tree.insert(key.as_bytes(), bytes)
            .map_err(VaultError::storage)?;
        tree.flush().map_err(VaultError::storage)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let tree = self.tree()?;
        tree.remove(key.as_bytes()).map_err(VaultError::storage)?;
        tree.flush().map_err(VaultError::storage)?;
        Ok(())
    }
}

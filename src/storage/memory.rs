//! In-memory storage area for tests and in-process wiring

use crate::error::Result;
use crate::storage::StorageArea;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// HashMap-backed storage area. Cloning shares the underlying map, so a
/// background context and a foreign-page script can see the same slots.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the gateway. Test setup only.
    pub async fn seed(&self, key: &str, value: Value) {
        self.entries.lock().await.insert(key.to_string(), value);
    }
}

#[async_trait]
impl StorageArea for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

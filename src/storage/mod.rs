//! Storage gateway - async key-value access over named records
//! No multi-key atomicity; two sequential writes are not transactional

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStorage;
pub use sled_store::SledStorage;

use crate::error::{Result, VaultError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// The host's key-value storage area.
///
/// The persistence store is the only writer of the collection keys; other
/// contexts reach storage through the RPC protocol. The one exception is
/// the injection slot, which a foreign page's script consumes directly.
#[async_trait]
pub trait StorageArea: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read a typed collection, defaulting to empty when the record is absent.
pub async fn get_collection<T: DeserializeOwned>(
    storage: &dyn StorageArea,
    key: &str,
) -> Result<Vec<T>> {
    match storage.get(key).await? {
        Some(value) => {
            serde_json::from_value(value).map_err(|_| VaultError::MalformedRecord {
                key: key.to_string(),
            })
        }
        None => Ok(Vec::new()),
    }
}

/// Write a typed collection back in full.
pub async fn set_collection<T: Serialize>(
    storage: &dyn StorageArea,
    key: &str,
    items: &[T],
) -> Result<()> {
    let value = serde_json::to_value(items).map_err(VaultError::storage)?;
    storage.set(key, value).await
}

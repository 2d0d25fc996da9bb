//! Key-value backend implementations.

use crate::error::Result;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};

/// Trait for key-value backend implementations.
///
/// The engine requires exactly get/set/delete over opaque bytes. Everything
/// else (persistence, eviction, TTL, transactions) is the store's own
/// policy and contract, which the engine neither assumes nor controls.
///
/// **IMPORTANT:** All methods use `&self` to allow concurrent access.
/// Implementations should use interior mutability (DashMap, pools, or
/// external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve a value by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - value found
    /// - `Ok(None)` - key not found
    ///
    /// # Errors
    /// Returns `Err` on backend failure (connection lost, etc.)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value under a key, replacing any previous value.
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a key exists (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

//! In-memory key-value backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Entries live until deleted or the process exits; there is no eviction,
//! which makes this backend a fit for tests and single-process deployments
//! with bounded cache cardinality.

use super::CacheBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory backend.
///
/// `Clone` shares the underlying store.
///
/// # Example
///
/// ```no_run
/// use webcache_kit::backend::{CacheBackend, InMemoryBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("key1", b"value".to_vec()).await?;
///     let value = backend.get("key1").await?;
///     assert!(value.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Current number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total stored payload bytes.
    pub fn total_bytes(&self) -> usize {
        self.store.iter().map(|entry| entry.value().len()).sum()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.store.clear();
        warn!("⚠ InMemory CLEAR executed - all entries dropped!");
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.store.get(key).map(|entry| entry.value().clone());
        if value.is_some() {
            debug!("✓ InMemory GET {} -> HIT", key);
        } else {
            debug!("✓ InMemory GET {} -> MISS", key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory SET {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }
}

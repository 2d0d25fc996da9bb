//! Metrics hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to feed hit/miss/store/invalidate events into
//! your monitoring system:
//!
//! ```ignore
//! use webcache_kit::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("webcache_hits").inc();
//!     }
//!     // ... other methods
//! }
//!
//! // let engine = CacheEngine::new(backend, config)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Default trait methods log via the `log` crate; [`NoOpMetrics`] silences
//! them entirely and is the engine default.

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache write.
    fn record_store(&self, key: &str, duration: Duration) {
        debug!("Cache STORE: {} took {:?}", key, duration);
    }

    /// Record a resource invalidation.
    fn record_invalidate(&self, key: &str, duration: Duration) {
        debug!("Cache INVALIDATE: {} took {:?}", key, duration);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_store(&self, _key: &str, _duration: Duration) {}
    fn record_invalidate(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

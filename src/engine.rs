//! Cache engine - store and retrieval over a key-value backend.
//!
//! [`CacheEngine`] is the single entry point for cache state: the write
//! path ([`cache_response`](CacheEngine::cache_response),
//! [`invalidate_resource`](CacheEngine::invalidate_resource)) and the read
//! path ([`fetch_metadata`](CacheEngine::fetch_metadata),
//! [`fetch_response`](CacheEngine::fetch_response)). The cachability policy
//! and the conditional validator are separate, pure collaborators; the
//! engine only does key derivation and backend I/O.

use crate::backend::CacheBackend;
use crate::config::{Config, SharedConfig};
use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::key::CacheKeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::policy;
use crate::record::{CacheRecord, CachedResponse, Metadata};
use std::time::Instant;

/// The cache engine: key derivation plus store/retrieval/invalidation
/// against a pluggable backend.
///
/// Holds the process-wide [`SharedConfig`]; every lookup reads the
/// configuration live, so rotating the master salt immediately invalidates
/// all entries without touching the store.
///
/// # Example
///
/// ```ignore
/// use webcache_kit::{CacheEngine, Config, backend::InMemoryBackend};
///
/// let engine = CacheEngine::new(InMemoryBackend::new(), Config::default());
/// ```
pub struct CacheEngine<B: CacheBackend> {
    backend: B,
    config: SharedConfig,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> CacheEngine<B> {
    /// Create an engine with the given backend and configuration.
    pub fn new(backend: B, config: Config) -> Self {
        CacheEngine {
            backend,
            config: SharedConfig::new(config),
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Create an engine sharing an existing configuration handle.
    pub fn with_shared_config(backend: B, config: SharedConfig) -> Self {
        CacheEngine {
            backend,
            config,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set a custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The shared configuration handle. Swapping its master salt is the
    /// global invalidation lever.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Policy (pure, delegated; exposed here so hosts talk to one type)
    // ------------------------------------------------------------------

    /// Whether the response may be persisted for this request.
    pub fn should_cache_response(&self, request: &Request, response: &Response) -> bool {
        policy::should_cache_response(request, response, &self.config.load())
    }

    /// Whether this request/response pair invalidates the cached resource.
    pub fn should_invalidate_resource(&self, request: &Request, response: &Response) -> bool {
        policy::should_invalidate_resource(request, response)
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Fetch the resource's metadata record.
    ///
    /// # Errors
    ///
    /// - [`Error::CacheMiss`] when no record exists
    /// - backend and envelope faults propagate unchanged
    pub async fn fetch_metadata(&self, request: &Request) -> Result<Metadata> {
        let config = self.config.load();
        let key = CacheKeyBuilder::metadata_key(request, &config);

        match self.backend.get(&key).await? {
            Some(bytes) => Metadata::from_cache_bytes(&bytes),
            None => Err(Error::CacheMiss),
        }
    }

    /// Fetch the negotiated cached response for this request.
    ///
    /// Reads metadata first, then derives the response key from it and the
    /// live configuration. The master salt is read at lookup time, not
    /// frozen at write time: rotating it misses every resource at once.
    ///
    /// # Errors
    ///
    /// - [`Error::CacheMiss`] when metadata or the negotiated variant is
    ///   absent
    /// - backend and envelope faults propagate unchanged
    pub async fn fetch_response(&self, request: &Request) -> Result<Response> {
        let start = Instant::now();
        let metadata = match self.fetch_metadata(request).await {
            Ok(metadata) => metadata,
            Err(e) => {
                if e.is_miss() {
                    self.metrics.record_miss(request.path(), start.elapsed());
                }
                return Err(e);
            }
        };

        let config = self.config.load();
        let key = CacheKeyBuilder::response_key(request, &metadata, &config);

        match self.backend.get(&key).await? {
            Some(bytes) => {
                let entry = CachedResponse::from_cache_bytes(&bytes)?;
                self.metrics.record_hit(&key, start.elapsed());
                debug!("Cache hit for {} ({})", request.path(), key);
                Ok(entry.into_response())
            }
            None => {
                self.metrics.record_miss(&key, start.elapsed());
                debug!("Negotiated variant absent for {} ({})", request.path(), key);
                Err(Error::CacheMiss)
            }
        }
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    /// Persist a response for this request.
    ///
    /// Rebuilds the metadata record from the response's declared Vary
    /// names, preserving the existing salt when the resource already has
    /// one (a fresh salt is minted on the first write and after
    /// invalidation). Writes metadata first, then the response under the
    /// key derived from that metadata. The two writes are not atomic; a
    /// crash between them surfaces as a future miss, never as corruption.
    ///
    /// # Errors
    ///
    /// - [`Error::Other`] when called with a streaming body (the policy
    ///   rejects those before this point)
    /// - backend and envelope faults propagate unchanged
    pub async fn cache_response(&self, request: &Request, response: &Response) -> Result<()> {
        let Some(entry) = CachedResponse::from_response(response) else {
            return Err(Error::Other(
                "refusing to cache a streaming response body".to_string(),
            ));
        };

        let start = Instant::now();
        let config = self.config.load();
        let metadata_key = CacheKeyBuilder::metadata_key(request, &config);

        // Corrupt existing metadata propagates; only true absence mints a
        // fresh salt
        let vary = response.vary_names();
        let metadata = match self.backend.get(&metadata_key).await? {
            Some(bytes) => Metadata::new(vary, Metadata::from_cache_bytes(&bytes)?.salt()),
            None => Metadata::with_fresh_salt(vary),
        };

        let response_key = CacheKeyBuilder::response_key(request, &metadata, &config);

        self.backend
            .set(&metadata_key, metadata.to_cache_bytes()?)
            .await?;
        self.backend
            .set(&response_key, entry.to_cache_bytes()?)
            .await?;

        self.metrics.record_store(&response_key, start.elapsed());
        debug!(
            "Cached {} under {} (metadata {})",
            request.path(),
            response_key,
            metadata_key
        );
        Ok(())
    }

    /// Invalidate the resource by deleting its metadata record.
    ///
    /// The stored response entries are left in place: without metadata no
    /// future response-key derivation can reach them, and the next cache
    /// write mints a fresh salt. Reclamation of the orphans belongs to the
    /// backing store's own eviction.
    ///
    /// # Errors
    ///
    /// Backend faults propagate unchanged.
    pub async fn invalidate_resource(&self, request: &Request) -> Result<()> {
        let start = Instant::now();
        let config = self.config.load();
        let key = CacheKeyBuilder::metadata_key(request, &config);

        self.backend.delete(&key).await?;

        self.metrics.record_invalidate(&key, start.elapsed());
        debug!("Invalidated {} ({})", request.path(), key);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Set the configured diagnostic header to `hit`.
    pub fn mark_cache_hit(&self, response: &mut Response) {
        let config = self.config.load();
        response
            .headers_mut()
            .set(config.x_cache_header_name.clone(), "hit");
    }

    /// Set the configured diagnostic header to `miss`.
    pub fn mark_cache_miss(&self, response: &mut Response) {
        let config = self.config.load();
        response
            .headers_mut()
            .set(config.x_cache_header_name.clone(), "miss");
    }
}

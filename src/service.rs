//! Request-lifecycle service for host frameworks.
//!
//! [`WebCache`] wraps the engine in `Arc` for cheap sharing across request
//! handlers and exposes the two hook entry points a host wires around its
//! request cycle:
//!
//! - [`before_request`](WebCache::before_request) - retrieval; a hit
//!   short-circuits application logic entirely
//! - [`after_request`](WebCache::after_request) - validation, modifiers,
//!   conditional 304 and the cache-or-invalidate decision
//!
//! Exact hook registration belongs to the host framework.

use crate::backend::CacheBackend;
use crate::config::{Config, SharedConfig};
use crate::engine::CacheEngine;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::validation;
use std::sync::Arc;

type Modifier = dyn Fn(&mut Response) + Send + Sync;
type ExemptPredicate = dyn Fn(&Request) -> bool + Send + Sync;

/// Clonable request-lifecycle cache service.
///
/// `Clone` is cheap (`Arc` increments); all clones share the engine, the
/// modifier list and the exemption predicate.
///
/// # Example
///
/// ```ignore
/// use webcache_kit::{Config, WebCache, backend::InMemoryBackend};
///
/// let cache = WebCache::new(InMemoryBackend::new(), Config::default())
///     .with_modifier(|response| {
///         response.headers_mut().set("Server", "example");
///     })
///     .exempt_when(|request| request.path().starts_with("/admin"));
///
/// // before the application handles a request:
/// // if let Some(cached) = cache.before_request(&request).await? { return cached; }
/// // after it produced a response:
/// // cache.after_request(&request, &mut response).await?;
/// ```
pub struct WebCache<B: CacheBackend> {
    engine: Arc<CacheEngine<B>>,
    modifiers: Vec<Arc<Modifier>>,
    exempt: Option<Arc<ExemptPredicate>>,
}

impl<B: CacheBackend> Clone for WebCache<B> {
    fn clone(&self) -> Self {
        WebCache {
            engine: Arc::clone(&self.engine),
            modifiers: self.modifiers.clone(),
            exempt: self.exempt.clone(),
        }
    }
}

impl<B: CacheBackend> WebCache<B> {
    /// Create a service over a new engine.
    pub fn new(backend: B, config: Config) -> Self {
        WebCache {
            engine: Arc::new(CacheEngine::new(backend, config)),
            modifiers: Vec::new(),
            exempt: None,
        }
    }

    /// Create a service over an existing engine (e.g. one carrying custom
    /// metrics).
    pub fn from_engine(engine: CacheEngine<B>) -> Self {
        WebCache {
            engine: Arc::new(engine),
            modifiers: Vec::new(),
            exempt: None,
        }
    }

    /// Append a response modifier.
    ///
    /// Modifiers run in registration order, after `Last-Modified`
    /// defaulting and before the entity tag is computed and the cache-write
    /// decision is taken, so whatever they mutate is what gets validated
    /// and persisted.
    pub fn with_modifier<F>(mut self, modifier: F) -> Self
    where
        F: Fn(&mut Response) + Send + Sync + 'static,
    {
        self.modifiers.push(Arc::new(modifier));
        self
    }

    /// Exempt matching requests from caching.
    ///
    /// Exempt requests skip retrieval entirely and are never persisted;
    /// invalidation by mutating methods still applies.
    pub fn exempt_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.exempt = Some(Arc::new(predicate));
        self
    }

    /// The underlying engine.
    pub fn engine(&self) -> &CacheEngine<B> {
        &self.engine
    }

    /// The shared configuration handle (master-salt rotation lever).
    pub fn config(&self) -> &SharedConfig {
        self.engine.config()
    }

    fn is_exempt(&self, request: &Request) -> bool {
        self.exempt.as_ref().is_some_and(|p| p(request))
    }

    fn served_from_cache(&self, response: &Response) -> bool {
        let config = self.engine.config().load();
        response.headers().get(&config.x_cache_header_name) == Some("hit")
    }

    /// Entry point before the application handles the request.
    ///
    /// Returns the marked cached response on a hit; `Ok(None)` on a miss or
    /// for exempt requests, meaning the application proceeds normally.
    ///
    /// # Errors
    ///
    /// [`Error::CacheMiss`](crate::Error::CacheMiss) never escapes here; a
    /// hard backend fault propagates unchanged.
    pub async fn before_request(&self, request: &Request) -> Result<Option<Response>> {
        if self.is_exempt(request) {
            debug!("Request {} is exempt from caching", request.path());
            return Ok(None);
        }

        match self.engine.fetch_response(request).await {
            Ok(mut response) => {
                self.engine.mark_cache_hit(&mut response);
                Ok(Some(response))
            }
            Err(e) if e.is_miss() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Entry point after the application produced a response.
    ///
    /// Runs the full finalization sequence: `Last-Modified` defaulting,
    /// the modifier list, entity-tag computation, the conditional 304
    /// short-circuit, then either persistence (marking the response
    /// `miss`) or invalidation, per policy. Responses this service itself
    /// served from cache are returned untouched.
    ///
    /// # Errors
    ///
    /// Backend faults from the write path propagate unchanged.
    pub async fn after_request(&self, request: &Request, response: &mut Response) -> Result<()> {
        if self.served_from_cache(response) {
            return Ok(());
        }

        validation::update_last_modified(response);

        for modifier in &self.modifiers {
            modifier(response);
        }

        if validation::can_set_etag(response) {
            validation::set_etag(response);
        }

        if validation::if_none_match(request, response) {
            if let Some(not_modified) = validation::not_modified_response(response) {
                *response = not_modified;
                return Ok(());
            }
        }

        if !self.is_exempt(request) && self.engine.should_cache_response(request, response) {
            self.engine.cache_response(request, response).await?;
            self.engine.mark_cache_miss(response);
        } else if self.engine.should_invalidate_resource(request, response) {
            self.engine.invalidate_resource(request).await?;
        }

        Ok(())
    }
}

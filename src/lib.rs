//! # webcache-kit
//!
//! An HTTP response-caching decision engine for Rust web services.
//!
//! ## Features
//!
//! - **HTTP-semantic cachability:** Cache-Control, Expires, Vary, method
//!   safety and status class decide what may be persisted
//! - **Vary-aware keys:** one fingerprint per negotiated variant, derived
//!   from the request headers the response declared as significant
//! - **Salted invalidation:** per-resource salts give O(1) invalidation
//!   without deletes; rotating the master salt invalidates everything at
//!   once
//! - **Conditional GET:** computed entity tags, `Last-Modified` defaulting
//!   and the `304 Not Modified` short circuit
//! - **Backend Agnostic:** in-memory, Redis, or any custom get/set/delete
//!   key-value store
//! - **Framework Independent:** two hook entry points, no dependency on any
//!   web framework
//!
//! ## Quick Start
//!
//! ```ignore
//! use webcache_kit::{Config, WebCache, backend::InMemoryBackend};
//! use webcache_kit::http::{Request, Response};
//!
//! let cache = WebCache::new(InMemoryBackend::new(), Config::default());
//!
//! // Wire the two entry points around your request cycle:
//! async fn handle(cache: &WebCache<InMemoryBackend>, request: Request) -> Response {
//!     if let Some(cached) = cache.before_request(&request).await.unwrap() {
//!         return cached; // hit: application logic is skipped entirely
//!     }
//!
//!     let mut response = run_application(&request);
//!
//!     cache.after_request(&request, &mut response).await.unwrap();
//!     response
//! }
//! # fn run_application(_: &Request) -> Response { Response::new(200) }
//! ```
//!
//! ## Invalidation levers
//!
//! ```ignore
//! // Per resource: a successful PUT/POST/DELETE/PATCH through
//! // after_request invalidates the path automatically. Manually:
//! cache.engine().invalidate_resource(&request).await?;
//!
//! // Globally, without touching the store:
//! cache.config().rotate_master_salt("deploy-2024-06-01");
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod key;
pub mod observability;
pub mod policy;
pub mod record;
pub mod serialization;
pub mod service;
pub mod validation;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use config::{Config, SharedConfig};
pub use engine::CacheEngine;
pub use error::{Error, Result};
pub use http::{Headers, Method, Request, Response};
pub use record::{CacheRecord, CachedResponse, Metadata};
pub use service::WebCache;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

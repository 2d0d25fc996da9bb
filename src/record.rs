//! Persisted cache records: resource metadata and response snapshots.

use crate::error::Result;
use crate::http::{Headers, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trait implemented by every record the engine persists.
///
/// Serialization goes through the versioned envelope (see
/// `crate::serialization`) and is NOT overridable, so every record in the
/// store shares one validated wire format.
pub trait CacheRecord: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Short record name used in log lines.
    fn record_kind() -> &'static str;

    /// Serialize for storage, enveloped and versioned.
    fn to_cache_bytes(&self) -> Result<Vec<u8>> {
        crate::serialization::serialize_record(self)
    }

    /// Deserialize from storage, validating magic and schema version.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidCacheEntry`: bad magic or corrupted envelope
    /// - `Error::VersionMismatch`: schema version changed
    /// - `Error::DeserializationError`: corrupted payload
    fn from_cache_bytes(bytes: &[u8]) -> Result<Self> {
        crate::serialization::deserialize_record(bytes)
    }
}

/// Per-resource metadata record.
///
/// Exists in storage iff at least one negotiated variant of the resource is
/// reachable: created on the first successful cache write, replaced
/// wholesale on later writes, removed on invalidation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    vary: BTreeSet<String>,
    salt: String,
}

impl Metadata {
    /// Builds a record from lowercased vary names and an existing salt.
    pub fn new(vary: BTreeSet<String>, salt: impl Into<String>) -> Self {
        Metadata {
            vary,
            salt: salt.into(),
        }
    }

    /// Builds a record with a freshly minted salt.
    ///
    /// Used on the first write for a resource and after invalidation reset
    /// the previous record. The salt only has to be fresh and unpredictable;
    /// a v4 UUID provides both without cross-process coordination.
    pub fn with_fresh_salt(vary: BTreeSet<String>) -> Self {
        Metadata {
            vary,
            salt: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// The response's declared vary names, lowercased and sorted.
    pub fn vary(&self) -> impl Iterator<Item = &str> {
        self.vary.iter().map(|s| s.as_str())
    }

    /// The per-resource invalidation salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }
}

impl CacheRecord for Metadata {
    fn record_kind() -> &'static str {
        "metadata"
    }
}

/// Stored representation of one negotiated response variant.
///
/// Only fully materialized bodies are representable; streamed responses
/// never reach the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    status: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl CachedResponse {
    /// Snapshots a response for storage. Returns `None` for a streaming
    /// body, which cannot be read without consuming it.
    pub fn from_response(response: &Response) -> Option<Self> {
        let body = response.body_bytes()?.to_vec();
        Some(CachedResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body,
        })
    }

    /// Rebuilds the live response.
    pub fn into_response(self) -> Response {
        Response::from_parts(self.status, self.headers, self.body)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl CacheRecord for CachedResponse {
    fn record_kind() -> &'static str {
        "response"
    }
}

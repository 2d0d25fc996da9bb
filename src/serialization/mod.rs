//! Postcard-based record serialization with versioned envelopes.
//!
//! Every record persisted by the engine follows this format:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "WKIT"              u32 (LE)          postcard::to_allocvec(T)
//! ```
//!
//! Guarantees:
//!
//! - **Deterministic:** the same record always produces identical bytes,
//!   which cache key fingerprints and tests rely on
//! - **Validated:** magic and version are checked on every read
//! - **Versioned:** schema changes force eviction, not silent migration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header identifying records written by this crate.
///
/// Anything else found under one of our keys is rejected as foreign or
/// corrupted data.
pub const CACHE_MAGIC: [u8; 4] = *b"WKIT";

/// Current schema version.
///
/// Increment when making breaking changes to persisted record types
/// (field added/removed/reordered, type changed). Old entries then fail
/// the version check, surface as a miss to the caller, and are rewritten
/// on the next cache write.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope wrapped around every persisted record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordEnvelope<T> {
    /// Magic header: must be b"WKIT"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The actual record
    pub payload: T,
}

impl<T> RecordEnvelope<T> {
    /// Create a new envelope with the current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a record with its envelope for storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    let envelope = RecordEnvelope::new(record);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Record serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a record from storage, validating the envelope.
///
/// # Errors
///
/// - `Error::InvalidCacheEntry`: invalid magic header
/// - `Error::VersionMismatch`: schema version mismatch
/// - `Error::DeserializationError`: corrupted payload
pub fn deserialize_record<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: RecordEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        error!("Record deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != CACHE_MAGIC {
        warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}

//! Error types for the caching engine.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the caching engine.
///
/// All fallible operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Different variants represent different
/// failure modes:
#[derive(Debug, Clone)]
pub enum Error {
    /// Cache miss: the lookup could not produce a usable cached entry.
    ///
    /// Raised when the metadata record is absent, when the negotiated
    /// variant is absent, or when the recorded salt no longer derives the
    /// stored response key under the current configuration.
    ///
    /// Not a fault: callers catch it and proceed to generate a fresh
    /// response.
    CacheMiss,

    /// Configuration was given an option key outside the recognized set.
    ///
    /// Raised only at configuration construction time. Fatal: surfaced
    /// immediately, never recovered.
    UnrecognizedOption(String),

    /// Configuration option had an invalid value.
    ///
    /// Common causes:
    /// - Non-boolean value for a boolean option
    /// - Empty header name
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// Serialization failed when converting a record to cache bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes to a record.
    ///
    /// This indicates corrupted or malformed data in the store.
    ///
    /// **Recovery:** Evict the entry and recompute.
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    ///
    /// Returned when the magic header is not `b"WKIT"` or the envelope
    /// itself cannot be decoded.
    ///
    /// **Recovery:** Evict the entry and recompute.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and a persisted record.
    ///
    /// Raised when `CURRENT_SCHEMA_VERSION` changed between the write and
    /// the read. Expected during deployments; the entry is evicted and
    /// recomputed on the next request.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from the persisted record)
        found: u32,
    },

    /// Backend storage error (Redis, custom stores, etc).
    ///
    /// The backend's own error contract propagates through this variant
    /// unchanged: the engine performs no retries and no suppression.
    BackendError(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// True for the recoverable miss signal, false for every fault.
    pub fn is_miss(&self) -> bool {
        matches!(self, Error::CacheMiss)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CacheMiss => write!(f, "Cache miss"),
            Error::UnrecognizedOption(key) => {
                write!(f, "Unrecognized configuration option: {}", key)
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}

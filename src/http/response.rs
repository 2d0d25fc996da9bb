//! Response surface consumed and produced by the caching engine.

use super::{parse_http_date, CacheControl, Headers};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A response body: either fully materialized bytes, or a one-shot stream
/// the engine must never consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Re-readable byte sequence.
    Full(Vec<u8>),
    /// One-shot/streaming body. The bytes are owned by the transport and
    /// are not observable here; such responses are never cacheable.
    Streaming,
}

/// The response view the engine operates on: status code, mutable headers
/// and a body that is either materialized or flagged as one-shot.
///
/// # Example
///
/// ```
/// use webcache_kit::http::Response;
///
/// let response = Response::new(200)
///     .with_header("Vary", "Accept-Encoding, Accept-Language")
///     .with_body("hello");
///
/// assert!(response.vary_names().contains("accept-encoding"));
/// assert_eq!(response.body_bytes(), Some(&b"hello"[..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Body,
}

impl Response {
    /// Creates a response with an empty materialized body.
    pub fn new(status: u16) -> Self {
        Response {
            status,
            headers: Headers::new(),
            body: Body::Full(Vec::new()),
        }
    }

    /// Creates a response flagged as carrying a one-shot streaming body.
    pub fn streaming(status: u16) -> Self {
        Response {
            status,
            headers: Headers::new(),
            body: Body::Streaming,
        }
    }

    /// Sets a materialized body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Full(body.into());
        self
    }

    /// Appends a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Rebuilds a response from stored parts.
    pub fn from_parts(status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Response {
            status,
            headers,
            body: Body::Full(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// The materialized body bytes, or `None` for a streaming body.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Full(bytes) => Some(bytes),
            Body::Streaming => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming)
    }

    /// 2xx status class.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 4xx or 5xx status class.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// 5xx status class.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    // ------------------------------------------------------------------
    // Structured header accessors
    // ------------------------------------------------------------------

    /// Parsed `Cache-Control` directives (all header lines combined).
    pub fn cache_control(&self) -> CacheControl {
        self.cache_control_named("Cache-Control")
    }

    /// Parsed freshness directives from an arbitrarily named header.
    pub fn cache_control_named(&self, header_name: &str) -> CacheControl {
        let combined = self
            .headers
            .get_all(header_name)
            .collect::<Vec<_>>()
            .join(", ");
        CacheControl::parse(&combined)
    }

    /// Declared `Vary` header names, lowercased. Comma lists and repeated
    /// header lines both contribute. A `*` entry appears verbatim.
    pub fn vary_names(&self) -> BTreeSet<String> {
        self.headers
            .get_all("Vary")
            .flat_map(|line| line.split(','))
            .map(|name| name.trim().to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Parsed `Expires` timestamp. `Some(None)` distinguishes a present but
    /// unparseable value (treated as already expired, RFC 7234 §5.3) from an
    /// absent header.
    pub fn expires(&self) -> Option<Option<DateTime<Utc>>> {
        self.headers.get("Expires").map(parse_http_date)
    }

    /// The entity tag, if set.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get("ETag")
    }

    /// The `Last-Modified` value, if set.
    pub fn last_modified(&self) -> Option<&str> {
        self.headers.get("Last-Modified")
    }
}

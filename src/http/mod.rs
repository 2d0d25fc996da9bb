//! Minimal HTTP surface for the caching engine.
//!
//! These types expose exactly the accessors the engine needs from a host
//! framework: method/path/query/header lookup on requests, and status,
//! header mutation and structured freshness accessors on responses. Hosts
//! adapt their own request/response types into these at the hook boundary.

use chrono::{DateTime, Utc};

mod headers;
mod request;
mod response;

pub use headers::Headers;
pub use request::{Method, Request};
pub use response::{Body, Response};

/// Parsed `Cache-Control` response directives relevant to cachability.
///
/// Unknown directives are ignored; a malformed `max-age` reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub private: bool,
    pub no_cache: bool,
    pub no_store: bool,
    pub public: bool,
    pub max_age: Option<u64>,
}

impl CacheControl {
    /// Parses a comma-separated directive list (RFC 9111 §5.2).
    pub fn parse(value: &str) -> Self {
        let mut parsed = CacheControl::default();

        for directive in value.split(',') {
            let directive = directive.trim();
            let (name, arg) = match directive.split_once('=') {
                Some((name, arg)) => (name.trim(), Some(arg.trim().trim_matches('"'))),
                None => (directive, None),
            };

            match name.to_ascii_lowercase().as_str() {
                "private" => parsed.private = true,
                "no-cache" => parsed.no_cache = true,
                "no-store" => parsed.no_store = true,
                "public" => parsed.public = true,
                "max-age" => parsed.max_age = arg.and_then(|a| a.parse().ok()),
                _ => {}
            }
        }

        parsed
    }
}

/// Parses an HTTP-date (IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`).
///
/// Returns `None` for an unparseable value; per RFC 7234 §5.3 callers treat
/// that as a timestamp in the past.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp as an IMF-fixdate with the canonical `GMT` zone.
pub fn format_http_date(when: DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

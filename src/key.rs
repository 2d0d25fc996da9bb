//! Cache key derivation.
//!
//! Two keys exist per request: the *metadata key* identifies the logical
//! resource (path only, no negotiation), the *response key* identifies one
//! negotiated variant of it. Both are deterministic fingerprints, stable
//! across processes, so any replica derives the same keys from the same
//! inputs.

use crate::config::Config;
use crate::http::Request;
use crate::record::Metadata;
use sha2::{Digest, Sha256};

/// Key prefix for metadata records.
pub const METADATA_PREFIX: &str = "meta";

/// Key prefix for cached response entries.
pub const RESPONSE_PREFIX: &str = "resp";

/// Builder for the two cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Key of the resource's metadata record.
    ///
    /// Fingerprints `{master_salt, path}` only: the query string and every
    /// header are excluded, so invalidation by path reaches the resource
    /// regardless of how it was later negotiated.
    pub fn metadata_key(request: &Request, config: &Config) -> String {
        let digest = fingerprint(&[config.master_salt.as_bytes(), request.path().as_bytes()]);
        format!("{}:{}", METADATA_PREFIX, digest)
    }

    /// Key of one negotiated variant of the resource.
    ///
    /// Fingerprints `{master_salt, resource salt, path, query string}` plus,
    /// for each header name in the metadata's vary set (already sorted and
    /// lowercased), the name and the sorted request values for it. Two
    /// requests differing in any Vary-listed header value map to different
    /// keys.
    pub fn response_key(request: &Request, metadata: &Metadata, config: &Config) -> String {
        let mut parts: Vec<Vec<u8>> = vec![
            config.master_salt.as_bytes().to_vec(),
            metadata.salt().as_bytes().to_vec(),
            request.path().as_bytes().to_vec(),
            request.query_string().unwrap_or("").as_bytes().to_vec(),
        ];

        for name in metadata.vary() {
            let mut values: Vec<&str> = request.headers().get_all(name).collect();
            values.sort_unstable();
            parts.push(name.as_bytes().to_vec());
            parts.push(values.join(",").into_bytes());
        }

        let borrowed: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        format!("{}:{}", RESPONSE_PREFIX, fingerprint(&borrowed))
    }
}

/// SHA-256 over length-prefixed fields, hex-encoded and truncated to 128
/// bits. Length prefixes keep adjacent fields from colliding (`"ab","c"`
/// vs `"a","bc"`).
fn fingerprint(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn vary(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_metadata_key_deterministic() {
        let config = Config::default();
        let a = CacheKeyBuilder::metadata_key(&Request::get("/foo"), &config);
        let b = CacheKeyBuilder::metadata_key(&Request::get("/foo"), &config);
        assert_eq!(a, b);
        assert!(a.starts_with("meta:"));
    }

    #[test]
    fn test_metadata_key_ignores_query_and_headers() {
        let config = Config::default();
        let plain = CacheKeyBuilder::metadata_key(&Request::get("/foo"), &config);
        let negotiated = CacheKeyBuilder::metadata_key(
            &Request::get("/foo")
                .with_query("page=2")
                .with_header("Accept-Encoding", "gzip"),
            &config,
        );
        assert_eq!(plain, negotiated);
    }

    #[test]
    fn test_metadata_key_depends_on_path_and_master_salt() {
        let config = Config::default();
        let foo = CacheKeyBuilder::metadata_key(&Request::get("/foo"), &config);
        let bar = CacheKeyBuilder::metadata_key(&Request::get("/bar"), &config);
        assert_ne!(foo, bar);

        let salted = Config::default().with_master_salt("v2");
        let foo_salted = CacheKeyBuilder::metadata_key(&Request::get("/foo"), &salted);
        assert_ne!(foo, foo_salted);
    }

    #[test]
    fn test_response_key_varies_on_listed_header() {
        let config = Config::default();
        let metadata = Metadata::new(vary(&["accept-encoding"]), "s1");

        let gzip = CacheKeyBuilder::response_key(
            &Request::get("/foo").with_header("Accept-Encoding", "gzip"),
            &metadata,
            &config,
        );
        let bare = CacheKeyBuilder::response_key(&Request::get("/foo"), &metadata, &config);
        assert_ne!(gzip, bare);
    }

    #[test]
    fn test_response_key_ignores_unlisted_header() {
        let config = Config::default();
        let metadata = Metadata::new(vary(&["accept-encoding"]), "s1");

        let with_cookie = CacheKeyBuilder::response_key(
            &Request::get("/foo").with_header("Cookie", "session=1"),
            &metadata,
            &config,
        );
        let bare = CacheKeyBuilder::response_key(&Request::get("/foo"), &metadata, &config);
        assert_eq!(with_cookie, bare);
    }

    #[test]
    fn test_response_key_depends_on_salts_and_query() {
        let config = Config::default();
        let metadata = Metadata::new(vary(&[]), "s1");
        let request = Request::get("/foo");

        let base = CacheKeyBuilder::response_key(&request, &metadata, &config);

        let resalted = Metadata::new(vary(&[]), "s2");
        assert_ne!(
            base,
            CacheKeyBuilder::response_key(&request, &resalted, &config)
        );

        let master = Config::default().with_master_salt("v2");
        assert_ne!(
            base,
            CacheKeyBuilder::response_key(&request, &metadata, &master)
        );

        let queried = Request::get("/foo").with_query("a=1");
        assert_ne!(
            base,
            CacheKeyBuilder::response_key(&queried, &metadata, &config)
        );
    }

    #[test]
    fn test_response_key_header_value_order_irrelevant() {
        let config = Config::default();
        let metadata = Metadata::new(vary(&["accept"]), "s1");

        let ab = CacheKeyBuilder::response_key(
            &Request::get("/foo")
                .with_header("Accept", "text/html")
                .with_header("Accept", "application/json"),
            &metadata,
            &config,
        );
        let ba = CacheKeyBuilder::response_key(
            &Request::get("/foo")
                .with_header("Accept", "application/json")
                .with_header("Accept", "text/html"),
            &metadata,
            &config,
        );
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_field_boundaries_do_not_collide() {
        assert_ne!(
            fingerprint(&[b"ab".as_slice(), b"c".as_slice()]),
            fingerprint(&[b"a".as_slice(), b"bc".as_slice()])
        );
        assert_ne!(
            fingerprint(&[b"".as_slice(), b"x".as_slice()]),
            fingerprint(&[b"x".as_slice(), b"".as_slice()])
        );
    }
}

//! Property-based tests for persisted cache records.
//!
//! These tests use proptest to verify that serialization and key
//! derivation properties hold for randomly generated inputs, catching edge
//! cases that example-based tests might miss.
//!
//! # Properties Tested
//!
//! 1. **Roundtrip Property**: from_cache_bytes(to_cache_bytes(x)) == x
//! 2. **Determinism Property**: to_cache_bytes(x) == to_cache_bytes(x)
//! 3. **Envelope Property**: every serialized record carries the correct
//!    magic and version
//! 4. **Key Stability Property**: equal inputs always derive equal keys

use proptest::prelude::*;
use std::collections::BTreeSet;
use webcache_kit::http::{Headers, Request, Response};
use webcache_kit::key::CacheKeyBuilder;
use webcache_kit::serialization::{CACHE_MAGIC, CURRENT_SCHEMA_VERSION};
use webcache_kit::{CacheRecord, CachedResponse, Config, Metadata};

// ============================================================================
// Strategies
// ============================================================================

/// Lowercased header-ish names, as they appear in a vary set.
fn arb_vary() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[a-z][a-z0-9-]{0,20}", 0..6)
}

fn arb_metadata() -> impl Strategy<Value = Metadata> {
    (arb_vary(), "[ -~]{0,40}").prop_map(|(vary, salt)| Metadata::new(vary, salt))
}

fn arb_header_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("[A-Za-z][A-Za-z0-9-]{0,20}", "[ -~]{0,40}"), 0..8)
}

fn arb_cached_response() -> impl Strategy<Value = CachedResponse> {
    (
        100u16..600,
        arb_header_pairs(),
        proptest::collection::vec(any::<u8>(), 0..512),
    )
        .prop_map(|(status, header_pairs, body)| {
            let headers: Headers = header_pairs.into_iter().collect();
            let mut response = Response::new(status).with_body(body);
            *response.headers_mut() = headers;
            CachedResponse::from_response(&response).expect("Body is materialized")
        })
}

// ============================================================================
// Roundtrip and determinism
// ============================================================================

proptest! {
    #[test]
    fn metadata_roundtrip(metadata in arb_metadata()) {
        let bytes = metadata.to_cache_bytes().expect("Serialization should succeed");
        let back = Metadata::from_cache_bytes(&bytes).expect("Deserialization should succeed");
        prop_assert_eq!(&metadata, &back);
        prop_assert_eq!(metadata.salt(), back.salt());
    }

    #[test]
    fn metadata_serialization_deterministic(metadata in arb_metadata()) {
        let bytes1 = metadata.to_cache_bytes().expect("Serialization should succeed");
        let bytes2 = metadata.to_cache_bytes().expect("Serialization should succeed");
        prop_assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn cached_response_roundtrip(entry in arb_cached_response()) {
        let bytes = entry.to_cache_bytes().expect("Serialization should succeed");
        let back = CachedResponse::from_cache_bytes(&bytes).expect("Deserialization should succeed");
        prop_assert_eq!(entry, back);
    }

    #[test]
    fn envelope_carries_magic_and_version(metadata in arb_metadata()) {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct RawEnvelope {
            magic: [u8; 4],
            version: u32,
        }

        let bytes = metadata.to_cache_bytes().expect("Serialization should succeed");
        // The payload trails the envelope header; take_from_bytes tolerates it
        let (raw, _rest): (RawEnvelope, _) =
            postcard::take_from_bytes(&bytes).expect("Envelope should decode");
        prop_assert_eq!(raw.magic, CACHE_MAGIC);
        prop_assert_eq!(raw.version, CURRENT_SCHEMA_VERSION);
    }
}

// ============================================================================
// Key stability
// ============================================================================

proptest! {
    #[test]
    fn metadata_key_stable(path in "/[a-z0-9/]{0,30}", salt in "[ -~]{0,20}") {
        let config = Config::default().with_master_salt(salt);
        let request = Request::get(path);
        prop_assert_eq!(
            CacheKeyBuilder::metadata_key(&request, &config),
            CacheKeyBuilder::metadata_key(&request, &config)
        );
    }

    #[test]
    fn response_key_stable(
        path in "/[a-z0-9/]{0,30}",
        metadata in arb_metadata(),
    ) {
        let config = Config::default();
        let request = Request::get(path);
        prop_assert_eq!(
            CacheKeyBuilder::response_key(&request, &metadata, &config),
            CacheKeyBuilder::response_key(&request, &metadata, &config)
        );
    }

    #[test]
    fn resource_salt_always_separates_keys(
        path in "/[a-z0-9/]{0,30}",
        vary in arb_vary(),
        salt_a in "[a-z0-9]{1,20}",
        salt_b in "[a-z0-9]{1,20}",
    ) {
        prop_assume!(salt_a != salt_b);
        let config = Config::default();
        let request = Request::get(path);
        let a = CacheKeyBuilder::response_key(&request, &Metadata::new(vary.clone(), salt_a), &config);
        let b = CacheKeyBuilder::response_key(&request, &Metadata::new(vary, salt_b), &config);
        prop_assert_ne!(a, b);
    }
}

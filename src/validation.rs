//! Conditional-GET validation: entity tags, `Last-Modified` and the
//! `304 Not Modified` short circuit.

use crate::http::{format_http_date, Request, Response};
use chrono::Utc;
use sha2::{Digest, Sha256};

/// True when the response can carry a computed entity tag: a 2xx status
/// and a fully materialized body.
pub fn can_set_etag(response: &Response) -> bool {
    response.is_success() && !response.is_streaming()
}

/// Computes a content fingerprint of the body and sets it as the entity
/// tag. Stable for identical bytes, so recomputing on the same body yields
/// the same tag. No-op when [`can_set_etag`] is false.
pub fn set_etag(response: &mut Response) {
    let Some(body) = response.body_bytes() else {
        return;
    };
    if !response.is_success() {
        return;
    }
    let tag = format!("\"{}\"", hex::encode(Sha256::digest(body)));
    response.headers_mut().set("ETag", tag);
}

/// Sets `Last-Modified` to the current time if the application did not
/// supply one. Best-effort staleness anchor at response finalization.
pub fn update_last_modified(response: &mut Response) {
    if !response.headers().contains("Last-Modified") {
        response
            .headers_mut()
            .set("Last-Modified", format_http_date(Utc::now()));
    }
}

/// True when the request's `If-None-Match` list contains the response's
/// entity tag. A `*` member matches any tag. Weak-comparison: a `W/`
/// prefix on either side is ignored (RFC 9110 §8.8.3.2).
pub fn if_none_match(request: &Request, response: &Response) -> bool {
    let Some(etag) = response.etag() else {
        return false;
    };

    request
        .headers()
        .get_all("If-None-Match")
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .any(|candidate| candidate == "*" || weak_eq(candidate, etag))
}

fn weak_eq(a: &str, b: &str) -> bool {
    a.strip_prefix("W/").unwrap_or(a) == b.strip_prefix("W/").unwrap_or(b)
}

/// Converts a validated response into its `304 Not Modified` form: the
/// validator headers survive, the body does not. Returns `None` when the
/// response carries no entity tag, in which case the caller falls through
/// to the original response.
pub fn not_modified_response(response: &Response) -> Option<Response> {
    let etag = response.etag()?;

    let mut not_modified = Response::new(304).with_header("ETag", etag);
    if let Some(last_modified) = response.last_modified() {
        not_modified
            .headers_mut()
            .insert("Last-Modified", last_modified);
    }
    Some(not_modified)
}

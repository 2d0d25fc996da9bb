//! Cachability policy: pure decisions over a request/response pair.
//!
//! Nothing here performs I/O or can fail; the engine invokes these by name
//! and acts on the verdict.

use crate::config::Config;
use crate::http::{Request, Response};
use chrono::Utc;

/// Decides whether a response may be persisted for the given request.
///
/// The response is not cacheable when any of the following holds:
///
/// - the body is one-shot/streaming (cannot be safely read twice)
/// - the status is a server error (5xx)
/// - the method is not an idempotent read (only GET/HEAD qualify)
/// - the response declares `Vary: *`
/// - cache-control carries `private`, `no-cache` or `no-store`
/// - cache-control carries `max-age=0`
/// - `Expires` is present but not strictly in the future (an unparseable
///   value counts as already expired)
///
/// A positive `max-age` or a future `Expires` then decides cacheable:
/// explicit freshness wins. With no explicit freshness signal at all, the
/// conservative default applies: cacheable only for query-less requests,
/// and only if the configuration allows it.
pub fn should_cache_response(request: &Request, response: &Response, config: &Config) -> bool {
    if response.is_streaming() {
        return false;
    }
    if response.is_server_error() {
        return false;
    }
    if !request.method().is_safe() {
        return false;
    }
    if response.vary_names().contains("*") {
        return false;
    }

    let cc = response.cache_control_named(&config.cache_control_header_name);
    if cc.private || cc.no_cache || cc.no_store {
        return false;
    }
    if cc.max_age == Some(0) {
        return false;
    }

    if let Some(parsed) = response.expires() {
        // Present Expires decides either way; unparseable counts as past
        return match parsed {
            Some(when) => when > Utc::now(),
            None => false,
        };
    }
    if cc.max_age.is_some() {
        return true;
    }

    request.query_string().is_none() && config.default_cacheable_without_query
}

/// Decides whether a request/response pair invalidates the cached resource.
///
/// True only for a mutating method (POST/PUT/DELETE/PATCH) whose response
/// status does not denote an error: a mutation that failed server-side must
/// not discard cached state.
pub fn should_invalidate_resource(request: &Request, response: &Response) -> bool {
    request.method().is_mutating() && !response.is_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{format_http_date, Method};
    use chrono::Duration;

    fn get_foo() -> Request {
        Request::get("/foo")
    }

    fn cacheable(request: &Request, response: &Response) -> bool {
        should_cache_response(request, response, &Config::default())
    }

    #[test]
    fn test_basic_cachability() {
        let request = get_foo();

        assert!(cacheable(&request, &Response::new(200).with_body("foo")));
        assert!(cacheable(&request, &Response::new(200)));
        assert!(!cacheable(&request, &Response::streaming(200)));
        assert!(!cacheable(&request, &Response::new(500)));
        assert!(!cacheable(
            &request,
            &Response::new(200).with_header("Vary", "*")
        ));
    }

    #[test]
    fn test_unsafe_methods_never_cacheable() {
        let response = Response::new(200).with_body("foo");
        for method in [Method::Post, Method::Put, Method::Delete, Method::Patch] {
            assert!(!cacheable(&Request::new(method, "/foo"), &response));
        }
        assert!(cacheable(&Request::new(Method::Head, "/foo"), &response));
    }

    #[test]
    fn test_cache_control_cachability() {
        let request = get_foo();
        let with_cc = |value: &str| Response::new(200).with_header("Cache-Control", value);

        assert!(cacheable(&request, &with_cc("max-age=10")));
        assert!(!cacheable(&request, &with_cc("max-age=0")));
        assert!(!cacheable(&request, &with_cc("private")));
        assert!(!cacheable(&request, &with_cc("no-cache")));
        assert!(!cacheable(&request, &with_cc("no-store")));
    }

    #[test]
    fn test_renamed_cache_control_header() {
        let config = Config::from_options([("cache_control_header_name", "X-Cache-Control")])
            .expect("Option should be accepted");
        let response = Response::new(200).with_header("X-Cache-Control", "no-store");

        assert!(!should_cache_response(&get_foo(), &response, &config));
        // The standard header name is not consulted under the renamed config
        let standard = Response::new(200).with_header("Cache-Control", "no-store");
        assert!(should_cache_response(&get_foo(), &standard, &config));
    }

    #[test]
    fn test_expires_cachability() {
        let request = get_foo();
        let with_expires = |when| {
            Response::new(200).with_header("Expires", format_http_date(when))
        };

        assert!(!cacheable(
            &request,
            &with_expires(Utc::now() - Duration::seconds(10))
        ));
        assert!(cacheable(
            &request,
            &with_expires(Utc::now() + Duration::seconds(60))
        ));
        // Unparseable Expires counts as already expired
        assert!(!cacheable(
            &request,
            &Response::new(200).with_header("Expires", "0")
        ));
    }

    #[test]
    fn test_past_expires_beats_positive_max_age() {
        let response = Response::new(200)
            .with_header("Cache-Control", "max-age=60")
            .with_header("Expires", format_http_date(Utc::now() - Duration::seconds(10)));
        assert!(!cacheable(&get_foo(), &response));
    }

    #[test]
    fn test_default_cachability() {
        assert!(cacheable(&get_foo(), &Response::new(200)));
        assert!(!cacheable(
            &Request::get("/foo").with_query("bar"),
            &Response::new(200)
        ));
        // Explicit freshness overrides the query-string default
        assert!(cacheable(
            &Request::get("/foo").with_query("bar"),
            &Response::new(200).with_header("Cache-Control", "max-age=10")
        ));
    }

    #[test]
    fn test_default_cachability_disabled_by_config() {
        let config =
            Config::default().with_default_cacheable_without_query(false);
        assert!(!should_cache_response(
            &get_foo(),
            &Response::new(200),
            &config
        ));
        // Explicit freshness still wins
        assert!(should_cache_response(
            &get_foo(),
            &Response::new(200).with_header("Cache-Control", "max-age=10"),
            &config
        ));
    }

    #[test]
    fn test_invalidation_condition() {
        let put = Request::new(Method::Put, "/foo");
        assert!(should_invalidate_resource(&put, &Response::new(200)));
        assert!(should_invalidate_resource(&put, &Response::new(204)));
        assert!(!should_invalidate_resource(&put, &Response::new(500)));
        assert!(!should_invalidate_resource(&put, &Response::new(404)));
        assert!(!should_invalidate_resource(&get_foo(), &Response::new(200)));
    }
}

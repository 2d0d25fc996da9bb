//! Request surface consumed by the caching engine.

use super::Headers;
use std::fmt;
use std::str::FromStr;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    /// Canonical upper-case token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }

    /// True for the idempotent-read methods (GET/HEAD) whose responses are
    /// candidates for caching.
    pub fn is_safe(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }

    /// True for the mutating methods whose successful responses invalidate
    /// cached state for the resource.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Delete | Method::Patch
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("unsupported method: {}", other)),
        }
    }
}

/// The request view the engine operates on: method, path, raw query string
/// and headers. Nothing richer is assumed of the host framework.
///
/// # Example
///
/// ```
/// use webcache_kit::http::{Method, Request};
///
/// let request = Request::new(Method::Get, "/articles/42")
///     .with_query("page=2")
///     .with_header("Accept-Encoding", "gzip");
///
/// assert_eq!(request.path(), "/articles/42");
/// assert_eq!(request.query_string(), Some("page=2"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
}

impl Request {
    /// Creates a request with no query string and no headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: None,
            headers: Headers::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Request::new(Method::Get, path)
    }

    /// Sets the raw query string (without the leading `?`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Appends a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, `None` when the request carries none.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_classes() {
        assert!(Method::Get.is_safe());
        assert!(Method::Head.is_safe());
        assert!(!Method::Put.is_safe());
        assert!(Method::Put.is_mutating());
        assert!(Method::Delete.is_mutating());
        assert!(!Method::Options.is_mutating());
    }

    #[test]
    fn method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn request_builder() {
        let r = Request::get("/foo")
            .with_query("a=1")
            .with_header("Accept", "text/html");
        assert_eq!(r.method(), Method::Get);
        assert_eq!(r.query_string(), Some("a=1"));
        assert_eq!(r.headers().get("accept"), Some("text/html"));
    }

    #[test]
    fn request_without_query() {
        let r = Request::get("/foo");
        assert_eq!(r.query_string(), None);
    }
}

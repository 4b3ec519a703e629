//! Request and response snapshot types.
//!
//! These are the proxy's view of an intercepted exchange: enough of the
//! request to compute cache identity and enough of the response to store
//! and replay it. Bodies are immutable `Bytes` snapshots, so a response
//! can be cloned for cache population without consuming the copy handed
//! back to the caller.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Method, StatusCode};
use url::Url;

/// How the intercepted request was issued by the page.
///
/// Only `Navigate` changes the proxy's behavior (offline navigations fall
/// back to the cached entry document); the other variants mirror the host's
/// fetch-mode vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level page navigation
    Navigate,
    /// Same-origin subresource request
    SameOrigin,
    /// Cross-origin request without CORS
    NoCors,
    /// Cross-origin request with CORS
    Cors,
}

impl Default for RequestMode {
    fn default() -> Self {
        Self::Cors
    }
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,

    /// Absolute request URL
    pub url: Url,

    /// Fetch mode as reported by the host
    pub mode: RequestMode,
}

impl Request {
    /// Create a GET request with the default fetch mode.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::default(),
        }
    }

    /// Create a top-level navigation request.
    pub fn navigation(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::Navigate,
        }
    }

    /// Set the fetch mode.
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether this request is a top-level page navigation.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Cache identity of this request: method plus full URL.
    ///
    /// Two requests with the same key hit the same cache entry.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// A stored or synthesized response snapshot.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a response with the given status and an empty body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Create a 200 response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Whether this response is stored back into the cache on the
    /// same-origin miss path. Exactly 200, not the whole 2xx class.
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }
}

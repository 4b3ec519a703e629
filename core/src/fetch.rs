//! Network fetch seam.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{ProxyError, Result};
use crate::http::{Request, Response};

/// The host's network fetch primitive.
///
/// An `Err` means the fetch itself failed (offline, DNS, connection
/// refused); an HTTP error status is still an `Ok` response.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    /// Perform the network fetch for the given request.
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// Production fetcher over a reqwest client.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher over an existing client (shared pools, custom TLS).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkFetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let resp = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .send()
            .await
            .map_err(|e| {
                ProxyError::FetchError(format!("{} {}: {}", request.method, request.url, e))
            })?;

        let status = resp.status();
        let mut headers = HashMap::new();
        for (name, value) in resp.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.to_string(), value.to_string());
            }
        }

        let body = resp.bytes().await.map_err(|e| {
            ProxyError::FetchError(format!("Reading body of {}: {}", request.url, e))
        })?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

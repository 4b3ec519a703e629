//! The cache proxy itself: install, activate, fetch interception, and the
//! control-message plane.
//!
//! Interception is cache-first. Same-origin requests are served from the
//! current cache generation when possible; network responses repopulate the
//! cache opportunistically. Every failure is absorbed into a well-formed
//! (if degraded) response, so no intercepted request ever surfaces a
//! proxy-internal error to the page.

use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use http::StatusCode;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};
use crate::fetch::NetworkFetch;
use crate::http::{Request, Response};
use crate::lifecycle::{HostSignal, SignalEmitter};
use crate::message::{ControlMessage, MessageEvent, VersionReply};
use crate::store::{Cache, CacheStorage};

/// Offline-first caching proxy for a single origin.
pub struct CacheProxy {
    config: ProxyConfig,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetch>,
    signals: SignalEmitter,
}

impl CacheProxy {
    /// Create a proxy over the given storage registry and fetcher.
    pub fn new(
        config: ProxyConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetch>,
    ) -> Self {
        Self {
            config,
            storage,
            fetcher,
            signals: SignalEmitter::new(16),
        }
    }

    /// The current cache generation identifier.
    pub fn version(&self) -> &str {
        &self.config.cache_name
    }

    /// This proxy's configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Host signals emitted by this proxy.
    pub fn signals(&self) -> &SignalEmitter {
        &self.signals
    }

    /// Install procedure: pre-warm the cache with the asset list.
    ///
    /// If warming the full list fails, falls back to the two essential
    /// assets; if that fails too, the failure is logged and swallowed so
    /// installation always completes. Ends by signaling the host to skip
    /// the waiting phase.
    pub async fn install(&self) {
        tracing::info!(cache = %self.config.cache_name, "Installing proxy version");

        if let Err(e) = self.pre_warm(&self.config.assets).await {
            tracing::warn!(error = %e, "Pre-warm failed, retrying with essential assets only");
            if let Err(e) = self.pre_warm(&self.config.essential_assets).await {
                tracing::warn!(error = %e, "Essential pre-warm failed, installing with a cold cache");
            }
        }

        self.signals.emit(HostSignal::SkipWaiting);
    }

    /// Activate procedure: delete every cache generation except the
    /// current one, then signal the host to claim open pages.
    ///
    /// Deletions run concurrently and independently; one failure never
    /// blocks the others or activation itself.
    pub async fn activate(&self) {
        tracing::info!(cache = %self.config.cache_name, "Activating proxy version");

        match self.storage.keys().await {
            Ok(names) => {
                let stale: Vec<String> = names
                    .into_iter()
                    .filter(|name| *name != self.config.cache_name)
                    .collect();
                let deletions = stale.iter().map(|name| async move {
                    match self.storage.delete(name).await {
                        Ok(_) => {
                            tracing::debug!(cache = %name, "Deleted stale cache generation");
                        }
                        Err(e) => {
                            tracing::warn!(cache = %name, error = %e, "Failed to delete stale cache generation");
                        }
                    }
                });
                join_all(deletions).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to enumerate cache generations");
            }
        }

        self.signals.emit(HostSignal::ClaimClients);
        self.signals.emit(HostSignal::Activated);
    }

    /// Fetch interception: decide between cache, network, and synthesized
    /// fallback. Always yields a response.
    pub async fn handle_fetch(&self, request: &Request) -> Response {
        if request.url.origin() == self.config.scope.origin() {
            self.handle_same_origin(request).await
        } else {
            self.handle_cross_origin(request).await
        }
    }

    /// Control-message handler.
    pub fn handle_message(&self, event: MessageEvent) {
        match event.data {
            ControlMessage::SkipWaiting => {
                tracing::info!("Skip-waiting requested by a client");
                self.signals.emit(HostSignal::SkipWaiting);
            }
            ControlMessage::GetVersion => {
                if let Some(port) = event.reply_port {
                    let _ = port.send(VersionReply {
                        version: self.config.cache_name.clone(),
                    });
                }
            }
            ControlMessage::Unknown => {
                tracing::debug!("Ignoring unrecognized control message");
            }
        }
    }

    /// Fetch and store every listed asset into the current generation.
    ///
    /// Fails if any asset is unreachable or answers outside the 2xx class,
    /// leaving whatever was already stored in place.
    async fn pre_warm(&self, assets: &[String]) -> Result<()> {
        let store = self.storage.open(&self.config.cache_name).await?;
        try_join_all(
            assets
                .iter()
                .map(|locator| self.warm_asset(&store, locator)),
        )
        .await?;
        Ok(())
    }

    async fn warm_asset(&self, store: &Arc<dyn Cache>, locator: &str) -> Result<()> {
        let request = Request::get(self.config.resolve(locator)?);
        let response = self.fetcher.fetch(&request).await?;
        if !response.status.is_success() {
            return Err(ProxyError::FetchError(format!(
                "Pre-warm of {} answered {}",
                request.url, response.status
            )));
        }
        store.put(&request, response).await
    }

    async fn handle_same_origin(&self, request: &Request) -> Response {
        let store = self.open_store().await;

        if let Some(store) = &store {
            if let Some(hit) = self.lookup(store, request).await {
                tracing::debug!(url = %request.url, "Serving from cache");
                return hit;
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    if let Some(store) = store {
                        // Fire-and-forget: the caller sees the response
                        // before the cache write is guaranteed to land.
                        let request = request.clone();
                        let copy = response.clone();
                        tokio::spawn(async move {
                            if let Err(e) = store.put(&request, copy).await {
                                tracing::warn!(url = %request.url, error = %e, "Failed to cache network response");
                            }
                        });
                    }
                }
                response
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "Same-origin fetch failed");
                if request.is_navigation() {
                    self.entry_document_fallback(store.as_ref()).await
                } else {
                    Response::empty(StatusCode::NOT_FOUND)
                }
            }
        }
    }

    async fn handle_cross_origin(&self, request: &Request) -> Response {
        if let Some(store) = self.open_store().await {
            if let Some(hit) = self.lookup(&store, request).await {
                tracing::debug!(url = %request.url, "Serving cross-origin resource from cache");
                return hit;
            }
        }

        match self.fetcher.fetch(request).await {
            // Cross-origin responses are returned as-is and never re-cached.
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "Cross-origin fetch failed, synthesizing empty 200");
                Response::empty(StatusCode::OK)
            }
        }
    }

    /// Offline navigation substitute: the cached entry document, or an
    /// empty 404 when it was never stored.
    async fn entry_document_fallback(&self, store: Option<&Arc<dyn Cache>>) -> Response {
        if let Some(store) = store {
            match self.config.resolve(self.config.entry_document()) {
                Ok(url) => {
                    if let Some(hit) = self.lookup(store, &Request::get(url)).await {
                        tracing::debug!("Serving cached entry document for offline navigation");
                        return hit;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Entry document locator did not resolve");
                }
            }
        }
        Response::empty(StatusCode::NOT_FOUND)
    }

    async fn open_store(&self) -> Option<Arc<dyn Cache>> {
        match self.storage.open(&self.config.cache_name).await {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "Cache store unavailable");
                None
            }
        }
    }

    async fn lookup(&self, store: &Arc<dyn Cache>, request: &Request) -> Option<Response> {
        match store.match_request(request).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }
}

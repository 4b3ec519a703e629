//! Cache store seams and the in-memory implementation.
//!
//! The host environment owns durable storage; the proxy only ever talks to
//! it through the [`CacheStorage`] registry (named stores, create / list /
//! delete) and the per-store [`Cache`] handle (match / put). `MemoryStorage`
//! is the bundled implementation: a DashMap-backed registry with per-key
//! atomicity, used by embedders without a durable host cache and by the
//! test suite.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::Result;
use crate::http::{Request, Response};

/// A single named cache store: request identity to stored response.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a stored response for the given request.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>>;

    /// Store a response snapshot keyed by the given request.
    ///
    /// Replaces any existing entry for the same request identity.
    async fn put(&self, request: &Request, response: Response) -> Result<()>;
}

/// Registry of named cache stores, one per cache generation.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open the store with the given name, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>>;

    /// List the names of all existing stores.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete the store with the given name.
    ///
    /// Returns `true` if a store existed and was removed.
    async fn delete(&self, name: &str) -> Result<bool>;
}

/// A cached response plus its metadata.
#[derive(Debug, Clone)]
struct StoredEntry {
    response: Response,
    /// When this entry was written
    stored_at: DateTime<Utc>,
}

/// In-memory cache store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, StoredEntry>,
}

impl MemoryCache {
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the entry for the given request was stored, if present.
    pub fn stored_at(&self, request: &Request) -> Option<DateTime<Utc>> {
        self.entries
            .get(&request.cache_key())
            .map(|entry| entry.stored_at)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>> {
        Ok(self
            .entries
            .get(&request.cache_key())
            .map(|entry| entry.response.clone()))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<()> {
        self.entries.insert(
            request.cache_key(),
            StoredEntry {
                response,
                stored_at: Utc::now(),
            },
        );
        Ok(())
    }
}

/// In-memory registry of named cache stores.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stores: DashMap<String, Arc<MemoryCache>>,
}

impl MemoryStorage {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of existing stores.
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>> {
        let cache = self
            .stores
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(cache as Arc<dyn Cache>)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.stores.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.stores.remove(name).is_some())
    }
}

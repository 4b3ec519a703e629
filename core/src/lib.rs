//! Offcache Core - Offline-First Cache Proxy Engine
//!
//! This crate provides the cache-first request interception engine for a
//! single-page application: install-time cache pre-warming, activation-time
//! garbage collection of stale cache generations, per-request cache / network
//! / fallback decisions, and a minimal control plane for pages.

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod proxy;
pub mod store;

// Re-export commonly used types
pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use fetch::{HttpFetcher, NetworkFetch};
pub use http::{Request, RequestMode, Response};
pub use lifecycle::{HostSignal, SignalEmitter};
pub use message::{ControlMessage, MessageEvent, VersionReply};
pub use proxy::CacheProxy;
pub use store::{Cache, CacheStorage, MemoryCache, MemoryStorage};

/// Offcache version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

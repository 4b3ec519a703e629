use url::Url;

use crate::error::{ProxyError, Result};

/// Relative assets every installation can fall back to: the app shell root
/// and the entry document, in that order.
pub const ESSENTIAL_ASSETS: [&str; 2] = ["./", "./index.html"];

/// Proxy configuration
///
/// Constructed in code by the embedder; there is no config file or
/// environment surface. The cache name doubles as the cache generation
/// identifier: it must change whenever a new proxy version ships, and the
/// activation step deletes every store named differently.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Cache generation identifier, used as the cache store name
    pub cache_name: String,

    /// Origin this proxy serves; requests whose origin differs are
    /// treated as cross-origin
    pub scope: Url,

    /// Pre-warm set: relative paths resolved against the scope, or
    /// absolute cross-origin URLs
    pub assets: Vec<String>,

    /// Minimal pre-warm set used when warming the full asset list fails
    pub essential_assets: [String; 2],
}

impl ProxyConfig {
    /// Create a configuration for the given generation name and scope.
    ///
    /// Starts with the default asset list (shell root, entry document,
    /// app manifest); extend it with [`with_assets`](Self::with_assets).
    pub fn new(cache_name: impl Into<String>, scope: Url) -> Self {
        Self {
            cache_name: cache_name.into(),
            scope,
            assets: vec![
                "./".to_string(),
                "./index.html".to_string(),
                "./manifest.json".to_string(),
            ],
            essential_assets: ESSENTIAL_ASSETS.map(String::from),
        }
    }

    /// Replace the pre-warm asset list.
    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    /// The entry document locator (offline navigation substitute).
    pub fn entry_document(&self) -> &str {
        &self.essential_assets[1]
    }

    /// Resolve an asset locator to an absolute URL.
    ///
    /// Relative locators resolve against the scope; absolute locators
    /// (cross-origin pre-warm entries) pass through unchanged.
    pub fn resolve(&self, locator: &str) -> Result<Url> {
        self.scope.join(locator).map_err(|e| {
            ProxyError::ConfigError(format!("Unresolvable asset locator '{}': {}", locator, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProxyConfig {
        ProxyConfig::new("offcache-v1", Url::parse("https://app.example/pwa/").unwrap())
    }

    #[test]
    fn test_default_assets_include_essentials() {
        let config = config();
        for essential in &config.essential_assets {
            assert!(config.assets.contains(essential));
        }
        assert_eq!(config.entry_document(), "./index.html");
    }

    #[test]
    fn test_resolve_relative_asset() {
        let config = config();
        assert_eq!(
            config.resolve("./index.html").unwrap().as_str(),
            "https://app.example/pwa/index.html"
        );
        assert_eq!(
            config.resolve("./").unwrap().as_str(),
            "https://app.example/pwa/"
        );
    }

    #[test]
    fn test_resolve_absolute_asset_passes_through() {
        let config = config();
        let url = config
            .resolve("https://fonts.example/css2?family=Inter")
            .unwrap();
        assert_eq!(url.as_str(), "https://fonts.example/css2?family=Inter");
    }

    #[test]
    fn test_with_assets_replaces_list() {
        let config = config().with_assets(vec!["./app.js".to_string()]);
        assert_eq!(config.assets, vec!["./app.js"]);
    }
}

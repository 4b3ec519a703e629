use thiserror::Error;

/// Offcache error types
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Network fetch failed (connection refused, DNS failure, offline)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Cache store operation failed
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Configuration error (bad scope URL, unresolvable asset locator)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias using ProxyError
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProxyError::FetchError("connection refused".to_string());
        assert_eq!(err.to_string(), "Fetch error: connection refused");

        let err = ProxyError::CacheError("store unavailable".to_string());
        assert_eq!(err.to_string(), "Cache error: store unavailable");
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ProxyError = json_err.into();
        assert!(matches!(err, ProxyError::SerializationError(_)));
    }
}

//! Error types for hostsync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for hostsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hostsync
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing fields, unreadable or malformed file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inventory source errors (malformed listing, missing catalog entries)
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP client errors (from cloud APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Publish errors (temp file creation, write, rename)
    #[error("Publish error: {0}")]
    Publish(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an inventory error
    pub fn inventory(msg: impl Into<String>) -> Self {
        Self::Inventory(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a publish error
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error should be reported as a configuration failure
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_config() {
        assert!(Error::config("missing domain").is_config());
        assert!(!Error::auth("rejected").is_config());
        assert!(!Error::publish("rename failed").is_config());
        assert!(!Error::provider("openstack", "500").is_config());
    }

    #[test]
    fn test_json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }

    #[test]
    fn test_provider_display_names_provider() {
        let err = Error::provider("openstack", "Server listing failed: 500");
        assert_eq!(
            err.to_string(),
            "Provider error (openstack): Server listing failed: 500"
        );
    }
}

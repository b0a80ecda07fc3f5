//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Veridian API key id.
///
/// This newtype ensures the key id is non-empty and provides type safety
/// to prevent accidental misuse of raw strings.
///
/// # Example
///
/// ```rust
/// use veridian_api::ApiKeyId;
///
/// let id = ApiKeyId::new("my-key-id").unwrap();
/// assert_eq!(id.as_ref(), "my-key-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Creates a new validated API key id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKeyId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyApiKeyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ApiKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Veridian API key secret.
///
/// This newtype ensures the secret is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ApiKeySecret(*****)` instead of the actual secret.
///
/// # Example
///
/// ```rust
/// use veridian_api::ApiKeySecret;
///
/// let secret = ApiKeySecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiKeySecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySecret(String);

impl ApiKeySecret {
    /// Creates a new validated API key secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKeySecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyApiKeySecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ApiKeySecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKeySecret(*****)")
    }
}

/// A validated service base URL.
///
/// This newtype validates and normalizes the base URL all relative request
/// paths are resolved against. A trailing slash is stripped so paths can be
/// joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use veridian_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api.veridian.io/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.veridian.io/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// The production Veridian API base URL.
    pub const PRODUCTION: &'static str = "https://api.veridian.io/v1";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not an absolute
    /// http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }
        // Require a host after the scheme
        let rest = url.split_once("://").map_or("", |(_, rest)| rest);
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(url))
    }

    /// Returns the production base URL.
    #[must_use]
    pub fn production() -> Self {
        Self(Self::PRODUCTION.to_string())
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_id_accepts_non_empty() {
        let id = ApiKeyId::new("ABC123").unwrap();
        assert_eq!(id.as_ref(), "ABC123");
    }

    #[test]
    fn test_api_key_id_rejects_empty() {
        assert!(matches!(ApiKeyId::new(""), Err(ConfigError::EmptyApiKeyId)));
    }

    #[test]
    fn test_api_key_secret_rejects_empty() {
        assert!(matches!(
            ApiKeySecret::new(""),
            Err(ConfigError::EmptyApiKeySecret)
        ));
    }

    #[test]
    fn test_api_key_secret_debug_is_masked() {
        let secret = ApiKeySecret::new("super-secret-value").unwrap();
        let debug = format!("{secret:?}");
        assert_eq!(debug, "ApiKeySecret(*****)");
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("https://api.veridian.io/v1/").unwrap();
        assert_eq!(url.as_ref(), "https://api.veridian.io/v1");
    }

    #[test]
    fn test_base_url_accepts_http_for_local_testing() {
        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.as_ref(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            BaseUrl::new("ftp://api.veridian.io"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            BaseUrl::new("api.veridian.io"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_rejects_missing_host() {
        assert!(matches!(
            BaseUrl::new("https://"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_production_base_url() {
        assert_eq!(BaseUrl::production().as_ref(), "https://api.veridian.io/v1");
    }
}

//! Configuration types for the Veridian API SDK.
//!
//! This module provides the core configuration types used to initialize
//! and configure the SDK for API communication with the Veridian identity
//! service.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiConfig`]: The main configuration struct holding all SDK settings
//! - [`ApiConfigBuilder`]: A builder for constructing [`ApiConfig`] instances
//! - [`ApiKeyId`]: A validated API key id newtype
//! - [`ApiKeySecret`]: A validated API key secret newtype with masked debug output
//! - [`BaseUrl`]: A validated service base URL
//!
//! # Example
//!
//! ```rust
//! use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret};
//!
//! let config = ApiConfig::builder()
//!     .api_key_id(ApiKeyId::new("my-key-id").unwrap())
//!     .api_key_secret(ApiKeySecret::new("my-secret").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiKeyId, ApiKeySecret, BaseUrl};

use crate::error::ConfigError;

/// Default number of items requested per collection page.
pub const DEFAULT_PAGE_LIMIT: usize = 25;

/// Configuration for the Veridian API SDK.
///
/// This struct holds all configuration needed for SDK operations: the API
/// key pair used to sign requests, the service base URL, and collection
/// paging defaults.
///
/// # Thread Safety
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret, BaseUrl};
///
/// let config = ApiConfig::builder()
///     .api_key_id(ApiKeyId::new("id").unwrap())
///     .api_key_secret(ApiKeySecret::new("secret").unwrap())
///     .base_url(BaseUrl::new("https://api.veridian.io/v1").unwrap())
///     .page_limit(50)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.page_limit(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct ApiConfig {
    api_key_id: ApiKeyId,
    api_key_secret: ApiKeySecret,
    base_url: BaseUrl,
    page_limit: usize,
    user_agent_prefix: Option<String>,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret};
    ///
    /// let config = ApiConfig::builder()
    ///     .api_key_id(ApiKeyId::new("id").unwrap())
    ///     .api_key_secret(ApiKeySecret::new("secret").unwrap())
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Builds a configuration from the `VERIDIAN_API_KEY_ID` and
    /// `VERIDIAN_API_KEY_SECRET` environment variables.
    ///
    /// The base URL defaults to production and may be overridden with
    /// `VERIDIAN_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if either credential variable
    /// is unset, or the underlying validation error if a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let id = std::env::var("VERIDIAN_API_KEY_ID")
            .map_err(|_| ConfigError::MissingEnvVar {
                name: "VERIDIAN_API_KEY_ID",
            })?;
        let secret =
            std::env::var("VERIDIAN_API_KEY_SECRET").map_err(|_| ConfigError::MissingEnvVar {
                name: "VERIDIAN_API_KEY_SECRET",
            })?;

        let mut builder = Self::builder()
            .api_key_id(ApiKeyId::new(id)?)
            .api_key_secret(ApiKeySecret::new(secret)?);

        if let Ok(url) = std::env::var("VERIDIAN_BASE_URL") {
            builder = builder.base_url(BaseUrl::new(url)?);
        }

        builder.build()
    }

    /// Returns the API key id.
    #[must_use]
    pub const fn api_key_id(&self) -> &ApiKeyId {
        &self.api_key_id
    }

    /// Returns the API key secret.
    #[must_use]
    pub const fn api_key_secret(&self) -> &ApiKeySecret {
        &self.api_key_secret
    }

    /// Returns the service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default collection page limit.
    #[must_use]
    pub const fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// Builder for constructing [`ApiConfig`] instances.
///
/// This builder provides a fluent API for configuring the SDK. Required
/// fields are `api_key_id` and `api_key_secret`. All other fields have
/// sensible defaults.
///
/// # Defaults
///
/// - `base_url`: the production Veridian API
/// - `page_limit`: [`DEFAULT_PAGE_LIMIT`]
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret, BaseUrl};
///
/// let config = ApiConfig::builder()
///     .api_key_id(ApiKeyId::new("id").unwrap())
///     .api_key_secret(ApiKeySecret::new("secret").unwrap())
///     .base_url(BaseUrl::new("https://api.veridian.io/v1").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    api_key_id: Option<ApiKeyId>,
    api_key_secret: Option<ApiKeySecret>,
    base_url: Option<BaseUrl>,
    page_limit: Option<usize>,
    user_agent_prefix: Option<String>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key id (required).
    #[must_use]
    pub fn api_key_id(mut self, id: ApiKeyId) -> Self {
        self.api_key_id = Some(id);
        self
    }

    /// Sets the API key secret (required).
    #[must_use]
    pub fn api_key_secret(mut self, secret: ApiKeySecret) -> Self {
        self.api_key_secret = Some(secret);
        self
    }

    /// Sets the service base URL.
    ///
    /// Point this at a local mock server in tests.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the default collection page limit.
    #[must_use]
    pub const fn page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ApiConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key_id` or
    /// `api_key_secret` are not set.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let api_key_id = self.api_key_id.ok_or(ConfigError::MissingRequiredField {
            field: "api_key_id",
        })?;
        let api_key_secret = self
            .api_key_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_key_secret",
            })?;

        Ok(ApiConfig {
            api_key_id,
            api_key_secret,
            base_url: self.base_url.unwrap_or_else(BaseUrl::production),
            page_limit: self.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

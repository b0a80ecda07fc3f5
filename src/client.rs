//! The top-level API client.
//!
//! [`ApiClient`] owns the HTTP transport and configuration, and hands out
//! typed entry points into the resource graph. It is cheap to share by
//! reference; every resource operation borrows it for the duration of one
//! call.

use crate::clients::HttpClient;
use crate::config::ApiConfig;
use crate::error::ConfigError;
use crate::resources::{
    Account, Application, Directory, Group, Href, ResourceError, ResourceModel, Tenant,
};

/// Client for the Veridian identity API.
///
/// # Example
///
/// ```rust,ignore
/// use veridian_api::{ApiClient, ApiConfig, ApiKeyId, ApiKeySecret};
///
/// let config = ApiConfig::builder()
///     .api_key_id(ApiKeyId::new("id")?)
///     .api_key_secret(ApiKeySecret::new("secret")?)
///     .build()?;
/// let client = ApiClient::new(config);
///
/// let mut tenant = client.current_tenant().await?;
/// println!("tenant: {}", tenant.name(&client).await?);
/// ```
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client for the given configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        tracing::debug!(base_url = %config.base_url(), "constructing API client");
        Self {
            http: HttpClient::new(&config),
            config,
        }
    }

    /// Creates a client from the `VERIDIAN_API_KEY_ID` /
    /// `VERIDIAN_API_KEY_SECRET` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a credential variable is missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Fetches the tenant the configured API key belongs to.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error, or a materialization error
    /// for a malformed body.
    pub async fn current_tenant(&self) -> Result<Tenant, ResourceError> {
        const PATH: &str = "tenants/current";
        let response = self
            .http
            .get(PATH, None)
            .await
            .map_err(|err| ResourceError::from_http(err, Tenant::KIND.as_str(), PATH))?;
        Tenant::materialize(&response.body)
    }

    /// Returns an unfetched handle for an application href.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the href does not denote an application.
    pub fn application(&self, href: Href) -> Result<Application, ResourceError> {
        Application::from_href(href)
    }

    /// Returns an unfetched handle for a directory href.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the href does not denote a directory.
    pub fn directory(&self, href: Href) -> Result<Directory, ResourceError> {
        Directory::from_href(href)
    }

    /// Returns an unfetched handle for an account href.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the href does not denote an account.
    pub fn account(&self, href: Href) -> Result<Account, ResourceError> {
        Account::from_href(href)
    }

    /// Returns an unfetched handle for a group href.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the href does not denote a group.
    pub fn group(&self, href: Href) -> Result<Group, ResourceError> {
        Group::from_href(href)
    }
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

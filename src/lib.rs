//! # Veridian API Rust SDK
//!
//! A Rust SDK for the Veridian cloud identity service, modeling accounts,
//! applications, directories, groups and related resources, and driving the
//! authentication, password-reset and group-membership workflows against
//! the remote API.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ApiConfig`] and [`ApiConfigBuilder`]
//! - Validated newtypes for API credentials and URLs
//! - A generic resource layer with lazy fetch-on-access, dirty-field
//!   tracking and href-based identity ([`resources::Resource`])
//! - Lazily paginated, functionally composable collections
//!   ([`resources::Collection`])
//! - Polymorphic reference resolution through an href-pattern registry
//!   ([`resources::registry`])
//! - Domain resources with authentication, password-reset and
//!   group-membership operations
//!
//! ## Quick Start
//!
//! ```rust
//! use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret};
//!
//! // Create configuration using the builder pattern
//! let config = ApiConfig::builder()
//!     .api_key_id(ApiKeyId::new("your-key-id").unwrap())
//!     .api_key_secret(ApiKeySecret::new("your-key-secret").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Walking the resource graph
//!
//! ```rust,ignore
//! use veridian_api::{ApiClient, ApiConfig};
//! use veridian_api::resources::ResourceModel;
//!
//! let client = ApiClient::new(ApiConfig::from_env()?);
//!
//! // The tenant the API key belongs to
//! let mut tenant = client.current_tenant().await?;
//!
//! // Lazily paginated collections with functional query composition
//! let directories = tenant.directories(&client).await?;
//! let mut matching = directories.query([("name", "Staff*")]).items();
//! while let Some(mut directory) = matching.next(&client).await? {
//!     println!("{}", directory.name(&client).await?);
//! }
//! ```
//!
//! ## Authentication
//!
//! ```rust,ignore
//! let app = client.application(app_href)?;
//! let result = app.authenticate_account(&client, "jlpicard", "Engage!9").await?;
//! println!("authenticated: {}", result.account().href().unwrap());
//! ```
//!
//! ## Password reset
//!
//! The reset workflow is a three-step state machine over single-use tokens:
//!
//! ```rust,ignore
//! // 1. request: create a token tied to an email
//! let token = app
//!     .password_reset_tokens()?
//!     .create(&client, serde_json::json!({"email": "jlpicard@example.com"}))
//!     .await?;
//!
//! // 2. verify: exchange the token for the owning account
//! let account = app.verify_password_reset_token(&client, &token_value).await?;
//!
//! // 3. consume: submit the new password, invalidating the token
//! app.reset_account_password(&client, &token_value, "Engage!10").await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction, and
//!   unregistered reference patterns are hard errors
//! - **No hidden I/O policy**: the core never retries, never caches across
//!   requests and never recovers from an error on its own
//! - **Href identity**: resources are equal when their hrefs are equal;
//!   there is no in-memory singleton cache
//! - **Async-first**: designed for use with the Tokio runtime

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod resources;

// Re-export public types at crate root for convenience
pub use client::ApiClient;
pub use config::{ApiConfig, ApiConfigBuilder, ApiKeyId, ApiKeySecret, BaseUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export the resource layer's core types
pub use resources::{
    Account, Application, AuthenticationResult, Collection, CustomData, Directory, Group,
    GroupMembership, GroupSelector, GuardedDataModel, Href, InvalidHrefError, LoadState,
    PasswordResetToken, ProviderData, Resource, ResourceError, ResourceKind, ResourceModel,
    ResourceStatus, Tenant, TypedResource,
};

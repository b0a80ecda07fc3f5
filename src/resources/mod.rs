//! Resource abstractions for the Veridian API.
//!
//! This module is the heart of the SDK. The generic layer provides:
//!
//! - **[`Resource`]**: one remote JSON object mirrored locally, with
//!   href-based identity, lazy fetch-on-first-access, dirty-field tracking
//!   and explicit load state
//! - **[`Collection`]**: a lazily paginated, functionally composable query
//!   view over a server-side list
//! - **[`registry`]**: the ordered href-pattern table that resolves
//!   embedded references to concrete types, failing fast on unregistered
//!   patterns
//! - **[`ResourceError`]**: the full error taxonomy, from transport
//!   failures to reserved-key guards
//!
//! The domain types ([`Account`], [`Application`], [`Directory`],
//! [`Group`], [`Tenant`], ...) are thin wrappers over the generic layer
//! adding typed accessors and the authentication, password-reset and
//! group-membership workflows.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::{ApiClient, ApiConfig};
//! use veridian_api::resources::ResourceModel;
//!
//! let client = ApiClient::new(ApiConfig::from_env()?);
//! let mut tenant = client.current_tenant().await?;
//!
//! let mut apps = tenant.applications(&client).await?.items();
//! while let Some(mut app) = apps.next(&client).await? {
//!     println!("{}", app.name(&client).await?);
//! }
//! ```

mod account;
mod application;
mod base;
mod collection;
mod common;
mod custom_data;
mod directory;
mod errors;
mod group;
mod href;
mod tenant;
mod token;

pub mod registry;

// Public exports
pub use account::Account;
pub use application::Application;
pub use base::{LoadState, Resource, ResourceModel};
pub use collection::{Collection, ItemsCursor};
pub use common::ResourceStatus;
pub use custom_data::{CustomData, GuardedDataModel, ProviderData, RESERVED_KEYS};
pub use directory::Directory;
pub use errors::ResourceError;
pub use group::{Group, GroupMembership, GroupSelector};
pub use href::{Href, InvalidHrefError};
pub use registry::{ResourceKind, TypedResource};
pub use tenant::Tenant;
pub use token::{AuthenticationResult, PasswordResetToken};

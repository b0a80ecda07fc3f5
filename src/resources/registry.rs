//! Href-pattern registry for polymorphic reference resolution.
//!
//! Any JSON value shaped like `{"href": "...", ...}` is a reference to
//! another resource. This module decides which concrete resource type a
//! reference denotes by matching the href against an ordered, static table
//! of path-segment patterns.
//!
//! # Resolution rules
//!
//! - Patterns are checked in declaration order, most specific first:
//!   sub-resource segments (`/customData`) and longer segments
//!   (`/groupMemberships/`) are listed before the parent patterns that
//!   their hrefs also contain (`/accounts/`, `/groups/`).
//! - The first matching entry wins.
//! - An href matching no entry is a hard error
//!   ([`ResourceError::UnknownResourceType`]); there is no fallback to an
//!   untyped value, so typed behavior (e.g. `Account::is_enabled`) can
//!   never be silently lost.
//!
//! # Example
//!
//! ```rust
//! use veridian_api::resources::{registry, ResourceKind, TypedResource};
//! use serde_json::json;
//!
//! let reference = json!({"href": "https://api.veridian.io/v1/groups/g1"});
//! let resolved = registry::resolve(&reference).unwrap();
//! assert_eq!(resolved.kind(), ResourceKind::Group);
//! assert!(matches!(resolved, TypedResource::Group(_)));
//! ```

use serde_json::Value;

use crate::resources::account::Account;
use crate::resources::application::Application;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::custom_data::{CustomData, ProviderData};
use crate::resources::directory::Directory;
use crate::resources::errors::ResourceError;
use crate::resources::group::{Group, GroupMembership};
use crate::resources::href::Href;
use crate::resources::tenant::Tenant;
use crate::resources::token::PasswordResetToken;

/// The concrete resource types the registry can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A login-capable account.
    Account,
    /// An application accounts authenticate against.
    Application,
    /// An account and group store.
    Directory,
    /// A named group of accounts within a directory.
    Group,
    /// The association between an account and a group.
    GroupMembership,
    /// The top-level tenant owning all other resources.
    Tenant,
    /// Free-form key-value data attached to an owning resource.
    CustomData,
    /// Identity-provider data attached to an account.
    ProviderData,
    /// A single-use password-reset token.
    PasswordResetToken,
}

impl ResourceKind {
    /// Returns the kind name as used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Application => "Application",
            Self::Directory => "Directory",
            Self::Group => "Group",
            Self::GroupMembership => "GroupMembership",
            Self::Tenant => "Tenant",
            Self::CustomData => "CustomData",
            Self::ProviderData => "ProviderData",
            Self::PasswordResetToken => "PasswordResetToken",
        }
    }
}

/// One entry in the href-pattern registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The path-segment pattern matched against the href.
    pub pattern: &'static str,
    /// The resource type hrefs matching the pattern resolve to.
    pub kind: ResourceKind,
}

impl RegistryEntry {
    const fn new(pattern: &'static str, kind: ResourceKind) -> Self {
        Self { pattern, kind }
    }
}

/// The href-pattern registry, checked in order.
///
/// Sub-resource and multi-segment patterns come first so that e.g.
/// `/accounts/a1/customData` resolves to [`ResourceKind::CustomData`]
/// rather than [`ResourceKind::Account`].
pub const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry::new("/groupMemberships/", ResourceKind::GroupMembership),
    RegistryEntry::new("/passwordResetTokens/", ResourceKind::PasswordResetToken),
    RegistryEntry::new("/customData", ResourceKind::CustomData),
    RegistryEntry::new("/providerData", ResourceKind::ProviderData),
    RegistryEntry::new("/accounts/", ResourceKind::Account),
    RegistryEntry::new("/applications/", ResourceKind::Application),
    RegistryEntry::new("/directories/", ResourceKind::Directory),
    RegistryEntry::new("/groups/", ResourceKind::Group),
    RegistryEntry::new("/tenants/", ResourceKind::Tenant),
];

/// Looks up the resource type for an href.
///
/// # Errors
///
/// Returns [`ResourceError::UnknownResourceType`] if no pattern matches.
pub fn kind_for_href(href: &Href) -> Result<ResourceKind, ResourceError> {
    REGISTRY
        .iter()
        .find(|entry| href.contains_segment(entry.pattern))
        .map(|entry| entry.kind)
        .ok_or_else(|| ResourceError::UnknownResourceType {
            href: href.as_str().to_string(),
        })
}

/// Returns `true` if the value is a reference: a JSON object containing an
/// `href` key.
#[must_use]
pub fn is_reference(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("href"))
}

/// Extracts and validates the href of a reference value.
///
/// # Errors
///
/// Returns [`ResourceError::UnknownResourceType`] if the value is not a
/// reference or its href is malformed.
pub fn reference_href(value: &Value) -> Result<Href, ResourceError> {
    let raw = value
        .get("href")
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::UnknownResourceType {
            href: value.to_string(),
        })?;
    Href::new(raw).map_err(|e| ResourceError::UnknownResourceType { href: e.href })
}

/// A reference resolved to its concrete resource type.
///
/// Produced by [`resolve`]; pattern-match to recover the typed value.
#[derive(Debug, Clone)]
pub enum TypedResource {
    /// An [`Account`] reference.
    Account(Account),
    /// An [`Application`] reference.
    Application(Application),
    /// A [`Directory`] reference.
    Directory(Directory),
    /// A [`Group`] reference.
    Group(Group),
    /// A [`GroupMembership`] reference.
    GroupMembership(GroupMembership),
    /// A [`Tenant`] reference.
    Tenant(Tenant),
    /// A [`CustomData`] reference.
    CustomData(CustomData),
    /// A [`ProviderData`] reference.
    ProviderData(ProviderData),
    /// A [`PasswordResetToken`] reference.
    PasswordResetToken(PasswordResetToken),
}

impl TypedResource {
    /// Returns the kind of the resolved resource.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Account(_) => ResourceKind::Account,
            Self::Application(_) => ResourceKind::Application,
            Self::Directory(_) => ResourceKind::Directory,
            Self::Group(_) => ResourceKind::Group,
            Self::GroupMembership(_) => ResourceKind::GroupMembership,
            Self::Tenant(_) => ResourceKind::Tenant,
            Self::CustomData(_) => ResourceKind::CustomData,
            Self::ProviderData(_) => ResourceKind::ProviderData,
            Self::PasswordResetToken(_) => ResourceKind::PasswordResetToken,
        }
    }

    /// Returns the href of the resolved resource.
    #[must_use]
    pub fn href(&self) -> Option<&Href> {
        match self {
            Self::Account(r) => r.href(),
            Self::Application(r) => r.href(),
            Self::Directory(r) => r.href(),
            Self::Group(r) => r.href(),
            Self::GroupMembership(r) => r.href(),
            Self::Tenant(r) => r.href(),
            Self::CustomData(r) => r.href(),
            Self::ProviderData(r) => r.href(),
            Self::PasswordResetToken(r) => r.href(),
        }
    }
}

/// Resolves a raw JSON reference to a concrete, typed resource.
///
/// The resource is constructed from whatever fields the reference carries:
/// an href-only reference produces an unloaded stub whose first field
/// access will fetch, while an expanded reference (or a full body) is
/// already loaded.
///
/// # Errors
///
/// Returns [`ResourceError::UnknownResourceType`] if the value is not a
/// reference or no registry pattern matches its href.
pub fn resolve(value: &Value) -> Result<TypedResource, ResourceError> {
    let href = reference_href(value)?;
    let kind = kind_for_href(&href)?;

    let map = value.as_object().cloned().unwrap_or_default();
    let resource = Resource::from_reference(kind, href, map);

    Ok(match kind {
        ResourceKind::Account => TypedResource::Account(Account::from_resource(resource)),
        ResourceKind::Application => {
            TypedResource::Application(Application::from_resource(resource))
        }
        ResourceKind::Directory => TypedResource::Directory(Directory::from_resource(resource)),
        ResourceKind::Group => TypedResource::Group(Group::from_resource(resource)),
        ResourceKind::GroupMembership => {
            TypedResource::GroupMembership(GroupMembership::from_resource(resource))
        }
        ResourceKind::Tenant => TypedResource::Tenant(Tenant::from_resource(resource)),
        ResourceKind::CustomData => TypedResource::CustomData(CustomData::from_resource(resource)),
        ResourceKind::ProviderData => {
            TypedResource::ProviderData(ProviderData::from_resource(resource))
        }
        ResourceKind::PasswordResetToken => {
            TypedResource::PasswordResetToken(PasswordResetToken::from_resource(resource))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn href(path: &str) -> Href {
        Href::new(format!("https://api.veridian.io/v1{path}")).unwrap()
    }

    #[test]
    fn test_kind_for_href_matches_each_pattern() {
        let cases = [
            ("/accounts/a1", ResourceKind::Account),
            ("/applications/app1", ResourceKind::Application),
            ("/directories/d1", ResourceKind::Directory),
            ("/groups/g1", ResourceKind::Group),
            ("/groupMemberships/m1", ResourceKind::GroupMembership),
            ("/tenants/t1", ResourceKind::Tenant),
            ("/passwordResetTokens/tok1", ResourceKind::PasswordResetToken),
        ];

        for (path, expected) in cases {
            assert_eq!(kind_for_href(&href(path)).unwrap(), expected, "{path}");
        }
    }

    #[test]
    fn test_sub_resource_patterns_win_over_owner_patterns() {
        // These hrefs also contain /accounts/, but the sub-resource entry
        // is listed first and must win.
        assert_eq!(
            kind_for_href(&href("/accounts/a1/customData")).unwrap(),
            ResourceKind::CustomData
        );
        assert_eq!(
            kind_for_href(&href("/accounts/a1/providerData")).unwrap(),
            ResourceKind::ProviderData
        );
    }

    #[test]
    fn test_membership_pattern_wins_over_group_pattern() {
        assert_eq!(
            kind_for_href(&href("/groupMemberships/m1")).unwrap(),
            ResourceKind::GroupMembership
        );
        assert_eq!(kind_for_href(&href("/groups/g1")).unwrap(), ResourceKind::Group);
    }

    #[test]
    fn test_unregistered_pattern_is_a_hard_error() {
        let result = kind_for_href(&href("/widgets/w1"));
        assert!(matches!(
            result,
            Err(ResourceError::UnknownResourceType { .. })
        ));
    }

    #[test]
    fn test_is_reference_requires_href_key() {
        assert!(is_reference(&json!({"href": "https://api.veridian.io/v1/accounts/a1"})));
        assert!(is_reference(
            &json!({"href": "https://api.veridian.io/v1/accounts/a1", "username": "x"})
        ));
        assert!(!is_reference(&json!({"name": "admins"})));
        assert!(!is_reference(&json!("https://api.veridian.io/v1/accounts/a1")));
        assert!(!is_reference(&json!(42)));
    }

    #[test]
    fn test_reference_href_rejects_malformed_values() {
        assert!(reference_href(&json!({"href": "not-a-url"})).is_err());
        assert!(reference_href(&json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_resolve_constructs_the_matching_type() {
        let resolved =
            resolve(&json!({"href": "https://api.veridian.io/v1/accounts/a1"})).unwrap();
        assert!(matches!(resolved, TypedResource::Account(_)));
        assert_eq!(resolved.kind(), ResourceKind::Account);
        assert_eq!(
            resolved.href().unwrap().as_str(),
            "https://api.veridian.io/v1/accounts/a1"
        );
    }

    #[test]
    fn test_resolve_fails_fast_on_unregistered_href() {
        let result = resolve(&json!({"href": "https://api.veridian.io/v1/widgets/w1"}));
        assert!(matches!(
            result,
            Err(ResourceError::UnknownResourceType { .. })
        ));
    }

    #[test]
    fn test_registry_lists_sub_resources_before_owners() {
        let custom_idx = REGISTRY
            .iter()
            .position(|e| e.kind == ResourceKind::CustomData)
            .unwrap();
        let account_idx = REGISTRY
            .iter()
            .position(|e| e.kind == ResourceKind::Account)
            .unwrap();
        assert!(custom_idx < account_idx);
    }
}

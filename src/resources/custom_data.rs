//! Guarded key-value data attached to owning resources.
//!
//! [`CustomData`] and [`ProviderData`] are key-value sub-resources attached
//! 1:1 to an owner (an account, group, directory or application for custom
//! data; an account for provider data). Both expose two surfaces over the
//! same backing map:
//!
//! - a **map surface**: [`GuardedDataModel::get`] /
//!   [`GuardedDataModel::insert`] / [`GuardedDataModel::remove`]
//! - a **typed-accessor surface**: [`GuardedDataModel::created_at`] and
//!   [`GuardedDataModel::modified_at`]
//!
//! A fixed set of reserved, server-maintained keys (`createdAt`,
//! `modifiedAt` and the identity key `href`) rejects writes and deletions
//! through either surface, immediately and locally, before any round trip.
//! Both spellings of the timestamp keys are guarded, so neither
//! `insert("createdAt", ..)` nor `insert("created_at", ..)` can slip
//! through.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::resources::GuardedDataModel;
//!
//! let custom = account.custom_data(&client).await?;
//! custom.insert("favorite_ship", json!("NCC-1701-D"))?;
//! custom.save(&client).await?;
//!
//! // Reserved keys are readable but never writable.
//! let created = custom.created_at(&client).await?;
//! assert!(custom.insert("createdAt", json!("now")).is_err());
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::errors::ResourceError;
use crate::resources::href::Href;
use crate::resources::registry::ResourceKind;

/// Keys maintained by the server and closed to local mutation.
///
/// Both the wire spelling and the snake-case spelling of the timestamps are
/// listed so the guard holds on either surface.
pub const RESERVED_KEYS: &[&str] = &[
    "href",
    "createdAt",
    "modifiedAt",
    "created_at",
    "modified_at",
];

/// The guarded map behavior shared by [`CustomData`] and [`ProviderData`].
///
/// Implementors supply the removed-key bookkeeping; every map operation and
/// the reserved-key guard come as default methods.
#[allow(async_fn_in_trait)]
pub trait GuardedDataModel: ResourceModel {
    /// Keys removed locally and pending a server-side delete.
    fn removed_keys(&self) -> &BTreeSet<String>;

    /// Mutable access to the removed-key set.
    fn removed_keys_mut(&mut self) -> &mut BTreeSet<String>;

    /// Returns `true` if the key is reserved and closed to mutation.
    #[must_use]
    fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }

    /// Returns the value for a key, fetching the body on first access.
    ///
    /// Reserved keys are readable through this surface; only mutation is
    /// guarded. A key removed locally reads as `None` without a round trip.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error.
    async fn get(
        &mut self,
        client: &ApiClient,
        key: &str,
    ) -> Result<Option<Value>, ResourceError> {
        if self.removed_keys().contains(key) {
            return Ok(None);
        }
        self.resource_mut().get_opt(client, key).await
    }

    /// Sets a key locally, to be persisted by the next `save`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReservedKey`] for a reserved key, without
    /// any round trip.
    fn insert(&mut self, key: &str, value: Value) -> Result<(), ResourceError> {
        if Self::is_reserved(key) {
            return Err(ResourceError::ReservedKey {
                key: key.to_string(),
            });
        }
        self.removed_keys_mut().remove(key);
        self.resource_mut().set(key, value)
    }

    /// Removes a key locally; the next `save` deletes it on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReservedKey`] for a reserved key, without
    /// any round trip.
    fn remove(&mut self, key: &str) -> Result<(), ResourceError> {
        if Self::is_reserved(key) {
            return Err(ResourceError::ReservedKey {
                key: key.to_string(),
            });
        }
        self.resource_mut().unset(key)?;
        self.removed_keys_mut().insert(key.to_string());
        Ok(())
    }

    /// Returns the server-maintained creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// a malformed timestamp.
    async fn created_at(&mut self, client: &ApiClient) -> Result<DateTime<Utc>, ResourceError> {
        self.resource_mut().get_as(client, "createdAt").await
    }

    /// Returns the server-maintained modification timestamp.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// a malformed timestamp.
    async fn modified_at(&mut self, client: &ApiClient) -> Result<DateTime<Utc>, ResourceError> {
        self.resource_mut().get_as(client, "modifiedAt").await
    }

    /// Returns `true` if unsaved inserts or removals are pending.
    #[must_use]
    fn has_pending_changes(&self) -> bool {
        !self.resource().dirty_fields().is_empty() || !self.removed_keys().is_empty()
    }

    /// Returns the locally modified entries, for embedding into an owner's
    /// save payload.
    #[must_use]
    fn pending_changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        for key in self.resource().dirty_fields() {
            if let Some(value) = self.resource().get_local(key) {
                changes.insert(key.clone(), value.clone());
            }
        }
        changes
    }

    /// Issues one DELETE per locally removed key.
    ///
    /// # Errors
    ///
    /// Returns the first transport error; keys already deleted remain
    /// cleared locally.
    async fn flush_removed(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        let Some(href) = self.href().cloned() else {
            self.removed_keys_mut().clear();
            return Ok(());
        };
        let removed: Vec<String> = self.removed_keys().iter().cloned().collect();
        for key in removed {
            let target = href.child(&key);
            client
                .http()
                .delete(target.as_str())
                .await
                .map_err(|err| {
                    ResourceError::from_http(err, Self::KIND.as_str(), target.as_str())
                })?;
            self.removed_keys_mut().remove(&key);
        }
        Ok(())
    }

    /// Persists pending removals and inserts, then discards the local cache
    /// so the next access refetches the server's view.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error.
    async fn save(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.flush_removed(client).await?;
        if !self.resource().dirty_fields().is_empty() {
            self.resource_mut().save(client).await?;
        }
        Ok(())
    }

    /// Clears local bookkeeping after the owner persisted the data as part
    /// of its own save.
    fn mark_saved(&mut self) {
        self.removed_keys_mut().clear();
        self.resource_mut().refresh();
    }
}

/// Free-form key-value data attached to an owning resource.
#[derive(Debug, Clone)]
pub struct CustomData {
    inner: Resource,
    removed: BTreeSet<String>,
}

impl CustomData {
    /// Returns the custom-data handle for an owner href.
    ///
    /// The handle is unfetched; the first read loads the full map.
    #[must_use]
    pub fn for_owner(owner: &Href) -> Self {
        Self {
            inner: Resource::from_href(ResourceKind::CustomData, owner.child("customData")),
            removed: BTreeSet::new(),
        }
    }
}

impl ResourceModel for CustomData {
    const KIND: ResourceKind = ResourceKind::CustomData;

    fn from_resource(resource: Resource) -> Self {
        Self {
            inner: resource,
            removed: BTreeSet::new(),
        }
    }

    fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.inner
    }
}

impl GuardedDataModel for CustomData {
    fn removed_keys(&self) -> &BTreeSet<String> {
        &self.removed
    }

    fn removed_keys_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.removed
    }
}

/// Identity-provider data attached to an account.
///
/// Carries the provider id (`"veridian"` for directory-backed accounts)
/// alongside the same guarded timestamp keys as custom data.
#[derive(Debug, Clone)]
pub struct ProviderData {
    inner: Resource,
    removed: BTreeSet<String>,
}

impl ProviderData {
    /// Returns the provider-data handle for an owner href.
    #[must_use]
    pub fn for_owner(owner: &Href) -> Self {
        Self {
            inner: Resource::from_href(ResourceKind::ProviderData, owner.child("providerData")),
            removed: BTreeSet::new(),
        }
    }

    /// Returns the identity provider id.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a provider id.
    pub async fn provider_id(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "providerId").await
    }
}

impl ResourceModel for ProviderData {
    const KIND: ResourceKind = ResourceKind::ProviderData;

    fn from_resource(resource: Resource) -> Self {
        Self {
            inner: resource,
            removed: BTreeSet::new(),
        }
    }

    fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.inner
    }
}

impl GuardedDataModel for ProviderData {
    fn removed_keys(&self) -> &BTreeSet<String> {
        &self.removed
    }

    fn removed_keys_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owner() -> Href {
        Href::new("https://api.veridian.io/v1/accounts/a1").unwrap()
    }

    fn loaded_custom_data() -> CustomData {
        let body = json!({
            "href": "https://api.veridian.io/v1/accounts/a1/customData",
            "createdAt": "2026-01-10T08:30:00.000Z",
            "modifiedAt": "2026-02-01T12:00:00.000Z",
            "rank": "captain"
        });
        CustomData::materialize(&body).unwrap()
    }

    #[test]
    fn test_for_owner_derives_child_href() {
        let custom = CustomData::for_owner(&owner());
        assert_eq!(
            custom.href().unwrap().as_str(),
            "https://api.veridian.io/v1/accounts/a1/customData"
        );
        assert!(!custom.resource().is_loaded());

        let provider = ProviderData::for_owner(&owner());
        assert_eq!(
            provider.href().unwrap().as_str(),
            "https://api.veridian.io/v1/accounts/a1/providerData"
        );
    }

    #[test]
    fn test_insert_and_remove_reserved_keys_fail_locally() {
        let mut custom = loaded_custom_data();

        for key in ["createdAt", "modifiedAt", "created_at", "modified_at", "href"] {
            assert!(
                matches!(
                    custom.insert(key, json!("whatever")),
                    Err(ResourceError::ReservedKey { .. })
                ),
                "insert of '{key}' must be rejected"
            );
            assert!(
                matches!(
                    custom.remove(key),
                    Err(ResourceError::ReservedKey { .. })
                ),
                "removal of '{key}' must be rejected"
            );
        }

        // No pending changes were accumulated by the rejected mutations.
        assert!(!custom.has_pending_changes());
    }

    #[test]
    fn test_insert_marks_key_pending() {
        let mut custom = loaded_custom_data();
        custom.insert("ship", json!("NCC-1701-D")).unwrap();

        assert!(custom.has_pending_changes());
        let changes = custom.pending_changes();
        assert_eq!(changes.get("ship"), Some(&json!("NCC-1701-D")));
        // Only dirty entries ride along, never server-maintained ones.
        assert!(changes.get("createdAt").is_none());
        assert!(changes.get("rank").is_none());
    }

    #[test]
    fn test_remove_then_insert_cancels_deletion() {
        let mut custom = loaded_custom_data();
        custom.remove("rank").unwrap();
        assert!(custom.removed_keys().contains("rank"));

        custom.insert("rank", json!("admiral")).unwrap();
        assert!(!custom.removed_keys().contains("rank"));
        assert_eq!(
            custom.pending_changes().get("rank"),
            Some(&json!("admiral"))
        );
    }

    #[tokio::test]
    async fn test_removed_key_reads_as_none_locally() {
        let client = crate::client::test_support::offline_client();
        let mut custom = loaded_custom_data();

        custom.remove("rank").unwrap();
        let value = custom.get(&client, "rank").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_timestamps_readable_through_both_surfaces() {
        let client = crate::client::test_support::offline_client();
        let mut custom = loaded_custom_data();

        let typed = custom.created_at(&client).await.unwrap();
        let raw = custom.get(&client, "createdAt").await.unwrap().unwrap();
        assert_eq!(typed.to_rfc3339(), "2026-01-10T08:30:00+00:00");
        assert_eq!(raw, json!("2026-01-10T08:30:00.000Z"));

        let modified = custom.modified_at(&client).await.unwrap();
        assert!(modified > typed);
    }

    #[tokio::test]
    async fn test_provider_data_exposes_provider_id() {
        let client = crate::client::test_support::offline_client();
        let body = json!({
            "href": "https://api.veridian.io/v1/accounts/a1/providerData",
            "providerId": "veridian",
            "createdAt": "2026-01-10T08:30:00.000Z",
            "modifiedAt": "2026-01-10T08:30:00.000Z"
        });
        let mut provider = ProviderData::materialize(&body).unwrap();

        assert_eq!(provider.provider_id(&client).await.unwrap(), "veridian");
        assert!(provider.created_at(&client).await.is_ok());
    }

    #[test]
    fn test_provider_data_guards_the_same_reserved_keys() {
        let mut provider = ProviderData::for_owner(&owner());

        assert!(matches!(
            provider.insert("createdAt", json!("now")),
            Err(ResourceError::ReservedKey { .. })
        ));
        assert!(matches!(
            provider.remove("modifiedAt"),
            Err(ResourceError::ReservedKey { .. })
        ));
    }

    #[test]
    fn test_mark_saved_clears_bookkeeping() {
        let mut custom = loaded_custom_data();
        custom.insert("ship", json!("NCC-1701-D")).unwrap();
        custom.remove("rank").unwrap();

        custom.mark_saved();
        assert!(!custom.has_pending_changes());
        assert!(!custom.resource().is_loaded());
    }
}

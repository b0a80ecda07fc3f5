//! Account resources and group-membership operations.
//!
//! An [`Account`] is a login-capable identity stored in a directory and
//! reachable through every application assigned to that directory. Beyond
//! plain field access it carries the group-membership suite
//! (`add_group`/`in_group`/`remove_group` and friends), all of which accept
//! the polymorphic [`GroupSelector`] and resolve it against the account's
//! owning directory.

use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::resources::application::Application;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::collection::Collection;
use crate::resources::common::ResourceStatus;
use crate::resources::custom_data::{CustomData, GuardedDataModel, ProviderData};
use crate::resources::directory::Directory;
use crate::resources::errors::ResourceError;
use crate::resources::group::{Group, GroupMembership, GroupSelector};
use crate::resources::registry::ResourceKind;
use crate::resources::tenant::Tenant;

/// A login-capable identity.
#[derive(Debug, Clone)]
pub struct Account {
    inner: Resource,
    custom_data: Option<CustomData>,
    provider_data: Option<ProviderData>,
}

impl Account {
    fn own_href(&self) -> Result<crate::resources::href::Href, ResourceError> {
        self.inner
            .href()
            .cloned()
            .ok_or_else(|| ResourceError::MissingField {
                resource: Self::KIND.as_str(),
                field: "href".to_string(),
            })
    }

    /// Returns the username.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a username.
    pub async fn username(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "username").await
    }

    /// Returns the email address.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks an email.
    pub async fn email(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "email").await
    }

    /// Returns the given (first) name.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks one.
    pub async fn given_name(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "givenName").await
    }

    /// Returns the middle name, if one is set.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error.
    pub async fn middle_name(
        &mut self,
        client: &ApiClient,
    ) -> Result<Option<String>, ResourceError> {
        let value = self.inner.get_opt(client, "middleName").await?;
        Ok(value.and_then(|v| v.as_str().map(ToString::to_string)))
    }

    /// Returns the surname (last name).
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks one.
    pub async fn surname(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "surname").await
    }

    /// Returns the server-computed full name, if present.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error.
    pub async fn full_name(
        &mut self,
        client: &ApiClient,
    ) -> Result<Option<String>, ResourceError> {
        let value = self.inner.get_opt(client, "fullName").await?;
        Ok(value.and_then(|v| v.as_str().map(ToString::to_string)))
    }

    /// Returns the account status.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// an unknown status value.
    pub async fn status(&mut self, client: &ApiClient) -> Result<ResourceStatus, ResourceError> {
        self.inner.get_as(client, "status").await
    }

    /// Returns `true` if the account status is `ENABLED`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::status`].
    pub async fn is_enabled(&mut self, client: &ApiClient) -> Result<bool, ResourceError> {
        Ok(self.status(client).await?.is_enabled())
    }

    /// Sets the username locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_username(&mut self, username: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("username", json!(username.into()))
    }

    /// Sets the email address locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("email", json!(email.into()))
    }

    /// Sets the password locally.
    ///
    /// The password is write-only: it is sent by the next `save` and never
    /// echoed back by the service.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_password(&mut self, password: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("password", json!(password.into()))
    }

    /// Sets the given name locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_given_name(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("givenName", json!(name.into()))
    }

    /// Sets the middle name locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_middle_name(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("middleName", json!(name.into()))
    }

    /// Sets the surname locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_surname(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("surname", json!(name.into()))
    }

    /// Sets the account status locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_status(&mut self, status: ResourceStatus) -> Result<(), ResourceError> {
        self.inner.set("status", json!(status))
    }

    /// Returns the directory storing this account.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn directory(&mut self, client: &ApiClient) -> Result<Directory, ResourceError> {
        self.inner.related(client, "directory").await
    }

    /// Returns the owning tenant.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn tenant(&mut self, client: &ApiClient) -> Result<Tenant, ResourceError> {
        self.inner.related(client, "tenant").await
    }

    /// Returns the applications this account can log in to.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn applications(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<Application>, ResourceError> {
        self.inner.related_collection(client, "applications").await
    }

    /// Returns the groups this account belongs to.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn groups(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<Group>, ResourceError> {
        self.inner.related_collection(client, "groups").await
    }

    /// Returns the memberships attaching this account to groups.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn group_memberships(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<GroupMembership>, ResourceError> {
        self.inner
            .related_collection(client, "groupMemberships")
            .await
    }

    /// Returns the custom-data handle for this account.
    ///
    /// The handle is created lazily and kept, so pending edits accumulate
    /// across calls and ride along with the next [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the account has no href
    /// yet.
    pub fn custom_data(&mut self) -> Result<&mut CustomData, ResourceError> {
        let href = self.own_href()?;
        Ok(self
            .custom_data
            .get_or_insert_with(|| CustomData::for_owner(&href)))
    }

    /// Returns the provider-data handle for this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the account has no href
    /// yet.
    pub fn provider_data(&mut self) -> Result<&mut ProviderData, ResourceError> {
        let href = self.own_href()?;
        Ok(self
            .provider_data
            .get_or_insert_with(|| ProviderData::for_owner(&href)))
    }

    /// Persists locally modified fields, including pending custom-data and
    /// provider-data edits.
    ///
    /// Removed data keys are deleted on the server first; dirty data keys
    /// are embedded into the save payload.
    ///
    /// # Errors
    ///
    /// See [`Resource::save`].
    pub async fn save(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        if let Some(custom) = &mut self.custom_data {
            custom.flush_removed(client).await?;
            let changes = custom.pending_changes();
            if !changes.is_empty() {
                self.inner.set("customData", Value::Object(changes))?;
            }
        }
        if let Some(provider) = &mut self.provider_data {
            provider.flush_removed(client).await?;
            let changes = provider.pending_changes();
            if !changes.is_empty() {
                self.inner.set("providerData", Value::Object(changes))?;
            }
        }

        self.inner.save(client).await?;

        if let Some(custom) = &mut self.custom_data {
            custom.mark_saved();
        }
        if let Some(provider) = &mut self.provider_data {
            provider.mark_saved();
        }
        Ok(())
    }

    /// Discards cached data and pending edits, including pending
    /// custom-data and provider-data edits.
    ///
    /// Edits made after the call survive the next fetch and the next
    /// `save`.
    pub fn refresh(&mut self) {
        self.inner.refresh();
        if let Some(custom) = &mut self.custom_data {
            custom.mark_saved();
        }
        if let Some(provider) = &mut self.provider_data {
            provider.mark_saved();
        }
    }

    /// Deletes the account; the handle becomes unusable.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.delete(client).await
    }

    /// Resolves a [`GroupSelector`] to exactly one group in the account's
    /// directory.
    ///
    /// Accepts an existing [`Group`], an href, an exact name, or a
    /// `*`-wildcard name filter.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing matches,
    /// [`ResourceError::AmbiguousMatch`] when several groups match a
    /// filter, or the underlying fetch error.
    pub async fn resolve_group(
        &mut self,
        client: &ApiClient,
        selector: impl Into<GroupSelector>,
    ) -> Result<Group, ResourceError> {
        match selector.into() {
            GroupSelector::Instance(group) => Ok(group),
            GroupSelector::Href(href) => Group::from_href(href),
            GroupSelector::Name(filter) | GroupSelector::NameFilter(filter) => {
                let mut directory = self.directory(client).await?;
                directory
                    .groups(client)
                    .await?
                    .query([("name", filter)])
                    .single(client)
                    .await
            }
        }
    }

    /// Finds the membership attaching this account to `group`, if any.
    async fn membership_for(
        &mut self,
        client: &ApiClient,
        group: &Group,
    ) -> Result<Option<GroupMembership>, ResourceError> {
        let target = group.href().ok_or_else(|| ResourceError::MissingField {
            resource: Group::KIND.as_str(),
            field: "href".to_string(),
        })?;
        let target = target.clone();

        let memberships = self.group_memberships(client).await?;
        let mut cursor = memberships.items();
        while let Some(mut membership) = cursor.next(client).await? {
            let member_group = membership.group(client).await?;
            if member_group.href() == Some(&target) {
                return Ok(Some(membership));
            }
        }
        Ok(None)
    }

    /// Adds this account to a group.
    ///
    /// # Errors
    ///
    /// Returns the resolution error for the selector, or the underlying
    /// transport error.
    pub async fn add_group(
        &mut self,
        client: &ApiClient,
        selector: impl Into<GroupSelector>,
    ) -> Result<GroupMembership, ResourceError> {
        let group = self.resolve_group(client, selector).await?;
        GroupMembership::create(client, self, &group).await
    }

    /// Adds this account to several groups.
    ///
    /// # Errors
    ///
    /// Fails on the first selector that cannot be resolved or created;
    /// memberships created before the failure remain.
    pub async fn add_groups(
        &mut self,
        client: &ApiClient,
        selectors: impl IntoIterator<Item = GroupSelector>,
    ) -> Result<Vec<GroupMembership>, ResourceError> {
        let mut memberships = Vec::new();
        for selector in selectors {
            memberships.push(self.add_group(client, selector).await?);
        }
        Ok(memberships)
    }

    /// Returns `true` if the account belongs to the group.
    ///
    /// Membership is read live from the membership collection; adds and
    /// removes are visible immediately.
    ///
    /// # Errors
    ///
    /// Returns the resolution error for the selector, or the underlying
    /// fetch error.
    pub async fn in_group(
        &mut self,
        client: &ApiClient,
        selector: impl Into<GroupSelector>,
    ) -> Result<bool, ResourceError> {
        let group = self.resolve_group(client, selector).await?;
        Ok(self.membership_for(client, &group).await?.is_some())
    }

    /// Alias for [`Self::in_group`].
    ///
    /// # Errors
    ///
    /// See [`Self::in_group`].
    pub async fn has_group(
        &mut self,
        client: &ApiClient,
        selector: impl Into<GroupSelector>,
    ) -> Result<bool, ResourceError> {
        self.in_group(client, selector).await
    }

    /// Returns `true` if the account belongs to every listed group.
    ///
    /// # Errors
    ///
    /// See [`Self::in_group`].
    pub async fn in_groups(
        &mut self,
        client: &ApiClient,
        selectors: impl IntoIterator<Item = GroupSelector>,
    ) -> Result<bool, ResourceError> {
        for selector in selectors {
            if !self.in_group(client, selector).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Removes this account from a group.
    ///
    /// Removing from a group the account does not belong to is an error,
    /// never a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no membership exists, or the
    /// underlying transport error.
    pub async fn remove_group(
        &mut self,
        client: &ApiClient,
        selector: impl Into<GroupSelector>,
    ) -> Result<(), ResourceError> {
        let group = self.resolve_group(client, selector).await?;
        match self.membership_for(client, &group).await? {
            Some(mut membership) => membership.delete(client).await,
            None => Err(ResourceError::NotFound {
                resource: GroupMembership::KIND.as_str(),
                href: group
                    .href()
                    .map_or_else(String::new, |h| h.as_str().to_string()),
            }),
        }
    }

    /// Removes this account from several groups.
    ///
    /// # Errors
    ///
    /// Fails on the first group without a membership; removals performed
    /// before the failure remain.
    pub async fn remove_groups(
        &mut self,
        client: &ApiClient,
        selectors: impl IntoIterator<Item = GroupSelector>,
    ) -> Result<(), ResourceError> {
        for selector in selectors {
            self.remove_group(client, selector).await?;
        }
        Ok(())
    }
}

impl ResourceModel for Account {
    const KIND: ResourceKind = ResourceKind::Account;

    fn from_resource(resource: Resource) -> Self {
        Self {
            inner: resource,
            custom_data: None,
            provider_data: None,
        }
    }

    fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded_account() -> Account {
        Account::materialize(&json!({
            "href": "https://api.veridian.io/v1/accounts/a1",
            "username": "jlpicard",
            "email": "jlpicard@example.com",
            "givenName": "Jean-Luc",
            "surname": "Picard",
            "fullName": "Jean-Luc Picard",
            "status": "ENABLED",
            "directory": {"href": "https://api.veridian.io/v1/directories/d1"},
            "groupMemberships": {"href": "https://api.veridian.io/v1/accounts/a1/groupMemberships"},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_account_accessors() {
        let client = crate::client::test_support::offline_client();
        let mut account = loaded_account();

        assert_eq!(account.username(&client).await.unwrap(), "jlpicard");
        assert_eq!(account.email(&client).await.unwrap(), "jlpicard@example.com");
        assert_eq!(account.given_name(&client).await.unwrap(), "Jean-Luc");
        assert_eq!(account.surname(&client).await.unwrap(), "Picard");
        assert_eq!(
            account.full_name(&client).await.unwrap().as_deref(),
            Some("Jean-Luc Picard")
        );
        assert!(account.middle_name(&client).await.unwrap().is_none());
        assert!(account.is_enabled(&client).await.unwrap());
    }

    #[test]
    fn test_setters_mark_fields_dirty_with_wire_names() {
        let mut account = loaded_account();
        account.set_email("locutus@example.com").unwrap();
        account.set_given_name("Locutus").unwrap();
        account.set_status(ResourceStatus::Disabled).unwrap();
        account.set_password("Resistance1sFutile!").unwrap();

        let dirty = account.resource().dirty_fields();
        assert!(dirty.contains("email"));
        assert!(dirty.contains("givenName"));
        assert!(dirty.contains("status"));
        assert!(dirty.contains("password"));
    }

    #[test]
    fn test_custom_data_handle_is_cached_across_calls() {
        let mut account = loaded_account();

        account
            .custom_data()
            .unwrap()
            .insert("rank", json!("captain"))
            .unwrap();

        // A second call must see the pending edit, not a fresh handle.
        assert!(account.custom_data().unwrap().has_pending_changes());
    }

    #[test]
    fn test_provider_data_reserved_keys_rejected_through_account() {
        let mut account = loaded_account();
        let provider = account.provider_data().unwrap();

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
    fn test_refresh_discards_pending_custom_data_edits() {
        let mut account = loaded_account();
        account.set_email("edit@example.com").unwrap();
        account
            .custom_data()
            .unwrap()
            .insert("rank", json!("captain"))
            .unwrap();

        account.refresh();

        assert!(account.resource().dirty_fields().is_empty());
        assert!(!account.custom_data().unwrap().has_pending_changes());

        // Edits made after the refresh are pending as usual.
        account
            .custom_data()
            .unwrap()
            .insert("ship", json!("NCC-1701-D"))
            .unwrap();
        assert!(account.custom_data().unwrap().has_pending_changes());
    }

    #[tokio::test]
    async fn test_resolve_group_from_instance_and_href() {
        let client = crate::client::test_support::offline_client();
        let mut account = loaded_account();

        let group = Group::materialize(&json!({
            "href": "https://api.veridian.io/v1/groups/g1",
            "name": "deck-officers",
            "status": "ENABLED",
        }))
        .unwrap();

        let resolved = account
            .resolve_group(&client, group.clone())
            .await
            .unwrap();
        assert_eq!(resolved.href(), group.href());

        let resolved = account
            .resolve_group(&client, "https://api.veridian.io/v1/groups/g1")
            .await
            .unwrap();
        assert_eq!(resolved.href(), group.href());
    }

    #[tokio::test]
    async fn test_resolve_group_rejects_non_group_href() {
        let client = crate::client::test_support::offline_client();
        let mut account = loaded_account();

        let result = account
            .resolve_group(&client, "https://api.veridian.io/v1/accounts/a2")
            .await;
        assert!(matches!(result, Err(ResourceError::UnexpectedKind { .. })));
    }

    #[test]
    fn test_custom_data_requires_href() {
        let mut account = Account::from_resource(Resource::detached(
            ResourceKind::Account,
            crate::resources::href::Href::new("https://api.veridian.io/v1/directories/d1/accounts")
                .unwrap(),
        ));

        assert!(matches!(
            account.custom_data(),
            Err(ResourceError::MissingField { .. })
        ));
    }
}

//! Group and group-membership resources.
//!
//! A [`Group`] is a named set of accounts within a directory. Accounts are
//! attached to groups through [`GroupMembership`] resources; the membership
//! is itself a first-class resource with an href, created via
//! [`GroupMembership::create`] and removed via its `delete`.
//!
//! [`GroupSelector`] is the polymorphic input accepted by the group
//! operations on [`Account`](crate::resources::Account): an existing
//! `Group`, an href, an exact name, or a `*`-wildcard name filter.

use serde_json::json;

use crate::client::ApiClient;
use crate::resources::account::Account;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::collection::Collection;
use crate::resources::common::ResourceStatus;
use crate::resources::custom_data::CustomData;
use crate::resources::directory::Directory;
use crate::resources::errors::ResourceError;
use crate::resources::href::Href;
use crate::resources::registry::ResourceKind;
use crate::resources::tenant::Tenant;

/// A named group of accounts within a directory.
#[derive(Debug, Clone)]
pub struct Group {
    inner: Resource,
}

impl Group {
    /// Returns the group name.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a name.
    pub async fn name(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "name").await
    }

    /// Returns the group description, if one is set.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error.
    pub async fn description(
        &mut self,
        client: &ApiClient,
    ) -> Result<Option<String>, ResourceError> {
        let value = self.inner.get_opt(client, "description").await?;
        Ok(value.and_then(|v| v.as_str().map(ToString::to_string)))
    }

    /// Returns the group status.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// an unknown status value.
    pub async fn status(&mut self, client: &ApiClient) -> Result<ResourceStatus, ResourceError> {
        self.inner.get_as(client, "status").await
    }

    /// Returns `true` if the group status is `ENABLED`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::status`].
    pub async fn is_enabled(&mut self, client: &ApiClient) -> Result<bool, ResourceError> {
        Ok(self.status(client).await?.is_enabled())
    }

    /// Sets the group name locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("name", json!(name.into()))
    }

    /// Sets the group description locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("description", json!(description.into()))
    }

    /// Sets the group status locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_status(&mut self, status: ResourceStatus) -> Result<(), ResourceError> {
        self.inner.set("status", json!(status))
    }

    /// Returns the owning directory.
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

    /// Returns the accounts belonging to this group.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn accounts(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<Account>, ResourceError> {
        self.inner.related_collection(client, "accounts").await
    }

    /// Returns the memberships attaching accounts to this group.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn account_memberships(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<GroupMembership>, ResourceError> {
        self.inner
            .related_collection(client, "accountMemberships")
            .await
    }

    /// Returns the custom-data handle for this group.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the group has no href yet.
    pub fn custom_data(&self) -> Result<CustomData, ResourceError> {
        let href = self.href().ok_or_else(|| ResourceError::MissingField {
            resource: Self::KIND.as_str(),
            field: "href".to_string(),
        })?;
        Ok(CustomData::for_owner(href))
    }

    /// Adds an account to this group by creating a membership.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if either side has no href,
    /// or the underlying transport error.
    pub async fn add_account(
        &mut self,
        client: &ApiClient,
        account: &Account,
    ) -> Result<GroupMembership, ResourceError> {
        GroupMembership::create(client, account, self).await
    }

    /// Persists locally modified fields.
    ///
    /// # Errors
    ///
    /// See [`Resource::save`].
    pub async fn save(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.save(client).await
    }

    /// Discards cached data and pending edits.
    pub fn refresh(&mut self) {
        self.inner.refresh();
    }

    /// Deletes the group; the handle becomes unusable.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.delete(client).await
    }
}

impl ResourceModel for Group {
    const KIND: ResourceKind = ResourceKind::Group;

    fn from_resource(resource: Resource) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.inner
    }
}

/// The association between an [`Account`] and a [`Group`].
#[derive(Debug, Clone)]
pub struct GroupMembership {
    inner: Resource,
}

impl GroupMembership {
    /// Relative path of the top-level membership collection.
    const COLLECTION_PATH: &'static str = "groupMemberships";

    /// Creates a membership attaching `account` to `group`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if either resource has no
    /// href, or the underlying transport error.
    pub async fn create(
        client: &ApiClient,
        account: &Account,
        group: &Group,
    ) -> Result<Self, ResourceError> {
        let account_href = account.href().ok_or_else(|| ResourceError::MissingField {
            resource: Account::KIND.as_str(),
            field: "href".to_string(),
        })?;
        let group_href = group.href().ok_or_else(|| ResourceError::MissingField {
            resource: Group::KIND.as_str(),
            field: "href".to_string(),
        })?;

        let payload = json!({
            "account": {"href": account_href},
            "group": {"href": group_href},
        });

        tracing::debug!(account = %account_href, group = %group_href, "creating group membership");
        let response = client
            .http()
            .post(Self::COLLECTION_PATH, payload)
            .await
            .map_err(|err| {
                ResourceError::from_http(err, Self::KIND.as_str(), Self::COLLECTION_PATH)
            })?;

        Self::materialize(&response.body)
    }

    /// Returns the account side of the membership.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn account(&mut self, client: &ApiClient) -> Result<Account, ResourceError> {
        self.inner.related(client, "account").await
    }

    /// Returns the group side of the membership.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn group(&mut self, client: &ApiClient) -> Result<Group, ResourceError> {
        self.inner.related(client, "group").await
    }

    /// Deletes the membership, detaching the account from the group.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.delete(client).await
    }
}

impl ResourceModel for GroupMembership {
    const KIND: ResourceKind = ResourceKind::GroupMembership;

    fn from_resource(resource: Resource) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.inner
    }
}

/// Polymorphic input for the group operations on
/// [`Account`](crate::resources::Account).
///
/// A selector is resolved against the account's directory to exactly one
/// group; see
/// [`Account::resolve_group`](crate::resources::Account::resolve_group).
///
/// # Example
///
/// ```rust
/// use veridian_api::resources::GroupSelector;
///
/// // From an href string
/// let by_href = GroupSelector::from("https://api.veridian.io/v1/groups/g1");
/// assert!(matches!(by_href, GroupSelector::Href(_)));
///
/// // From a bare name (exact match)
/// let by_name = GroupSelector::from("deck-officers");
/// assert!(matches!(by_name, GroupSelector::Name(_)));
///
/// // Wildcard name filter
/// let by_filter = GroupSelector::filter("*officers*");
/// assert!(matches!(by_filter, GroupSelector::NameFilter(_)));
/// ```
#[derive(Debug, Clone)]
pub enum GroupSelector {
    /// An already-resolved group.
    Instance(Group),
    /// The group's href.
    Href(Href),
    /// The group's exact name.
    Name(String),
    /// A name filter, which may contain `*` glob wildcards.
    NameFilter(String),
}

impl GroupSelector {
    /// Creates a name-filter selector; `*` matches any substring.
    #[must_use]
    pub fn filter(pattern: impl Into<String>) -> Self {
        Self::NameFilter(pattern.into())
    }
}

impl From<Group> for GroupSelector {
    fn from(group: Group) -> Self {
        Self::Instance(group)
    }
}

impl From<Href> for GroupSelector {
    fn from(href: Href) -> Self {
        Self::Href(href)
    }
}

impl From<&str> for GroupSelector {
    /// Strings that parse as absolute URLs select by href; anything else is
    /// an exact name.
    fn from(value: &str) -> Self {
        Href::new(value).map_or_else(|e| Self::Name(e.href), Self::Href)
    }
}

impl From<String> for GroupSelector {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded_group() -> Group {
        Group::materialize(&json!({
            "href": "https://api.veridian.io/v1/groups/g1",
            "name": "deck-officers",
            "description": "Bridge crew",
            "status": "ENABLED",
            "directory": {"href": "https://api.veridian.io/v1/directories/d1"},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_group_accessors_read_the_loaded_body() {
        let client = crate::client::test_support::offline_client();
        let mut group = loaded_group();

        assert_eq!(group.name(&client).await.unwrap(), "deck-officers");
        assert_eq!(
            group.description(&client).await.unwrap().as_deref(),
            Some("Bridge crew")
        );
        assert!(group.is_enabled(&client).await.unwrap());
    }

    #[tokio::test]
    async fn test_group_directory_reference_resolves_typed() {
        let client = crate::client::test_support::offline_client();
        let mut group = loaded_group();

        let directory = group.directory(&client).await.unwrap();
        assert_eq!(
            directory.href().unwrap().as_str(),
            "https://api.veridian.io/v1/directories/d1"
        );
    }

    #[test]
    fn test_group_setters_mark_fields_dirty() {
        let mut group = loaded_group();
        group.set_status(ResourceStatus::Disabled).unwrap();
        group.set_description("Retired crew").unwrap();

        assert!(group.resource().dirty_fields().contains("status"));
        assert!(group.resource().dirty_fields().contains("description"));
        assert_eq!(group.resource().get_local("status"), Some(&json!("DISABLED")));
    }

    #[test]
    fn test_custom_data_handle_derives_child_href() {
        let group = loaded_group();
        let custom = group.custom_data().unwrap();
        assert_eq!(
            custom.href().unwrap().as_str(),
            "https://api.veridian.io/v1/groups/g1/customData"
        );
    }

    #[test]
    fn test_selector_from_href_string() {
        let selector = GroupSelector::from("https://api.veridian.io/v1/groups/g1");
        match selector {
            GroupSelector::Href(href) => {
                assert_eq!(href.as_str(), "https://api.veridian.io/v1/groups/g1");
            }
            other => panic!("expected href selector, got {other:?}"),
        }
    }

    #[test]
    fn test_selector_from_bare_name() {
        let selector = GroupSelector::from("deck-officers");
        assert!(matches!(selector, GroupSelector::Name(ref n) if n == "deck-officers"));
    }

    #[test]
    fn test_selector_filter_keeps_wildcards() {
        let selector = GroupSelector::filter("*officers*");
        assert!(matches!(selector, GroupSelector::NameFilter(ref p) if p == "*officers*"));
    }

    #[test]
    fn test_selector_from_group_instance() {
        let selector = GroupSelector::from(loaded_group());
        assert!(matches!(selector, GroupSelector::Instance(_)));
    }
}

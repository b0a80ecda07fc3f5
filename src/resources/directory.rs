//! Directory resources.
//!
//! A directory is a store of accounts and groups. Applications are assigned
//! directories through account-store mappings on the server side; the same
//! account is therefore reachable both through its directory and through
//! every application assigned to that directory.

use serde_json::json;

use crate::client::ApiClient;
use crate::resources::account::Account;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::collection::Collection;
use crate::resources::common::ResourceStatus;
use crate::resources::custom_data::CustomData;
use crate::resources::errors::ResourceError;
use crate::resources::group::Group;
use crate::resources::registry::ResourceKind;
use crate::resources::tenant::Tenant;

/// An account and group store.
#[derive(Debug, Clone)]
pub struct Directory {
    inner: Resource,
}

impl Directory {
    /// Returns the directory name.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a name.
    pub async fn name(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "name").await
    }

    /// Returns the directory description, if one is set.
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

    /// Returns the directory status.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// an unknown status value.
    pub async fn status(&mut self, client: &ApiClient) -> Result<ResourceStatus, ResourceError> {
        self.inner.get_as(client, "status").await
    }

    /// Sets the directory name locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("name", json!(name.into()))
    }

    /// Sets the directory description locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("description", json!(description.into()))
    }

    /// Sets the directory status locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_status(&mut self, status: ResourceStatus) -> Result<(), ResourceError> {
        self.inner.set("status", json!(status))
    }

    /// Returns the owning tenant.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn tenant(&mut self, client: &ApiClient) -> Result<Tenant, ResourceError> {
        self.inner.related(client, "tenant").await
    }

    /// Returns the accounts stored in this directory.
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

    /// Returns the groups defined in this directory.
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

    /// Returns the custom-data handle for this directory.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the directory has no href
    /// yet.
    pub fn custom_data(&self) -> Result<CustomData, ResourceError> {
        let href = self.href().ok_or_else(|| ResourceError::MissingField {
            resource: Self::KIND.as_str(),
            field: "href".to_string(),
        })?;
        Ok(CustomData::for_owner(href))
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

    /// Deletes the directory; the handle becomes unusable.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.delete(client).await
    }
}

impl ResourceModel for Directory {
    const KIND: ResourceKind = ResourceKind::Directory;

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

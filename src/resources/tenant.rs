//! Tenant resources.

use crate::client::ApiClient;
use crate::resources::application::Application;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::collection::Collection;
use crate::resources::custom_data::CustomData;
use crate::resources::directory::Directory;
use crate::resources::errors::ResourceError;
use crate::resources::registry::ResourceKind;

/// The top-level tenant owning every other resource.
///
/// Obtained from [`ApiClient::current_tenant`], which resolves the tenant
/// the configured API key belongs to.
#[derive(Debug, Clone)]
pub struct Tenant {
    inner: Resource,
}

impl Tenant {
    /// Returns the tenant's display name.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a name.
    pub async fn name(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "name").await
    }

    /// Returns the tenant's unique key.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a key.
    pub async fn key(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "key").await
    }

    /// Returns the tenant's applications.
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

    /// Returns the tenant's directories.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn directories(
        &mut self,
        client: &ApiClient,
    ) -> Result<Collection<Directory>, ResourceError> {
        self.inner.related_collection(client, "directories").await
    }

    /// Returns the custom-data handle for this tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the tenant has no href.
    pub fn custom_data(&self) -> Result<CustomData, ResourceError> {
        let href = self.href().ok_or_else(|| ResourceError::MissingField {
            resource: Self::KIND.as_str(),
            field: "href".to_string(),
        })?;
        Ok(CustomData::for_owner(href))
    }
}

impl ResourceModel for Tenant {
    const KIND: ResourceKind = ResourceKind::Tenant;

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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_tenant_accessors_and_collections() {
        let client = crate::client::test_support::offline_client();
        let mut tenant = Tenant::materialize(&json!({
            "href": "https://api.veridian.io/v1/tenants/t1",
            "name": "Acme",
            "key": "acme",
            "applications": {"href": "https://api.veridian.io/v1/tenants/t1/applications"},
            "directories": {"href": "https://api.veridian.io/v1/tenants/t1/directories"},
        }))
        .unwrap();

        assert_eq!(tenant.name(&client).await.unwrap(), "Acme");
        assert_eq!(tenant.key(&client).await.unwrap(), "acme");

        let applications = tenant.applications(&client).await.unwrap();
        assert!(applications.href().as_str().ends_with("/applications"));

        let directories = tenant.directories(&client).await.unwrap();
        assert!(directories.href().as_str().ends_with("/directories"));
    }
}

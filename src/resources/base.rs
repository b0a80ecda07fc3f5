//! The generic remote-resource abstraction.
//!
//! This module defines [`Resource`], the entity every typed resource wraps,
//! and the [`ResourceModel`] trait that connects typed wrappers to it.
//!
//! A `Resource` mirrors one remote JSON object. It tracks:
//!
//! - **identity**: the server-assigned [`Href`], or `None` for a resource
//!   that has not been created yet
//! - **load state**: an explicit tri-state ([`LoadState`]); the first field
//!   access on an unfetched resource performs exactly one fetch that
//!   populates every field
//! - **dirty fields**: locally set values not yet persisted; a fetch never
//!   overwrites them, and `save` sends only them
//! - **liveness**: once deleted, a handle is permanently unusable
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::resources::{Account, ResourceModel};
//!
//! let mut account = client.account(href)?;
//! // First access fetches the full body; later accesses are local.
//! let email = account.email(&client).await?;
//!
//! account.set_email("new@example.com");
//! account.save(&client).await?;        // sends only the dirty fields
//! ```

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::resources::collection::Collection;
use crate::resources::errors::ResourceError;
use crate::resources::href::Href;
use crate::resources::registry::{self, ResourceKind};

/// The load state of a [`Resource`].
///
/// Modeled explicitly rather than as an implicit fallthrough so that
/// refresh semantics and fetch counting are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch has happened; the next field access will fetch.
    Unfetched,
    /// A fetch is in flight.
    Loading,
    /// The full body has been fetched (or the resource was materialized
    /// from a server response); field access is local.
    Loaded,
}

/// A single remote entity mirrored locally.
///
/// See the [module documentation](self) for the lifecycle rules. Typed
/// resources ([`crate::resources::Account`] etc.) wrap a `Resource` and add
/// domain accessors and operations on top of it.
///
/// # Identity
///
/// Two handles are equal when both carry the same href. Handles are never
/// deduplicated in memory; fetching the same href twice yields two
/// independent instances.
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    href: Option<Href>,
    create_target: Option<Href>,
    state: LoadState,
    data: Map<String, Value>,
    dirty: BTreeSet<String>,
    deleted: bool,
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        match (&self.href, &other.href) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Resource {
    /// Creates a detached resource pending creation.
    ///
    /// The resource has no href yet; `save` will POST to `create_target`
    /// and adopt the href the server assigns.
    #[must_use]
    pub fn detached(kind: ResourceKind, create_target: Href) -> Self {
        Self {
            kind,
            href: None,
            create_target: Some(create_target),
            state: LoadState::Loaded,
            data: Map::new(),
            dirty: BTreeSet::new(),
            deleted: false,
        }
    }

    /// Creates an unfetched stub for a known href.
    ///
    /// The first field access will fetch the full body.
    #[must_use]
    pub fn from_href(kind: ResourceKind, href: Href) -> Self {
        Self {
            kind,
            href: Some(href),
            create_target: None,
            state: LoadState::Unfetched,
            data: Map::new(),
            dirty: BTreeSet::new(),
            deleted: false,
        }
    }

    /// Creates a resource from a reference or response body.
    ///
    /// An href-only reference produces an unfetched stub; a body carrying
    /// any other field is treated as materialized and starts out loaded.
    /// The `href` key itself is held separately, not as a data field.
    #[must_use]
    pub fn from_reference(kind: ResourceKind, href: Href, mut body: Map<String, Value>) -> Self {
        body.remove("href");
        let state = if body.is_empty() {
            LoadState::Unfetched
        } else {
            LoadState::Loaded
        };
        Self {
            kind,
            href: Some(href),
            create_target: None,
            state,
            data: body,
            dirty: BTreeSet::new(),
            deleted: false,
        }
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the kind name, used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Returns the href, if the resource has been created.
    #[must_use]
    pub const fn href(&self) -> Option<&Href> {
        self.href.as_ref()
    }

    /// Returns the current load state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Returns `true` if the full body has been fetched or materialized.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Returns `true` if the resource was deleted through this handle.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the names of locally modified, unsaved fields.
    #[must_use]
    pub const fn dirty_fields(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    /// Returns the locally cached data without fetching.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns a field from the local cache without fetching.
    #[must_use]
    pub fn get_local(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    fn href_or_missing(&self) -> Result<&Href, ResourceError> {
        self.href.as_ref().ok_or_else(|| ResourceError::MissingField {
            resource: self.name(),
            field: "href".to_string(),
        })
    }

    fn check_live(&self) -> Result<(), ResourceError> {
        if self.deleted {
            return Err(ResourceError::InvalidState {
                resource: self.name(),
            });
        }
        Ok(())
    }

    /// Fetches the full body if it has not been fetched yet.
    ///
    /// Server values are merged around dirty fields: anything set locally
    /// wins over data already in flight. On failure the state reverts to
    /// [`LoadState::Unfetched`] so a later access can try again.
    async fn ensure_loaded(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.check_live()?;
        if self.state == LoadState::Loaded {
            return Ok(());
        }
        let Some(href) = self.href.clone() else {
            return Ok(());
        };

        self.state = LoadState::Loading;
        tracing::debug!(kind = self.name(), href = %href, "fetching resource");

        match client.http().get(href.as_str(), None).await {
            Ok(response) => {
                if let Value::Object(mut body) = response.body {
                    body.remove("href");
                    for (key, value) in body {
                        if !self.dirty.contains(&key) {
                            self.data.insert(key, value);
                        }
                    }
                }
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Unfetched;
                Err(ResourceError::from_http(err, self.name(), href.as_str()))
            }
        }
    }

    /// Returns a field value, fetching the full body first if needed.
    ///
    /// Returns `None` for a field the loaded body does not carry.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle,
    /// [`ResourceError::NotFound`] if the href no longer exists, or the
    /// underlying transport error.
    pub async fn get_opt(
        &mut self,
        client: &ApiClient,
        field: &str,
    ) -> Result<Option<Value>, ResourceError> {
        self.check_live()?;
        if let Some(value) = self.data.get(field) {
            return Ok(Some(value.clone()));
        }
        if self.state != LoadState::Loaded {
            self.ensure_loaded(client).await?;
        }
        Ok(self.data.get(field).cloned())
    }

    /// Returns a required field value, fetching the full body first if needed.
    ///
    /// # Errors
    ///
    /// Like [`Self::get_opt`], plus [`ResourceError::MissingField`] when the
    /// loaded body lacks the field.
    pub async fn get(&mut self, client: &ApiClient, field: &str) -> Result<Value, ResourceError> {
        self.get_opt(client, field)
            .await?
            .ok_or_else(|| ResourceError::MissingField {
                resource: self.name(),
                field: field.to_string(),
            })
    }

    /// Returns a required field decoded into `T`.
    ///
    /// # Errors
    ///
    /// Like [`Self::get`], plus [`ResourceError::Decode`] when the value
    /// does not decode into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &mut self,
        client: &ApiClient,
        field: &str,
    ) -> Result<T, ResourceError> {
        let value = self.get(client, field).await?;
        serde_json::from_value(value).map_err(|source| ResourceError::Decode {
            resource: self.name(),
            field: field.to_string(),
            source,
        })
    }

    /// Sets a field locally and marks it dirty.
    ///
    /// Never triggers a fetch; the value survives a later fetch and is sent
    /// by the next `save`.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), ResourceError> {
        self.check_live()?;
        self.data.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());
        Ok(())
    }

    /// Removes a field from the local cache and the dirty set.
    ///
    /// Local bookkeeping only; server-side key deletion is the concern of
    /// the guarded data wrappers.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn unset(&mut self, field: &str) -> Result<(), ResourceError> {
        self.check_live()?;
        self.data.remove(field);
        self.dirty.remove(field);
        Ok(())
    }

    /// Resolves a reference field to a typed resource.
    ///
    /// The reference's href is dispatched through the type registry; an
    /// unregistered pattern is a hard error, and a registered pattern that
    /// does not match `T` fails with [`ResourceError::UnexpectedKind`].
    ///
    /// # Errors
    ///
    /// Everything [`Self::get`] can fail with, plus
    /// [`ResourceError::UnknownResourceType`] and
    /// [`ResourceError::UnexpectedKind`].
    pub async fn related<T: ResourceModel>(
        &mut self,
        client: &ApiClient,
        field: &str,
    ) -> Result<T, ResourceError> {
        let value = self.get(client, field).await?;
        let href = registry::reference_href(&value)?;
        let found = registry::kind_for_href(&href)?;
        if found != T::KIND {
            return Err(ResourceError::UnexpectedKind {
                expected: T::KIND.as_str(),
                found: found.as_str(),
                href: href.as_str().to_string(),
            });
        }
        let body = value.as_object().cloned().unwrap_or_default();
        Ok(T::from_resource(Self::from_reference(T::KIND, href, body)))
    }

    /// Resolves a reference field to a collection of `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Self::get`] can fail with, plus
    /// [`ResourceError::UnknownResourceType`] if the reference is malformed.
    pub async fn related_collection<T: ResourceModel>(
        &mut self,
        client: &ApiClient,
        field: &str,
    ) -> Result<Collection<T>, ResourceError> {
        let value = self.get(client, field).await?;
        let href = registry::reference_href(&value)?;
        Ok(Collection::new(href))
    }

    /// Persists the resource.
    ///
    /// A detached resource is created with a POST to its collection href
    /// and adopts the returned href. An existing resource POSTs only its
    /// dirty fields to its own href. In both cases the server's echo
    /// replaces the local cache and the dirty set is cleared.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::Validation`] when the service rejects the
    /// payload (e.g. a duplicate username), [`ResourceError::InvalidState`]
    /// on a deleted handle, or the underlying transport error.
    pub async fn save(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.check_live()?;

        let (target, payload) = if let Some(href) = &self.href {
            let mut payload = Map::new();
            for field in &self.dirty {
                if let Some(value) = self.data.get(field) {
                    payload.insert(field.clone(), value.clone());
                }
            }
            (href.clone(), payload)
        } else {
            let target = self
                .create_target
                .clone()
                .ok_or_else(|| ResourceError::MissingField {
                    resource: self.name(),
                    field: "href".to_string(),
                })?;
            (target, self.data.clone())
        };

        tracing::debug!(kind = self.name(), target = %target, "saving resource");
        let response = client
            .http()
            .post(target.as_str(), Value::Object(payload))
            .await
            .map_err(|err| ResourceError::from_http(err, self.name(), target.as_str()))?;

        if let Value::Object(mut body) = response.body {
            if let Some(href_value) = body.remove("href") {
                if let Some(raw) = href_value.as_str() {
                    self.href = Some(Href::new(raw).map_err(|e| {
                        ResourceError::UnknownResourceType { href: e.href }
                    })?);
                }
            }
            if !body.is_empty() {
                self.data = body;
            }
        }
        self.dirty.clear();
        self.state = LoadState::Loaded;
        Ok(())
    }

    /// Discards cached data and pending edits, forcing the next access to
    /// refetch.
    ///
    /// Only edits made before the call are discarded; fields set afterwards
    /// are dirty as usual and survive both the refetch and the next `save`.
    pub fn refresh(&mut self) {
        self.data.clear();
        self.dirty.clear();
        if !self.deleted {
            self.state = LoadState::Unfetched;
        }
    }

    /// Deletes the resource on the server.
    ///
    /// The handle becomes permanently unusable: subsequent gets and sets
    /// fail with [`ResourceError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::NotFound`] if the href no longer exists,
    /// or the underlying transport error. The handle stays live if the
    /// delete fails.
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.check_live()?;
        let href = self.href_or_missing()?.clone();

        tracing::debug!(kind = self.name(), href = %href, "deleting resource");
        client
            .http()
            .delete(href.as_str())
            .await
            .map_err(|err| ResourceError::from_http(err, self.name(), href.as_str()))?;

        self.deleted = true;
        self.data.clear();
        self.dirty.clear();
        Ok(())
    }
}

/// A typed wrapper over a [`Resource`].
///
/// Every domain resource implements this trait; it ties the wrapper to its
/// registry kind and gives the generic layer a uniform way to construct and
/// inspect typed values.
pub trait ResourceModel: Sized {
    /// The registry kind this type corresponds to.
    const KIND: ResourceKind;

    /// Wraps a raw resource. The caller is responsible for the kind match.
    fn from_resource(resource: Resource) -> Self;

    /// Returns the wrapped resource.
    fn resource(&self) -> &Resource;

    /// Returns the wrapped resource mutably.
    fn resource_mut(&mut self) -> &mut Resource;

    /// Returns the resource's href, if created.
    fn href(&self) -> Option<&Href> {
        self.resource().href()
    }

    /// Creates an unfetched handle for a known href, verifying the href
    /// against the type registry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResourceType`] if no registry
    /// pattern matches, or [`ResourceError::UnexpectedKind`] if the href
    /// belongs to a different type.
    fn from_href(href: Href) -> Result<Self, ResourceError> {
        let found = registry::kind_for_href(&href)?;
        if found != Self::KIND {
            return Err(ResourceError::UnexpectedKind {
                expected: Self::KIND.as_str(),
                found: found.as_str(),
                href: href.as_str().to_string(),
            });
        }
        Ok(Self::from_resource(Resource::from_href(Self::KIND, href)))
    }

    /// Materializes a typed resource from a full response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResourceType`] if the body carries no
    /// valid href, or [`ResourceError::UnexpectedKind`] on a kind mismatch.
    fn materialize(body: &Value) -> Result<Self, ResourceError> {
        let href = registry::reference_href(body)?;
        let found = registry::kind_for_href(&href)?;
        if found != Self::KIND {
            return Err(ResourceError::UnexpectedKind {
                expected: Self::KIND.as_str(),
                found: found.as_str(),
                href: href.as_str().to_string(),
            });
        }
        let map = body.as_object().cloned().unwrap_or_default();
        Ok(Self::from_resource(Resource::from_reference(
            Self::KIND,
            href,
            map,
        )))
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn href(path: &str) -> Href {
        Href::new(format!("https://api.veridian.io/v1{path}")).unwrap()
    }

    fn loaded_account() -> Resource {
        let body = json!({
            "href": "https://api.veridian.io/v1/accounts/a1",
            "username": "jlpicard",
            "email": "jlpicard@example.com",
            "status": "ENABLED"
        });
        Resource::from_reference(
            ResourceKind::Account,
            href("/accounts/a1"),
            body.as_object().cloned().unwrap(),
        )
    }

    #[test]
    fn test_href_only_reference_starts_unfetched() {
        let resource = Resource::from_reference(
            ResourceKind::Account,
            href("/accounts/a1"),
            json!({"href": "https://api.veridian.io/v1/accounts/a1"})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert_eq!(resource.state(), LoadState::Unfetched);
        assert!(!resource.is_loaded());
    }

    #[test]
    fn test_expanded_body_starts_loaded() {
        let resource = loaded_account();
        assert_eq!(resource.state(), LoadState::Loaded);
        assert_eq!(
            resource.get_local("username").and_then(Value::as_str),
            Some("jlpicard")
        );
        // The href key is held as identity, not data
        assert!(resource.get_local("href").is_none());
    }

    #[test]
    fn test_set_marks_field_dirty_without_fetching() {
        let mut resource = loaded_account();
        resource.set("email", json!("new@example.com")).unwrap();

        assert!(resource.dirty_fields().contains("email"));
        assert_eq!(
            resource.get_local("email").and_then(Value::as_str),
            Some("new@example.com")
        );
    }

    #[test]
    fn test_refresh_discards_prior_edits_only() {
        let mut resource = loaded_account();
        resource.set("email", json!("edit@example.com")).unwrap();

        resource.refresh();
        assert!(resource.dirty_fields().is_empty());
        assert_eq!(resource.state(), LoadState::Unfetched);

        // An edit made after the refresh is dirty as usual.
        resource.set("givenName", json!("Jean-Luc")).unwrap();
        assert!(resource.dirty_fields().contains("givenName"));
        assert_eq!(resource.state(), LoadState::Unfetched);
    }

    #[test]
    fn test_equality_is_href_equality() {
        let a = loaded_account();
        let b = Resource::from_href(ResourceKind::Account, href("/accounts/a1"));
        let c = Resource::from_href(ResourceKind::Account, href("/accounts/a2"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_detached_resources_are_never_equal() {
        let a = Resource::detached(ResourceKind::Account, href("/directories/d1/accounts"));
        let b = Resource::detached(ResourceKind::Account, href("/directories/d1/accounts"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_detached_resource_starts_loaded_and_empty() {
        let resource = Resource::detached(ResourceKind::Account, href("/applications/app1/accounts"));
        assert!(resource.is_loaded());
        assert!(resource.href().is_none());
        assert!(resource.data().is_empty());
    }

    #[tokio::test]
    async fn test_get_on_loaded_resource_is_local() {
        let client = crate::client::test_support::offline_client();
        let mut resource = loaded_account();

        // The mock base URL is unreachable; a fetch attempt would error.
        let value = resource.get(&client, "username").await.unwrap();
        assert_eq!(value, json!("jlpicard"));
    }

    #[tokio::test]
    async fn test_get_missing_field_on_loaded_resource() {
        let client = crate::client::test_support::offline_client();
        let mut resource = loaded_account();

        let result = resource.get(&client, "surname").await;
        assert!(matches!(
            result,
            Err(ResourceError::MissingField { resource: "Account", ref field }) if field == "surname"
        ));
    }

    #[tokio::test]
    async fn test_dirty_field_read_does_not_fetch() {
        let client = crate::client::test_support::offline_client();
        let mut resource = Resource::from_href(ResourceKind::Account, href("/accounts/a1"));

        // Set before any load; reading it back must not hit the network.
        resource.set("email", json!("local@example.com")).unwrap();
        let value = resource.get(&client, "email").await.unwrap();
        assert_eq!(value, json!("local@example.com"));
        assert!(!resource.is_loaded());
    }

    #[tokio::test]
    async fn test_deleted_handle_rejects_access() {
        let client = crate::client::test_support::offline_client();
        let mut resource = loaded_account();
        // Simulate the post-delete state without a round trip.
        resource.deleted = true;

        assert!(matches!(
            resource.get(&client, "username").await,
            Err(ResourceError::InvalidState { .. })
        ));
        assert!(matches!(
            resource.set("email", json!("x@example.com")),
            Err(ResourceError::InvalidState { .. })
        ));
        assert!(matches!(
            resource.save(&client).await,
            Err(ResourceError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_without_href_or_target_fails() {
        let client = crate::client::test_support::offline_client();
        let mut resource = Resource::detached(ResourceKind::Account, href("/tenants/t1/accounts"));
        resource.create_target = None;

        assert!(matches!(
            resource.save(&client).await,
            Err(ResourceError::MissingField { ref field, .. }) if field == "href"
        ));
    }

    #[tokio::test]
    async fn test_get_as_decodes_typed_values() {
        let client = crate::client::test_support::offline_client();
        let mut resource = loaded_account();

        let username: String = resource.get_as(&client, "username").await.unwrap();
        assert_eq!(username, "jlpicard");

        let result: Result<u64, _> = resource.get_as(&client, "username").await;
        assert!(matches!(result, Err(ResourceError::Decode { .. })));
    }
}

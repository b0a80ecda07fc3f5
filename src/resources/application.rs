//! Application resources and the authentication / password-reset workflows.
//!
//! An [`Application`] is the entry point accounts authenticate against.
//! Login attempts go to the application's `loginAttempts` sub-resource;
//! password reset is a three-step state machine over single-use tokens in
//! the application's `passwordResetTokens` collection:
//!
//! 1. **request**: create a token for an email
//!    ([`Application::send_password_reset_email`] or
//!    [`Application::password_reset_tokens`] + `create`)
//! 2. **verify**: exchange the token value for the owning account
//!    ([`Application::verify_password_reset_token`])
//! 3. **consume**: submit the new password, invalidating the token
//!    ([`Application::reset_account_password`])
//!
//! Each step fails independently; a consumed or expired token fails with
//! [`ResourceError::InvalidToken`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;

use crate::client::ApiClient;
use crate::clients::HttpError;
use crate::resources::account::Account;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::collection::Collection;
use crate::resources::common::ResourceStatus;
use crate::resources::custom_data::CustomData;
use crate::resources::errors::ResourceError;
use crate::resources::href::Href;
use crate::resources::registry::ResourceKind;
use crate::resources::tenant::Tenant;
use crate::resources::token::{AuthenticationResult, PasswordResetToken};

/// An application accounts authenticate against.
#[derive(Debug, Clone)]
pub struct Application {
    inner: Resource,
}

impl Application {
    fn own_href(&self) -> Result<Href, ResourceError> {
        self.inner
            .href()
            .cloned()
            .ok_or_else(|| ResourceError::MissingField {
                resource: Self::KIND.as_str(),
                field: "href".to_string(),
            })
    }

    /// Returns the application name.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a name.
    pub async fn name(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "name").await
    }

    /// Returns the application description, if one is set.
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

    /// Returns the application status.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or [`ResourceError::Decode`] for
    /// an unknown status value.
    pub async fn status(&mut self, client: &ApiClient) -> Result<ResourceStatus, ResourceError> {
        self.inner.get_as(client, "status").await
    }

    /// Sets the application name locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("name", json!(name.into()))
    }

    /// Sets the application description locally.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::InvalidState`] on a deleted handle.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ResourceError> {
        self.inner.set("description", json!(description.into()))
    }

    /// Sets the application status locally.
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

    /// Returns the accounts reachable through this application.
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

    /// Returns the password-reset-token collection.
    ///
    /// Creating a token with an `email` payload starts the reset workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the application has no
    /// href yet.
    pub fn password_reset_tokens(&self) -> Result<Collection<PasswordResetToken>, ResourceError> {
        Ok(Collection::new(self.own_href()?.child("passwordResetTokens")))
    }

    /// Returns the custom-data handle for this application.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the application has no
    /// href yet.
    pub fn custom_data(&self) -> Result<CustomData, ResourceError> {
        Ok(CustomData::for_owner(&self.own_href()?))
    }

    /// Authenticates an account against this application.
    ///
    /// The login may be a username or an email address; the credential pair
    /// is submitted to the application's `loginAttempts` sub-resource as a
    /// base64 basic value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Authentication`] on any rejected credential
    /// pair. The error is deliberately undifferentiated so callers cannot
    /// tell whether the login or the password was wrong.
    pub async fn authenticate_account(
        &self,
        client: &ApiClient,
        login: &str,
        password: &str,
    ) -> Result<AuthenticationResult, ResourceError> {
        let attempts = self.own_href()?.child("loginAttempts");
        let value = BASE64.encode(format!("{login}:{password}"));
        let payload = json!({"type": "basic", "value": value});

        tracing::debug!(application = %attempts, "submitting login attempt");
        match client.http().post(attempts.as_str(), payload).await {
            Ok(response) => AuthenticationResult::from_body(&response.body),
            Err(HttpError::Response(e)) if (400..500).contains(&e.status) => {
                Err(ResourceError::Authentication)
            }
            Err(err) => Err(ResourceError::Http(err)),
        }
    }

    /// Requests a password reset for an email, sending the reset message.
    ///
    /// Returns the account the email belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for an unknown email, or the
    /// underlying transport error.
    pub async fn send_password_reset_email(
        &self,
        client: &ApiClient,
        email: &str,
    ) -> Result<Account, ResourceError> {
        let tokens = self.password_reset_tokens()?;
        let response = client
            .http()
            .post(tokens.href().as_str(), json!({"email": email}))
            .await
            .map_err(|err| {
                ResourceError::from_http(err, Account::KIND.as_str(), tokens.href().as_str())
            })?;

        Ok(AuthenticationResult::from_body(&response.body)?.into_account())
    }

    /// Verifies a password-reset token, returning the owning account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidToken`] for an expired, consumed or
    /// unknown token.
    pub async fn verify_password_reset_token(
        &self,
        client: &ApiClient,
        token: &str,
    ) -> Result<Account, ResourceError> {
        let target = self.own_href()?.child(&format!("passwordResetTokens/{token}"));

        match client.http().get(target.as_str(), None).await {
            Ok(response) => {
                Ok(AuthenticationResult::from_body(&response.body)?.into_account())
            }
            Err(HttpError::Response(e)) if (400..500).contains(&e.status) => {
                Err(ResourceError::InvalidToken)
            }
            Err(err) => Err(ResourceError::Http(err)),
        }
    }

    /// Consumes a password-reset token, setting the account's new password.
    ///
    /// The token is single-use: this invalidates it, and any further
    /// verify or consume fails.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidToken`] for an expired, consumed or
    /// unknown token.
    pub async fn reset_account_password(
        &self,
        client: &ApiClient,
        token: &str,
        new_password: &str,
    ) -> Result<Account, ResourceError> {
        let target = self.own_href()?.child(&format!("passwordResetTokens/{token}"));
        let payload = json!({"password": new_password});

        match client.http().post(target.as_str(), payload).await {
            Ok(response) => {
                Ok(AuthenticationResult::from_body(&response.body)?.into_account())
            }
            Err(HttpError::Response(e)) if (400..500).contains(&e.status) => {
                Err(ResourceError::InvalidToken)
            }
            Err(err) => Err(ResourceError::Http(err)),
        }
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

    /// Deletes the application; the handle becomes unusable.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&mut self, client: &ApiClient) -> Result<(), ResourceError> {
        self.inner.delete(client).await
    }
}

impl ResourceModel for Application {
    const KIND: ResourceKind = ResourceKind::Application;

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

    fn loaded_application() -> Application {
        Application::materialize(&json!({
            "href": "https://api.veridian.io/v1/applications/app1",
            "name": "Bridge Console",
            "status": "ENABLED",
            "accounts": {"href": "https://api.veridian.io/v1/applications/app1/accounts"},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_application_accessors() {
        let client = crate::client::test_support::offline_client();
        let mut application = loaded_application();

        assert_eq!(application.name(&client).await.unwrap(), "Bridge Console");
        assert!(application.description(&client).await.unwrap().is_none());
        assert!(application.status(&client).await.unwrap().is_enabled());
    }

    #[test]
    fn test_password_reset_tokens_collection_href() {
        let application = loaded_application();
        let tokens = application.password_reset_tokens().unwrap();
        assert_eq!(
            tokens.href().as_str(),
            "https://api.veridian.io/v1/applications/app1/passwordResetTokens"
        );
    }

    #[tokio::test]
    async fn test_accounts_collection_resolves_from_reference() {
        let client = crate::client::test_support::offline_client();
        let mut application = loaded_application();

        let accounts = application.accounts(&client).await.unwrap();
        assert_eq!(
            accounts.href().as_str(),
            "https://api.veridian.io/v1/applications/app1/accounts"
        );
    }

    #[test]
    fn test_workflow_operations_require_href() {
        let application = Application::from_resource(Resource::detached(
            ResourceKind::Application,
            Href::new("https://api.veridian.io/v1/tenants/t1/applications").unwrap(),
        ));

        assert!(matches!(
            application.password_reset_tokens(),
            Err(ResourceError::MissingField { .. })
        ));
    }
}

//! Password-reset tokens and authentication results.

use serde_json::Value;

use crate::client::ApiClient;
use crate::resources::account::Account;
use crate::resources::base::{Resource, ResourceModel};
use crate::resources::errors::ResourceError;
use crate::resources::registry::{self, ResourceKind};

/// A single-use token driving the password-reset workflow.
///
/// Created through an application's password-reset-token collection with an
/// account email; the token value is then exchanged for the owning account
/// (verify) and finally consumed together with the new password. Each step
/// invalidates nothing but the last: a consumed or expired token fails with
/// [`ResourceError::InvalidToken`] on any further use.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    inner: Resource,
}

impl PasswordResetToken {
    /// Returns the opaque token value.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks a token.
    pub async fn token(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "token").await
    }

    /// Returns the email the reset was requested for.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch error, or
    /// [`ResourceError::MissingField`] if the body lacks an email.
    pub async fn email(&mut self, client: &ApiClient) -> Result<String, ResourceError> {
        self.inner.get_as(client, "email").await
    }

    /// Returns the account the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns the underlying fetch or reference-resolution error.
    pub async fn account(&mut self, client: &ApiClient) -> Result<Account, ResourceError> {
        self.inner.related(client, "account").await
    }
}

impl ResourceModel for PasswordResetToken {
    const KIND: ResourceKind = ResourceKind::PasswordResetToken;

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

/// The result of a successful login attempt.
///
/// Wraps the resolved [`Account`] reference returned by the service. The
/// account starts out unfetched; its first field access loads the full
/// body.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    account: Account,
}

impl AuthenticationResult {
    /// Builds a result from a login-attempt response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the body carries no
    /// account reference, or a registry error for a malformed one.
    pub fn from_body(body: &Value) -> Result<Self, ResourceError> {
        let reference = body
            .get("account")
            .ok_or_else(|| ResourceError::MissingField {
                resource: "AuthenticationResult",
                field: "account".to_string(),
            })?;

        let href = registry::reference_href(reference)?;
        let found = registry::kind_for_href(&href)?;
        if found != Account::KIND {
            return Err(ResourceError::UnexpectedKind {
                expected: Account::KIND.as_str(),
                found: found.as_str(),
                href: href.as_str().to_string(),
            });
        }

        let map = reference.as_object().cloned().unwrap_or_default();
        Ok(Self {
            account: Account::from_resource(Resource::from_reference(Account::KIND, href, map)),
        })
    }

    /// Returns the authenticated account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Consumes the result, returning the authenticated account.
    #[must_use]
    pub fn into_account(self) -> Account {
        self.account
    }
}

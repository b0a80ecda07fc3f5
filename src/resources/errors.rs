//! Resource-specific error types for Veridian API operations.
//!
//! This module contains the error taxonomy for resource operations,
//! extending the transport-level [`HttpError`](crate::clients::HttpError)
//! with semantic variants like `NotFound` and `Validation`.
//!
//! # Error Handling
//!
//! The SDK maps HTTP status codes to semantic error variants:
//!
//! - **404**: [`ResourceError::NotFound`] - the href no longer exists
//! - **Other 4xx**: [`ResourceError::Validation`] - the service rejected the
//!   payload (e.g. a duplicate username), carrying the service error code
//!   and message
//! - **5xx / transport**: [`ResourceError::Http`] - wrapped HTTP error
//!
//! Workflow operations add their own mappings on top: login attempts
//! produce [`ResourceError::Authentication`] and password-reset token
//! exchanges produce [`ResourceError::InvalidToken`].
//!
//! Nothing is retried or recovered here; every error propagates to the
//! caller with enough structure to branch on.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::resources::ResourceError;
//!
//! match directory.accounts().create(&client, payload).await {
//!     Ok(account) => println!("created {}", account.href().unwrap()),
//!     Err(ResourceError::Validation { code, message, .. }) => {
//!         println!("rejected ({code}): {message}");
//!     }
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for resource operations.
///
/// This enum provides semantic error types for resource operations,
/// mapping HTTP error codes to meaningful variants while preserving
/// the service's error code and message for caller-side branching.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource was not found (HTTP 404).
    #[error("{resource} at {href} not found")]
    NotFound {
        /// The type name of the resource (e.g., "Account", "Group").
        resource: &'static str,
        /// The href that was requested.
        href: String,
    },

    /// The service rejected the payload (HTTP 400-class).
    ///
    /// Covers uniqueness violations (duplicate username or email), missing
    /// required fields and other server-side validation failures.
    #[error("Validation failed ({code}): {message}")]
    Validation {
        /// The service-specific error code.
        code: u64,
        /// The user-facing error message.
        message: String,
        /// A documentation URL describing the error, if provided.
        more_info: Option<String>,
        /// The request ID for debugging (from the X-Request-Id header).
        request_id: Option<String>,
    },

    /// Login attempt failed.
    ///
    /// Deliberately undifferentiated: callers cannot tell whether the login
    /// or the password was wrong.
    #[error("Invalid username or password.")]
    Authentication,

    /// A password-reset token is expired, consumed or unknown.
    #[error("The password reset token is invalid or has already been used.")]
    InvalidToken,

    /// No resource type is registered for an href pattern.
    ///
    /// This is a programming or configuration defect, never retried and
    /// never silently downgraded to an untyped value.
    #[error("No resource type registered for href '{href}'")]
    UnknownResourceType {
        /// The href that failed to resolve.
        href: String,
    },

    /// A reference resolved to a registered type other than the one the
    /// caller requested.
    #[error("Expected a {expected} reference but '{href}' is a {found}")]
    UnexpectedKind {
        /// The type the caller asked for.
        expected: &'static str,
        /// The type the registry resolved.
        found: &'static str,
        /// The offending href.
        href: String,
    },

    /// The handle refers to a deleted resource.
    #[error("{resource} handle is no longer usable: the resource was deleted")]
    InvalidState {
        /// The type name of the resource.
        resource: &'static str,
    },

    /// A lookup that must match exactly one resource matched several.
    #[error("Query '{query}' matched {count} resources, expected exactly one")]
    AmbiguousMatch {
        /// The filter that was applied.
        query: String,
        /// How many resources matched.
        count: usize,
    },

    /// A write or delete targeted a reserved, server-maintained key.
    ///
    /// Rejected locally, before any round trip.
    #[error("'{key}' is a reserved, read-only key")]
    ReservedKey {
        /// The reserved key that was targeted.
        key: String,
    },

    /// A loaded resource body lacks an expected field.
    #[error("{resource} is missing field '{field}'")]
    MissingField {
        /// The type name of the resource.
        resource: &'static str,
        /// The missing field name.
        field: String,
    },

    /// A field value could not be decoded into the requested type.
    #[error("{resource} field '{field}' could not be decoded: {source}")]
    Decode {
        /// The type name of the resource.
        resource: &'static str,
        /// The offending field name.
        field: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A transport-level error occurred.
    ///
    /// Wraps network failures and non-2xx responses that don't map to a
    /// more specific variant.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Maps a transport error onto the resource taxonomy.
    ///
    /// 404 becomes [`Self::NotFound`]; other 4xx responses become
    /// [`Self::Validation`] carrying the service's error payload; everything
    /// else is wrapped unchanged.
    #[must_use]
    pub fn from_http(err: HttpError, resource: &'static str, href: &str) -> Self {
        match err {
            HttpError::Response(e) if e.status == 404 => Self::NotFound {
                resource,
                href: href.to_string(),
            },
            HttpError::Response(e) if (400..500).contains(&e.status) => Self::Validation {
                code: e.code,
                message: e.message,
                more_info: e.more_info,
                request_id: e.request_id,
            },
            other => Self::Http(other),
        }
    }

    /// Returns the request ID if this error carries one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Validation { request_id, .. } => request_id.as_deref(),
            Self::Http(HttpError::Response(e)) => e.request_id.as_deref(),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    fn response_error(status: u16, code: u64, message: &str) -> HttpError {
        HttpError::Response(HttpResponseError {
            status,
            code,
            message: message.to_string(),
            developer_message: None,
            more_info: Some(format!("https://docs.veridian.io/errors/{code}")),
            request_id: Some("req-1".to_string()),
        })
    }

    #[test]
    fn test_from_http_maps_404_to_not_found() {
        let error = ResourceError::from_http(
            response_error(404, 404, "not here"),
            "Account",
            "https://api.veridian.io/v1/accounts/a1",
        );

        assert!(matches!(
            error,
            ResourceError::NotFound { resource: "Account", ref href }
                if href.ends_with("/accounts/a1")
        ));
    }

    #[test]
    fn test_from_http_maps_400_class_to_validation() {
        let error = ResourceError::from_http(
            response_error(409, 4010, "An account with that username already exists."),
            "Account",
            "https://api.veridian.io/v1/directories/d1/accounts",
        );

        if let ResourceError::Validation {
            code,
            message,
            more_info,
            request_id,
        } = error
        {
            assert_eq!(code, 4010);
            assert!(message.contains("already exists"));
            assert!(more_info.unwrap().contains("4010"));
            assert_eq!(request_id.as_deref(), Some("req-1"));
        } else {
            panic!("Expected Validation variant");
        }
    }

    #[test]
    fn test_from_http_wraps_5xx_unchanged() {
        let error = ResourceError::from_http(
            response_error(500, 500, "boom"),
            "Account",
            "https://api.veridian.io/v1/accounts/a1",
        );

        assert!(matches!(error, ResourceError::Http(_)));
    }

    #[test]
    fn test_authentication_error_does_not_leak_which_credential_failed() {
        let message = ResourceError::Authentication.to_string();
        assert_eq!(message, "Invalid username or password.");
        assert!(!message.contains("login"));
    }

    #[test]
    fn test_unknown_resource_type_message_includes_href() {
        let error = ResourceError::UnknownResourceType {
            href: "https://api.veridian.io/v1/widgets/w1".to_string(),
        };
        assert!(error.to_string().contains("/widgets/w1"));
    }

    #[test]
    fn test_ambiguous_match_message() {
        let error = ResourceError::AmbiguousMatch {
            query: "name=*admins*".to_string(),
            count: 3,
        };
        let message = error.to_string();
        assert!(message.contains("name=*admins*"));
        assert!(message.contains('3'));
        assert!(message.contains("exactly one"));
    }

    #[test]
    fn test_request_id_extraction() {
        let error = ResourceError::Validation {
            code: 2000,
            message: "bad".to_string(),
            more_info: None,
            request_id: Some("req-abc".to_string()),
        };
        assert_eq!(error.request_id(), Some("req-abc"));

        let error = ResourceError::Authentication;
        assert_eq!(error.request_id(), None);
    }

    #[test]
    fn test_all_error_variants_implement_std_error() {
        let errors: Vec<ResourceError> = vec![
            ResourceError::NotFound {
                resource: "Group",
                href: "h".to_string(),
            },
            ResourceError::Authentication,
            ResourceError::InvalidToken,
            ResourceError::InvalidState { resource: "Account" },
            ResourceError::MissingField {
                resource: "Account",
                field: "email".to_string(),
            },
        ];
        for error in &errors {
            let _: &dyn std::error::Error = error;
        }
    }
}

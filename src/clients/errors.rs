//! HTTP-specific error types for the Veridian API SDK.
//!
//! This module contains error types for HTTP operations: non-2xx responses
//! carrying the service's structured error payload, request validation
//! failures, and transport-level failures.
//!
//! # Error Handling
//!
//! The SDK uses specific error types for different failure scenarios:
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! The client never retries a failed exchange; every error propagates to the
//! caller with the server's code and message intact.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::clients::{HttpClient, HttpRequest, HttpMethod, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         println!("API error {} (code {}): {}", e.status, e.code, e.message);
//!     }
//!     Err(HttpError::InvalidRequest(e)) => {
//!         println!("Invalid request: {}", e);
//!     }
//!     Err(HttpError::Network(e)) => {
//!         println!("Network error: {}", e);
//!     }
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// The Veridian service reports errors as a JSON object with a numeric
/// service `code`, a user-facing `message`, an optional `developerMessage`,
/// and a `moreInfo` documentation URL. All of those fields are carried here
/// unchanged so callers can branch on them.
///
/// # Example
///
/// ```rust
/// use veridian_api::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     status: 409,
///     code: 4010,
///     message: "An account with that username already exists.".to_string(),
///     developer_message: None,
///     more_info: Some("https://docs.veridian.io/errors/4010".to_string()),
///     request_id: Some("abc-123".to_string()),
/// };
///
/// println!("Status {}: {}", error.status, error.message);
/// ```
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The service-specific error code from the response body.
    pub code: u64,
    /// The user-facing error message from the response body.
    pub message: String,
    /// The developer-facing error message, if the service provided one.
    pub developer_message: Option<String>,
    /// A documentation URL describing the error, if provided.
    pub more_info: Option<String>,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub request_id: Option<String>,
}

impl HttpResponseError {
    /// Builds an error from a non-2xx response body.
    ///
    /// Missing payload fields fall back to the HTTP status code and a
    /// generic message, so a malformed error body never hides the failure.
    #[must_use]
    pub fn from_body(status: u16, body: &serde_json::Value, request_id: Option<&str>) -> Self {
        let code = body
            .get("code")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| u64::from(status));
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| format!("HTTP {status} response"), ToString::to_string);
        let developer_message = body
            .get("developerMessage")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);
        let more_info = body
            .get("moreInfo")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        Self {
            status,
            code,
            message,
            developer_message,
            more_info,
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Error returned when an HTTP request fails validation.
///
/// This error is raised before a request is sent if it fails validation
/// checks, such as:
/// - Missing body for POST requests
/// - Body provided for GET/DELETE requests
///
/// # Example
///
/// ```rust
/// use veridian_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// println!("{}", error); // "Cannot use post without specifying data."
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A body was supplied for a method that does not carry one.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that rejects a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
///
/// This enum provides a single error type for HTTP operations, making it
/// easier to handle errors at API boundaries. Use pattern matching to
/// handle specific error types.
///
/// # Example
///
/// ```rust,ignore
/// use veridian_api::HttpError;
///
/// let result = client.request(request).await;
/// match result {
///     Ok(response) => { /* handle success */ }
///     Err(HttpError::Response(e)) => { /* handle API error */ }
///     Err(HttpError::InvalidRequest(e)) => { /* handle validation error */ }
///     Err(HttpError::Network(e)) => { /* handle network error */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status of the server response, if this error
    /// carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

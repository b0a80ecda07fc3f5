//! HTTP response types for the Veridian API SDK.
//!
//! This module provides the [`HttpResponse`] type for parsing and accessing
//! API response data.

use std::collections::HashMap;

/// A parsed HTTP response from the Veridian API.
///
/// All response bodies are JSON objects; an empty body (e.g. from a DELETE)
/// is represented as an empty JSON object.
///
/// # Example
///
/// ```rust
/// use veridian_api::clients::HttpResponse;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let response = HttpResponse::new(200, HashMap::new(), json!({"href": "https://api.veridian.io/v1/accounts/a1"}));
/// assert!(response.is_ok());
/// assert_eq!(response.body["href"], "https://api.veridian.io/v1/accounts/a1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased, with repeated headers collected.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new response from its parts.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of the given header, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the request ID from the `X-Request-Id` header, if present.
    ///
    /// Useful for debugging and error reporting.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}

// Verify HttpResponse is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpResponse>();
};

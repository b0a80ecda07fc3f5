//! HTTP request types for the Veridian API SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the Veridian API.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the Veridian API.
///
/// The service is driven entirely through GET (fetch), POST (create and
/// partial update) and DELETE (remove).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request to be sent to the Veridian API.
///
/// The target may be a path relative to the configured base URL (e.g.
/// `"tenants/current"`) or an absolute href returned by the service; hrefs
/// pass through untouched.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use veridian_api::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// // GET request
/// let get_request = HttpRequest::builder(HttpMethod::Get, "tenants/current")
///     .build()
///     .unwrap();
///
/// // POST request with JSON body
/// let post_request = HttpRequest::builder(HttpMethod::Post, "https://api.veridian.io/v1/applications/a1/loginAttempts")
///     .body(json!({"type": "basic", "value": "dXNlcjpwYXNz"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The target: a path relative to the base URL, or an absolute href.
    pub target: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method for the request
    /// * `target` - A relative path or absolute href
    #[must_use]
    pub fn builder(method: HttpMethod, target: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, target)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` but `body` is `None`
    /// - `http_method` is `Get` or `Delete` and a `body` is present
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        match self.http_method {
            HttpMethod::Post => {
                if self.body.is_none() {
                    return Err(InvalidHttpRequestError::MissingBody {
                        method: self.http_method.to_string(),
                    });
                }
            }
            HttpMethod::Get | HttpMethod::Delete => {
                if self.body.is_some() {
                    return Err(InvalidHttpRequestError::UnexpectedBody {
                        method: self.http_method.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
///
/// Provides a fluent API for building requests with optional parameters.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    target: String,
    body: Option<serde_json::Value>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequestBuilder {
    /// Creates a new builder for the given method and target.
    #[must_use]
    pub fn new(method: HttpMethod, target: impl Into<String>) -> Self {
        Self {
            http_method: method,
            target: target.into(),
            body: None,
            query: None,
            extra_headers: None,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds an extra header to the request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request is invalid
    /// (see [`HttpRequest::verify`]).
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            target: self.target,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}

// Verify request types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpMethod>();
    assert_send_sync::<HttpRequest>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request_builds_without_body() {
        let request = HttpRequest::builder(HttpMethod::Get, "tenants/current")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.target, "tenants/current");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_request_requires_body() {
        let result = HttpRequest::builder(HttpMethod::Post, "accounts").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { .. })
        ));
    }

    #[test]
    fn test_get_request_rejects_body() {
        let result = HttpRequest::builder(HttpMethod::Get, "accounts")
            .body(json!({"nope": true}))
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnexpectedBody { .. })
        ));
    }

    #[test]
    fn test_delete_request_rejects_body() {
        let result = HttpRequest::builder(HttpMethod::Delete, "accounts/a1")
            .body(json!({}))
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnexpectedBody { .. })
        ));
    }

    #[test]
    fn test_post_request_with_body_builds() {
        let request = HttpRequest::builder(HttpMethod::Post, "accounts")
            .body(json!({"username": "jlpicard"}))
            .build()
            .unwrap();

        assert_eq!(request.body.unwrap()["username"], "jlpicard");
    }

    #[test]
    fn test_query_and_headers_are_carried() {
        let mut query = HashMap::new();
        query.insert("username".to_string(), "jlpicard".to_string());

        let request = HttpRequest::builder(HttpMethod::Get, "accounts")
            .query(query)
            .header("X-Test", "1")
            .build()
            .unwrap();

        assert_eq!(
            request.query.unwrap().get("username"),
            Some(&"jlpicard".to_string())
        );
        assert_eq!(
            request.extra_headers.unwrap().get("X-Test"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_http_method_display_lowercase() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }
}

//! HTTP client for Veridian API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Veridian API.
//!
//! Every call performs exactly one HTTP exchange: there is no retry loop,
//! no background fetching and no response cache. A failed exchange is
//! surfaced to the caller unchanged.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ApiConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Veridian API.
///
/// The client handles:
/// - Resolution of relative paths against the configured base URL
///   (absolute hrefs returned by the service pass through untouched)
/// - Default headers including User-Agent and HTTP Basic credentials
/// - JSON body parsing and structured error extraction
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use veridian_api::{ApiConfig, ApiKeyId, ApiKeySecret};
/// use veridian_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = ApiConfig::builder()
///     .api_key_id(ApiKeyId::new("id").unwrap())
///     .api_key_secret(ApiKeySecret::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "tenants/current")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL all relative targets resolve against.
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let base_url = config.base_url().as_ref().to_string();

        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Veridian API Library v{SDK_VERSION} | Rust {rust_version}");

        // HTTP Basic credentials from the API key pair
        let credentials = BASE64.encode(format!(
            "{}:{}",
            config.api_key_id().as_ref(),
            config.api_key_secret().as_ref()
        ));

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Authorization".to_string(), format!("Basic {credentials}"));

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            default_headers,
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Resolves a request target to a full URL.
    ///
    /// Absolute hrefs (as handed out by the service) are used as-is;
    /// anything else is joined onto the base URL.
    #[must_use]
    pub fn resolve_url(&self, target: &str) -> String {
        if target.starts_with("https://") || target.starts_with("http://") {
            target.to_string()
        } else {
            format!("{}/{}", self.base_url, target.trim_start_matches('/'))
        }
    }

    /// Sends an HTTP request to the Veridian API.
    ///
    /// This method handles request validation, URL resolution, header
    /// merging and response parsing. The exchange is performed exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The connection fails (`Network`)
    /// - A non-2xx response is received (`Response`, carrying the service's
    ///   structured error payload)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.resolve_url(&request.target);
        tracing::debug!(method = %request.http_method, %url, "dispatching request");

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                req_builder = req_builder.header(key, value);
            }
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| serde_json::json!({}))
        };

        let response = HttpResponse::new(code, headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(status = code, %url, "request failed");
        Err(HttpError::Response(HttpResponseError::from_body(
            code,
            &response.body,
            response.request_id(),
        )))
    }

    /// Sends a GET request to the given target.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for network failures and non-2xx responses.
    pub async fn get(
        &self,
        target: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, target);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.request(builder.build()?).await
    }

    /// Sends a POST request with a JSON body to the given target.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for network failures and non-2xx responses.
    pub async fn post(
        &self,
        target: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.request(HttpRequest::builder(HttpMethod::Post, target).body(body).build()?)
            .await
    }

    /// Sends a DELETE request to the given target.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for network failures and non-2xx responses.
    pub async fn delete(&self, target: &str) -> Result<HttpResponse, HttpError> {
        self.request(HttpRequest::builder(HttpMethod::Delete, target).build()?)
            .await
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

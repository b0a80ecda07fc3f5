//! HTTP client infrastructure for the Veridian API.
//!
//! This module provides the transport layer the resource abstractions are
//! built on:
//!
//! - [`HttpClient`]: authenticated request dispatch against the configured
//!   base URL
//! - [`HttpRequest`] / [`HttpRequestBuilder`]: validated request construction
//! - [`HttpResponse`]: parsed JSON responses with header access
//! - [`HttpError`] and friends: transport and service error types
//!
//! The transport never retries, caches or recovers; every failure propagates
//! to the caller with the server's structured error payload intact.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

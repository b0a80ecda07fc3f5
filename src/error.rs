//! Error types for the Veridian API SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use veridian_api::{ApiKeyId, ConfigError};
//!
//! let result = ApiKeyId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKeyId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key id cannot be empty.
    #[error("API key id cannot be empty. Please provide a valid Veridian API key id.")]
    EmptyApiKeyId,

    /// API key secret cannot be empty.
    #[error("API key secret cannot be empty. Please provide a valid Veridian API key secret.")]
    EmptyApiKeySecret,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://api.veridian.io/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A credential environment variable is missing or unreadable.
    #[error("Missing environment variable '{name}'. Set it to your Veridian API credential.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_id_error_message() {
        let error = ConfigError::EmptyApiKeyId;
        let message = error.to_string();
        assert!(message.contains("API key id cannot be empty"));
        assert!(message.contains("valid Veridian API key id"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://nope".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://nope"));
        assert!(message.contains("absolute http(s) URL"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "api_key_id" };
        let message = error.to_string();
        assert!(message.contains("api_key_id"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_missing_env_var_error_message() {
        let error = ConfigError::MissingEnvVar {
            name: "VERIDIAN_API_KEY_ID",
        };
        assert!(error.to_string().contains("VERIDIAN_API_KEY_ID"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyApiKeyId;
        // Verify it implements std::error::Error by using it as a dyn Error
        let _: &dyn std::error::Error = &error;
    }
}

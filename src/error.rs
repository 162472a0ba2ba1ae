//! Configuration error types for the Nobl9 API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so invalid
//! settings are rejected before any network call is made.
//!
//! # Example
//!
//! ```rust
//! use nobl9_api::{ConfigError, OrganizationId};
//!
//! let result = OrganizationId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyOrganization)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Organization id cannot be empty.
    #[error("Organization cannot be empty. Set NOBL9_ORG to your Nobl9 organization ID.")]
    EmptyOrganization,

    /// Client id cannot be empty.
    #[error("Client ID cannot be empty. Please provide a valid Nobl9 client ID.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide a valid Nobl9 client secret.")]
    EmptyClientSecret,

    /// Pre-generated API token cannot be empty.
    #[error("API token cannot be empty. Please provide a valid Nobl9 API token.")]
    EmptyApiToken,

    /// Neither an API token nor a complete client credential pair was supplied.
    #[error(
        "Either NOBL9_CLIENT_ID and NOBL9_CLIENT_SECRET, or NOBL9_API_TOKEN must be set. \
         Client credentials are recommended."
    )]
    MissingCredentials,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme (e.g., 'https://app.nobl9.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Retry policy values are out of range.
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// Why the policy was rejected.
        reason: String,
    },
}

//! Error types for the Nobl9 API client.
//!
//! Every failed call surfaces as one [`ApiError`] variant. Response codes are
//! mapped to variants by [`classify_response`](crate::clients::classify_response):
//!
//! | Status | Variant |
//! |---|---|
//! | 400 | [`ApiError::Validation`] |
//! | 401 | [`ApiError::Authentication`] |
//! | 404 | [`ApiError::NotFound`] |
//! | 429 | [`ApiError::RateLimit`] |
//! | 502, 503 | [`ApiError::Transient`] (retried) |
//! | 500 and anything else | [`ApiError::Api`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use nobl9_api::{ApiError, ErrorKind};
//!
//! match client.get("/status-page/status", None).await {
//!     Ok(body) => println!("{body}"),
//!     Err(e) if e.kind() == ErrorKind::Authentication => eprintln!("check credentials: {e}"),
//!     Err(ApiError::Transient(e)) => eprintln!("gave up after {} attempts", e.attempts),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use thiserror::Error;

/// A retryable failure (HTTP 502 or 503).
///
/// Classification of a single response yields `attempts == 1` with
/// `exhausted == false`. When the retry loop gives up it marks the error
/// exhausted and records the total attempt count, which changes the message
/// to "Request failed after N attempts. Last error: ...".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", describe_transient(.code, .message, .attempts, .exhausted))]
pub struct TransientApiError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// Body text of the last response.
    pub message: String,
    /// How many attempts were made.
    pub attempts: u32,
    /// Whether the retry policy ran out of attempts.
    pub exhausted: bool,
}

impl TransientApiError {
    /// Creates the error for a single 502/503 response.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            attempts: 1,
            exhausted: false,
        }
    }

    /// Marks the error as final after `attempts` tries.
    #[must_use]
    pub const fn exhausted_after(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self.exhausted = true;
        self
    }
}

fn describe_transient(code: &u16, message: &str, attempts: &u32, exhausted: &bool) -> String {
    let last = format!("Transient API error (HTTP {code}): {message}");
    if *exhausted {
        format!("Request failed after {attempts} attempts. Last error: {last}")
    } else {
        last
    }
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("Cannot serialize request body: {message}")]
    UnserializableBody {
        /// The serializer's message.
        message: String,
    },

    /// Paths are appended to the API prefix and must start with `/`.
    #[error("Request path '{path}' must start with '/'.")]
    RelativePath {
        /// The offending path.
        path: String,
    },
}

/// Unified error type for every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials are missing or were rejected.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// What went wrong.
        message: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("Resource not found: {message}")]
    NotFound {
        /// Response body text.
        message: String,
    },

    /// The API rejected the call because of rate limiting (HTTP 429).
    #[error("Rate limit exceeded. Please retry later.")]
    RateLimit {
        /// Response body text.
        message: String,
    },

    /// The API rejected the request payload (HTTP 400).
    #[error("Validation error: {message}")]
    Validation {
        /// Response body text.
        message: String,
    },

    /// A retryable gateway failure (HTTP 502/503).
    #[error(transparent)]
    Transient(#[from] TransientApiError),

    /// Any other non-success response.
    #[error("{}", describe_api_error(.code, .message))]
    Api {
        /// The HTTP status code.
        code: u16,
        /// Response body text.
        message: String,
    },

    /// A success response whose body was not valid JSON.
    #[error("Failed to decode response (HTTP {code}): {message}")]
    Decode {
        /// The HTTP status code.
        code: u16,
        /// The decoder's message.
        message: String,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

fn describe_api_error(code: &u16, message: &str) -> String {
    if *code == 500 {
        format!("Server error: {message}")
    } else {
        format!("Unexpected error (HTTP {code}): {message}")
    }
}

/// The kind of an [`ApiError`], without its payload.
///
/// Intended for mapping failures to exit codes or message prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ApiError::Authentication`].
    Authentication,
    /// See [`ApiError::NotFound`].
    NotFound,
    /// See [`ApiError::RateLimit`].
    RateLimit,
    /// See [`ApiError::Validation`].
    Validation,
    /// See [`ApiError::Transient`].
    Transient,
    /// See [`ApiError::Api`].
    Api,
    /// See [`ApiError::Decode`].
    Decode,
    /// See [`ApiError::InvalidRequest`].
    InvalidRequest,
    /// See [`ApiError::Network`].
    Network,
}

impl ApiError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transient(_) => ErrorKind::Transient,
            Self::Api { .. } => ErrorKind::Api,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// Returns `true` if the retry loop would try this call again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Returns the HTTP status code that produced this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } | Self::InvalidRequest(_) => None,
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Validation { .. } => Some(400),
            Self::Transient(e) => Some(e.code),
            Self::Api { code, .. } | Self::Decode { code, .. } => Some(*code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_transient_error_message() {
        let error = TransientApiError::new(503, "Service temporarily unavailable");
        assert_eq!(
            error.to_string(),
            "Transient API error (HTTP 503): Service temporarily unavailable"
        );
    }

    #[test]
    fn test_exhausted_transient_error_includes_attempt_count() {
        let error = TransientApiError::new(502, "bad gateway").exhausted_after(4);
        let message = error.to_string();
        assert!(message.starts_with("Request failed after 4 attempts."));
        assert!(message.contains("HTTP 502"));
        assert!(message.contains("bad gateway"));
    }

    #[test]
    fn test_exhausted_single_attempt_keeps_wrapper() {
        let error = TransientApiError::new(503, "down").exhausted_after(1);
        assert_eq!(
            error.to_string(),
            "Request failed after 1 attempts. Last error: Transient API error (HTTP 503): down"
        );
    }

    #[test]
    fn test_api_error_message_distinguishes_server_error() {
        let server = ApiError::Api {
            code: 500,
            message: "boom".to_string(),
        };
        let other = ApiError::Api {
            code: 418,
            message: "teapot".to_string(),
        };
        assert_eq!(server.to_string(), "Server error: boom");
        assert_eq!(other.to_string(), "Unexpected error (HTTP 418): teapot");
    }

    #[test]
    fn test_only_transient_is_retryable() {
        let transient: ApiError = TransientApiError::new(503, "").into();
        assert!(transient.is_retryable());
        assert_eq!(transient.kind(), ErrorKind::Transient);

        let not_found = ApiError::NotFound {
            message: String::new(),
        };
        assert!(!not_found.is_retryable());
        assert_eq!(not_found.status_code(), Some(404));
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidRequestError::MissingBody {
            method: "post".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use post without specifying data.");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &ApiError::RateLimit {
            message: String::new(),
        };
        let _: &dyn std::error::Error = &InvalidRequestError::RelativePath {
            path: "x".to_string(),
        };
    }
}

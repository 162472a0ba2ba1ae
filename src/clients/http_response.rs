//! HTTP response handling for the Nobl9 API client.
//!
//! [`classify_response`] is the single place where status codes become
//! either a decoded payload or an [`ApiError`].

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{ApiError, TransientApiError};

/// A raw HTTP response from the Nobl9 API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Classifies this response. See [`classify_response`].
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] matching the status code.
    pub fn into_result(self) -> Result<Value, ApiError> {
        classify_response(self.code, &self.body)
    }
}

/// Maps a status code and body to a decoded payload or a typed error.
///
/// | Status | Outcome |
/// |---|---|
/// | 200 | JSON body, or `{}` when the body is empty |
/// | 201 | JSON body |
/// | 204 | `{}` |
/// | 400 | [`ApiError::Validation`] |
/// | 401 | [`ApiError::Authentication`] |
/// | 404 | [`ApiError::NotFound`] |
/// | 429 | [`ApiError::RateLimit`] |
/// | 500 | [`ApiError::Api`] |
/// | 502, 503 | [`ApiError::Transient`] |
/// | other | [`ApiError::Api`] |
///
/// # Errors
///
/// Returns an [`ApiError`] for every status other than 200, 201 and 204, and
/// [`ApiError::Decode`] when a 200/201 body is not valid JSON. A body of
/// only whitespace is not empty and fails to decode.
///
/// # Example
///
/// ```rust
/// use nobl9_api::{classify_response, ErrorKind};
/// use serde_json::json;
///
/// assert_eq!(classify_response(200, "").unwrap(), json!({}));
/// assert_eq!(classify_response(503, "").unwrap_err().kind(), ErrorKind::Transient);
/// ```
pub fn classify_response(code: u16, body: &str) -> Result<Value, ApiError> {
    match code {
        200 if body.is_empty() => Ok(Value::Object(serde_json::Map::new())),
        204 => Ok(Value::Object(serde_json::Map::new())),
        200 | 201 => serde_json::from_str(body).map_err(|e| ApiError::Decode {
            code,
            message: e.to_string(),
        }),
        400 => Err(ApiError::Validation {
            message: non_empty_or(body, "Bad request - invalid parameters"),
        }),
        401 => Err(ApiError::Authentication {
            message: "Check your API token or client credentials and organization.".to_string(),
        }),
        404 => Err(ApiError::NotFound {
            message: non_empty_or(body, "Resource not found"),
        }),
        429 => Err(ApiError::RateLimit {
            message: body.to_string(),
        }),
        502 | 503 => Err(ApiError::Transient(TransientApiError::new(
            code,
            non_empty_or(body, "Service temporarily unavailable"),
        ))),
        _ => Err(ApiError::Api {
            code,
            message: body.to_string(),
        }),
    }
}

fn non_empty_or(body: &str, fallback: &str) -> String {
    if body.is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

//! HTTP request types for the Nobl9 API client.
//!
//! This module provides the [`HttpRequest`] type and its builder. Paths are
//! relative to an [`ApiRoot`]: the dashboards API (`/api/dashboards/v1`) by
//! default, or the general API (`/api`) used by annotations and SLO reads.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods used by the Nobl9 dashboards API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// The API tree a request path is resolved against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiRoot {
    /// `/api/dashboards/v1`: status page and incident resources.
    #[default]
    Dashboards,
    /// `/api`: annotations, SLO documents and time series.
    Api,
}

impl ApiRoot {
    /// Returns the path prefix placed between the base URL and the request
    /// path.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Dashboards => "/api/dashboards/v1",
            Self::Api => "/api",
        }
    }
}

/// An HTTP request to be sent to the Nobl9 API.
///
/// Bodies are always sent as JSON.
///
/// # Example
///
/// ```rust
/// use nobl9_api::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/status-page/incidents")
///     .query_param("ongoing", "true")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/status-page/issues")
///     .body(json!({"componentId": "4c91326b", "occurredAt": "2024-11-04T10:30:00Z"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The API tree `path` is relative to.
    pub api_root: ApiRoot,
    /// The path (relative to the API prefix), starting with `/`.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL, in order. Keys may repeat.
    pub query: Option<Vec<(String, String)>>,
    /// Additional headers, which override the client defaults.
    pub extra_headers: Option<BTreeMap<String, String>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if:
    /// - `path` does not start with `/`
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidRequestError::RelativePath {
                path: self.path.clone(),
            });
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    api_root: ApiRoot,
    path: String,
    body: Option<serde_json::Value>,
    query: Option<Vec<(String, String)>>,
    extra_headers: Option<BTreeMap<String, String>>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            api_root: ApiRoot::default(),
            path: path.into(),
            body: None,
            query: None,
            extra_headers: None,
        }
    }

    /// Resolves the path against `root` instead of the dashboards API.
    #[must_use]
    pub const fn api_root(mut self, root: ApiRoot) -> Self {
        self.api_root = root;
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds every parameter in `query`.
    #[must_use]
    pub fn query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query.get_or_insert_with(Vec::new).extend(query);
        self
    }

    /// Adds a single query parameter. Adding the same key twice sends it
    /// twice.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Scopes the request to a Nobl9 project via the `Project` header.
    #[must_use]
    pub fn project(self, project: impl Into<String>) -> Self {
        self.header("Project", project)
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            api_root: self.api_root,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Serializes a typed payload into a request body.
pub(crate) fn json_body<T: Serialize>(
    payload: &T,
) -> Result<serde_json::Value, InvalidRequestError> {
    serde_json::to_value(payload).map_err(|e| InvalidRequestError::UnserializableBody {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_api_root_prefixes() {
        assert_eq!(ApiRoot::default(), ApiRoot::Dashboards);
        assert_eq!(ApiRoot::Dashboards.prefix(), "/api/dashboards/v1");
        assert_eq!(ApiRoot::Api.prefix(), "/api");
    }

    #[test]
    fn test_delete_needs_no_body() {
        let request = HttpRequest::builder(HttpMethod::Delete, "/annotations/deploy-1")
            .api_root(ApiRoot::Api)
            .build()
            .unwrap();

        assert_eq!(request.api_root, ApiRoot::Api);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_project_sets_header() {
        let request = HttpRequest::builder(HttpMethod::Get, "/v2/slos")
            .project("software-slo")
            .build()
            .unwrap();

        let headers = request.extra_headers.unwrap();
        assert_eq!(headers.get("Project"), Some(&"software-slo".to_string()));
    }

    #[test]
    fn test_repeated_query_keys_are_kept_in_order() {
        let request = HttpRequest::builder(HttpMethod::Get, "/annotations")
            .query_param("name", "a")
            .query_param("name", "b")
            .build()
            .unwrap();

        assert_eq!(
            request.query.unwrap(),
            vec![
                ("name".to_string(), "a".to_string()),
                ("name".to_string(), "b".to_string())
            ]
        );
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/status-page/status")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "/status-page/status");
        assert!(request.body.is_none());
        assert!(request.query.is_none());
    }

    #[test]
    fn test_verify_requires_body_for_post_and_put() {
        let post = HttpRequest::builder(HttpMethod::Post, "/status-page/issues").build();
        assert!(matches!(
            post,
            Err(InvalidRequestError::MissingBody { method }) if method == "post"
        ));

        let put = HttpRequest::builder(HttpMethod::Put, "/status-page/components/1").build();
        assert!(matches!(
            put,
            Err(InvalidRequestError::MissingBody { method }) if method == "put"
        ));
    }

    #[test]
    fn test_verify_rejects_relative_path() {
        let result = HttpRequest::builder(HttpMethod::Get, "status-page/status").build();
        assert!(matches!(
            result,
            Err(InvalidRequestError::RelativePath { path }) if path == "status-page/status"
        ));
    }

    #[test]
    fn test_builder_with_query_params_and_headers() {
        let request = HttpRequest::builder(HttpMethod::Post, "/status-page/issues")
            .body(json!({"componentId": "abc"}))
            .query_param("ongoing", "true")
            .header("Authorization", "Basic abc")
            .build()
            .unwrap();

        let query = request.query.unwrap();
        assert_eq!(query, vec![("ongoing".to_string(), "true".to_string())]);
        let headers = request.extra_headers.unwrap();
        assert_eq!(headers.get("Authorization"), Some(&"Basic abc".to_string()));
    }
}

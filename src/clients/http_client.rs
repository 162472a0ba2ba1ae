//! Authenticated, retrying client for the Nobl9 dashboards API.
//!
//! This module provides [`Nobl9Client`], which turns a logical call
//! (`GET|POST|PUT|DELETE path` plus query or body) into a decoded JSON
//! payload, handling authentication and transient-failure retry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::auth::{basic_authorization, bearer_authorization, request_access_token};
use crate::clients::errors::{ApiError, TransientApiError};
use crate::clients::http_request::{ApiRoot, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{Sleeper, TokioSleeper};
use crate::config::Nobl9Config;

/// Prefix of every resource path on the dashboards API.
pub const API_PREFIX: &str = ApiRoot::Dashboards.prefix();

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client for the Nobl9 dashboards API.
///
/// The client handles:
/// - Bearer token acquisition on first use, cached for the client's lifetime
/// - Default headers (`Organization`, `Content-Type`, `Accept`, `User-Agent`)
/// - Response classification into [`ApiError`] kinds
/// - Exponential-backoff retry of 502/503 responses per the configured
///   [`RetryPolicy`](crate::RetryPolicy)
///
/// # Example
///
/// ```rust,ignore
/// use nobl9_api::{Nobl9Client, Nobl9Config};
///
/// let client = Nobl9Client::new(Nobl9Config::from_env()?)?;
/// let status = client.get("/status-page/status", None).await?;
/// println!("{} components", status["components"].as_array().map_or(0, Vec::len));
/// ```
pub struct Nobl9Client {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    config: Nobl9Config,
    /// Headers sent with every resource call.
    default_headers: BTreeMap<String, String>,
    /// Bearer token, populated at most once.
    token: OnceCell<String>,
    sleeper: Arc<dyn Sleeper>,
}

// Verify Nobl9Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Nobl9Client>();
};

impl fmt::Debug for Nobl9Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nobl9Client")
            .field("base_url", &self.config.base_url().as_ref())
            .field("organization", &self.config.organization().as_ref())
            .field("authenticated", &self.token.initialized())
            .field("sleeper", &self.sleeper)
            .finish_non_exhaustive()
    }
}

impl Nobl9Client {
    /// Creates a new client from a validated configuration.
    ///
    /// A pre-generated API token in the configuration seeds the token cache,
    /// so no token exchange will ever happen for that client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot be
    /// created (e.g. TLS backend initialization failure).
    pub fn new(config: Nobl9Config) -> Result<Self, ApiError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("{user_agent_prefix}nobl9-api v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = BTreeMap::new();
        default_headers.insert(
            "Organization".to_string(),
            config.organization().as_ref().to_string(),
        );
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), user_agent);

        let token = config
            .api_token()
            .map_or_else(OnceCell::new, |token| OnceCell::from(token.as_ref().to_string()));

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            config,
            default_headers,
            token,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the sleeper used between retry attempts.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &Nobl9Config {
        &self.config
    }

    /// Returns the headers sent with every resource call (excluding
    /// `Authorization`).
    #[must_use]
    pub const fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Returns the cached bearer token without acquiring one.
    #[must_use]
    pub fn cached_token(&self) -> Option<&str> {
        self.token.get().map(String::as_str)
    }

    /// Returns the full URL for a dashboards API path.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        self.root_url(ApiRoot::Dashboards, path)
    }

    /// Returns the full URL for `path` under `root`.
    #[must_use]
    pub fn root_url(&self, root: ApiRoot, path: &str) -> String {
        format!("{}{}{path}", self.config.base_url().as_ref(), root.prefix())
    }

    /// Returns the bearer token, acquiring it on first use.
    ///
    /// Once a token is cached it is returned as-is for the rest of the
    /// client's lifetime; there is no expiry tracking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] if no token is cached and client
    /// credentials are missing or rejected.
    pub async fn access_token(&self) -> Result<&str, ApiError> {
        let token = self
            .token
            .get_or_try_init(|| request_access_token(&self.client, &self.config))
            .await?;
        Ok(token.as_str())
    }

    /// Sends a GET request to `{base_url}/api/dashboards/v1{path}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on authentication failure, a non-success
    /// response, or when transient retries are exhausted.
    pub async fn get(
        &self,
        path: &str,
        params: Option<BTreeMap<String, String>>,
    ) -> Result<Value, ApiError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path);
        if let Some(params) = params {
            builder = builder.query(params);
        }
        self.request(builder.build()?).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Nobl9Client::get`].
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Nobl9Client::get`].
    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a DELETE request to a dashboards API path.
    ///
    /// A 204 response yields `{}`.
    ///
    /// # Errors
    ///
    /// See [`Nobl9Client::get`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(HttpRequest::builder(HttpMethod::Delete, path).build()?)
            .await
    }

    /// Sends a POST request authenticated with Basic client credentials.
    ///
    /// Some endpoints (external issue reports) reject bearer tokens. This
    /// variant never touches the token cache; the Basic header is computed
    /// for every call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] before any network call if
    /// client credentials are not configured. Otherwise see
    /// [`Nobl9Client::get`].
    pub async fn post_external(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let (client_id, client_secret) =
            self.config
                .client_credentials()
                .ok_or_else(|| ApiError::Authentication {
                    message: "Client credentials required for external endpoint. \
                              Set NOBL9_CLIENT_ID and NOBL9_CLIENT_SECRET."
                        .to_string(),
                })?;

        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .header("Authorization", basic_authorization(client_id, client_secret))
            .build()?;
        self.request_with_retry(&request).await
    }

    /// Sends a request with bearer authentication and transient retry.
    ///
    /// # Errors
    ///
    /// See [`Nobl9Client::get`].
    pub async fn request(&self, request: HttpRequest) -> Result<Value, ApiError> {
        request.verify()?;
        let token = self.access_token().await?;

        let mut request = request;
        request
            .extra_headers
            .get_or_insert_with(BTreeMap::new)
            .entry("Authorization".to_string())
            .or_insert_with(|| bearer_authorization(token));

        self.request_with_retry(&request).await
    }

    /// Runs `request` until it succeeds, fails with a non-transient error, or
    /// the retry policy is exhausted.
    ///
    /// Headers are sent exactly as given (defaults merged with
    /// `extra_headers`); no token is added here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transient`] carrying the total attempt count when
    /// every attempt hit a 502/503, or the first non-transient error.
    pub async fn request_with_retry(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        request.verify()?;

        let policy = self.config.retry_policy();
        let mut backoff = policy.backoff();

        loop {
            let response = self.send_once(request).await?;
            let request_id = response.request_id().map(String::from);

            let transient = match response.into_result() {
                Ok(value) => return Ok(value),
                Err(ApiError::Transient(e)) => e,
                Err(e) => return Err(e),
            };

            let Some(delay) = backoff.next_delay() else {
                return Err(ApiError::Transient(
                    transient.exhausted_after(backoff.attempts()),
                ));
            };

            tracing::warn!(
                attempt = backoff.attempts(),
                max_attempts = policy.max_attempts(),
                request_id = request_id.as_deref().unwrap_or("-"),
                "Transient error from Nobl9 API at {}: {}. Retrying in {:.1}s",
                request.path,
                transient,
                delay.as_secs_f64()
            );
            self.sleeper.sleep(delay).await;
        }
    }

    /// Performs a single HTTP exchange without classification.
    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.root_url(request.api_root, &request.path);
        tracing::debug!("{} {}", request.http_method, url);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        let mut headers = self.default_headers.clone();
        if let Some(extra) = &request.extra_headers {
            headers.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(HttpResponse::new(code, res_headers, body))
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

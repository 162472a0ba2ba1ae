//! Configuration types for the Nobl9 API client.
//!
//! # Overview
//!
//! - [`Nobl9Config`]: validated settings for a client instance
//! - [`Nobl9ConfigBuilder`]: a builder for constructing [`Nobl9Config`]
//! - [`OrganizationId`], [`ClientId`], [`ClientSecret`], [`ApiToken`],
//!   [`BaseUrl`]: validated newtypes
//!
//! A configuration always names an organization and at least one way to
//! authenticate: a pre-generated API token, or a client id/secret pair that
//! is exchanged for an access token on first use.
//!
//! # Example
//!
//! ```rust
//! use nobl9_api::{ClientId, ClientSecret, Nobl9Config, OrganizationId};
//!
//! let config = Nobl9Config::builder()
//!     .organization(OrganizationId::new("my-org").unwrap())
//!     .client_id(ClientId::new("client-id").unwrap())
//!     .client_secret(ClientSecret::new("client-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://app.nobl9.com");
//! ```

mod newtypes;

pub use newtypes::{ApiToken, BaseUrl, ClientId, ClientSecret, OrganizationId};

use crate::clients::RetryPolicy;
use crate::error::ConfigError;

/// Environment variable holding the organization id.
pub const ENV_ORGANIZATION: &str = "NOBL9_ORG";
/// Environment variable holding the client id.
pub const ENV_CLIENT_ID: &str = "NOBL9_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "NOBL9_CLIENT_SECRET";
/// Environment variable holding a pre-generated API token.
pub const ENV_API_TOKEN: &str = "NOBL9_API_TOKEN";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "NOBL9_BASE_URL";

/// Configuration for a Nobl9 API client.
///
/// `Nobl9Config` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct Nobl9Config {
    organization: OrganizationId,
    base_url: BaseUrl,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    api_token: Option<ApiToken>,
    retry_policy: RetryPolicy,
    user_agent_prefix: Option<String>,
}

impl Nobl9Config {
    /// Creates a new builder for constructing a `Nobl9Config`.
    #[must_use]
    pub fn builder() -> Nobl9ConfigBuilder {
        Nobl9ConfigBuilder::new()
    }

    /// Loads configuration from `NOBL9_*` environment variables.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first
    /// if present; variables already set in the process take precedence.
    /// Empty variables are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the organization is missing, no
    /// authentication method is configured, or a value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// This is the logic behind [`Nobl9Config::from_env`], exposed so callers
    /// can source settings from somewhere other than the process environment.
    ///
    /// # Errors
    ///
    /// See [`Nobl9Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(org) = read(ENV_ORGANIZATION) {
            builder = builder.organization(OrganizationId::new(org)?);
        }
        if let Some(id) = read(ENV_CLIENT_ID) {
            builder = builder.client_id(ClientId::new(id)?);
        }
        if let Some(secret) = read(ENV_CLIENT_SECRET) {
            builder = builder.client_secret(ClientSecret::new(secret)?);
        }
        if let Some(token) = read(ENV_API_TOKEN) {
            builder = builder.api_token(ApiToken::new(token)?);
        }
        if let Some(url) = read(ENV_BASE_URL) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }
        builder.build()
    }

    /// Returns the organization id.
    #[must_use]
    pub const fn organization(&self) -> &OrganizationId {
        &self.organization
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the client id, if configured.
    #[must_use]
    pub const fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// Returns the client secret, if configured.
    #[must_use]
    pub const fn client_secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref()
    }

    /// Returns the pre-generated API token, if configured.
    #[must_use]
    pub const fn api_token(&self) -> Option<&ApiToken> {
        self.api_token.as_ref()
    }

    /// Returns both halves of the client credential pair, if both are set.
    #[must_use]
    pub const fn client_credentials(&self) -> Option<(&ClientId, &ClientSecret)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }

    /// Returns the retry policy for transient failures.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify Nobl9Config is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Nobl9Config>();
};

/// Builder for constructing [`Nobl9Config`] instances.
///
/// `organization` is required, plus either `api_token` or both `client_id`
/// and `client_secret`.
///
/// # Defaults
///
/// - `base_url`: `https://app.nobl9.com`
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct Nobl9ConfigBuilder {
    organization: Option<OrganizationId>,
    base_url: Option<BaseUrl>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    api_token: Option<ApiToken>,
    retry_policy: Option<RetryPolicy>,
    user_agent_prefix: Option<String>,
}

impl Nobl9ConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the organization id (required).
    #[must_use]
    pub fn organization(mut self, organization: OrganizationId) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the client id used for token acquisition and external endpoints.
    #[must_use]
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Sets the client secret used for token acquisition and external endpoints.
    #[must_use]
    pub fn client_secret(mut self, client_secret: ClientSecret) -> Self {
        self.client_secret = Some(client_secret);
        self
    }

    /// Sets a pre-generated API token, which skips token acquisition.
    #[must_use]
    pub fn api_token(mut self, token: ApiToken) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Sets the retry policy for transient failures.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`Nobl9Config`], validating required fields.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCredentials`] if neither an API token nor a
    ///   complete client id/secret pair is set
    /// - [`ConfigError::MissingRequiredField`] if `organization` is not set
    pub fn build(self) -> Result<Nobl9Config, ConfigError> {
        let has_client_credentials = self.client_id.is_some() && self.client_secret.is_some();
        if self.api_token.is_none() && !has_client_credentials {
            return Err(ConfigError::MissingCredentials);
        }

        let organization = self.organization.ok_or(ConfigError::MissingRequiredField {
            field: "organization",
        })?;

        Ok(Nobl9Config {
            organization,
            base_url: self.base_url.unwrap_or_default(),
            client_id: self.client_id,
            client_secret: self.client_secret,
            api_token: self.api_token,
            retry_policy: self.retry_policy.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

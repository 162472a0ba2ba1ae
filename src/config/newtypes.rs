//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction. Secrets mask their
//! value in `Debug` output so they cannot leak through logs.

use crate::error::ConfigError;
use std::fmt;

/// A validated Nobl9 organization id.
///
/// Sent as the `Organization` header on every request.
///
/// # Example
///
/// ```rust
/// use nobl9_api::OrganizationId;
///
/// let org = OrganizationId::new("my-org").unwrap();
/// assert_eq!(org.as_ref(), "my-org");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates a new validated organization id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyOrganization`] if the id is empty or blank.
    pub fn new(org: impl Into<String>) -> Result<Self, ConfigError> {
        let org = org.into().trim().to_string();
        if org.is_empty() {
            return Err(ConfigError::EmptyOrganization);
        }
        Ok(Self(org))
    }
}

impl AsRef<str> for OrganizationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Nobl9 client id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Nobl9 client secret.
///
/// # Security
///
/// The `Debug` implementation prints `ClientSecret(*****)` instead of the value.
///
/// ```rust
/// use nobl9_api::ClientSecret;
///
/// let secret = ClientSecret::new("s3cr3t").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A pre-generated Nobl9 API access token.
///
/// Like [`ClientSecret`], the value is masked in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// A validated base URL for the Nobl9 API.
///
/// Trailing slashes are stripped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use nobl9_api::BaseUrl;
///
/// let url = BaseUrl::new("https://app.nobl9.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://app.nobl9.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "app.nobl9.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// The production Nobl9 endpoint.
    pub const DEFAULT: &'static str = "https://app.nobl9.com";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_start == host_end {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT.to_string(),
            scheme_end: 5,
            host_start: 8,
            host_end: Self::DEFAULT.len(),
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

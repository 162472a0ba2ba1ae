//! Client-credential exchange for Nobl9 access tokens.
//!
//! `POST {base_url}/api/accessToken` with a Basic `Authorization` header and
//! the `Organization` header returns `{"access_token": "..."}`.

use base64::prelude::*;
use serde::Deserialize;

use crate::clients::ApiError;
use crate::config::{ClientId, ClientSecret, Nobl9Config};

/// Path of the token endpoint, relative to the base URL.
pub const ACCESS_TOKEN_PATH: &str = "/api/accessToken";

/// Successful response body of the token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime in seconds, when the API reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Builds a `Basic` authorization header value from client credentials.
///
/// ```rust
/// use nobl9_api::auth::basic_authorization;
/// use nobl9_api::{ClientId, ClientSecret};
///
/// let header = basic_authorization(
///     &ClientId::new("Aladdin").unwrap(),
///     &ClientSecret::new("open sesame").unwrap(),
/// );
/// assert_eq!(header, "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
/// ```
#[must_use]
pub fn basic_authorization(client_id: &ClientId, client_secret: &ClientSecret) -> String {
    let credentials = format!("{}:{}", client_id.as_ref(), client_secret.as_ref());
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// Builds a `Bearer` authorization header value.
#[must_use]
pub fn bearer_authorization(token: &str) -> String {
    format!("Bearer {token}")
}

/// Exchanges the configured client credentials for an access token.
///
/// This always hits the network; caching is the caller's job.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] if the credentials are not
/// configured, the API answers 401, or it answers anything other than 200.
/// Transport failures, including a body cut short mid-read, surface as
/// [`ApiError::Network`]; a success body that is not a token response is
/// [`ApiError::Decode`].
pub async fn request_access_token(
    http: &reqwest::Client,
    config: &Nobl9Config,
) -> Result<String, ApiError> {
    let (client_id, client_secret) =
        config
            .client_credentials()
            .ok_or_else(|| ApiError::Authentication {
                message: "Client credentials not configured. Set NOBL9_CLIENT_ID and NOBL9_CLIENT_SECRET."
                    .to_string(),
            })?;

    let url = format!("{}{ACCESS_TOKEN_PATH}", config.base_url().as_ref());
    tracing::debug!("Requesting Nobl9 access token from {}", url);

    let response = http
        .post(&url)
        .header("Authorization", basic_authorization(client_id, client_secret))
        .header("Organization", config.organization().as_ref())
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    match status {
        200 => {
            let token: AccessTokenResponse =
                serde_json::from_str(&body).map_err(|e| ApiError::Decode {
                    code: status,
                    message: format!("Failed to parse token response: {e}"),
                })?;
            if let Some(expires_in) = token.expires_in {
                tracing::debug!("Access token issued, expires in {}s", expires_in);
            }
            Ok(token.access_token)
        }
        401 => Err(ApiError::Authentication {
            message: "Failed to authenticate. Check your NOBL9_CLIENT_ID, NOBL9_CLIENT_SECRET, and NOBL9_ORG."
                .to_string(),
        }),
        _ => Err(ApiError::Authentication {
            message: format!("Token generation failed (HTTP {status}): {body}"),
        }),
    }
}

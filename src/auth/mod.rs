//! Authentication helpers for the Nobl9 API.
//!
//! Nobl9 accepts two kinds of `Authorization` header:
//!
//! - **Basic**: base64 of `client_id:client_secret`. Used to obtain an access
//!   token and to call endpoints that only accept Basic auth (external issue
//!   reports).
//! - **Bearer**: an access token, either pre-generated or obtained from
//!   `POST /api/accessToken`. Used for every other dashboards API call.
//!
//! [`Nobl9Client`](crate::Nobl9Client) caches the bearer token for its whole
//! lifetime; see [`request_access_token`] for the exchange itself.

mod access_token;

pub use access_token::{
    basic_authorization, bearer_authorization, request_access_token, AccessTokenResponse,
    ACCESS_TOKEN_PATH,
};

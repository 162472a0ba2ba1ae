//! # Nobl9 API Rust Client
//!
//! An async client for the Nobl9 SaaS API, providing validated
//! configuration, client-credential authentication, bounded retry of
//! transient failures, and a typed error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`Nobl9Config`] and [`Nobl9ConfigBuilder`]
//! - Validated newtypes for credentials and the API base URL
//! - Access-token acquisition, cached for the life of a client, via [`auth`]
//! - An HTTP client with exponential backoff on 502/503 via [`Nobl9Client`]
//! - Status-code classification into [`ApiError`] variants
//! - Typed status-page operations via [`status_page`]
//! - Annotation management via [`annotations`]
//! - SLO lookups, time series and an error-budget release gate via [`slo`]
//!
//! ## Quick Start
//!
//! ```rust
//! use nobl9_api::{ClientId, ClientSecret, Nobl9Config, OrganizationId, RetryPolicy};
//! use std::time::Duration;
//!
//! let config = Nobl9Config::builder()
//!     .organization(OrganizationId::new("my-org").unwrap())
//!     .client_id(ClientId::new("client-id").unwrap())
//!     .client_secret(ClientSecret::new("client-secret").unwrap())
//!     .retry_policy(
//!         RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(32), 2.0).unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use nobl9_api::{Nobl9Client, Nobl9Config};
//! use std::collections::BTreeMap;
//!
//! let client = Nobl9Client::new(Nobl9Config::from_env()?)?;
//!
//! let params = BTreeMap::from([("ongoing".to_string(), "true".to_string())]);
//! let incidents = client.get("/status-page/incidents", Some(params)).await?;
//! ```
//!
//! ## Handling Errors
//!
//! ```rust
//! use nobl9_api::{classify_response, ErrorKind};
//!
//! let error = classify_response(404, r#"{"message": "component not found"}"#).unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! assert!(!error.is_retryable());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod annotations;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod slo;
pub mod status_page;
mod timestamp;

// Re-export public types at crate root for convenience
pub use config::{
    ApiToken, BaseUrl, ClientId, ClientSecret, Nobl9Config, Nobl9ConfigBuilder, OrganizationId,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    classify_response, ApiError, ApiRoot, Backoff, ErrorKind, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, InvalidRequestError, Nobl9Client, RecordingSleeper,
    RetryPolicy, Sleeper, TokioSleeper, TransientApiError, API_PREFIX, SDK_VERSION,
};

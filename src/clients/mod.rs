//! HTTP client types for Nobl9 API communication.
//!
//! # Overview
//!
//! - [`Nobl9Client`]: the authenticated, retrying client
//! - [`HttpRequest`] / [`HttpMethod`] / [`ApiRoot`]: a request to be sent
//! - [`HttpResponse`] / [`classify_response`]: status-code classification
//! - [`ApiError`] / [`ErrorKind`]: the error taxonomy
//! - [`RetryPolicy`] / [`Backoff`] / [`Sleeper`]: the retry schedule
//!
//! # Retry Behavior
//!
//! Only 502 and 503 responses are retried. The client waits
//! `min(backoff, max_backoff)` between attempts, multiplying `backoff` after
//! each retry, and gives up after `max_retries + 1` attempts with
//! [`ApiError::Transient`]. Every other error is returned on first
//! occurrence.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use errors::{ApiError, ErrorKind, InvalidRequestError, TransientApiError};
pub use http_client::{Nobl9Client, API_PREFIX, SDK_VERSION};
pub(crate) use http_request::json_body;
pub use http_request::{ApiRoot, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{classify_response, HttpResponse};
pub use retry::{Backoff, RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};

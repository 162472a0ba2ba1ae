//! SLO lookups, time series and the error-budget quality gate.
//!
//! These endpoints live under the general API root (`/api`) and are scoped
//! to a project with the `Project` header:
//!
//! - `GET /api/v2/slos`: SLOs in a project
//! - `GET /api/v2/slos/{name}`: one SLO with objectives and budget figures
//! - `GET /api/timeseries/slo`: an SLO's time series
//!
//! [`SloClient::evaluate_gate`] fetches the time series and hands it to a
//! [`QualityGate`].
//!
//! # Example
//!
//! ```rust,ignore
//! use nobl9_api::slo::{QualityGate, SloClient, TimeseriesQuery};
//!
//! let slos = SloClient::new(&client);
//! let decision = slos
//!     .evaluate_gate("software-slo", &TimeseriesQuery::new("prod-latency"), &QualityGate::default())
//!     .await?;
//! println!("{decision}");
//! if !decision.should_proceed() {
//!     std::process::exit(1);
//! }
//! ```

mod gate;
mod timeseries;

pub use gate::{extract_error_budget, GateDecision, QualityGate};
pub use timeseries::{Percentile, Series, TimeseriesQuery};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clients::{ApiError, ApiRoot, HttpMethod, HttpRequest, Nobl9Client};
use crate::timestamp;

/// Page size used when collecting SLO names.
pub const SLO_NAMES_LIMIT: u32 = 500;

/// Optional filters for [`SloClient::info`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SloInfoQuery {
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    fields: Option<String>,
}

impl SloInfoQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts budget figures to a time window. `from` and `to` are only
    /// sent together.
    #[must_use]
    pub const fn window(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.window = Some((from, to));
        self
    }

    /// Requests only the named fields (comma-separated).
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some((from, to)) = &self.window {
            params.push(("from".to_string(), timestamp::format(from)));
            params.push(("to".to_string(), timestamp::format(to)));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields".to_string(), fields.clone()));
        }
        params
    }
}

/// SLO operations on top of a [`Nobl9Client`].
#[derive(Clone, Copy, Debug)]
pub struct SloClient<'a> {
    client: &'a Nobl9Client,
}

impl<'a> SloClient<'a> {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: &'a Nobl9Client) -> Self {
        Self { client }
    }

    /// `GET /api/v2/slos` for `project`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn list(&self, project: &str, limit: Option<u32>) -> Result<Value, ApiError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, "/v2/slos")
            .api_root(ApiRoot::Api)
            .project(project);
        if let Some(limit) = limit {
            builder = builder.query_param("limit", limit.to_string());
        }
        self.client.request(builder.build()?).await
    }

    /// Names of up to [`SLO_NAMES_LIMIT`] SLOs in `project`, read from
    /// `data[].name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn names(&self, project: &str) -> Result<Vec<String>, ApiError> {
        let listing = self.list(project, Some(SLO_NAMES_LIMIT)).await?;
        let names = listing
            .get("data")
            .and_then(Value::as_array)
            .map(|slos| {
                slos.iter()
                    .filter_map(|slo| slo.get("name").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    /// `GET /api/v2/slos/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown SLO, or [`ApiError`] if
    /// the call otherwise fails.
    pub async fn info(
        &self,
        project: &str,
        slo_name: &str,
        query: &SloInfoQuery,
    ) -> Result<Value, ApiError> {
        let path = format!("/v2/slos/{}", urlencoding::encode(slo_name));
        let mut builder = HttpRequest::builder(HttpMethod::Get, path)
            .api_root(ApiRoot::Api)
            .project(project);
        for (key, value) in query.to_params() {
            builder = builder.query_param(key, value);
        }
        self.client.request(builder.build()?).await
    }

    /// `GET /api/timeseries/slo`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn timeseries(
        &self,
        project: &str,
        query: &TimeseriesQuery,
    ) -> Result<Value, ApiError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, "/timeseries/slo")
            .api_root(ApiRoot::Api)
            .project(project);
        for (key, value) in query.to_params() {
            builder = builder.query_param(key, value);
        }
        self.client.request(builder.build()?).await
    }

    /// Fetches the time series for `query` and evaluates `gate` over it.
    ///
    /// A payload without budget data yields [`GateDecision::NoData`]; a
    /// failed fetch is an error, never a decision.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the time series cannot be fetched.
    pub async fn evaluate_gate(
        &self,
        project: &str,
        query: &TimeseriesQuery,
        gate: &QualityGate,
    ) -> Result<GateDecision, ApiError> {
        let payload = self.timeseries(project, query).await?;
        tracing::debug!(
            "Evaluating quality gate for SLO {} in project {}",
            query.slo_name(),
            project
        );
        Ok(gate.evaluate(&payload))
    }
}

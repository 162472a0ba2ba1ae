//! Typed access to the Nobl9 status-page endpoints.
//!
//! [`StatusPageClient`] borrows a [`Nobl9Client`] and wraps the calls the
//! status-page tooling needs: reading component status, incidents and issue
//! summaries, reporting issues, and changing component status. Responses are
//! returned as raw JSON; the client does not interpret business fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use nobl9_api::status_page::{ComponentStatus, StatusChange, StatusPageClient};
//!
//! let status_page = StatusPageClient::new(&client);
//! status_page
//!     .change_status(
//!         "4c91326b-81f3-47aa-b2b7-da2d1da3e298",
//!         &StatusChange::new(ComponentStatus::DegradedPerformance).comment("High latency"),
//!     )
//!     .await?;
//! let ongoing = status_page.list_incidents(Some(true)).await?;
//! ```

mod types;

pub use types::{
    ComponentStatus, ExternalIssueReport, ExternalStatusChange, InvalidStatusError, IssueReport,
    StatusChange,
};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::clients::{json_body, ApiError, Nobl9Client};

/// Status-page operations on top of a [`Nobl9Client`].
#[derive(Clone, Copy, Debug)]
pub struct StatusPageClient<'a> {
    client: &'a Nobl9Client,
}

impl<'a> StatusPageClient<'a> {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: &'a Nobl9Client) -> Self {
        Self { client }
    }

    /// `GET /status-page/status`: current state of all components.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn status(&self) -> Result<Value, ApiError> {
        self.client.get("/status-page/status", None).await
    }

    /// `GET /status-page/components`: all components.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn list_components(&self) -> Result<Value, ApiError> {
        self.client.get("/status-page/components", None).await
    }

    /// `GET /status-page/incidents`, grouped by day.
    ///
    /// `Some(true)` limits to ongoing incidents, `Some(false)` to resolved
    /// ones, and `None` returns both.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn list_incidents(&self, ongoing: Option<bool>) -> Result<Value, ApiError> {
        let params = ongoing.map(|ongoing| {
            BTreeMap::from([("ongoing".to_string(), ongoing.to_string())])
        });
        self.client.get("/status-page/incidents", params).await
    }

    /// `GET /status-page/issues/summary`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn issue_summary(&self) -> Result<Value, ApiError> {
        self.client.get("/status-page/issues/summary", None).await
    }

    /// `POST /status-page/issues`: reports an issue against a component id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn create_issue(&self, report: &IssueReport) -> Result<Value, ApiError> {
        self.client
            .post("/status-page/issues", json_body(report)?)
            .await
    }

    /// `POST /status-page/issues/external`: reports an issue by component
    /// name using Basic client-credential auth.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] without a network call when
    /// client credentials are not configured, or [`ApiError`] if the call
    /// fails.
    pub async fn create_external_issue(
        &self,
        report: &ExternalIssueReport,
    ) -> Result<Value, ApiError> {
        self.client
            .post_external("/status-page/issues/external", json_body(report)?)
            .await
    }

    /// `POST /status-page/components/{id}/change-status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn change_status(
        &self,
        component_id: &str,
        change: &StatusChange,
    ) -> Result<Value, ApiError> {
        let path = format!(
            "/status-page/components/{}/change-status",
            urlencoding::encode(component_id)
        );
        self.client.post(&path, json_body(change)?).await
    }

    /// `GET /status-page/components/{id}/status-changes`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn status_history(&self, component_id: &str) -> Result<Value, ApiError> {
        let path = format!(
            "/status-page/components/{}/status-changes",
            urlencoding::encode(component_id)
        );
        self.client.get(&path, None).await
    }
}

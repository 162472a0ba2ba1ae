//! Request payloads for the status-page endpoints.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operational state of a status-page component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentStatus {
    /// Working normally.
    Operational,
    /// Working, but slow or partially failing.
    DegradedPerformance,
    /// Unavailable.
    MajorOutage,
}

impl ComponentStatus {
    /// All statuses accepted by the API.
    pub const ALL: [Self; 3] = [Self::Operational, Self::DegradedPerformance, Self::MajorOutage];

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::DegradedPerformance => "degradedPerformance",
            Self::MajorOutage => "majorOutage",
        }
    }

    /// Maps a monitoring alert severity to a component status.
    ///
    /// `critical` is a major outage, `resolved` is operational, and anything
    /// else (including `warning`) is degraded performance. Matching ignores
    /// case.
    #[must_use]
    pub fn from_alert_severity(severity: &str) -> Self {
        match severity.to_ascii_lowercase().as_str() {
            "critical" => Self::MajorOutage,
            "resolved" => Self::Operational,
            _ => Self::DegradedPerformance,
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown component status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid status '{0}'. Must be one of: operational, degradedPerformance, majorOutage")]
pub struct InvalidStatusError(pub String);

impl FromStr for ComponentStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatusError(s.to_string()))
    }
}

/// Body of `POST /status-page/components/{id}/change-status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// The new status.
    pub status: ComponentStatus,
    /// Whether parent components should inherit the change.
    pub propagate_up: bool,
    /// Optional explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StatusChange {
    /// Creates a status change that does not propagate.
    #[must_use]
    pub const fn new(status: ComponentStatus) -> Self {
        Self {
            status,
            propagate_up: false,
            comment: None,
        }
    }

    /// Propagates the change to parent components.
    #[must_use]
    pub const fn propagate_up(mut self, propagate: bool) -> Self {
        self.propagate_up = propagate;
        self
    }

    /// Attaches a comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Body of `POST /status-page/issues`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    /// Id of the affected component.
    pub component_id: String,
    /// When the issue occurred.
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub occurred_at: DateTime<Utc>,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl IssueReport {
    /// Creates a report for `component_id` that occurred now.
    #[must_use]
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            occurred_at: Utc::now(),
            comment: None,
        }
    }

    /// Sets when the issue occurred.
    #[must_use]
    pub const fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = at;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Status change embedded in an external issue report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStatusChange {
    /// The new status.
    pub status: ComponentStatus,
    /// Whether parent components should inherit the change.
    pub propagate_up: bool,
}

/// Body of `POST /status-page/issues/external`.
///
/// External reports address components by name and may carry a status
/// change.
///
/// ```rust
/// use nobl9_api::status_page::{ComponentStatus, ExternalIssueReport};
///
/// let report = ExternalIssueReport::new("API Service")
///     .comment("High error rate")
///     .requested_by("prometheus-alertmanager")
///     .status_change(ComponentStatus::MajorOutage, true);
///
/// let json = serde_json::to_value(&report).unwrap();
/// assert_eq!(json["statusChange"]["status"], "majorOutage");
/// assert_eq!(json["statusChange"]["propagateUp"], true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIssueReport {
    /// Name of the affected component.
    pub component_name: String,
    /// When the issue occurred.
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub occurred_at: DateTime<Utc>,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Identifier of the reporting system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    /// Optional status change to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_change: Option<ExternalStatusChange>,
}

impl ExternalIssueReport {
    /// Creates a report for `component_name` that occurred now.
    #[must_use]
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            occurred_at: Utc::now(),
            comment: None,
            requested_by: None,
            status_change: None,
        }
    }

    /// Sets when the issue occurred.
    #[must_use]
    pub const fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = at;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Names the reporting system.
    #[must_use]
    pub fn requested_by(mut self, requester: impl Into<String>) -> Self {
        self.requested_by = Some(requester.into());
        self
    }

    /// Requests a status change alongside the report.
    #[must_use]
    pub const fn status_change(mut self, status: ComponentStatus, propagate_up: bool) -> Self {
        self.status_change = Some(ExternalStatusChange {
            status,
            propagate_up,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 4, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_status_parses_wire_names_only() {
        assert_eq!(
            "degradedPerformance".parse::<ComponentStatus>(),
            Ok(ComponentStatus::DegradedPerformance)
        );
        let error = "partialOutage".parse::<ComponentStatus>().unwrap_err();
        assert!(error.to_string().contains("partialOutage"));
        assert!("Operational".parse::<ComponentStatus>().is_err());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            ComponentStatus::from_alert_severity("warning"),
            ComponentStatus::DegradedPerformance
        );
        assert_eq!(
            ComponentStatus::from_alert_severity("CRITICAL"),
            ComponentStatus::MajorOutage
        );
        assert_eq!(
            ComponentStatus::from_alert_severity("resolved"),
            ComponentStatus::Operational
        );
        assert_eq!(
            ComponentStatus::from_alert_severity("unknown"),
            ComponentStatus::DegradedPerformance
        );
    }

    #[test]
    fn test_issue_report_payload() {
        let report = IssueReport::new("4c91326b")
            .occurred_at(fixed_time())
            .comment("Slow response times");

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "componentId": "4c91326b",
                "occurredAt": "2024-11-04T10:30:00Z",
                "comment": "Slow response times"
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let report = ExternalIssueReport::new("Database").occurred_at(fixed_time());

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"componentName": "Database", "occurredAt": "2024-11-04T10:30:00Z"})
        );
    }

    #[test]
    fn test_status_change_payload() {
        let change = StatusChange::new(ComponentStatus::MajorOutage)
            .propagate_up(true)
            .comment("Service unavailable");

        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"status": "majorOutage", "propagateUp": true, "comment": "Service unavailable"})
        );
    }
}

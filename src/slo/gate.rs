//! Error-budget quality gate.
//!
//! A release pipeline asks Nobl9 for the state of an SLO and lets the
//! release go ahead only while error budget remains. [`QualityGate`] makes
//! that decision from the raw JSON payload.
//!
//! Two payload shapes are understood:
//!
//! - the SLO time series, read from
//!   `[0].timewindows[0].objectives[0].status.errorBudgetRemainingPercentage`
//! - a v2 SLO document, read from `objectives[0].errorBudgetRemainingPercentage`
//!   (optionally nested under `status` or `data`)
//!
//! # Example
//!
//! ```rust
//! use nobl9_api::slo::{GateDecision, QualityGate};
//! use serde_json::json;
//!
//! let payload = json!([{
//!     "timewindows": [{
//!         "objectives": [{ "status": { "errorBudgetRemainingPercentage": 0.42 } }]
//!     }]
//! }]);
//!
//! let decision = QualityGate::default().evaluate(&payload);
//! assert!(matches!(decision, GateDecision::Proceed { .. }));
//! assert!(decision.should_proceed());
//! ```

use std::fmt;

use serde_json::Value;

const BUDGET_FIELD: &str = "errorBudgetRemainingPercentage";

/// Outcome of evaluating an SLO payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateDecision {
    /// Budget remains above the threshold.
    Proceed {
        /// Remaining budget as a fraction (`1.0` is 100%).
        remaining: f64,
    },
    /// Budget is at or below the threshold.
    Cancel {
        /// Remaining budget as a fraction (`1.0` is 100%).
        remaining: f64,
    },
    /// The payload carried no error-budget figure.
    NoData,
}

impl GateDecision {
    /// Returns `true` unless the release should be cancelled.
    ///
    /// Missing data does not block a release.
    #[must_use]
    pub const fn should_proceed(&self) -> bool {
        !matches!(self, Self::Cancel { .. })
    }

    /// Remaining budget as a percentage, if known.
    #[must_use]
    pub fn remaining_percent(&self) -> Option<f64> {
        match self {
            Self::Proceed { remaining } | Self::Cancel { remaining } => Some(remaining * 100.0),
            Self::NoData => None,
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed { remaining } => {
                write!(f, "Error budget remaining is {:.2}%: proceed with release", remaining * 100.0)
            }
            Self::Cancel { remaining } => {
                write!(f, "Error budget remaining is {:.2}%: cancel release", remaining * 100.0)
            }
            Self::NoData => f.write_str("No error budget data available: proceed with release"),
        }
    }
}

/// Go/no-go decision over remaining error budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityGate {
    threshold: f64,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self { threshold: 0.0 }
    }
}

impl QualityGate {
    /// Creates a gate that proceeds only while the remaining budget fraction
    /// is strictly above `threshold`.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns the threshold fraction.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decides whether a release may proceed given an SLO payload.
    #[must_use]
    pub fn evaluate(&self, payload: &Value) -> GateDecision {
        let Some(remaining) = extract_error_budget(payload) else {
            tracing::warn!("No error budget data in SLO payload");
            return GateDecision::NoData;
        };

        let decision = if remaining > self.threshold {
            GateDecision::Proceed { remaining }
        } else {
            GateDecision::Cancel { remaining }
        };
        tracing::debug!("{}", decision);
        decision
    }
}

/// Reads the remaining error-budget fraction from an SLO payload.
///
/// Returns `None` when the payload matches neither known shape or the
/// figure is not a number.
#[must_use]
pub fn extract_error_budget(payload: &Value) -> Option<f64> {
    from_time_series(payload).or_else(|| from_slo_document(payload))
}

fn from_time_series(payload: &Value) -> Option<f64> {
    payload
        .get(0)?
        .get("timewindows")?
        .get(0)?
        .get("objectives")?
        .get(0)?
        .get("status")?
        .get(BUDGET_FIELD)?
        .as_f64()
}

fn from_slo_document(payload: &Value) -> Option<f64> {
    let document = payload.get("data").unwrap_or(payload);
    let objectives = document
        .get("objectives")
        .or_else(|| document.get("status")?.get("objectives"))?;
    objectives.get(0)?.get(BUDGET_FIELD)?.as_f64()
}

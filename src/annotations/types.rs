//! Annotation payloads and list filters.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::timestamp;

/// Default length of an annotation window when none is given.
pub const DEFAULT_ANNOTATION_MINUTES: i64 = 5;

/// The content of an annotation: which SLO it marks, when, and why.
///
/// The annotation name is passed separately because it is part of the
/// resource path for upserts.
///
/// ```rust
/// use nobl9_api::annotations::AnnotationSpec;
///
/// let spec = AnnotationSpec::new("software-slo", "prod-latency", "Deployed v1.2.3")
///     .label("environment", "prod")
///     .label("team", "backend");
///
/// let json = serde_json::to_value(&spec).unwrap();
/// assert_eq!(json["slo"], "prod-latency");
/// assert_eq!(json["labels"]["team"][0], "backend");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSpec {
    /// Project the SLO belongs to.
    pub project: String,
    /// Name of the annotated SLO.
    pub slo: String,
    /// Free-form description.
    pub description: String,
    /// Start of the annotated window.
    #[serde(serialize_with = "timestamp::serialize")]
    pub start_time: DateTime<Utc>,
    /// End of the annotated window.
    #[serde(serialize_with = "timestamp::serialize")]
    pub end_time: DateTime<Utc>,
    /// Labels, each key mapping to one or more values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, Vec<String>>,
}

impl AnnotationSpec {
    /// Creates a spec covering the next five minutes.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        slo: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let start_time = Utc::now();
        Self {
            project: project.into(),
            slo: slo.into(),
            description: description.into(),
            start_time,
            end_time: start_time + Duration::minutes(DEFAULT_ANNOTATION_MINUTES),
            labels: BTreeMap::new(),
        }
    }

    /// Sets the annotated window.
    #[must_use]
    pub const fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Adds `value` under label `key`.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Returns a copy of this spec for another SLO.
    #[must_use]
    pub fn for_slo(&self, slo: impl Into<String>) -> Self {
        Self {
            slo: slo.into(),
            ..self.clone()
        }
    }
}

/// Body of `POST /api/annotations`: the annotation content plus its name.
#[derive(Serialize)]
pub(crate) struct NamedAnnotation<'a> {
    pub(crate) name: &'a str,
    #[serde(flatten)]
    pub(crate) spec: &'a AnnotationSpec,
}

/// Filters for listing annotations. Empty filters list everything in the
/// project.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationQuery {
    slo: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    names: Vec<String>,
}

impl AnnotationQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only annotations on this SLO.
    #[must_use]
    pub fn slo(mut self, slo: impl Into<String>) -> Self {
        self.slo = Some(slo.into());
        self
    }

    /// Only annotations starting at or after `from`.
    #[must_use]
    pub const fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Only annotations ending at or before `to`.
    #[must_use]
    pub const fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Only annotations with this name. May be called more than once.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(slo) = &self.slo {
            params.push(("slo".to_string(), slo.clone()));
        }
        if let Some(from) = &self.from {
            params.push(("from".to_string(), timestamp::format(from)));
        }
        if let Some(to) = &self.to {
            params.push(("to".to_string(), timestamp::format(to)));
        }
        params.extend(self.names.iter().map(|name| ("name".to_string(), name.clone())));
        params
    }
}

//! Query parameters for `GET /api/timeseries/slo`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::timestamp;

/// Which series the time-series endpoint returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Series {
    /// Latency percentiles.
    Percentiles,
    /// Good and total counts.
    Counts,
    /// Burn rate at each point.
    #[default]
    InstantaneousBurnRate,
    /// Remaining error budget over time.
    BurnDown,
}

impl Series {
    /// Returns the wire name of the series.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentiles => "percentiles",
            Self::Counts => "counts",
            Self::InstantaneousBurnRate => "instantaneousBurnRate",
            Self::BurnDown => "burnDown",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentile level for [`Series::Percentiles`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Percentile {
    P1,
    P5,
    P10,
    P50,
    P90,
    P95,
    P99,
}

impl Percentile {
    /// Returns the wire name, e.g. `p95`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P5 => "p5",
            Self::P10 => "p10",
            Self::P50 => "p50",
            Self::P90 => "p90",
            Self::P95 => "p95",
            Self::P99 => "p99",
        }
    }
}

/// Query for one SLO's time series.
///
/// Defaults: the last three hours, 20 steps, instantaneous burn rate.
///
/// ```rust
/// use nobl9_api::slo::{Percentile, Series, TimeseriesQuery};
///
/// let query = TimeseriesQuery::new("prod-latency")
///     .steps(5000)
///     .series(Series::Percentiles)
///     .percentile(Percentile::P95);
///
/// let params = query.to_params();
/// assert!(params.contains(&("steps".to_string(), "1000".to_string())));
/// assert!(params.contains(&("q".to_string(), "p95".to_string())));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeseriesQuery {
    slo_name: String,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    steps: u16,
    series: Series,
    percentile: Option<Percentile>,
}

impl TimeseriesQuery {
    /// Smallest accepted step count.
    pub const MIN_STEPS: u16 = 1;
    /// Largest accepted step count.
    pub const MAX_STEPS: u16 = 1000;

    /// Creates a query for `slo_name` over the last three hours.
    #[must_use]
    pub fn new(slo_name: impl Into<String>) -> Self {
        let to = Utc::now();
        Self {
            slo_name: slo_name.into(),
            from: to - Duration::hours(3),
            to,
            steps: 20,
            series: Series::default(),
            percentile: None,
        }
    }

    /// Sets the time window.
    #[must_use]
    pub const fn window(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Sets how many points to return, clamped to `1..=1000`. For
    /// percentile series the API treats this as a hint.
    #[must_use]
    pub fn steps(mut self, steps: u16) -> Self {
        self.steps = steps.clamp(Self::MIN_STEPS, Self::MAX_STEPS);
        self
    }

    /// Selects the series.
    #[must_use]
    pub const fn series(mut self, series: Series) -> Self {
        self.series = series;
        self
    }

    /// Selects one percentile. Only sent for [`Series::Percentiles`];
    /// without it every percentile is returned.
    #[must_use]
    pub const fn percentile(mut self, percentile: Percentile) -> Self {
        self.percentile = Some(percentile);
        self
    }

    /// Returns the SLO name.
    #[must_use]
    pub fn slo_name(&self) -> &str {
        &self.slo_name
    }

    /// Renders the query string parameters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("name".to_string(), self.slo_name.clone()),
            ("from".to_string(), timestamp::format(&self.from)),
            ("to".to_string(), timestamp::format(&self.to)),
            ("steps".to_string(), self.steps.to_string()),
            ("series".to_string(), self.series.to_string()),
        ];
        if let (Series::Percentiles, Some(percentile)) = (self.series, self.percentile) {
            params.push(("q".to_string(), percentile.as_str().to_string()));
        }
        params
    }
}

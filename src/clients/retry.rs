//! Retry policy and backoff schedule for transient failures.
//!
//! [`RetryPolicy`] holds the immutable settings; [`Backoff`] walks through a
//! single call's schedule one failed attempt at a time. Waiting is delegated
//! to a [`Sleeper`] so the schedule can be observed without real delays.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ConfigError;

/// Settings for retrying transient (502/503) failures.
///
/// # Defaults
///
/// - `max_retries`: 3 (four attempts in total)
/// - `initial_backoff`: 1 second
/// - `max_backoff`: 32 seconds
/// - `multiplier`: 2.0
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use nobl9_api::RetryPolicy;
///
/// let policy = RetryPolicy::new(2, Duration::from_millis(500), Duration::from_secs(5), 3.0)
///     .unwrap();
/// assert_eq!(policy.max_attempts(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    /// Creates a validated retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetryPolicy`] if `multiplier` is not a
    /// finite number of at least 1.0, or `max_backoff` is shorter than
    /// `initial_backoff`.
    pub fn new(
        max_retries: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("multiplier must be a finite value >= 1.0, got {multiplier}"),
            });
        }
        if max_backoff < initial_backoff {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!(
                    "max backoff ({max_backoff:?}) is shorter than initial backoff ({initial_backoff:?})"
                ),
            });
        }

        Ok(Self {
            max_retries,
            initial_backoff,
            max_backoff,
            multiplier,
        })
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Maximum number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Upper bound on any single delay.
    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Factor applied to the delay after each retry.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Starts a fresh backoff schedule for one call.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: self.clone(),
            attempt: 0,
            current: self.initial_backoff.as_secs_f64(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(32),
            multiplier: 2.0,
        }
    }
}

/// Backoff state for a single call.
///
/// Call [`Backoff::next_delay`] after each failed attempt. It returns the
/// time to wait before the next attempt, or `None` once the attempt budget
/// is spent.
///
/// ```rust
/// use std::time::Duration;
/// use nobl9_api::RetryPolicy;
///
/// let mut backoff = RetryPolicy::default().backoff();
/// assert_eq!(backoff.next_delay(), Some(Duration::from_secs(1)));
/// assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
/// assert_eq!(backoff.next_delay(), Some(Duration::from_secs(4)));
/// assert_eq!(backoff.next_delay(), None);
/// assert_eq!(backoff.attempts(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
    current: f64,
}

impl Backoff {
    /// Records a failed attempt and returns the delay before the next one.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.attempt = self.attempt.saturating_add(1);
        if self.attempt >= self.policy.max_attempts() {
            return None;
        }

        let capped = self.current.min(self.policy.max_backoff.as_secs_f64());
        self.current *= self.policy.multiplier;
        // Rounding can push `capped` just past the largest `Duration`.
        Some(Duration::try_from_secs_f64(capped).unwrap_or(self.policy.max_backoff))
    }

    /// Number of failed attempts recorded so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempt
    }
}

/// Something that can wait between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately.
///
/// Useful in tests that assert on the backoff schedule.
#[derive(Clone, Debug, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delay requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(values: &[f64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_secs_f64).collect()
    }

    fn drain(mut backoff: Backoff) -> Vec<Duration> {
        std::iter::from_fn(|| backoff.next_delay()).collect()
    }

    #[test]
    fn test_default_schedule() {
        assert_eq!(drain(RetryPolicy::default().backoff()), secs(&[1.0, 2.0, 4.0]));
    }

    #[test]
    fn test_delays_are_capped_at_max_backoff() {
        let policy =
            RetryPolicy::new(6, Duration::from_secs(1), Duration::from_secs(5), 2.0).unwrap();

        assert_eq!(
            drain(policy.backoff()),
            secs(&[1.0, 2.0, 4.0, 5.0, 5.0, 5.0])
        );
    }

    #[test]
    fn test_delays_never_decrease() {
        let policy =
            RetryPolicy::new(10, Duration::from_millis(300), Duration::from_secs(7), 1.7).unwrap();
        let delays = drain(policy.backoff());

        assert_eq!(delays.len(), 10);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(7)));
    }

    #[test]
    fn test_unbounded_max_backoff_saturates() {
        let policy = RetryPolicy::new(80, Duration::from_secs(1), Duration::MAX, 2.0).unwrap();
        let delays = drain(policy.backoff());

        assert_eq!(delays.len(), 80);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(delays.last(), Some(&Duration::MAX));
    }

    #[test]
    fn test_zero_retries_yields_no_delay() {
        let mut backoff = RetryPolicy::no_retry().backoff();
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.attempts(), 1);
    }

    #[test]
    fn test_rejects_bad_multiplier() {
        for multiplier in [0.5, f64::NAN, f64::INFINITY] {
            let result =
                RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(2), multiplier);
            assert!(matches!(result, Err(ConfigError::InvalidRetryPolicy { .. })));
        }
    }

    #[test]
    fn test_rejects_max_below_initial() {
        let result = RetryPolicy::new(3, Duration::from_secs(10), Duration::from_secs(2), 2.0);
        assert!(matches!(result, Err(ConfigError::InvalidRetryPolicy { .. })));
    }

    #[tokio::test]
    async fn test_recording_sleeper_returns_immediately() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_secs(1)).await;

        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(3600), Duration::from_secs(1)]
        );
    }
}

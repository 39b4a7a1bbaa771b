//! Retry policy with exponential backoff for transient fetch failures.
//!
//! A failed fetch is classified into a [`FailureType`]; the [`RetryPolicy`]
//! then decides whether to try again and how long to wait.
//!
//! ```
//! use playlist_core::fetch::{FailureType, RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::default();
//! match policy.should_retry(FailureType::Transient, 1) {
//!     RetryDecision::Retry { delay, attempt } => println!("retry #{attempt} in {delay:?}"),
//!     RetryDecision::DoNotRetry { reason } => println!("giving up: {reason}"),
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::FetchError;

/// Default maximum attempts per track, including the first.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Rate-limited failures wait at least this long before retrying.
const RATE_LIMIT_FLOOR: Duration = Duration::from_secs(5);

const MAX_JITTER: Duration = Duration::from_millis(500);

/// Classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry (network trouble).
    Transient,
    /// Will not succeed on retry (video gone, conversion failure, local IO).
    Permanent,
    /// Remote throttling; retried with a longer floor delay.
    RateLimited,
}

/// Decision on whether to retry a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the delay.
    Retry {
        /// How long to wait.
        delay: Duration,
        /// Number of the next attempt (1-indexed).
        attempt: u32,
    },
    /// Give up.
    DoNotRetry {
        /// Why no retry happens.
        reason: String,
    },
}

/// Exponential backoff policy.
///
/// `delay = min(base * multiplier^(attempt-1), max) + jitter`; with defaults
/// roughly 1s then 2s before the third and last attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit settings; `max_attempts` is at least 1.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Default delays with a custom attempt limit.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Policy that never waits; used by tests and dry runs.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO, 1.0)
    }

    /// Configured attempt limit.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether to retry after `attempt` (1-indexed) failed.
    #[instrument(level = "debug", skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let mut delay = self.calculate_delay(attempt);
        if failure_type == FailureType::RateLimited && self.base_delay > Duration::ZERO {
            delay = delay.max(RATE_LIMIT_FLOOR);
        }

        debug!(next_attempt = attempt + 1, delay_ms = delay.as_millis(), "will retry");
        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * f64::from(self.backoff_multiplier).powf(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        Duration::from_millis(capped_ms as u64) + jitter()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn jitter() -> Duration {
    let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER.as_millis() as u64);
    Duration::from_millis(jitter_ms)
}

/// Classifies a fetch error for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | `Network` | Transient |
/// | `RateLimited` | RateLimited |
/// | `Unavailable`, `PostProcessing`, `Failed` | Permanent |
/// | `Spawn`, `MissingOutput`, `Io`, `Destination` | Permanent |
#[must_use]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::Network { .. } => FailureType::Transient,
        FetchError::RateLimited { .. } => FailureType::RateLimited,
        FetchError::Unavailable { .. }
        | FetchError::PostProcessing { .. }
        | FetchError::Failed { .. }
        | FetchError::Spawn { .. }
        | FetchError::MissingOutput { .. }
        | FetchError::Io { .. }
        | FetchError::Destination { .. } => FailureType::Permanent,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::TrackId;

    fn id() -> TrackId {
        TrackId::new("abc").unwrap()
    }

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_RETRIES);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(32));
    }

    #[test]
    fn test_max_attempts_minimum_is_one() {
        assert_eq!(RetryPolicy::with_max_attempts(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::immediate(0).max_attempts(), 1);
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1), Duration::from_secs(5), 2.0);
        let first = policy.calculate_delay(1);
        assert!(first >= Duration::from_secs(1) && first <= Duration::from_millis(1500));
        let third = policy.calculate_delay(3);
        assert!(third >= Duration::from_secs(4) && third <= Duration::from_millis(4500));
        let capped = policy.calculate_delay(8);
        assert!(capped >= Duration::from_secs(5) && capped <= Duration::from_millis(5500));
    }

    #[test]
    fn test_immediate_policy_has_no_delay() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(
            policy.should_retry(FailureType::RateLimited, 1),
            RetryDecision::Retry {
                delay: Duration::ZERO,
                attempt: 2
            }
        );
    }

    #[test]
    fn test_permanent_never_retries() {
        let decision = RetryPolicy::default().should_retry(FailureType::Permanent, 1);
        let RetryDecision::DoNotRetry { reason } = decision else {
            panic!("expected DoNotRetry");
        };
        assert!(reason.contains("permanent"));
    }

    #[test]
    fn test_transient_retries_until_exhausted() {
        let policy = RetryPolicy::with_max_attempts(3);
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 1),
            RetryDecision::Retry { attempt: 2, .. }
        ));
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 2),
            RetryDecision::Retry { attempt: 3, .. }
        ));
        let RetryDecision::DoNotRetry { reason } = policy.should_retry(FailureType::Transient, 3)
        else {
            panic!("expected DoNotRetry");
        };
        assert!(reason.contains("exhausted"));
    }

    #[test]
    fn test_rate_limited_waits_at_least_floor() {
        let RetryDecision::Retry { delay, .. } =
            RetryPolicy::default().should_retry(FailureType::RateLimited, 1)
        else {
            panic!("expected Retry");
        };
        assert!(delay >= RATE_LIMIT_FLOOR);
    }

    #[test]
    fn test_classify_error() {
        let reason = || "x".to_string();
        assert_eq!(
            classify_error(&FetchError::Network { id: id(), reason: reason() }),
            FailureType::Transient
        );
        assert_eq!(
            classify_error(&FetchError::RateLimited { id: id(), reason: reason() }),
            FailureType::RateLimited
        );
        assert_eq!(
            classify_error(&FetchError::Unavailable { id: id(), reason: reason() }),
            FailureType::Permanent
        );
        assert_eq!(
            classify_error(&FetchError::io(
                "/x",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
            )),
            FailureType::Permanent
        );
    }
}

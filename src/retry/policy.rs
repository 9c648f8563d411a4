//! Retry Policy Module
//!
//! Pure configuration describing how many times to attempt an operation and
//! how long to wait between attempts.

use std::time::Duration;

use crate::error::{NavCacheError, Result};

/// Default number of attempts: one call plus three retries.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default wait before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(300);

/// Default multiplier applied to the delay after each retry.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

// == Retry Policy ==
/// Exponential backoff parameters.
///
/// The delay before attempt `n` (`n >= 2`) is
/// `initial_delay * backoff_factor^(n - 2)`, optionally capped by `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Option<Duration>,
}

impl RetryPolicy {
    // == Constructor ==
    /// Builds a validated policy.
    ///
    /// # Errors
    /// `InvalidPolicy` when `max_attempts` is zero or `backoff_factor` is not
    /// a finite number >= 1.0.
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: f64) -> Result<Self> {
        if max_attempts == 0 {
            return Err(NavCacheError::InvalidPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !backoff_factor.is_finite() || backoff_factor < 1.0 {
            return Err(NavCacheError::InvalidPolicy(format!(
                "backoff_factor must be a finite number >= 1.0, got {}",
                backoff_factor
            )));
        }

        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_factor,
            max_delay: None,
        })
    }

    /// Policy that runs the operation once and never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            backoff_factor: 1.0,
            max_delay: None,
        }
    }

    /// Caps every computed delay at `max_delay`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    // == Delay Before ==
    /// Returns the wait preceding `attempt` (1-based).
    ///
    /// `None` for the first attempt and for attempts beyond `max_attempts`.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt < 2 || attempt > self.max_attempts {
            return None;
        }

        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let scaled = self.initial_delay.as_nanos() as f64 * self.backoff_factor.powi(exponent);
        let delay = if scaled.is_finite() && scaled < u64::MAX as f64 {
            Duration::from_nanos(scaled.round() as u64)
        } else {
            Duration::MAX
        };

        Some(match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: None,
        }
    }
}

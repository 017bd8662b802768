//! # Backoff policy for automatic module restarts.
//!
//! [`BackoffPolicy`] controls how the delay before an automatic restart grows with
//! the number of restarts a module has already consumed. It is parameterized by:
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::first`] the initial delay;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for restart count `n` is `first × factor^n`, clamped to `max`, then
//! jitter is applied. The base is derived purely from `n`, so jitter never feeds
//! back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use modvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(500),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(500));
//! assert_eq!(backoff.next(1), Duration::from_secs(1));
//! assert_eq!(backoff.next(8), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Restart backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first automatic restart.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter applied to the clamped delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 1s`;
    /// - `factor = 2.0`;
    /// - `max = 60s`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            max: Duration::from_secs(60),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay before the restart following `restart_count` restarts.
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, restart_count: u32) -> Duration {
        let exp = restart_count.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}

//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the lifecycle runtime.
//!
//! Config is used in two ways:
//! 1. **Manager creation**: `LifecycleManager::builder(config)`
//! 2. **ModuleSpec defaults**: `ModuleSpec::with_defaults(module, &config)`
//!
//! ## Sentinel values
//! - `hook_timeout = 0s` → no timeout (treated as `None` by `ModuleSpec::with_defaults`)
//! - `journal_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::policies::{BackoffPolicy, RestartPolicy};

/// Global configuration for the lifecycle runtime.
///
/// ## Field semantics
/// - `health_check_interval`: Default period between health checks
/// - `max_restart_attempts`: Default restart ceiling per module
/// - `hook_timeout`: Default bound on every lifecycle hook (`0s` = unbounded)
/// - `journal_capacity`: Transitions kept per module (oldest dropped first)
/// - `grace`: Time allowed for [`shutdown_all`](crate::LifecycleManager::shutdown_all)
/// - `restart`, `backoff`: Default automatic restart behaviour
#[derive(Clone, Debug)]
pub struct Config {
    /// Default health-check period.
    pub health_check_interval: Duration,

    /// Default restart ceiling.
    ///
    /// Once a module consumed this many restarts, `restart()` fails with
    /// `RestartLimitExceeded` and the module stays `failed`.
    pub max_restart_attempts: u32,

    /// Default bound on `initialize`, `shutdown` and `health_check`.
    ///
    /// - `Duration::ZERO` = no timeout (a hook that never resolves stalls its dependents)
    /// - `> 0` = hook fails with `ModuleError::Timeout` when exceeded
    pub hook_timeout: Duration,

    /// Number of status transitions kept in each module's journal.
    pub journal_capacity: usize,

    /// Maximum time `shutdown_all` waits for every module to stop.
    pub grace: Duration,

    /// Default automatic restart policy.
    pub restart: RestartPolicy,

    /// Default delay policy for automatic restarts.
    pub backoff: BackoffPolicy,
}

impl Config {
    /// Returns the default hook timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → timeout applied per hook invocation
    #[inline]
    pub fn default_hook_timeout(&self) -> Option<Duration> {
        if self.hook_timeout == Duration::ZERO {
            None
        } else {
            Some(self.hook_timeout)
        }
    }

    /// Returns the journal capacity clamped to a minimum of 1.
    #[inline]
    pub fn journal_capacity_clamped(&self) -> usize {
        self.journal_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `health_check_interval = 30s`
    /// - `max_restart_attempts = 3`
    /// - `hook_timeout = 30s`
    /// - `journal_capacity = 1000`
    /// - `grace = 30s`
    /// - `restart = RestartPolicy::Never`
    /// - `backoff = BackoffPolicy::default()`
    fn default() -> Self {
        Self {
            health_check_interval: Duration::from_secs(30),
            max_restart_attempts: 3,
            hook_timeout: Duration::from_secs(30),
            journal_capacity: 1000,
            grace: Duration::from_secs(30),
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
        }
    }
}

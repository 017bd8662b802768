//! # Automatic restart policy for modules.
//!
//! [`RestartPolicy`] decides what the runtime does when a module reaches `failed`
//! on its own (initialization error, health check error).
//!
//! - [`RestartPolicy::Never`] the module stays `failed` until someone calls `restart()` (default).
//! - [`RestartPolicy::OnFailure`] the runtime schedules `restart()` after a backoff delay.
//!
//! Either way every restart counts against `max_restart_attempts`; once the ceiling
//! is reached the module stays `failed`.
//!
//! ```text
//! OnFailure:
//!   Running ──health check error──► Failed
//!      └─► delay = backoff.next(restart_count)
//!      └─► sleep(delay) (cancelled by stop/unregister)
//!      └─► restart()  ──► restart_count += 1 ──► stop + start
//! ```

/// Policy controlling whether a failed module is restarted automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Leave failed modules alone (default).
    #[default]
    Never,
    /// Restart failed modules after a backoff delay, within the restart ceiling.
    OnFailure,
}

impl RestartPolicy {
    /// Whether a module that just failed should be scheduled for restart.
    #[inline]
    pub fn restarts_on_failure(&self) -> bool {
        matches!(self, RestartPolicy::OnFailure)
    }
}

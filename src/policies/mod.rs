//! Restart policies.
//!
//! This module groups the knobs that control **if** a failed module is restarted
//! automatically and **how long** the runtime waits before doing so.
//!
//! ## Contents
//! - [`RestartPolicy`] whether to restart failed modules (never / on-failure)
//! - [`BackoffPolicy`] how restart delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization to spread simultaneous restarts
//!
//! ## Quick wiring
//! ```text
//! ModuleSpec { restart: RestartPolicy, backoff: BackoffPolicy, max_restart_attempts }
//!      └─► core::actor::ModuleActor uses:
//!           - restart to decide whether a failure schedules a restart
//!           - backoff.next(restart_count) to delay it
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::Never` (restarts are explicit unless configured otherwise).
//! - `BackoffPolicy::default()` → first=1s, factor=2.0, max=60s, jitter=None.

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::RestartPolicy;

//! # LogWriter: lifecycle events as `tracing` records
//!
//! A subscriber that renders every [`Event`] under its public
//! `lifecycle.module.*` name. Severity follows the event:
//! failures at `error`, degradation and restart exhaustion at `warn`, the rest at
//! `info`.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO  modvisor: lifecycle.module.started module="db" seq=4
//! WARN  modvisor: lifecycle.module.degraded module="db" seq=9 consecutive_failures=1
//! ERROR modvisor: lifecycle.module.failed module="api" seq=12 error="initialization failed: port in use" error_count=1
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let name = e.topic().public_name();
        let module = &*e.source;
        match &e.kind {
            EventKind::ModuleFailed { error, error_count } => {
                error!(target: "modvisor", module, seq = e.seq, error = &**error, error_count, "{name}");
            }
            EventKind::ModuleDegraded {
                consecutive_failures,
            } => {
                warn!(target: "modvisor", module, seq = e.seq, consecutive_failures, "{name}");
            }
            EventKind::RestartLimitExceeded { attempts } => {
                warn!(target: "modvisor", module, seq = e.seq, attempts, "{name}");
            }
            EventKind::ModuleRestarting {
                attempt,
                max_attempts,
            } => {
                info!(target: "modvisor", module, seq = e.seq, attempt, max_attempts, "{name}");
            }
            EventKind::ModuleStarting { restart_count } => {
                info!(target: "modvisor", module, seq = e.seq, restart_count, "{name}");
            }
            EventKind::ModuleRegistered { dependencies } => {
                info!(target: "modvisor", module, seq = e.seq, dependencies = ?dependencies, "{name}");
            }
            EventKind::ModuleUnregistered { forced } => {
                info!(target: "modvisor", module, seq = e.seq, forced, "{name}");
            }
            _ => {
                info!(target: "modvisor", module, seq = e.seq, "{name}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

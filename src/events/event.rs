//! # Lifecycle events emitted by modules and the registry.
//!
//! The [`EventKind`] enum is a closed set of event types, each carrying its own
//! typed payload:
//! - **Structural events**: module registered / unregistered (published by the registry)
//! - **Lifecycle events**: starting, started, stopped, restarting (published by modules)
//! - **Health events**: failed, degraded, recovered, restart limit exceeded
//!
//! Every kind maps to a payload-free [`Topic`], which is what subscriptions filter on.
//! The [`Event`] envelope adds the source module, a [`Priority`] tag, a timestamp
//! and a global sequence number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use modvisor::{Event, EventKind, Priority, Topic};
//!
//! let ev = Event::new("db", EventKind::ModuleDegraded { consecutive_failures: 2 })
//!     .with_priority(Priority::High);
//!
//! assert_eq!(ev.topic(), Topic::ModuleDegraded);
//! assert_eq!(ev.topic().as_str(), "module:degraded");
//! assert_eq!(&*ev.source, "db");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::modules::Priority;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Payload-free event type, used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// See [`EventKind::ModuleRegistered`].
    ModuleRegistered,
    /// See [`EventKind::ModuleUnregistered`].
    ModuleUnregistered,
    /// See [`EventKind::ModuleStarting`].
    ModuleStarting,
    /// See [`EventKind::ModuleStarted`].
    ModuleStarted,
    /// See [`EventKind::ModuleStopped`].
    ModuleStopped,
    /// See [`EventKind::ModuleFailed`].
    ModuleFailed,
    /// See [`EventKind::ModuleDegraded`].
    ModuleDegraded,
    /// See [`EventKind::ModuleRecovered`].
    ModuleRecovered,
    /// See [`EventKind::ModuleRestarting`].
    ModuleRestarting,
    /// See [`EventKind::RestartLimitExceeded`].
    RestartLimitExceeded,
}

impl Topic {
    /// Every topic, in declaration order.
    pub const ALL: [Topic; 10] = [
        Topic::ModuleRegistered,
        Topic::ModuleUnregistered,
        Topic::ModuleStarting,
        Topic::ModuleStarted,
        Topic::ModuleStopped,
        Topic::ModuleFailed,
        Topic::ModuleDegraded,
        Topic::ModuleRecovered,
        Topic::ModuleRestarting,
        Topic::RestartLimitExceeded,
    ];

    /// Internal event type name (`module:*`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ModuleRegistered => "module:registered",
            Topic::ModuleUnregistered => "module:unregistered",
            Topic::ModuleStarting => "module:starting",
            Topic::ModuleStarted => "module:started",
            Topic::ModuleStopped => "module:stopped",
            Topic::ModuleFailed => "module:failed",
            Topic::ModuleDegraded => "module:degraded",
            Topic::ModuleRecovered => "module:recovered",
            Topic::ModuleRestarting => "module:restarting",
            Topic::RestartLimitExceeded => "module:restart-limit-exceeded",
        }
    }

    /// Stable name under which the lifecycle manager rebroadcasts the event.
    pub fn public_name(&self) -> &'static str {
        match self {
            Topic::ModuleRegistered => "lifecycle.module.registered",
            Topic::ModuleUnregistered => "lifecycle.module.unregistered",
            Topic::ModuleStarting => "lifecycle.module.starting",
            Topic::ModuleStarted => "lifecycle.module.started",
            Topic::ModuleStopped => "lifecycle.module.stopped",
            Topic::ModuleFailed => "lifecycle.module.failed",
            Topic::ModuleDegraded => "lifecycle.module.degraded",
            Topic::ModuleRecovered => "lifecycle.module.recovered",
            Topic::ModuleRestarting => "lifecycle.module.restarting",
            Topic::RestartLimitExceeded => "lifecycle.module.restart_limit_exceeded",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Module added to the registry.
    ModuleRegistered {
        /// Declared dependencies.
        dependencies: Arc<[String]>,
    },

    /// Module removed from the registry.
    ModuleUnregistered {
        /// Whether the dependents check was bypassed.
        forced: bool,
    },

    /// `initialize` is about to run.
    ///
    /// - `restart_count`: restarts consumed so far
    ModuleStarting {
        /// Restarts consumed so far.
        restart_count: u32,
    },

    /// `initialize` succeeded; the module is running.
    ModuleStarted,

    /// The module reached `stopped`.
    ModuleStopped,

    /// The module reached `failed`.
    ModuleFailed {
        /// Failure message.
        error: Arc<str>,
        /// Total error count after this failure.
        error_count: u32,
    },

    /// A health check answered unhealthy; the module is degraded.
    ModuleDegraded {
        /// Unhealthy checks in a row.
        consecutive_failures: u32,
    },

    /// A health check answered healthy again after degradation.
    ModuleRecovered,

    /// A restart attempt began.
    ModuleRestarting {
        /// Attempt number (1-based).
        attempt: u32,
        /// Restart ceiling.
        max_attempts: u32,
    },

    /// `restart()` was refused: the ceiling was already reached.
    RestartLimitExceeded {
        /// Restarts consumed.
        attempts: u32,
    },
}

impl EventKind {
    /// Payload-free topic of this event.
    pub fn topic(&self) -> Topic {
        match self {
            EventKind::ModuleRegistered { .. } => Topic::ModuleRegistered,
            EventKind::ModuleUnregistered { .. } => Topic::ModuleUnregistered,
            EventKind::ModuleStarting { .. } => Topic::ModuleStarting,
            EventKind::ModuleStarted => Topic::ModuleStarted,
            EventKind::ModuleStopped => Topic::ModuleStopped,
            EventKind::ModuleFailed { .. } => Topic::ModuleFailed,
            EventKind::ModuleDegraded { .. } => Topic::ModuleDegraded,
            EventKind::ModuleRecovered => Topic::ModuleRecovered,
            EventKind::ModuleRestarting { .. } => Topic::ModuleRestarting,
            EventKind::RestartLimitExceeded { .. } => Topic::RestartLimitExceeded,
        }
    }

    /// Priority the registry tags this event with when republishing it.
    ///
    /// failed / restart limit → `Critical`, degraded → `High`, recovered → `Medium`,
    /// everything else → `Low`.
    pub fn severity(&self) -> Priority {
        match self {
            EventKind::ModuleFailed { .. } | EventKind::RestartLimitExceeded { .. } => {
                Priority::Critical
            }
            EventKind::ModuleDegraded { .. } => Priority::High,
            EventKind::ModuleRecovered => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

/// Event envelope.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `source`: id of the module the event is about
/// - `priority`: urgency tag
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Id of the module the event is about.
    pub source: Arc<str>,
    /// Priority tag.
    pub priority: Priority,
    /// Event type and payload.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event with current timestamp, next sequence number and
    /// `Priority::Medium`.
    pub fn new(source: impl Into<Arc<str>>, kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            source: source.into(),
            priority: Priority::default(),
            kind,
        }
    }

    /// Sets the priority tag.
    #[inline]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Shorthand for `self.kind.topic()`.
    #[inline]
    pub fn topic(&self) -> Topic {
        self.kind.topic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new("a", EventKind::ModuleStarted);
        let b = Event::new("a", EventKind::ModuleStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn severity_follows_health_impact() {
        let failed = EventKind::ModuleFailed {
            error: "boom".into(),
            error_count: 1,
        };
        assert_eq!(failed.severity(), Priority::Critical);
        assert_eq!(
            EventKind::ModuleDegraded { consecutive_failures: 1 }.severity(),
            Priority::High
        );
        assert_eq!(EventKind::ModuleRecovered.severity(), Priority::Medium);
        assert_eq!(EventKind::ModuleStarted.severity(), Priority::Low);
    }

    #[test]
    fn topic_names_are_distinct() {
        let mut names: Vec<_> = Topic::ALL.iter().map(Topic::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Topic::ALL.len());
        assert!(Topic::ALL.iter().all(|t| t.public_name().starts_with("lifecycle.")));
    }
}

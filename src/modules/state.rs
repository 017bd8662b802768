//! # Observable module state.
//!
//! Lifecycle state machine:
//! ```text
//! Uninitialized ──start──► Initializing ──ok──► Running ◄──healthy── Degraded
//!       ▲                      │   │               │  └──unhealthy──►   │
//!       │                      │   └──cancelled──► Stopped ◄──stop──────┘
//!       │                      ▼                    │
//!       │                    Failed ◄──check error / restart ceiling── (any)
//!       │                      │
//!       └──────────────── restart (restart_count < max) ──► Initializing
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::modules::ModuleMetrics;

/// Lifecycle status of a supervised module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    /// Registered, never started.
    Uninitialized,
    /// `initialize` in progress.
    Initializing,
    /// Up and passing health checks.
    Running,
    /// Up, but the last health check reported unhealthy.
    Degraded,
    /// Initialization or a health check raised, or the restart ceiling was hit.
    Failed,
    /// Shut down on request.
    Stopped,
}

impl ModuleStatus {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Uninitialized => "uninitialized",
            ModuleStatus::Initializing => "initializing",
            ModuleStatus::Running => "running",
            ModuleStatus::Degraded => "degraded",
            ModuleStatus::Failed => "failed",
            ModuleStatus::Stopped => "stopped",
        }
    }

    /// `Running` or `Degraded`: the states that carry an active health-check timer.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, ModuleStatus::Running | ModuleStatus::Degraded)
    }

    /// Active or on its way up.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.is_active() || matches!(self, ModuleStatus::Initializing)
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a module, and of the events published about it.
///
/// Ordered from most to least urgent: `Critical < High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Must be up for the process to be useful.
    Critical,
    /// Important, degraded service without it.
    High,
    /// Regular subsystem (default).
    #[default]
    Medium,
    /// Optional or background subsystem.
    Low,
}

impl Priority {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health bookkeeping kept per module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthRecord {
    /// Completion time of the last health check.
    pub last_check: Option<SystemTime>,
    /// Failed hooks and unhealthy checks since registration.
    pub error_count: u32,
    /// Restart attempts consumed (never exceeds `max_restart_attempts`).
    pub restart_count: u32,
    /// Whether the last health check answered healthy.
    pub is_responding: bool,
    /// Unhealthy or failed checks since the last healthy one.
    pub consecutive_failures: u32,
}

/// One recorded status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Wall-clock time of the transition.
    pub at: SystemTime,
    /// Status before.
    pub from: ModuleStatus,
    /// Status after.
    pub to: ModuleStatus,
    /// Optional cause (error text, "stop requested", ...).
    pub reason: Option<Arc<str>>,
}

/// Point-in-time snapshot of a registered module.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    /// Module id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Declared priority.
    pub priority: Priority,
    /// Declared dependencies, in declaration order.
    pub dependencies: Vec<String>,
    /// Current status.
    pub status: ModuleStatus,
    /// Health bookkeeping.
    pub health: HealthRecord,
    /// Restart ceiling.
    pub max_restart_attempts: u32,
    /// Whether the recurring health check is scheduled. True iff `status` is
    /// `running` or `degraded`.
    pub health_timer_armed: bool,
    /// Whether an automatic restart is waiting out its backoff delay.
    pub restart_pending: bool,
    /// Metrics reported by the module.
    pub metrics: ModuleMetrics,
}

//! Error types used by the modvisor runtime and by supervised modules.
//!
//! This module defines three error enums:
//!
//! - [`ModuleError`]: failures raised by a module's lifecycle hooks. These never
//!   reach registry callers; they are absorbed into state transitions and events.
//! - [`RegistryError`]: structural violations (duplicate ids, unknown ids,
//!   blocked stop/unregister, cycles, restart ceiling) returned to the caller.
//! - [`RuntimeError`]: failures of the orchestrator itself (bulk shutdown).
//!
//! All types provide `as_label` for logs/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::modules::{Hook, ModuleStatus};

/// # Errors produced by module lifecycle hooks.
///
/// Returned by [`Module`](crate::Module) implementations and by the runtime when a
/// hook times out, panics, or is cancelled.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// `initialize` could not bring the module up.
    #[error("initialization failed: {error}")]
    Initialization {
        /// The underlying error message.
        error: String,
    },

    /// `health_check` could not determine liveness.
    #[error("health check failed: {error}")]
    HealthCheck {
        /// The underlying error message.
        error: String,
    },

    /// `shutdown` did not release everything cleanly.
    #[error("shutdown failed: {error}")]
    Shutdown {
        /// The underlying error message.
        error: String,
    },

    /// A hook exceeded the configured hook timeout.
    #[error("{hook} timed out after {timeout:?}")]
    Timeout {
        /// Hook that timed out.
        hook: Hook,
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// A hook panicked; the panic was caught at the module boundary.
    #[error("{hook} panicked: {info}")]
    Panicked {
        /// Hook that panicked.
        hook: Hook,
        /// Panic payload rendered as text.
        info: String,
    },

    /// The hook was abandoned because its cancellation token fired.
    #[error("hook cancelled")]
    Canceled,
}

impl ModuleError {
    /// Shorthand for [`ModuleError::Initialization`].
    pub fn initialization(error: impl Into<String>) -> Self {
        ModuleError::Initialization {
            error: error.into(),
        }
    }

    /// Shorthand for [`ModuleError::HealthCheck`].
    pub fn health_check(error: impl Into<String>) -> Self {
        ModuleError::HealthCheck {
            error: error.into(),
        }
    }

    /// Shorthand for [`ModuleError::Shutdown`].
    pub fn shutdown(error: impl Into<String>) -> Self {
        ModuleError::Shutdown {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use modvisor::ModuleError;
    ///
    /// let err = ModuleError::initialization("port in use");
    /// assert_eq!(err.as_label(), "module_initialization");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ModuleError::Initialization { .. } => "module_initialization",
            ModuleError::HealthCheck { .. } => "module_health_check",
            ModuleError::Shutdown { .. } => "module_shutdown",
            ModuleError::Timeout { .. } => "module_hook_timeout",
            ModuleError::Panicked { .. } => "module_hook_panicked",
            ModuleError::Canceled => "module_hook_canceled",
        }
    }
}

/// # Structural errors returned by the [`Registry`](crate::Registry).
///
/// The registry never recovers from these on its own; the caller decides whether
/// to retry, force, or abort.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A module with the same id is already registered.
    #[error("module '{id}' is already registered")]
    DuplicateModule {
        /// Conflicting module id.
        id: String,
    },

    /// No module with this id is registered (also returned for a declared
    /// dependency that was never registered).
    #[error("module '{id}' is not registered")]
    ModuleNotFound {
        /// Requested module id.
        id: String,
    },

    /// The operation is blocked by modules that depend on `id`.
    #[error("module '{id}' has dependents: {dependents:?}")]
    DependentsExist {
        /// Module the operation targeted.
        id: String,
        /// Blocking dependents (sorted).
        dependents: Vec<String>,
    },

    /// Registering the module would close a dependency cycle.
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    CycleDetected {
        /// Cycle path, starting and ending at the registered module.
        path: Vec<String>,
    },

    /// A dependency was started but did not reach `running`.
    #[error("module '{id}' cannot start: dependency '{dependency}' is {status}")]
    DependencyUnavailable {
        /// Module being started.
        id: String,
        /// Dependency that is not running.
        dependency: String,
        /// Status the dependency ended in.
        status: ModuleStatus,
    },

    /// The module is `failed`; only `restart` can bring it back.
    #[error("module '{id}' has failed; restart it instead")]
    ModuleFailed {
        /// Failed module id.
        id: String,
    },

    /// The module already used all of its restart attempts.
    #[error("module '{id}' exhausted its restart attempts ({attempts})")]
    RestartLimitExceeded {
        /// Module id.
        id: String,
        /// Restart attempts already consumed.
        attempts: u32,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateModule { .. } => "registry_duplicate_module",
            RegistryError::ModuleNotFound { .. } => "registry_module_not_found",
            RegistryError::DependentsExist { .. } => "registry_dependents_exist",
            RegistryError::CycleDetected { .. } => "registry_cycle_detected",
            RegistryError::DependencyUnavailable { .. } => "registry_dependency_unavailable",
            RegistryError::ModuleFailed { .. } => "registry_module_failed",
            RegistryError::RestartLimitExceeded { .. } => "registry_restart_limit_exceeded",
        }
    }
}

/// # Errors produced by the orchestrator itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Bulk shutdown exceeded its grace period; some modules were still live.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Modules that had not stopped in time.
        stuck: Vec<String>,
    },

    /// OS signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use modvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::Signal(_) => "runtime_signal",
        }
    }
}

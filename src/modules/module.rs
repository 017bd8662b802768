//! # Module lifecycle contract.
//!
//! This module defines the [`Module`] trait (async, cancelable initialization) and
//! the shared handle type [`ModuleRef`], an `Arc<dyn Module>` suitable for sharing
//! across the runtime.
//!
//! The runtime only cares how a module starts, reports health and stops; what it
//! does in between is opaque.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ModuleError;
use crate::modules::ModuleMetrics;

/// # Supervised subsystem.
///
/// A `Module` has a stable [`id`](Module::id) and three async hooks driven by the
/// runtime. Hooks must yield instead of blocking the thread: a blocking hook
/// starves every other module's health-check timer.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use modvisor::{Module, ModuleError};
///
/// struct Cache;
///
/// #[async_trait]
/// impl Module for Cache {
///     fn id(&self) -> &str { "cache" }
///
///     async fn initialize(&self, ctx: CancellationToken) -> Result<(), ModuleError> {
///         if ctx.is_cancelled() {
///             return Err(ModuleError::Canceled);
///         }
///         // warm up...
///         Ok(())
///     }
///
///     async fn shutdown(&self) -> Result<(), ModuleError> { Ok(()) }
///
///     async fn health_check(&self) -> Result<bool, ModuleError> { Ok(true) }
/// }
/// ```
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Returns the unique module id.
    fn id(&self) -> &str;

    /// Human-readable name (defaults to the id).
    fn name(&self) -> &str {
        self.id()
    }

    /// Module version string.
    fn version(&self) -> &str {
        "0.0.0"
    }

    /// Brings the module up. Called once per start.
    ///
    /// `ctx` is cancelled when a concurrent `stop()` targets the module; implementations
    /// should return [`ModuleError::Canceled`] promptly when that happens.
    async fn initialize(&self, ctx: CancellationToken) -> Result<(), ModuleError>;

    /// Releases everything the module acquired. Failures are logged, never retried.
    async fn shutdown(&self) -> Result<(), ModuleError>;

    /// Liveness probe. `Ok(false)` degrades the module, `Err` fails it.
    async fn health_check(&self) -> Result<bool, ModuleError>;

    /// Metrics surfaced to observers; not interpreted by the runtime.
    fn metrics(&self) -> ModuleMetrics {
        ModuleMetrics::default()
    }
}

/// Shared handle to a module.
pub type ModuleRef = Arc<dyn Module>;

/// Lifecycle hook identifier (used in errors and logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// [`Module::initialize`].
    Initialize,
    /// [`Module::shutdown`].
    Shutdown,
    /// [`Module::health_check`].
    HealthCheck,
}

impl Hook {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::Initialize => "initialize",
            Hook::Shutdown => "shutdown",
            Hook::HealthCheck => "health_check",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

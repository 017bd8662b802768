//! # Module specification for supervised execution.
//!
//! Defines [`ModuleSpec`] a configuration bundle that describes how a module is
//! supervised: what it depends on, how urgent it is, how often it is probed and
//! how many restarts it may consume.
//!
//! A spec can be created:
//! - **From built-in defaults** with [`ModuleSpec::new`]
//! - **From config** with [`ModuleSpec::with_defaults`] (inherit defaults)
//!
//! Everything in a spec is immutable once the module is registered.

use std::time::Duration;

use crate::core::Config;
use crate::modules::{ModuleRef, Priority};
use crate::policies::{BackoffPolicy, RestartPolicy};

/// Specification for running a module under supervision.
///
/// ## Example
/// ```rust
/// # use async_trait::async_trait;
/// # use tokio_util::sync::CancellationToken;
/// # use modvisor::{Module, ModuleError};
/// # struct Api;
/// # #[async_trait]
/// # impl Module for Api {
/// #     fn id(&self) -> &str { "api" }
/// #     async fn initialize(&self, _: CancellationToken) -> Result<(), ModuleError> { Ok(()) }
/// #     async fn shutdown(&self) -> Result<(), ModuleError> { Ok(()) }
/// #     async fn health_check(&self) -> Result<bool, ModuleError> { Ok(true) }
/// # }
/// use std::{sync::Arc, time::Duration};
/// use modvisor::{Config, ModuleSpec, Priority};
///
/// let cfg = Config::default();
/// let spec = ModuleSpec::with_defaults(Arc::new(Api), &cfg)
///     .with_dependencies(["db", "cache", "db"])
///     .with_priority(Priority::High)
///     .with_health_check_interval(Duration::from_secs(5));
///
/// assert_eq!(spec.id(), "api");
/// assert_eq!(spec.dependencies(), ["db", "cache"]);
/// assert_eq!(spec.max_restart_attempts(), cfg.max_restart_attempts);
/// ```
#[derive(Clone)]
pub struct ModuleSpec {
    module: ModuleRef,
    dependencies: Vec<String>,
    priority: Priority,
    max_restart_attempts: u32,
    health_check_interval: Duration,
    hook_timeout: Option<Duration>,
    restart: RestartPolicy,
    backoff: BackoffPolicy,
}

impl ModuleSpec {
    /// Creates a spec with the defaults of [`Config::default`].
    pub fn new(module: ModuleRef) -> Self {
        Self::with_defaults(module, &Config::default())
    }

    /// Creates a spec inheriting defaults from the given config.
    ///
    /// Uses `Config::default_hook_timeout()` so that `0s` in config is treated as `None`.
    pub fn with_defaults(module: ModuleRef, cfg: &Config) -> Self {
        Self {
            module,
            dependencies: Vec::new(),
            priority: Priority::default(),
            max_restart_attempts: cfg.max_restart_attempts,
            health_check_interval: cfg.health_check_interval,
            hook_timeout: cfg.default_hook_timeout(),
            restart: cfg.restart,
            backoff: cfg.backoff,
        }
    }

    /// Returns reference to the module.
    pub fn module(&self) -> &ModuleRef {
        &self.module
    }

    /// Convenience: returns the module id.
    pub fn id(&self) -> &str {
        self.module.id()
    }

    /// Declared dependencies, in declaration order, without duplicates.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the declared priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the restart ceiling.
    pub fn max_restart_attempts(&self) -> u32 {
        self.max_restart_attempts
    }

    /// Returns the health-check period.
    pub fn health_check_interval(&self) -> Duration {
        self.health_check_interval
    }

    /// Returns the per-hook timeout, if configured.
    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout
    }

    /// Returns the automatic restart policy.
    pub fn restart(&self) -> RestartPolicy {
        self.restart
    }

    /// Returns the backoff used between automatic restarts.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Returns a new spec with the given dependencies (duplicates are dropped).
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.clear();
        for dep in deps {
            let dep = dep.into();
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    /// Returns a new spec with updated priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Returns a new spec with updated restart ceiling.
    pub fn with_max_restart_attempts(mut self, max: u32) -> Self {
        self.max_restart_attempts = max;
        self
    }

    /// Returns a new spec with updated health-check period.
    pub fn with_health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    /// Returns a new spec with updated hook timeout (`None` = wait forever).
    pub fn with_hook_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.hook_timeout = timeout;
        self
    }

    /// Returns a new spec with updated restart policy.
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Returns a new spec with updated backoff.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}

impl std::fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("id", &self.id())
            .field("dependencies", &self.dependencies)
            .field("priority", &self.priority)
            .field("max_restart_attempts", &self.max_restart_attempts)
            .field("health_check_interval", &self.health_check_interval)
            .field("hook_timeout", &self.hook_timeout)
            .field("restart", &self.restart)
            .finish()
    }
}

//! # LifecycleManager: external facade over the registry.
//!
//! The [`LifecycleManager`] is the owning root of a modvisor runtime. It owns the
//! global [`Bus`], the [`Registry`] and a [`SubscriberSet`], and adds what an
//! application needs on top of per-module operations:
//! - **health summary** bucketing every module into healthy / degraded / critical
//! - **rebroadcast** of all bus traffic to external subscribers
//!   (stable `lifecycle.module.*` names via [`Topic::public_name`](crate::Topic::public_name))
//! - **bulk lifecycle**: `start_all`, `shutdown_all` (bounded by [`Config::grace`]),
//!   `run_until_signal`
//!
//! ## Architecture
//! ```text
//! LifecycleManager::builder(cfg).with_subscribers(subs).build()
//!
//!   install(spec) ─► Registry.register ─► ModuleActor (own bus)
//!                                          │ events
//!                                          ▼
//!                       Registry listener (re-tag by severity)
//!                                          ▼
//!                                     global Bus ──► in-process handlers
//!                                          │
//!                                          └─► forwarder ─► SubscriberSet ─► Subscribe workers
//!
//! Shutdown path:
//!   run_until_signal()
//!     └─► wait_for_shutdown_signal()
//!     └─► shutdown_all(): stop dependents first, within cfg.grace
//!            ├─ all stopped      → Ok(())
//!            └─ grace exceeded   → Err(GraceExceeded { stuck })
//!     └─► SubscriberSet::shutdown() (drain queues)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use modvisor::{Config, LifecycleManager, Module, ModuleError, ModuleSpec, ModuleStatus};
//!
//! struct Cache;
//!
//! #[async_trait]
//! impl Module for Cache {
//!     fn id(&self) -> &str { "cache" }
//!     async fn initialize(&self, _ctx: CancellationToken) -> Result<(), ModuleError> { Ok(()) }
//!     async fn shutdown(&self) -> Result<(), ModuleError> { Ok(()) }
//!     async fn health_check(&self) -> Result<bool, ModuleError> { Ok(true) }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let manager = LifecycleManager::builder(cfg.clone()).build();
//!
//!     manager.install(ModuleSpec::with_defaults(Arc::new(Cache), &cfg))?;
//!     assert_eq!(manager.start("cache").await?, ModuleStatus::Running);
//!
//!     manager.shutdown_all().await?;
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::time;
use tracing::{info, warn};

use crate::core::builder::LifecycleManagerBuilder;
use crate::core::{Config, Registry, RegistryMetrics, shutdown};
use crate::error::{RegistryError, RuntimeError};
use crate::events::{Bus, Subscription, TopicFilter};
use crate::modules::{JournalEntry, ModuleInfo, ModuleSpec, ModuleStatus, Priority};
use crate::subscribers::SubscriberSet;

/// Health bucket of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    /// Running, responding, no recent failures.
    Healthy,
    /// Degraded, or running with recent failures / not responding.
    Degraded,
    /// Any other status.
    Critical,
}

impl HealthStatus {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of one module at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSummary {
    /// Bucket.
    pub overall: HealthStatus,
    /// Human-readable explanation.
    pub details: String,
    /// Completion time of the last health check, if any ran.
    pub last_check: Option<SystemTime>,
}

impl HealthSummary {
    fn of(info: &ModuleInfo) -> Self {
        let h = &info.health;
        let (overall, details) = match info.status {
            ModuleStatus::Running if h.is_responding && h.consecutive_failures == 0 => {
                (HealthStatus::Healthy, "running".to_string())
            }
            ModuleStatus::Running if !h.is_responding => (
                HealthStatus::Degraded,
                "running but not responding".to_string(),
            ),
            ModuleStatus::Running => (
                HealthStatus::Degraded,
                format!("running with {} recent failed checks", h.consecutive_failures),
            ),
            ModuleStatus::Degraded => (
                HealthStatus::Degraded,
                format!(
                    "degraded after {} consecutive failed checks",
                    h.consecutive_failures
                ),
            ),
            ModuleStatus::Failed => (
                HealthStatus::Critical,
                format!(
                    "failed ({} errors, {}/{} restarts used)",
                    h.error_count, h.restart_count, info.max_restart_attempts
                ),
            ),
            other => (HealthStatus::Critical, format!("module is {other}")),
        };
        Self {
            overall,
            details,
            last_check: h.last_check,
        }
    }
}

/// Owning root of a modvisor runtime.
pub struct LifecycleManager {
    cfg: Config,
    bus: Bus,
    registry: Arc<Registry>,
    subs: Arc<SubscriberSet>,
    _forwarder: Subscription,
}

impl LifecycleManager {
    /// Starts building a manager with the given configuration.
    pub fn builder(cfg: Config) -> LifecycleManagerBuilder {
        LifecycleManagerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, subs: Arc<SubscriberSet>) -> Self {
        let registry = Arc::new(Registry::new(&cfg, bus.clone()));
        let set = Arc::clone(&subs);
        let forwarder = bus.subscribe(
            "lifecycle-manager",
            TopicFilter::Any,
            Priority::Low,
            move |ev| set.emit(ev),
        );
        Self {
            cfg,
            bus,
            registry,
            subs,
            _forwarder: forwarder,
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Global event bus (in-process, synchronous).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Underlying registry, for the full query surface.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a module. See [`Registry::register`].
    pub fn install(&self, spec: ModuleSpec) -> Result<(), RegistryError> {
        self.registry.register(spec)
    }

    /// Unregisters a module. See [`Registry::unregister`].
    pub async fn uninstall(&self, id: &str, force: bool) -> Result<(), RegistryError> {
        self.registry.unregister(id, force).await
    }

    /// See [`Registry::start`].
    pub async fn start(&self, id: &str) -> Result<ModuleStatus, RegistryError> {
        self.registry.start(id).await
    }

    /// See [`Registry::stop`].
    pub async fn stop(&self, id: &str, force: bool) -> Result<ModuleStatus, RegistryError> {
        self.registry.stop(id, force).await
    }

    /// See [`Registry::restart`].
    pub async fn restart(&self, id: &str) -> Result<ModuleStatus, RegistryError> {
        self.registry.restart(id).await
    }

    pub fn module(&self, id: &str) -> Option<ModuleInfo> {
        self.registry.module(id)
    }

    pub fn modules(&self) -> Vec<ModuleInfo> {
        self.registry.modules()
    }

    pub fn metrics(&self) -> RegistryMetrics {
        self.registry.metrics()
    }

    pub fn dependencies(&self, id: &str) -> Vec<String> {
        self.registry.dependencies(id)
    }

    pub fn dependents(&self, id: &str) -> Vec<String> {
        self.registry.dependents(id)
    }

    pub fn journal(&self, id: &str) -> Option<Vec<JournalEntry>> {
        self.registry.journal(id)
    }

    /// Buckets every module by health. Recomputed on each call.
    pub fn check_health(&self) -> BTreeMap<String, HealthSummary> {
        self.registry
            .modules()
            .into_iter()
            .map(|m| {
                let summary = HealthSummary::of(&m);
                (m.id, summary)
            })
            .collect()
    }

    /// Starts every module, dependencies first and more urgent modules earlier.
    ///
    /// Keeps going after individual failures; the outcome of each module is
    /// reported in start order.
    pub async fn start_all(&self) -> Vec<(String, Result<ModuleStatus, RegistryError>)> {
        let order = self.registry.start_order();
        info!(modules = order.len(), "starting all modules");

        let mut out = Vec::with_capacity(order.len());
        for id in order {
            let res = self.registry.start(&id).await;
            if let Err(e) = &res {
                warn!(module = %id, error = %e, "module not started");
            }
            out.push((id, res));
        }
        out
    }

    /// Stops every module, dependents first, within [`Config::grace`].
    ///
    /// # Errors
    /// [`RuntimeError::GraceExceeded`] listing modules still live when the grace
    /// period ran out.
    pub async fn shutdown_all(&self) -> Result<(), RuntimeError> {
        let order = self.registry.stop_order();
        info!(modules = order.len(), grace = ?self.cfg.grace, "stopping all modules");

        let stop_all = async {
            for id in &order {
                if let Err(e) = self.registry.stop(id, true).await {
                    warn!(module = %id, error = %e, "module not stopped");
                }
            }
        };

        if time::timeout(self.cfg.grace, stop_all).await.is_ok() {
            info!("all modules stopped within grace");
            return Ok(());
        }

        let stuck: Vec<String> = self
            .registry
            .modules()
            .into_iter()
            .filter(|m| m.status.is_live())
            .map(|m| m.id)
            .collect();
        warn!(?stuck, grace = ?self.cfg.grace, "grace exceeded");
        Err(RuntimeError::GraceExceeded {
            grace: self.cfg.grace,
            stuck,
        })
    }

    /// Waits for a termination signal, then stops everything and drains the
    /// subscriber queues.
    pub async fn run_until_signal(&self) -> Result<(), RuntimeError> {
        shutdown::wait_for_shutdown_signal().await?;
        info!("shutdown signal received");
        let res = self.shutdown_all().await;
        self.subs.shutdown().await;
        res
    }

    /// Closes the subscriber queues and waits until they are drained.
    pub async fn close_subscribers(&self) {
        self.subs.shutdown().await;
    }
}

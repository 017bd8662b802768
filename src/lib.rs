//! # modvisor
//!
//! **Modvisor** supervises the long-lived subsystems ("modules") of an async Rust
//! process: it starts them in dependency order, probes their health on a timer,
//! restarts them within a bounded budget and stops them without pulling a module
//! out from under the modules that depend on it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  ModuleSpec  │   │  ModuleSpec  │   │  ModuleSpec  │
//!     │    (db)      │   │   (cache)    │   │ (api → db,   │
//!     │              │   │              │   │      cache)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  LifecycleManager (owning root)                                   │
//! │  - Registry (module table, dependency graph, cycle check)         │
//! │  - Bus (synchronous, priority-tagged publish/subscribe)           │
//! │  - SubscriberSet (fans out to external subscribers)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ModuleActor  │   │ ModuleActor  │   │ ModuleActor  │
//!     │ state machine│   │ state machine│   │ state machine│
//!     │ health timer │   │ health timer │   │ health timer │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ module bus       │ module bus       │ module bus
//!      ▼                  ▼                  ▼
//!   registry listeners (scoped, re-tag by severity)
//!      │
//!      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (global)                               │
//! └───────────────┬───────────────────────────────────┬───────────────┘
//!                 ▼                                   ▼
//!        in-process handlers                manager forwarder
//!        (Bus::subscribe)                          ▼
//!                                           SubscriberSet
//!                                   ┌─────────┼─────────┐
//!                                   ▼         ▼         ▼
//!                                worker1   worker2   workerN
//! ```
//!
//! ### Module lifecycle
//! ```text
//! uninitialized ──start──► initializing ──ok──► running ◄──check ok── degraded
//!                               │                  │ ──check false──►   │
//!                               │ err              │ check err          │
//!                               ▼                  ▼                    │
//!                             failed ◄─────────────┴────────────────────┘
//!                               │ restart (restart_count < max)
//!                               ▼
//!   running/degraded ──stop──► stopped ──start/restart──► initializing
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                              |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------------|
//! | **Modules**       | Lifecycle contract and declared supervision parameters.      | [`Module`], [`ModuleSpec`]                      |
//! | **Orchestration** | Dependency-ordered start, guarded stop, health summary.      | [`LifecycleManager`], [`Registry`]              |
//! | **Events**        | Typed lifecycle events on a synchronous bus.                 | [`Bus`], [`Event`], [`EventKind`], [`Topic`]    |
//! | **Subscribers**   | Out-of-band observers with bounded queues.                   | [`Subscribe`], [`SubscriberSet`]                |
//! | **Policies**      | Automatic restarts with backoff and jitter.                  | [`RestartPolicy`], [`BackoffPolicy`]            |
//! | **Errors**        | Typed errors for hooks, registry operations and shutdown.    | [`ModuleError`], [`RegistryError`], [`RuntimeError`] |
//! | **Configuration** | Defaults for every module spec and the runtime.              | [`Config`]                                      |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber rendering events via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use modvisor::{Config, LifecycleManager, Module, ModuleError, ModuleSpec, ModuleStatus, Priority};
//!
//! struct Named(&'static str);
//!
//! #[async_trait]
//! impl Module for Named {
//!     fn id(&self) -> &str { self.0 }
//!     async fn initialize(&self, _ctx: CancellationToken) -> Result<(), ModuleError> { Ok(()) }
//!     async fn shutdown(&self) -> Result<(), ModuleError> { Ok(()) }
//!     async fn health_check(&self) -> Result<bool, ModuleError> { Ok(true) }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn modvisor::Subscribe>> = vec![Arc::new(modvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn modvisor::Subscribe>> = Vec::new();
//!
//!     let manager = LifecycleManager::builder(cfg.clone())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     manager.install(ModuleSpec::with_defaults(Arc::new(Named("db")), &cfg).with_priority(Priority::Critical))?;
//!     manager.install(ModuleSpec::with_defaults(Arc::new(Named("api")), &cfg).with_dependencies(["db"]))?;
//!
//!     // Starting `api` brings `db` up first.
//!     assert_eq!(manager.start("api").await?, ModuleStatus::Running);
//!     assert_eq!(manager.dependents("db"), vec!["api".to_string()]);
//!
//!     manager.shutdown_all().await?;
//!     manager.close_subscribers().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod modules;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    Config, HealthStatus, HealthSummary, LifecycleManager, LifecycleManagerBuilder, Registry,
    RegistryMetrics,
};
pub use error::{ModuleError, RegistryError, RuntimeError};
pub use events::{Bus, Event, EventKind, Handler, Subscription, Topic, TopicFilter};
pub use modules::{
    HealthRecord, Hook, JournalEntry, Module, ModuleInfo, ModuleMetrics, ModuleRef, ModuleSpec,
    ModuleStatus, Priority,
};
pub use policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in tracing subscriber.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

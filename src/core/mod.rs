//! Runtime core: module supervision and orchestration.
//!
//! The public surface of this module is [`LifecycleManager`] (owning root),
//! [`Registry`] (module table + dependency graph) and [`Config`].
//!
//! Internal modules:
//! - [`runner`]: runs one hook invocation with timeout, cancellation and panic capture;
//! - [`actor`]: state machine of a single module (health timer, restarts, journal);
//! - [`registry`]: registration, dependency-ordered start, guarded stop/unregister;
//! - [`manager`]: health summary, subscriber fan-out, bulk start/shutdown;
//! - [`shutdown`]: cross-platform termination signals.

mod actor;
mod builder;
mod config;
mod manager;
mod registry;
mod runner;
mod shutdown;

pub use builder::LifecycleManagerBuilder;
pub use config::Config;
pub use manager::{HealthStatus, HealthSummary, LifecycleManager};
pub use registry::{Registry, RegistryMetrics};

//! # Module abstractions and specifications.
//!
//! This module provides the module-related types:
//! - [`Module`] - the lifecycle contract a supervised subsystem implements
//! - [`ModuleRef`] - shared reference to a module (`Arc<dyn Module>`)
//! - [`ModuleSpec`] - module bundled with its declared dependencies and policies
//! - [`ModuleStatus`], [`Priority`], [`HealthRecord`] - state observed by the runtime
//! - [`ModuleMetrics`] - fixed-schema metrics a module reports

mod metrics;
mod module;
mod spec;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use metrics::ModuleMetrics;
pub use module::{Hook, Module, ModuleRef};
pub use spec::ModuleSpec;
pub use state::{HealthRecord, JournalEntry, ModuleInfo, ModuleStatus, Priority};

//! # External event subscribers.
//!
//! The global [`Bus`](crate::Bus) is synchronous and meant for in-process wiring.
//! Observers that do I/O plug in here instead: the lifecycle manager forwards every
//! bus event to a [`SubscriberSet`], which feeds each [`Subscribe`] implementation
//! through its own bounded queue and worker task.
//!
//! ```text
//! ModuleActor ─► Registry ─► Bus ─► LifecycleManager forwarder ─► SubscriberSet::emit
//!                                                                  ├─► [queue] ─► LogWriter
//!                                                                  └─► [queue] ─► custom
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

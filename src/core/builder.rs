//! # Builder for [`LifecycleManager`].
//!
//! ```text
//! LifecycleManager::builder(cfg)
//!     .with_subscribers(vec![...])   // optional
//!     .build()                        → Arc<LifecycleManager>
//! ```

use std::sync::Arc;

use crate::core::{Config, LifecycleManager};
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`LifecycleManager`] with optional features.
pub struct LifecycleManagerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl LifecycleManagerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets external subscribers.
    ///
    /// Each subscriber receives every lifecycle event through a dedicated worker
    /// with a bounded queue. Spawning the workers requires a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the manager: global bus, registry, subscriber workers and the
    /// bus → subscribers forwarder.
    pub fn build(self) -> Arc<LifecycleManager> {
        let bus = Bus::new();
        let subs = Arc::new(SubscriberSet::new(self.subscribers));
        Arc::new(LifecycleManager::new_internal(self.cfg, bus, subs))
    }
}

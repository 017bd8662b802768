//! # External subscriber trait
//!
//! `Subscribe` is the extension point for observers that live outside the runtime
//! (audit logs, alerting, metrics exporters). Each subscriber is driven by its own
//! worker task fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they never block module transitions or other
//!   subscribers.
//! - On queue overflow, events for that subscriber are **dropped** (warn).
//! - Use `event.topic().public_name()` for the stable `lifecycle.module.*` name.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use modvisor::{Event, EventKind, Subscribe};
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl Subscribe for Pager {
//!     async fn on_event(&self, ev: &Event) {
//!         if let EventKind::ModuleFailed { error, .. } = &ev.kind {
//!             let _ = (ev.topic().public_name(), &ev.source, error);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "pager" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for external event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle one event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

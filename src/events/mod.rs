//! Lifecycle events: types and synchronous bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by modules and the registry.
//!
//! ## Contents
//! - [`EventKind`], [`Topic`], [`Event`] event classification, payloads and envelope
//! - [`Bus`], [`Subscription`], [`TopicFilter`] synchronous publish/subscribe
//!
//! ## Quick reference
//! - **Publishers**: each module actor (on its own local bus), the `Registry`
//!   (structural events and republished module events).
//! - **Consumers**: the `Registry` (per-module listeners), the `LifecycleManager`
//!   (forwards to external subscribers), any user handler.

mod bus;
mod event;

pub(crate) use bus::panic_message;
pub use bus::{Bus, Handler, Subscription, TopicFilter};
pub use event::{Event, EventKind, Topic};

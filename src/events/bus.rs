//! # Event bus for lifecycle events.
//!
//! [`Bus`] is a synchronous publish/subscribe channel: `publish()` calls every
//! matching handler, in subscription order, before it returns.
//!
//! ## Architecture
//! ```text
//! Publishers:                         Subscribers (in subscription order):
//!   ModuleActor ──┐
//!   Registry    ──┼──► Bus::publish(&Event) ──► handler #1 (filter: Any)
//!                 │                         ──► handler #2 (filter: Only(ModuleFailed))
//!                 │                         ──► ...
//! ```
//!
//! ## Rules
//! - **Synchronous**: handlers run on the publisher's task, so they must be quick.
//!   Slow consumers belong behind a [`SubscriberSet`](crate::SubscriberSet).
//! - **Isolated**: a panicking handler is caught and logged; remaining handlers
//!   still receive the event.
//! - **Scoped**: [`Bus::subscribe`] returns a [`Subscription`]; dropping it removes
//!   the handler.
//! - **No persistence**: a handler registered after a publish never sees that event.
//! - **Re-entrant**: handlers may publish, subscribe or unsubscribe; the handler
//!   list is snapshotted before dispatch.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::{trace, warn};

use super::event::{Event, Topic};
use crate::modules::Priority;

/// Handler invoked for every matching event.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Which events a subscription receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicFilter {
    /// Every event (wildcard).
    Any,
    /// Only events of this exact topic.
    Only(Topic),
}

impl TopicFilter {
    /// Whether events of `topic` pass this filter.
    #[inline]
    pub fn matches(&self, topic: Topic) -> bool {
        match self {
            TopicFilter::Any => true,
            TopicFilter::Only(t) => *t == topic,
        }
    }
}

impl From<Topic> for TopicFilter {
    fn from(topic: Topic) -> Self {
        TopicFilter::Only(topic)
    }
}

/// Registered handler with its metadata.
struct Entry {
    key: u64,
    subscriber: Arc<str>,
    filter: TopicFilter,
    priority: Priority,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    next_key: AtomicU64,
    entries: RwLock<Vec<Arc<Entry>>>,
}

impl Inner {
    fn remove(&self, key: u64) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| e.key != key);
        entries.len() != before
    }
}

/// Synchronous, priority-tagged publish/subscribe channel.
///
/// Cheap to clone (internally holds an `Arc`).
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
/// use modvisor::{Bus, Event, EventKind, Priority, Topic, TopicFilter};
///
/// let bus = Bus::new();
/// let failures = Arc::new(AtomicUsize::new(0));
///
/// let seen = failures.clone();
/// let sub = bus.subscribe("alerts", TopicFilter::Only(Topic::ModuleFailed), Priority::High, move |_| {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// bus.publish(&Event::new("db", EventKind::ModuleFailed { error: "boom".into(), error_count: 1 }));
/// bus.publish(&Event::new("db", EventKind::ModuleStarted));
/// assert_eq!(failures.load(Ordering::SeqCst), 1);
///
/// drop(sub);
/// assert_eq!(bus.subscriber_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events passing `filter`.
    ///
    /// - `subscriber`: identifies the subscriber in logs and [`Bus::subscribers`]
    /// - `priority`: urgency of the subscriber (informational; dispatch follows
    ///   subscription order)
    ///
    /// The handler stays registered as long as the returned [`Subscription`] lives.
    pub fn subscribe<F>(
        &self,
        subscriber: impl Into<Arc<str>>,
        filter: impl Into<TopicFilter>,
        priority: Priority,
        handler: F,
    ) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let key = self.inner.next_key.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(Entry {
            key,
            subscriber: subscriber.into(),
            filter: filter.into(),
            priority,
            handler: Arc::new(handler),
        });
        trace!(subscriber = %entry.subscriber, filter = ?entry.filter, "bus subscription added");
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);

        Subscription {
            key,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `ev` to every matching handler, in subscription order.
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn publish(&self, ev: &Event) -> usize {
        let topic = ev.topic();
        let targets: Vec<Arc<Entry>> = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.filter.matches(topic))
            .cloned()
            .collect();

        let mut delivered = 0;
        for entry in targets {
            match catch_unwind(AssertUnwindSafe(|| (entry.handler)(ev))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    warn!(
                        subscriber = %entry.subscriber,
                        topic = %topic,
                        source = %ev.source,
                        "event handler panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `(subscriber, filter, priority)` of every live subscription, in dispatch order.
    pub fn subscribers(&self) -> Vec<(Arc<str>, TopicFilter, Priority)> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| (e.subscriber.clone(), e.filter, e.priority))
            .collect()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Scoped handle to a bus subscription.
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the handler.
/// It holds only a weak reference to the bus, so it never keeps the bus alive.
#[must_use = "dropping a Subscription immediately unsubscribes its handler"]
pub struct Subscription {
    key: u64,
    bus: Weak<Inner>,
}

impl Subscription {
    /// Removes the handler now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.bus.upgrade().is_some_and(|inner| {
            inner
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .any(|e| e.key == self.key)
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.remove(self.key);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::Mutex;

    fn failed(source: &str) -> Event {
        Event::new(
            source,
            EventKind::ModuleFailed {
                error: "boom".into(),
                error_count: 1,
            },
        )
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus = Bus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<Subscription> = ["first", "second", "third"]
            .into_iter()
            .map(|name| {
                let order = order.clone();
                bus.subscribe(name, TopicFilter::Any, Priority::Low, move |_| {
                    order.lock().unwrap().push(name);
                })
            })
            .collect();

        assert_eq!(bus.publish(&failed("a")), 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
        drop(subs);
    }

    #[test]
    fn exact_topic_and_wildcard_filters() {
        let bus = Bus::new();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let h1 = hits.clone();
        let _only = bus.subscribe("only-failed", Topic::ModuleFailed, Priority::High, move |ev| {
            h1.lock().unwrap().push(format!("only:{}", ev.topic()));
        });
        let h2 = hits.clone();
        let _any = bus.subscribe("any", TopicFilter::Any, Priority::Low, move |ev| {
            h2.lock().unwrap().push(format!("any:{}", ev.topic()));
        });

        bus.publish(&Event::new("a", EventKind::ModuleStarted));
        bus.publish(&failed("a"));

        assert_eq!(
            *hits.lock().unwrap(),
            vec![
                "any:module:started",
                "only:module:failed",
                "any:module:failed"
            ]
        );
    }

    #[test]
    fn panicking_handler_does_not_block_others() {
        let bus = Bus::new();
        let reached = Arc::new(Mutex::new(false));

        let _bad = bus.subscribe("bad", TopicFilter::Any, Priority::Low, |_| {
            panic!("handler exploded");
        });
        let r = reached.clone();
        let _good = bus.subscribe("good", TopicFilter::Any, Priority::Low, move |_| {
            *r.lock().unwrap() = true;
        });

        assert_eq!(bus.publish(&failed("a")), 1);
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = Bus::new();
        let sub = bus.subscribe("tmp", TopicFilter::Any, Priority::Low, |_| {});
        assert!(sub.is_active());
        assert_eq!(bus.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&failed("a")), 0);
    }

    #[test]
    fn late_subscriber_sees_no_replay() {
        let bus = Bus::new();
        bus.publish(&failed("a"));

        let seen = Arc::new(Mutex::new(0));
        let s = seen.clone();
        let _sub = bus.subscribe("late", TopicFilter::Any, Priority::Low, move |_| {
            *s.lock().unwrap() += 1;
        });
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn handler_may_unsubscribe_others_during_dispatch() {
        let bus = Bus::new();
        let victim = Arc::new(Mutex::new(None::<Subscription>));

        let v = victim.clone();
        let _killer = bus.subscribe("killer", TopicFilter::Any, Priority::Low, move |_| {
            v.lock().unwrap().take();
        });
        *victim.lock().unwrap() = Some(bus.subscribe("victim", TopicFilter::Any, Priority::Low, |_| {}));

        bus.publish(&failed("a"));
        assert_eq!(bus.subscriber_count(), 1);
    }
}

//! # SubscriberSet: non-blocking fan-out to external subscribers
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber **without awaiting**
//! their processing. The lifecycle manager feeds it from the global bus.
//!
//! ## Guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - A panicking subscriber is logged and keeps receiving later events.
//!
//! ## Non-guarantees
//! - No ordering across different subscribers.
//! - No retries on queue overflow.
//!
//! ```text
//!    emit(&Event)
//!        ├──► [queue S1] ─► worker S1 ─► on_event()
//!        ├──► [queue S2] ─► worker S2 ─► on_event()
//!        └──► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::events::{Event, panic_message};

use super::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Mutex<Vec<SubscriberChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

            workers.push(tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(payload) = AssertUnwindSafe(fut).catch_unwind().await {
                        warn!(
                            subscriber = name,
                            topic = %ev.topic(),
                            "subscriber panicked: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }
            }));
            channels.push(SubscriberChannel { name, sender: tx });
        }

        Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// Queues `event` for every subscriber.
    ///
    /// A full or closed queue drops the event for that subscriber only.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        for channel in channels.iter() {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = channel.name, seq = ev.seq, "event dropped: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = channel.name, seq = ev.seq, "event dropped: worker closed");
                }
            }
        }
    }

    /// Closes every queue and waits until the workers drained them.
    ///
    /// Events emitted afterwards are discarded.
    pub async fn shutdown(&self) {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        let workers: Vec<_> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for h in workers {
            let _ = h.await;
        }
    }

    /// True if there are no (open) subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of open subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

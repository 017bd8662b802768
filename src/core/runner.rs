//! # Run a single lifecycle hook invocation.
//!
//! Executes one call of a module hook with an optional timeout and an optional
//! cancellation token, converting every way it can go wrong into a [`ModuleError`].
//!
//! ## Outcomes
//! ```text
//! hook future ──► Ok(v)                      → Ok(v)
//!             ──► Err(e)                     → Err(e)
//!             ──► panic                      → Err(Panicked { hook, info })
//!             ──► timeout exceeded           → Err(Timeout { hook, timeout })
//!             ──► cancellation token fired   → Err(Canceled)   (future dropped)
//! ```
//!
//! ## Rules
//! - Cancellation wins over completion when both are ready (`biased`).
//! - `timeout = Some(0s)` is treated as no timeout.
//! - The hook future is dropped on timeout or cancellation; modules that need
//!   cleanup get it through `shutdown`.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::ModuleError;
use crate::events::panic_message;
use crate::modules::Hook;

/// Awaits `fut` as an invocation of `hook`, bounded by `timeout` and `cancel`.
pub(crate) async fn run_hook<T, F>(
    hook: Hook,
    timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<T, ModuleError>
where
    F: Future<Output = Result<T, ModuleError>>,
{
    let guarded = async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(res) => res,
            Err(payload) => Err(ModuleError::Panicked {
                hook,
                info: panic_message(payload.as_ref()),
            }),
        }
    };

    let bounded = async move {
        match timeout.filter(|d| *d > Duration::ZERO) {
            Some(dur) => time::timeout(dur, guarded)
                .await
                .unwrap_or_else(|_elapsed| Err(ModuleError::Timeout { hook, timeout: dur })),
            None => guarded.await,
        }
    };

    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ModuleError::Canceled),
                res = bounded => res,
            }
        }
        None => bounded.await,
    }
}

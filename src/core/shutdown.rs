//! # Termination signals for [`run_until_signal`](crate::LifecycleManager::run_until_signal).
//!
//! - **Unix**: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - **Other platforms**: Ctrl-C via [`tokio::signal::ctrl_c`]

/// Completes on the first termination signal.
///
/// Fails if a signal handler cannot be installed.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let received = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    tracing::debug!(signal = received, "termination signal");
    Ok(())
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::debug!(signal = "ctrl-c", "termination signal");
    Ok(())
}

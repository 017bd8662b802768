//! # Demo: service_stack
//!
//! Three modules with dependencies, a flaky health probe and an automatic restart.
//!
//! Shows how to:
//! - Implement the [`Module`] trait.
//! - Declare dependencies, priority and restart policy on a [`ModuleSpec`].
//! - Attach the built-in [`LogWriter`] and route `tracing` output with `RUST_LOG`.
//! - Stop everything on Ctrl-C via [`LifecycleManager::run_until_signal`].
//!
//! ## Flow
//! ```text
//! start_all()
//!   ├─► db      (critical)
//!   ├─► cache   (low; reports unhealthy on its 2nd probe, recovers on the 3rd)
//!   └─► api     (depends on db + cache; first initialize fails, restarted after backoff)
//! Ctrl-C ─► shutdown_all(): api, cache, db
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example service_stack --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use modvisor::{
    BackoffPolicy, Config, JitterPolicy, LifecycleManager, LogWriter, Module, ModuleError,
    ModuleSpec, Priority, RestartPolicy, Subscribe,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

struct Database;

#[async_trait]
impl Module for Database {
    fn id(&self) -> &str {
        "db"
    }

    fn version(&self) -> &str {
        "15.4"
    }

    async fn initialize(&self, ctx: CancellationToken) -> Result<(), ModuleError> {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(300)) => Ok(()),
            _ = ctx.cancelled() => Err(ModuleError::Canceled),
        }
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ModuleError> {
        Ok(true)
    }
}

#[derive(Default)]
struct Cache {
    probes: AtomicU32,
}

#[async_trait]
impl Module for Cache {
    fn id(&self) -> &str {
        "cache"
    }

    async fn initialize(&self, _ctx: CancellationToken) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ModuleError> {
        let n = self.probes.fetch_add(1, Ordering::Relaxed);
        Ok(n != 1)
    }
}

#[derive(Default)]
struct Api {
    attempts: AtomicU32,
}

#[async_trait]
impl Module for Api {
    fn id(&self) -> &str {
        "api"
    }

    async fn initialize(&self, _ctx: CancellationToken) -> Result<(), ModuleError> {
        if self.attempts.fetch_add(1, Ordering::Relaxed) == 0 {
            return Err(ModuleError::initialization("port 8080 still bound"));
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ModuleError> {
        Ok(true)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config {
        health_check_interval: Duration::from_secs(2),
        grace: Duration::from_secs(5),
        ..Config::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let manager = LifecycleManager::builder(cfg.clone())
        .with_subscribers(subs)
        .build();

    manager.install(ModuleSpec::with_defaults(Arc::new(Database), &cfg).with_priority(Priority::Critical))?;
    manager.install(ModuleSpec::with_defaults(Arc::new(Cache::default()), &cfg).with_priority(Priority::Low))?;
    manager.install(
        ModuleSpec::with_defaults(Arc::new(Api::default()), &cfg)
            .with_dependencies(["db", "cache"])
            .with_priority(Priority::High)
            .with_restart(RestartPolicy::OnFailure)
            .with_backoff(BackoffPolicy {
                first: Duration::from_millis(500),
                max: Duration::from_secs(5),
                factor: 2.0,
                jitter: JitterPolicy::Equal,
            }),
    )?;

    for (id, res) in manager.start_all().await {
        tracing::info!(module = %id, outcome = ?res, "start");
    }

    manager.run_until_signal().await?;

    for (id, summary) in manager.check_health() {
        println!("{id}: {} ({})", summary.overall, summary.details);
    }
    Ok(())
}

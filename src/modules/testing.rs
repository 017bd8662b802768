//! Scriptable module used by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ModuleError;
use crate::modules::{Module, ModuleMetrics, ModuleSpec};

pub(crate) type Trace = Arc<Mutex<Vec<String>>>;

pub(crate) struct ProbeModule {
    id: String,
    init_script: Mutex<VecDeque<Result<(), ModuleError>>>,
    health_script: Mutex<VecDeque<Result<bool, ModuleError>>>,
    init_delay: Duration,
    shutdown_delay: Duration,
    pub(crate) initialized: AtomicU32,
    pub(crate) shutdowns: AtomicU32,
    pub(crate) checks: AtomicU32,
    trace: Trace,
}

impl ProbeModule {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            init_script: Mutex::new(VecDeque::new()),
            health_script: Mutex::new(VecDeque::new()),
            init_delay: Duration::ZERO,
            shutdown_delay: Duration::ZERO,
            initialized: AtomicU32::new(0),
            shutdowns: AtomicU32::new(0),
            checks: AtomicU32::new(0),
            trace: Arc::default(),
        }
    }

    pub(crate) fn with_trace(mut self, trace: &Trace) -> Self {
        self.trace = Arc::clone(trace);
        self
    }

    /// Results returned by successive `initialize` calls; `Ok` once exhausted.
    pub(crate) fn with_init(self, results: impl IntoIterator<Item = Result<(), ModuleError>>) -> Self {
        self.init_script.lock().unwrap().extend(results);
        self
    }

    /// Results returned by successive health checks; `Ok(true)` once exhausted.
    pub(crate) fn with_health(self, results: impl IntoIterator<Item = Result<bool, ModuleError>>) -> Self {
        self.health_script.lock().unwrap().extend(results);
        self
    }

    pub(crate) fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub(crate) fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = delay;
        self
    }

    pub(crate) fn initialized(&self) -> u32 {
        self.initialized.load(Ordering::SeqCst)
    }

    pub(crate) fn shutdowns(&self) -> u32 {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Module for ProbeModule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn initialize(&self, ctx: CancellationToken) -> Result<(), ModuleError> {
        if !self.init_delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.init_delay) => {}
                _ = ctx.cancelled() => return Err(ModuleError::Canceled),
            }
        }
        let res = self.init_script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if res.is_ok() {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            self.trace.lock().unwrap().push(format!("init:{}", self.id));
        }
        res
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        if !self.shutdown_delay.is_zero() {
            tokio::time::sleep(self.shutdown_delay).await;
        }
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.trace.lock().unwrap().push(format!("shutdown:{}", self.id));
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ModuleError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.health_script.lock().unwrap().pop_front().unwrap_or(Ok(true))
    }

    fn metrics(&self) -> ModuleMetrics {
        ModuleMetrics {
            operations_total: u64::from(self.checks.load(Ordering::SeqCst)),
            ..ModuleMetrics::default()
        }
    }
}

pub(crate) fn spec(module: &Arc<ProbeModule>) -> ModuleSpec {
    ModuleSpec::new(module.clone()).with_health_check_interval(Duration::from_secs(10))
}

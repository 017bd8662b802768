//! # ModuleActor: single-module state machine.
//!
//! Supervises one [`Module`](crate::Module) through its lifecycle:
//! - drives `initialize` / `shutdown` with an optional hook timeout,
//! - runs the recurring health check as a cancellable scheduled task,
//! - counts restarts against the module's ceiling,
//! - optionally schedules automatic restarts per [`RestartPolicy`](crate::RestartPolicy),
//! - records every status transition in a bounded journal,
//! - publishes lifecycle events on its **own** [`Bus`] (the registry listens there).
//!
//! ## Event flow
//! ```text
//! start():   ModuleStarting → [initialize] → ModuleStarted            (Running)
//!                                         → ModuleFailed             (Failed)
//!                                         → ModuleStopped            (cancelled by stop)
//! tick:      [health_check] → false  → ModuleDegraded                (Running → Degraded)
//!                           → true   → ModuleRecovered               (Degraded → Running)
//!                           → Err    → ModuleFailed                  (→ Failed)
//! stop():    [cancel timer] → [shutdown] → ModuleStopped             (Stopped)
//! restart(): ModuleRestarting → stop() → start()
//!            [shutdown] → RestartLimitExceeded (+ ModuleFailed)      (ceiling reached)
//! ```
//!
//! ## Rules
//! - `start`/`stop`/`restart` are serialized by a per-module transition lock.
//! - `stop` cancels an in-flight `initialize` **before** waiting for that lock.
//! - The health-check timer exists iff the status is `Running` or `Degraded`.
//! - At most one health check is in flight per module.
//! - Events are published after the state lock is released, so handlers may query
//!   the actor.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::runner::run_hook;
use crate::error::{ModuleError, RegistryError};
use crate::events::{Bus, Event, EventKind};
use crate::modules::{HealthRecord, Hook, JournalEntry, ModuleInfo, ModuleSpec, ModuleStatus};

/// Lower bound for the health-check period (a zero period is not schedulable).
const MIN_HEALTH_INTERVAL: Duration = Duration::from_millis(1);

/// Checks that a module's dependencies are active before an automatic restart.
///
/// Called with the module id and its declared dependencies; installed by the
/// registry, which owns the dependency graph.
pub(crate) type DependencyGate =
    Arc<dyn Fn(&str, &[String]) -> Result<(), RegistryError> + Send + Sync>;

/// Cancellable background task owned by an actor.
///
/// Dropping it cancels the task's token, so replacing or clearing the slot that
/// holds it can never leave a stale timer running.
struct Scheduled {
    token: CancellationToken,
    _join: JoinHandle<()>,
}

impl Scheduled {
    fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let join = tokio::spawn(f(token.clone()));
        Self { token, _join: join }
    }

    fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for Scheduled {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Resets the in-flight flag when a health check finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Mutable part of the actor, guarded by a sync mutex never held across `.await`.
struct ActorState {
    status: ModuleStatus,
    health: HealthRecord,
    journal: VecDeque<JournalEntry>,
    ticker: Option<Scheduled>,
    pending_restart: Option<Scheduled>,
    init_token: Option<CancellationToken>,
}

/// Supervises a single module.
pub(crate) struct ModuleActor {
    id: Arc<str>,
    spec: ModuleSpec,
    events: Bus,
    state: Mutex<ActorState>,
    transition: tokio::sync::Mutex<()>,
    check_in_flight: AtomicBool,
    journal_capacity: usize,
    dependency_gate: Option<DependencyGate>,
}

impl ModuleActor {
    /// Creates an `Uninitialized` actor.
    ///
    /// Without a `dependency_gate`, automatic restarts do not look at dependencies.
    pub(crate) fn new(
        spec: ModuleSpec,
        journal_capacity: usize,
        dependency_gate: Option<DependencyGate>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: Arc::from(spec.id()),
            spec,
            events: Bus::new(),
            state: Mutex::new(ActorState {
                status: ModuleStatus::Uninitialized,
                health: HealthRecord::default(),
                journal: VecDeque::new(),
                ticker: None,
                pending_restart: None,
                init_token: None,
            }),
            transition: tokio::sync::Mutex::new(()),
            check_in_flight: AtomicBool::new(false),
            journal_capacity: journal_capacity.max(1),
            dependency_gate,
        })
    }

    pub(crate) fn spec(&self) -> &ModuleSpec {
        &self.spec
    }

    /// Module-local bus carrying this actor's lifecycle events.
    pub(crate) fn events(&self) -> &Bus {
        &self.events
    }

    pub(crate) fn status(&self) -> ModuleStatus {
        self.lock_state().status
    }

    pub(crate) fn health(&self) -> HealthRecord {
        self.lock_state().health.clone()
    }

    pub(crate) fn journal(&self) -> Vec<JournalEntry> {
        self.lock_state().journal.iter().cloned().collect()
    }

    pub(crate) fn info(&self) -> ModuleInfo {
        let (status, health, health_timer_armed, restart_pending) = {
            let st = self.lock_state();
            (
                st.status,
                st.health.clone(),
                st.health_timer_armed(),
                st.restart_pending(),
            )
        };
        let module = self.spec.module();
        ModuleInfo {
            id: self.id.to_string(),
            name: module.name().to_string(),
            version: module.version().to_string(),
            priority: self.spec.priority(),
            dependencies: self.spec.dependencies().to_vec(),
            status,
            health,
            max_restart_attempts: self.spec.max_restart_attempts(),
            health_timer_armed,
            restart_pending,
            metrics: module.metrics(),
        }
    }

    /// Starts the module. Idempotent while `Running`/`Degraded`.
    ///
    /// Initialization failures are absorbed: the returned status tells the outcome.
    pub(crate) async fn start(self: &Arc<Self>) -> ModuleStatus {
        let _guard = self.transition.lock().await;
        self.start_locked().await
    }

    /// Stops the module, cancelling an in-flight `initialize` first.
    pub(crate) async fn stop(self: &Arc<Self>) -> ModuleStatus {
        if let Some(token) = self.lock_state().init_token.as_ref() {
            debug!(module = %self.id, "cancelling in-flight initialization");
            token.cancel();
        }
        let _guard = self.transition.lock().await;
        self.stop_locked().await
    }

    /// One stop + start cycle counted against the restart ceiling.
    ///
    /// Once the ceiling is reached the restart is refused: an active module is shut
    /// down and every module is left `Failed`.
    pub(crate) async fn restart(self: &Arc<Self>) -> Result<ModuleStatus, RegistryError> {
        let _guard = self.transition.lock().await;
        let max = self.spec.max_restart_attempts();

        let (used, was_active) = {
            let mut st = self.lock_state();
            st.pending_restart = None;
            let used = st.health.restart_count;
            if used < max {
                st.health.restart_count = used + 1;
            } else {
                st.ticker = None;
            }
            (used, st.status.is_active())
        };
        if used < max {
            return Ok(self.restart_locked(used + 1, max).await);
        }

        if was_active {
            self.run_shutdown().await;
        }
        let mut out = vec![EventKind::RestartLimitExceeded { attempts: used }];
        {
            let mut st = self.lock_state();
            if st.status != ModuleStatus::Failed {
                self.fail_locked(&mut st, "restart limit exceeded", &mut out);
            }
        }
        self.emit(out);
        warn!(module = %self.id, attempts = used, "restart refused: limit reached");
        Err(RegistryError::RestartLimitExceeded {
            id: self.id.to_string(),
            attempts: used,
        })
    }

    async fn restart_locked(self: &Arc<Self>, attempt: u32, max: u32) -> ModuleStatus {
        self.emit(vec![EventKind::ModuleRestarting {
            attempt,
            max_attempts: max,
        }]);
        info!(module = %self.id, attempt, max, "restarting module");

        self.stop_locked().await;
        self.start_locked().await
    }

    /// Runs one health check now.
    ///
    /// Returns `None` when the check was skipped (module not active, another check in
    /// flight, or the module stopped while the check ran).
    pub(crate) async fn check_health(self: &Arc<Self>) -> Option<bool> {
        if !self.lock_state().is_supervised() {
            return None;
        }
        let Some(_flight) = InFlight::enter(&self.check_in_flight) else {
            debug!(module = %self.id, "health check skipped: previous check still in flight");
            return None;
        };

        let res = run_hook(
            Hook::HealthCheck,
            self.spec.hook_timeout(),
            None,
            self.spec.module().health_check(),
        )
        .await;

        let mut out = Vec::new();
        let verdict = {
            let mut st = self.lock_state();
            if !st.is_supervised() {
                return None;
            }
            st.health.last_check = Some(SystemTime::now());
            match res {
                Ok(true) => {
                    st.health.is_responding = true;
                    st.health.consecutive_failures = 0;
                    if st.status == ModuleStatus::Degraded {
                        self.transition_to(&mut st, ModuleStatus::Running, Some("health check passed"));
                        out.push(EventKind::ModuleRecovered);
                    }
                    true
                }
                Ok(false) => {
                    st.health.is_responding = false;
                    st.health.error_count += 1;
                    st.health.consecutive_failures += 1;
                    if st.status == ModuleStatus::Running {
                        self.transition_to(&mut st, ModuleStatus::Degraded, Some("health check failed"));
                        out.push(EventKind::ModuleDegraded {
                            consecutive_failures: st.health.consecutive_failures,
                        });
                    }
                    false
                }
                Err(e) => {
                    st.health.consecutive_failures += 1;
                    self.fail_locked(&mut st, &e.to_string(), &mut out);
                    false
                }
            }
        };
        self.emit(out);
        Some(verdict)
    }

    async fn start_locked(self: &Arc<Self>) -> ModuleStatus {
        let token = CancellationToken::new();
        {
            let mut st = self.lock_state();
            match st.status {
                ModuleStatus::Uninitialized | ModuleStatus::Stopped | ModuleStatus::Failed => {}
                other => return other,
            }
            st.pending_restart = None;
            st.init_token = Some(token.clone());
            self.transition_to(&mut st, ModuleStatus::Initializing, None);
            let restart_count = st.health.restart_count;
            drop(st);
            self.emit(vec![EventKind::ModuleStarting { restart_count }]);
        }
        info!(module = %self.id, "initializing module");

        let res = run_hook(
            Hook::Initialize,
            self.spec.hook_timeout(),
            Some(&token),
            self.spec.module().initialize(token.clone()),
        )
        .await;

        let mut out = Vec::new();
        let mut aborted = false;
        let status = {
            let mut st = self.lock_state();
            st.init_token = None;
            match res {
                Ok(()) => {
                    st.health.is_responding = true;
                    st.health.consecutive_failures = 0;
                    self.transition_to(&mut st, ModuleStatus::Running, None);
                    st.ticker = Some(self.spawn_health_loop());
                    out.push(EventKind::ModuleStarted);
                }
                Err(ModuleError::Canceled) if token.is_cancelled() => {
                    self.transition_to(&mut st, ModuleStatus::Stopped, Some("initialization cancelled"));
                    out.push(EventKind::ModuleStopped);
                    aborted = true;
                }
                Err(e) => self.fail_locked(&mut st, &e.to_string(), &mut out),
            }
            st.status
        };
        self.emit(out);

        if aborted {
            info!(module = %self.id, "initialization cancelled by stop request");
            self.run_shutdown().await;
        } else if status == ModuleStatus::Running {
            info!(module = %self.id, "module running");
        }
        status
    }

    async fn stop_locked(self: &Arc<Self>) -> ModuleStatus {
        {
            let mut st = self.lock_state();
            st.pending_restart = None;
            if !st.status.is_active() {
                return st.status;
            }
            st.ticker = None;
        }

        self.run_shutdown().await;

        let status = {
            let mut st = self.lock_state();
            self.transition_to(&mut st, ModuleStatus::Stopped, Some("stop requested"));
            st.status
        };
        self.emit(vec![EventKind::ModuleStopped]);
        info!(module = %self.id, "module stopped");
        status
    }

    async fn run_shutdown(&self) {
        let res = run_hook(
            Hook::Shutdown,
            self.spec.hook_timeout(),
            None,
            self.spec.module().shutdown(),
        )
        .await;
        if let Err(e) = res {
            warn!(module = %self.id, error = %e, "shutdown hook failed");
            self.lock_state().health.error_count += 1;
        }
    }

    /// Moves to `Failed`, counting the error and scheduling an automatic restart
    /// when the policy allows one.
    fn fail_locked(self: &Arc<Self>, st: &mut ActorState, reason: &str, out: &mut Vec<EventKind>) {
        st.health.error_count += 1;
        st.health.is_responding = false;
        self.transition_to(st, ModuleStatus::Failed, Some(reason));
        out.push(EventKind::ModuleFailed {
            error: Arc::from(reason),
            error_count: st.health.error_count,
        });
        error!(module = %self.id, error = reason, error_count = st.health.error_count, "module failed");

        let used = st.health.restart_count;
        if self.spec.restart().restarts_on_failure() && used < self.spec.max_restart_attempts() {
            let delay = self.spec.backoff().next(used);
            debug!(module = %self.id, ?delay, "automatic restart scheduled");
            st.pending_restart = Some(self.schedule_restart(delay));
        }
    }

    fn transition_to(&self, st: &mut ActorState, to: ModuleStatus, reason: Option<&str>) {
        let from = st.status;
        if from == to {
            return;
        }
        st.status = to;
        if !to.is_active() {
            st.ticker = None;
        }
        if st.journal.len() >= self.journal_capacity {
            st.journal.pop_front();
        }
        st.journal.push_back(JournalEntry {
            at: SystemTime::now(),
            from,
            to,
            reason: reason.map(Arc::from),
        });
        debug!(module = %self.id, %from, %to, reason, "status transition");
    }

    fn spawn_health_loop(self: &Arc<Self>) -> Scheduled {
        let period = self.spec.health_check_interval().max(MIN_HEALTH_INTERVAL);
        let weak = Arc::downgrade(self);

        Scheduled::spawn(move |token| async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let Some(actor) = weak.upgrade() else { break };
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = actor.check_health() => {}
                }
            }
        })
    }

    fn schedule_restart(self: &Arc<Self>, delay: Duration) -> Scheduled {
        let weak = Arc::downgrade(self);

        Scheduled::spawn(move |token| async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = time::sleep(delay) => {}
            }
            let Some(actor) = weak.upgrade() else { return };
            if let Some(gate) = &actor.dependency_gate {
                if let Err(e) = gate(&*actor.id, actor.spec.dependencies()) {
                    warn!(module = %actor.id, error = %e, "automatic restart skipped");
                    actor.lock_state().pending_restart = None;
                    return;
                }
            }
            if let Err(e) = actor.restart().await {
                warn!(module = %actor.id, error = %e, "automatic restart refused");
            }
        })
    }

    fn emit(&self, kinds: Vec<EventKind>) {
        for kind in kinds {
            let ev = Event::new(self.id.clone(), kind).with_priority(self.spec.priority());
            self.events.publish(&ev);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ActorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActorState {
    /// Active and still owning its health timer (i.e. not being stopped).
    fn is_supervised(&self) -> bool {
        self.status.is_active() && self.ticker.is_some()
    }

    fn health_timer_armed(&self) -> bool {
        self.ticker.as_ref().is_some_and(Scheduled::is_active)
    }

    fn restart_pending(&self) -> bool {
        self.pending_restart.as_ref().is_some_and(Scheduled::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Topic, TopicFilter};
    use crate::modules::Priority;
    use crate::modules::testing::{ProbeModule, spec};
    use crate::policies::{BackoffPolicy, JitterPolicy, RestartPolicy};

    fn record(actor: &ModuleActor) -> (Arc<Mutex<Vec<Topic>>>, crate::events::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = actor
            .events()
            .subscribe("test", TopicFilter::Any, Priority::Low, move |ev| {
                s.lock().unwrap().push(ev.topic());
            });
        (seen, sub)
    }

    #[tokio::test(start_paused = true)]
    async fn start_initializes_and_arms_health_timer() {
        let probe = Arc::new(ProbeModule::new("a"));
        let actor = ModuleActor::new(spec(&probe), 16, None);
        assert!(!actor.info().health_timer_armed);

        assert_eq!(actor.start().await, ModuleStatus::Running);
        assert_eq!(probe.initialized(), 1);
        assert!(actor.info().health_timer_armed);

        // Idempotent while running.
        assert_eq!(actor.start().await, ModuleStatus::Running);
        assert_eq!(probe.initialized(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn initialization_error_fails_without_timer() {
        let probe = Arc::new(
            ProbeModule::new("a").with_init([Err(ModuleError::initialization("bad config"))]),
        );
        let actor = ModuleActor::new(spec(&probe), 16, None);
        let (seen, _sub) = record(&actor);

        assert_eq!(actor.start().await, ModuleStatus::Failed);
        assert!(!actor.info().health_timer_armed);
        assert_eq!(actor.health().error_count, 1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Topic::ModuleStarting, Topic::ModuleFailed]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn degrades_then_recovers_on_schedule() {
        let probe = Arc::new(ProbeModule::new("c").with_health([Ok(false), Ok(true)]));
        let actor = ModuleActor::new(spec(&probe), 16, None);
        actor.start().await;
        let (seen, _sub) = record(&actor);

        time::sleep(Duration::from_millis(10_001)).await;
        assert_eq!(actor.status(), ModuleStatus::Degraded);
        assert!(actor.info().health_timer_armed);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(actor.status(), ModuleStatus::Running);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Topic::ModuleDegraded, Topic::ModuleRecovered]
        );
        assert_eq!(actor.health().consecutive_failures, 0);
        assert_eq!(actor.health().error_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn health_check_error_fails_and_cancels_timer() {
        let probe = Arc::new(
            ProbeModule::new("a").with_health([Err(ModuleError::health_check("probe lost"))]),
        );
        let actor = ModuleActor::new(spec(&probe), 16, None);
        actor.start().await;

        assert_eq!(actor.check_health().await, Some(false));
        assert_eq!(actor.status(), ModuleStatus::Failed);
        assert!(!actor.info().health_timer_armed);
        assert_eq!(actor.check_health().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_ceiling_is_enforced() {
        let probe = Arc::new(ProbeModule::new("d"));
        let actor = ModuleActor::new(spec(&probe).with_max_restart_attempts(2), 16, None);
        actor.start().await;

        assert_eq!(actor.restart().await, Ok(ModuleStatus::Running));
        assert_eq!(actor.health().restart_count, 1);
        assert_eq!(actor.restart().await, Ok(ModuleStatus::Running));
        assert_eq!(actor.health().restart_count, 2);

        let err = actor.restart().await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::RestartLimitExceeded {
                id: "d".into(),
                attempts: 2
            }
        );
        assert_eq!(actor.health().restart_count, 2);
        assert_eq!(actor.status(), ModuleStatus::Failed);
        assert!(!actor.info().health_timer_armed);
        // The refused restart still releases what the last start acquired.
        assert_eq!(probe.initialized(), 3);
        assert_eq!(probe.shutdowns(), 3);

        // Already failed: nothing left to release.
        assert!(actor.restart().await.is_err());
        assert_eq!(actor.stop().await, ModuleStatus::Failed);
        assert_eq!(probe.shutdowns(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_inflight_initialize() {
        let probe = Arc::new(ProbeModule::new("slow").with_init_delay(Duration::from_secs(60)));
        let actor = ModuleActor::new(spec(&probe), 16, None);

        let a = actor.clone();
        let starting = tokio::spawn(async move { a.start().await });
        tokio::task::yield_now().await;
        assert_eq!(actor.status(), ModuleStatus::Initializing);

        assert_eq!(actor.stop().await, ModuleStatus::Stopped);
        assert_eq!(starting.await.unwrap(), ModuleStatus::Stopped);
        assert_eq!(probe.initialized(), 0);
        assert_eq!(probe.shutdowns(), 1);
        assert!(!actor.info().health_timer_armed);
    }

    #[tokio::test(start_paused = true)]
    async fn hook_timeout_fails_initialization() {
        let probe = Arc::new(ProbeModule::new("stuck").with_init_delay(Duration::from_secs(600)));
        let actor = ModuleActor::new(
            spec(&probe).with_hook_timeout(Some(Duration::from_secs(5))),
            16,
            None,
        );

        assert_eq!(actor.start().await, ModuleStatus::Failed);
        let last = actor.journal().pop().unwrap();
        assert_eq!(last.to, ModuleStatus::Failed);
        assert_eq!(last.reason.as_deref(), Some("initialize timed out after 5s"));
    }

    #[tokio::test(start_paused = true)]
    async fn on_failure_policy_restarts_after_backoff() {
        let probe = Arc::new(
            ProbeModule::new("flaky").with_init([Err(ModuleError::initialization("warming up"))]),
        );
        let backoff = BackoffPolicy {
            first: Duration::from_secs(2),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        let actor = ModuleActor::new(
            spec(&probe)
                .with_restart(RestartPolicy::OnFailure)
                .with_backoff(backoff),
            16,
            None,
        );

        assert_eq!(actor.start().await, ModuleStatus::Failed);
        assert!(actor.info().restart_pending);

        time::sleep(Duration::from_millis(2_001)).await;
        assert_eq!(actor.status(), ModuleStatus::Running);
        assert_eq!(actor.health().restart_count, 1);
        assert!(!actor.info().restart_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_dependency_gate_leaves_module_failed() {
        let probe = Arc::new(
            ProbeModule::new("api").with_init([Err(ModuleError::initialization("warming up"))]),
        );
        let gate: DependencyGate = Arc::new(|id: &str, deps: &[String]| {
            Err(RegistryError::DependencyUnavailable {
                id: id.to_string(),
                dependency: deps[0].clone(),
                status: ModuleStatus::Stopped,
            })
        });
        let actor = ModuleActor::new(
            spec(&probe)
                .with_dependencies(["db"])
                .with_restart(RestartPolicy::OnFailure),
            16,
            Some(gate),
        );

        assert_eq!(actor.start().await, ModuleStatus::Failed);
        assert!(actor.info().restart_pending);

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(actor.status(), ModuleStatus::Failed);
        assert_eq!(actor.health().restart_count, 0);
        assert_eq!(probe.initialized(), 0);
        assert!(!actor.info().restart_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_restart() {
        let probe = Arc::new(
            ProbeModule::new("flaky").with_init([Err(ModuleError::initialization("nope"))]),
        );
        let actor = ModuleActor::new(spec(&probe).with_restart(RestartPolicy::OnFailure), 16, None);

        actor.start().await;
        assert!(actor.info().restart_pending);
        assert_eq!(actor.stop().await, ModuleStatus::Failed);
        assert!(!actor.info().restart_pending);

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(actor.health().restart_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn journal_is_bounded() {
        let probe = Arc::new(ProbeModule::new("a"));
        let actor = ModuleActor::new(spec(&probe), 2, None);
        actor.start().await;
        actor.stop().await;

        let journal = actor.journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].to, ModuleStatus::Running);
        assert_eq!(journal[1].to, ModuleStatus::Stopped);
    }
}

//! # Module registry: module table and dependency graph.
//!
//! The registry is the only owner of registered modules. It keeps:
//! - the module table (`id → ModuleActor`)
//! - forward edges (declared in each [`ModuleSpec`])
//! - reverse edges (`dependency → dependents`), maintained on register/unregister
//!
//! ## Event wiring
//! ```text
//! ModuleActor ── publish ──► actor bus ──► registry listener ──► global Bus
//!                                         (re-tagged by severity:
//!                                          failed=critical, degraded=high,
//!                                          recovered=medium, other=low)
//! ```
//! The listener is a scoped [`Subscription`] stored with the node; unregistering
//! the module drops it.
//!
//! ## Rules
//! - Registration rejects duplicate ids and dependency cycles; forward references
//!   to modules registered later are allowed.
//! - `start(id)` brings every dependency up first (depth-first pre-order).
//! - `restart(id)` does the same before counting an attempt. An automatic restart
//!   only checks its dependencies and leaves the module `failed` if one is down.
//! - `stop`/`unregister` refuse to pull a module out from under its dependents
//!   unless `force` is set. A forced stop does not cascade.
//! - The graph lock is never held across `.await`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::core::Config;
use crate::core::actor::{DependencyGate, ModuleActor};
use crate::error::RegistryError;
use crate::events::{Bus, Event, EventKind, Subscription, TopicFilter};
use crate::modules::{JournalEntry, ModuleInfo, ModuleSpec, ModuleStatus, Priority};

/// Aggregate counters across all registered modules.
///
/// `running_modules + failed_modules + degraded_modules + other_modules == total_modules`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryMetrics {
    /// Registered modules.
    pub total_modules: usize,
    /// Modules in `running`.
    pub running_modules: usize,
    /// Modules in `failed`.
    pub failed_modules: usize,
    /// Modules in `degraded`.
    pub degraded_modules: usize,
    /// Modules in any other status.
    pub other_modules: usize,
    /// Sum of restart counts.
    pub total_restarts: u64,
    /// Sum of error counts.
    pub total_errors: u64,
}

struct Node {
    actor: Arc<ModuleActor>,
    _listener: Subscription,
}

#[derive(Default)]
struct Graph {
    nodes: HashMap<String, Node>,
    /// Reverse edges. May name modules that are not registered (forward references).
    dependents: HashMap<String, BTreeSet<String>>,
}

impl Graph {
    /// Returns the cycle path `id → … → id` that adding `deps` to `id` would close.
    fn find_cycle(&self, id: &str, deps: &[String]) -> Option<Vec<String>> {
        let mut path = vec![id.to_string()];
        let mut visited = BTreeSet::new();
        for dep in deps {
            if self.reaches(dep, id, &mut path, &mut visited) {
                return Some(path);
            }
        }
        None
    }

    fn reaches(
        &self,
        from: &str,
        target: &str,
        path: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
    ) -> bool {
        path.push(from.to_string());
        if from == target {
            return true;
        }
        if visited.insert(from.to_string()) {
            if let Some(node) = self.nodes.get(from) {
                for next in node.actor.spec().dependencies() {
                    if self.reaches(next, target, path, visited) {
                        return true;
                    }
                }
            }
        }
        path.pop();
        false
    }

    /// Every dependency of `id` must be registered and `running`/`degraded`.
    fn check_dependencies(&self, id: &str, deps: &[String]) -> Result<(), RegistryError> {
        for dep in deps {
            let node = self.nodes.get(dep).ok_or_else(|| not_found(dep))?;
            let status = node.actor.status();
            if !status.is_active() {
                return Err(RegistryError::DependencyUnavailable {
                    id: id.to_string(),
                    dependency: dep.clone(),
                    status,
                });
            }
        }
        Ok(())
    }

    fn live_dependents(&self, id: &str) -> Vec<String> {
        self.dependents
            .get(id)
            .into_iter()
            .flatten()
            .filter(|d| {
                self.nodes
                    .get(d.as_str())
                    .is_some_and(|n| n.actor.status().is_live())
            })
            .cloned()
            .collect()
    }
}

/// Owner of registered modules and their dependency graph.
pub struct Registry {
    graph: Arc<RwLock<Graph>>,
    bus: Bus,
    journal_capacity: usize,
}

impl Registry {
    /// Creates an empty registry publishing structural events on `bus`.
    pub fn new(cfg: &Config, bus: Bus) -> Self {
        Self {
            graph: Arc::new(RwLock::new(Graph::default())),
            bus,
            journal_capacity: cfg.journal_capacity_clamped(),
        }
    }

    /// The bus lifecycle events are republished on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registers a module.
    ///
    /// # Errors
    /// - [`RegistryError::DuplicateModule`] if the id is taken (nothing changes)
    /// - [`RegistryError::CycleDetected`] if the dependencies close a cycle
    pub fn register(&self, spec: ModuleSpec) -> Result<(), RegistryError> {
        let id = spec.id().to_string();
        let deps: Arc<[String]> = spec.dependencies().into();

        {
            let mut g = self.write();
            if g.nodes.contains_key(&id) {
                return Err(RegistryError::DuplicateModule { id });
            }
            if let Some(path) = g.find_cycle(&id, &deps) {
                return Err(RegistryError::CycleDetected { path });
            }

            let gate = dependency_gate(Arc::downgrade(&self.graph));
            let actor = ModuleActor::new(spec, self.journal_capacity, Some(gate));
            let bus = self.bus.clone();
            let listener = actor.events().subscribe(
                format!("registry:{id}"),
                TopicFilter::Any,
                Priority::Low,
                move |ev| {
                    bus.publish(&ev.clone().with_priority(ev.kind.severity()));
                },
            );

            for dep in deps.iter() {
                g.dependents
                    .entry(dep.clone())
                    .or_default()
                    .insert(id.clone());
            }
            g.nodes.insert(
                id.clone(),
                Node {
                    actor,
                    _listener: listener,
                },
            );
        }

        info!(module = %id, dependencies = ?deps, "module registered");
        self.bus.publish(
            &Event::new(id, EventKind::ModuleRegistered { dependencies: deps })
                .with_priority(Priority::Low),
        );
        Ok(())
    }

    /// Removes a module, stopping it first when it is live.
    ///
    /// # Errors
    /// - [`RegistryError::ModuleNotFound`] for an unknown id
    /// - [`RegistryError::DependentsExist`] when other modules depend on it and
    ///   `force` is not set
    pub async fn unregister(&self, id: &str, force: bool) -> Result<(), RegistryError> {
        let actor = {
            let g = self.read();
            let node = g.nodes.get(id).ok_or_else(|| not_found(id))?;
            let dependents = sorted(g.dependents.get(id));
            if !dependents.is_empty() {
                if !force {
                    return Err(RegistryError::DependentsExist {
                        id: id.to_string(),
                        dependents,
                    });
                }
                warn!(module = %id, ?dependents, "forced unregister; dependents keep a dangling reference");
            }
            node.actor.clone()
        };

        // Also drops a pending automatic restart.
        actor.stop().await;

        {
            let mut g = self.write();
            let Some(node) = g.nodes.remove(id) else {
                return Err(not_found(id));
            };
            for dep in node.actor.spec().dependencies() {
                if let Some(set) = g.dependents.get_mut(dep) {
                    set.remove(id);
                    if set.is_empty() {
                        g.dependents.remove(dep);
                    }
                }
            }
        }

        info!(module = %id, force, "module unregistered");
        self.bus.publish(
            &Event::new(id, EventKind::ModuleUnregistered { forced: force })
                .with_priority(Priority::Low),
        );
        Ok(())
    }

    /// Starts a module after its dependencies.
    ///
    /// Idempotent while the module is `running`/`degraded`. An initialization
    /// failure is not an error here: the returned status is `Failed`.
    ///
    /// # Errors
    /// - [`RegistryError::ModuleNotFound`] for an unknown id or dependency
    /// - [`RegistryError::DependencyUnavailable`] when a dependency did not come up
    /// - [`RegistryError::ModuleFailed`] when the module itself is `failed`
    pub async fn start(&self, id: &str) -> Result<ModuleStatus, RegistryError> {
        self.start_node(id).await
    }

    fn start_node<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ModuleStatus, RegistryError>> {
        async move {
            let actor = self.actor(id)?;
            match actor.status() {
                s if s.is_active() => return Ok(s),
                ModuleStatus::Failed => {
                    return Err(RegistryError::ModuleFailed { id: id.to_string() });
                }
                _ => {}
            }

            self.start_dependencies(id, &actor).await?;
            Ok(actor.start().await)
        }
        .boxed()
    }

    async fn start_dependencies(&self, id: &str, actor: &ModuleActor) -> Result<(), RegistryError> {
        for dep in actor.spec().dependencies() {
            let status = match self.start_node(dep).await {
                Ok(status) => status,
                Err(RegistryError::ModuleFailed { .. }) => ModuleStatus::Failed,
                Err(e) => return Err(e),
            };
            if !status.is_active() {
                return Err(RegistryError::DependencyUnavailable {
                    id: id.to_string(),
                    dependency: dep.clone(),
                    status,
                });
            }
        }
        debug!(module = %id, "dependencies satisfied");
        Ok(())
    }

    /// Stops a module.
    ///
    /// # Errors
    /// - [`RegistryError::ModuleNotFound`] for an unknown id
    /// - [`RegistryError::DependentsExist`] when live dependents exist and `force`
    ///   is not set. With `force` the dependents are left running.
    pub async fn stop(&self, id: &str, force: bool) -> Result<ModuleStatus, RegistryError> {
        let actor = {
            let g = self.read();
            let node = g.nodes.get(id).ok_or_else(|| not_found(id))?;
            let live = g.live_dependents(id);
            if !live.is_empty() {
                if !force {
                    return Err(RegistryError::DependentsExist {
                        id: id.to_string(),
                        dependents: live,
                    });
                }
                warn!(module = %id, dependents = ?live, "forced stop; dependents are not stopped");
            }
            node.actor.clone()
        };
        Ok(actor.stop().await)
    }

    /// Runs one stop/start cycle counted against the module's restart ceiling.
    ///
    /// Dependencies are brought up first, as for [`start`](Self::start). When one
    /// cannot be, the module is left untouched and no attempt is counted.
    ///
    /// # Errors
    /// - [`RegistryError::ModuleNotFound`] for an unknown id or dependency
    /// - [`RegistryError::DependencyUnavailable`] when a dependency did not come up
    /// - [`RegistryError::RestartLimitExceeded`] once the ceiling is reached
    pub async fn restart(&self, id: &str) -> Result<ModuleStatus, RegistryError> {
        let actor = self.actor(id)?;
        self.start_dependencies(id, &actor).await?;
        actor.restart().await
    }

    /// Runs one health check immediately.
    ///
    /// `Ok(None)` when the check was skipped (module not active, or a check is
    /// already in flight).
    pub async fn probe(&self, id: &str) -> Result<Option<bool>, RegistryError> {
        Ok(self.actor(id)?.check_health().await)
    }

    /// Snapshot of one module.
    pub fn module(&self, id: &str) -> Option<ModuleInfo> {
        self.read().nodes.get(id).map(|n| n.actor.info())
    }

    /// Snapshots of all modules, sorted by id.
    pub fn modules(&self) -> Vec<ModuleInfo> {
        let mut out: Vec<ModuleInfo> = self.read().nodes.values().map(|n| n.actor.info()).collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Modules currently in `status`, sorted by id.
    pub fn modules_by_status(&self, status: ModuleStatus) -> Vec<ModuleInfo> {
        self.modules()
            .into_iter()
            .filter(|m| m.status == status)
            .collect()
    }

    /// All modules, most urgent first (ties by id).
    pub fn modules_by_priority(&self) -> Vec<ModuleInfo> {
        let mut out = self.modules();
        out.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Current status of a module.
    pub fn status(&self, id: &str) -> Option<ModuleStatus> {
        self.read().nodes.get(id).map(|n| n.actor.status())
    }

    /// Declared dependencies of `id` (empty for unknown ids).
    pub fn dependencies(&self, id: &str) -> Vec<String> {
        self.read()
            .nodes
            .get(id)
            .map(|n| n.actor.spec().dependencies().to_vec())
            .unwrap_or_default()
    }

    /// Modules depending on `id`, sorted.
    pub fn dependents(&self, id: &str) -> Vec<String> {
        sorted(self.read().dependents.get(id))
    }

    pub fn has_dependents(&self, id: &str) -> bool {
        self.read().dependents.get(id).is_some_and(|s| !s.is_empty())
    }

    /// Whether a dependent of `id` is initializing, running or degraded.
    pub fn has_running_dependents(&self, id: &str) -> bool {
        !self.read().live_dependents(id).is_empty()
    }

    /// Whether `unregister(id, false)` would pass the dependents check.
    pub fn can_safely_remove(&self, id: &str) -> bool {
        !self.has_dependents(id)
    }

    /// Status transitions recorded for `id`, oldest first.
    pub fn journal(&self, id: &str) -> Option<Vec<JournalEntry>> {
        self.read().nodes.get(id).map(|n| n.actor.journal())
    }

    /// Aggregate counters.
    pub fn metrics(&self) -> RegistryMetrics {
        let g = self.read();
        let mut m = RegistryMetrics {
            total_modules: g.nodes.len(),
            ..RegistryMetrics::default()
        };
        for node in g.nodes.values() {
            match node.actor.status() {
                ModuleStatus::Running => m.running_modules += 1,
                ModuleStatus::Failed => m.failed_modules += 1,
                ModuleStatus::Degraded => m.degraded_modules += 1,
                _ => m.other_modules += 1,
            }
            let health = node.actor.health();
            m.total_restarts += u64::from(health.restart_count);
            m.total_errors += u64::from(health.error_count);
        }
        m
    }

    /// Registered ids with every dependency before its dependents.
    ///
    /// Among modules whose dependencies are already placed, more urgent ones come
    /// first (ties by id). Dependencies that are not registered are ignored.
    pub fn start_order(&self) -> Vec<String> {
        let g = self.read();
        let mut pending: HashMap<&str, usize> = g
            .nodes
            .iter()
            .map(|(id, n)| {
                let blocking = n
                    .actor
                    .spec()
                    .dependencies()
                    .iter()
                    .filter(|d| g.nodes.contains_key(d.as_str()))
                    .count();
                (id.as_str(), blocking)
            })
            .collect();

        let key = |id: &str| (g.nodes[id].actor.spec().priority(), id.to_string());
        let mut ready: BTreeSet<(Priority, String)> = pending
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(id, _)| key(*id))
            .collect();

        let mut order = Vec::with_capacity(g.nodes.len());
        while let Some(next) = ready.pop_first() {
            let (_, id) = next;
            for dependent in g.dependents.get(&id).into_iter().flatten() {
                if let Some(n) = pending.get_mut(dependent.as_str()) {
                    *n -= 1;
                    if *n == 0 {
                        ready.insert(key(dependent.as_str()));
                    }
                }
            }
            order.push(id);
        }
        order
    }

    /// Reverse of [`start_order`](Self::start_order): dependents before dependencies.
    pub fn stop_order(&self) -> Vec<String> {
        let mut order = self.start_order();
        order.reverse();
        order
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().nodes.contains_key(id)
    }

    fn actor(&self, id: &str) -> Result<Arc<ModuleActor>, RegistryError> {
        self.read()
            .nodes
            .get(id)
            .map(|n| n.actor.clone())
            .ok_or_else(|| not_found(id))
    }

    fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.graph.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(id: &str) -> RegistryError {
    RegistryError::ModuleNotFound { id: id.to_string() }
}

fn sorted(set: Option<&BTreeSet<String>>) -> Vec<String> {
    set.map(|s| s.iter().cloned().collect()).unwrap_or_default()
}

/// Lets an actor's automatic restart see the graph without owning it.
fn dependency_gate(graph: Weak<RwLock<Graph>>) -> DependencyGate {
    Arc::new(move |id: &str, deps: &[String]| {
        let graph = graph.upgrade().ok_or_else(|| not_found(id))?;
        let g = graph.read().unwrap_or_else(PoisonError::into_inner);
        g.check_dependencies(id, deps)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use crate::modules::testing::{ProbeModule, spec};
    use crate::policies::RestartPolicy;
    use std::sync::Mutex;

    fn registry() -> Registry {
        Registry::new(&Config::default(), Bus::new())
    }

    fn probe(id: &str, deps: &[&str]) -> ModuleSpec {
        spec(&Arc::new(ProbeModule::new(id))).with_dependencies(deps.iter().copied())
    }

    #[tokio::test]
    async fn duplicate_registration_leaves_graph_untouched() {
        let reg = registry();
        reg.register(probe("a", &[])).unwrap();
        reg.register(probe("b", &["a"])).unwrap();

        let err = reg.register(probe("b", &[])).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateModule { id: "b".into() });
        assert_eq!(reg.dependencies("b"), vec!["a".to_string()]);
        assert_eq!(reg.dependents("a"), vec!["b".to_string()]);
        assert_eq!(reg.len(), 2);
    }

    #[tokio::test]
    async fn cycles_are_rejected_with_path() {
        let reg = registry();
        reg.register(probe("a", &["b"])).unwrap();
        reg.register(probe("b", &["c"])).unwrap();

        let err = reg.register(probe("c", &["a"])).unwrap_err();
        assert_eq!(
            err,
            RegistryError::CycleDetected {
                path: vec!["c".into(), "a".into(), "b".into(), "c".into()]
            }
        );
        assert!(!reg.contains("c"));

        let err = reg.register(probe("self", &["self"])).unwrap_err();
        assert_eq!(
            err,
            RegistryError::CycleDetected {
                path: vec!["self".into(), "self".into()]
            }
        );
    }

    #[tokio::test]
    async fn unknown_dependency_blocks_start() {
        let reg = registry();
        reg.register(probe("api", &["db"])).unwrap();

        let err = reg.start("api").await.unwrap_err();
        assert_eq!(err, RegistryError::ModuleNotFound { id: "db".into() });
        assert_eq!(reg.status("api"), Some(ModuleStatus::Uninitialized));
    }

    #[tokio::test]
    async fn failed_dependency_is_unavailable() {
        let reg = registry();
        let db = ProbeModule::new("db")
            .with_init([Err(crate::error::ModuleError::initialization("disk full"))]);
        reg.register(spec(&Arc::new(db))).unwrap();
        reg.register(probe("api", &["db"])).unwrap();

        let err = reg.start("api").await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::DependencyUnavailable {
                id: "api".into(),
                dependency: "db".into(),
                status: ModuleStatus::Failed,
            }
        );
        assert_eq!(reg.status("api"), Some(ModuleStatus::Uninitialized));
        assert_eq!(
            reg.start("db").await.unwrap_err(),
            RegistryError::ModuleFailed { id: "db".into() }
        );
    }

    #[tokio::test]
    async fn restart_brings_dependencies_up_first() {
        let reg = registry();
        reg.register(probe("a", &[])).unwrap();
        reg.register(probe("b", &["a"])).unwrap();

        assert_eq!(reg.restart("b").await, Ok(ModuleStatus::Running));
        assert_eq!(reg.status("a"), Some(ModuleStatus::Running));
        assert_eq!(reg.module("b").unwrap().health.restart_count, 1);
    }

    #[tokio::test]
    async fn restart_refused_while_dependency_is_failed() {
        let reg = registry();
        let db = ProbeModule::new("db")
            .with_init([Err(crate::error::ModuleError::initialization("disk full"))]);
        reg.register(spec(&Arc::new(db))).unwrap();
        reg.register(probe("api", &["db"])).unwrap();
        reg.start("db").await.unwrap();

        assert_eq!(
            reg.restart("api").await,
            Err(RegistryError::DependencyUnavailable {
                id: "api".into(),
                dependency: "db".into(),
                status: ModuleStatus::Failed,
            })
        );
        let api = reg.module("api").unwrap();
        assert_eq!(api.status, ModuleStatus::Uninitialized);
        assert_eq!(api.health.restart_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn automatic_restart_waits_for_dependencies() {
        let reg = registry();
        reg.register(probe("a", &[])).unwrap();
        let flaky = ProbeModule::new("b")
            .with_init([Err(crate::error::ModuleError::initialization("warming up"))]);
        reg.register(
            spec(&Arc::new(flaky))
                .with_dependencies(["a"])
                .with_restart(RestartPolicy::OnFailure),
        )
        .unwrap();

        assert_eq!(reg.start("b").await, Ok(ModuleStatus::Failed));
        assert!(reg.module("b").unwrap().restart_pending);
        // A failed dependent does not hold its dependency up.
        assert_eq!(reg.stop("a", false).await, Ok(ModuleStatus::Stopped));

        tokio::time::sleep(std::time::Duration::from_secs(120)).await;
        let b = reg.module("b").unwrap();
        assert_eq!(b.status, ModuleStatus::Failed);
        assert_eq!(b.health.restart_count, 0);
        assert!(!b.restart_pending);

        assert_eq!(reg.restart("b").await, Ok(ModuleStatus::Running));
        assert_eq!(reg.status("a"), Some(ModuleStatus::Running));
    }

    #[tokio::test]
    async fn module_events_are_retagged_by_severity() {
        let bus = Bus::new();
        let reg = Registry::new(&Config::default(), bus.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = bus.subscribe("test", TopicFilter::Any, Priority::Low, move |ev| {
            s.lock().unwrap().push((ev.topic(), ev.priority));
        });

        let bad = ProbeModule::new("x")
            .with_init([Err(crate::error::ModuleError::initialization("nope"))]);
        reg.register(spec(&Arc::new(bad)).with_priority(Priority::High))
            .unwrap();
        reg.start("x").await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (Topic::ModuleRegistered, Priority::Low),
                (Topic::ModuleStarting, Priority::Low),
                (Topic::ModuleFailed, Priority::Critical),
            ]
        );
    }

    #[tokio::test]
    async fn unregister_releases_listener_and_edges() {
        let bus = Bus::new();
        let reg = Registry::new(&Config::default(), bus.clone());
        reg.register(probe("a", &[])).unwrap();
        reg.register(probe("b", &["a"])).unwrap();

        let err = reg.unregister("a", false).await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::DependentsExist {
                id: "a".into(),
                dependents: vec!["b".into()]
            }
        );

        reg.unregister("b", false).await.unwrap();
        assert!(!reg.has_dependents("a"));
        assert!(reg.can_safely_remove("a"));
        reg.unregister("a", false).await.unwrap();
        assert!(reg.is_empty());
        assert_eq!(
            reg.unregister("a", false).await.unwrap_err(),
            RegistryError::ModuleNotFound { id: "a".into() }
        );
    }

    #[tokio::test]
    async fn start_order_respects_dependencies_then_priority() {
        let reg = registry();
        reg.register(probe("web", &["api"]).with_priority(Priority::Critical))
            .unwrap();
        reg.register(probe("api", &["db", "cache"])).unwrap();
        reg.register(probe("cache", &[]).with_priority(Priority::Low))
            .unwrap();
        reg.register(probe("db", &[]).with_priority(Priority::High))
            .unwrap();
        reg.register(probe("metrics", &[]).with_priority(Priority::Low))
            .unwrap();

        assert_eq!(
            reg.start_order(),
            vec!["db", "cache", "api", "web", "metrics"]
        );
        assert_eq!(
            reg.stop_order(),
            vec!["metrics", "web", "api", "cache", "db"]
        );
    }

    #[tokio::test]
    async fn metrics_partition_all_modules() {
        let reg = registry();
        reg.register(probe("a", &[])).unwrap();
        reg.register(probe("b", &[])).unwrap();
        let bad = ProbeModule::new("c")
            .with_init([Err(crate::error::ModuleError::initialization("nope"))]);
        reg.register(spec(&Arc::new(bad))).unwrap();

        reg.start("a").await.unwrap();
        reg.start("c").await.unwrap();

        let m = reg.metrics();
        assert_eq!(m.total_modules, 3);
        assert_eq!(m.running_modules, 1);
        assert_eq!(m.failed_modules, 1);
        assert_eq!(m.other_modules, 1);
        assert_eq!(m.total_errors, 1);
        assert_eq!(
            m.running_modules + m.failed_modules + m.degraded_modules + m.other_modules,
            m.total_modules
        );
    }
}

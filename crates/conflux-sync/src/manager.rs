// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The state synchronization manager.

use crate::config::StateSyncConfig;
use crate::conflict::{detect_conflict, version_marker, ConflictResolver, SyncSide, Winner};
use crate::error::SyncError;
use crate::events::StateChangeEvent;
use crate::history::{SyncHistory, SyncRecord, SyncStatus};
use crate::metrics::{SyncCounters, SyncMetrics};
use crate::scheduler::SyncScheduler;
use crate::store::StateStore;
use conflux_core::{EventBus, SharedState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime};
use uuid::Uuid;

/// Outcome of one synchronization attempt, as reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Whether the winning state reached the target.
    pub success: bool,
    /// Terminal status of the attempt.
    pub status: SyncStatus,
    /// Whether the two states were in conflict.
    pub conflict_detected: bool,
    /// The module whose state was pushed.
    pub source_module: String,
    /// The module that received the winning state.
    pub target_module: String,
}

/// A consistent, timestamped capture of every registered module's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Module name to captured state.
    pub modules: HashMap<String, Value>,
    /// When the capture was taken.
    pub timestamp: SystemTime,
}

/// The mutable half of the manager. One logical owner; the public
/// [`StateSyncManager`] and the auto-sync worker both reach it through the
/// same mutex.
struct SyncEngine {
    modules: HashMap<String, SharedState>,
    order: Vec<String>,
    store: StateStore,
    history: SyncHistory,
    enable_history: bool,
    resolver: ConflictResolver,
    counters: SyncCounters,
    events_tx: flume::Sender<StateChangeEvent>,
}

impl SyncEngine {
    fn register(&mut self, name: &str, module: SharedState) -> Result<(), SyncError> {
        if self.modules.contains_key(name) {
            return Err(SyncError::AlreadyRegistered(name.to_string()));
        }

        let initial = module
            .lock()
            .map_err(|_| SyncError::LockPoisoned(name.to_string()))?
            .state();
        self.store.set(name, initial);
        self.modules.insert(name.to_string(), module);
        self.order.push(name.to_string());
        log::debug!("Module '{name}' registered for synchronization.");
        Ok(())
    }

    fn unregister(&mut self, name: &str) {
        if self.modules.remove(name).is_some() {
            self.order.retain(|n| n != name);
            self.store.remove(name);
            log::debug!("Module '{name}' unregistered.");
        }
    }

    fn sync(&mut self, source: &str, target: &str) -> Result<SyncOutcome, SyncError> {
        let source_ref = self
            .modules
            .get(source)
            .cloned()
            .ok_or_else(|| SyncError::ModuleNotRegistered(source.to_string()))?;
        let target_ref = self
            .modules
            .get(target)
            .cloned()
            .ok_or_else(|| SyncError::ModuleNotRegistered(target.to_string()))?;

        let start = Instant::now();
        let attempt = self.sync_pair(source, &source_ref, target, &target_ref);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (success, conflict_detected, winner) = match &attempt {
            Ok((conflict, winner)) => (true, *conflict, winner.clone()),
            Err(_) => (false, false, None),
        };

        self.counters.record(success, conflict_detected, duration_ms);

        let status = if success {
            SyncStatus::Completed
        } else {
            SyncStatus::Failed
        };
        if self.enable_history {
            self.history.push(SyncRecord {
                sync_id: Uuid::new_v4().to_string(),
                source_module: source.to_string(),
                target_module: target.to_string(),
                timestamp: SystemTime::now(),
                success,
                status,
                conflict_detected,
                winner,
            });
        }

        if let Err(e) = attempt {
            log::warn!("Sync {source} -> {target} failed: {e}");
        }

        Ok(SyncOutcome {
            success,
            status,
            conflict_detected,
            source_module: source.to_string(),
            target_module: target.to_string(),
        })
    }

    /// Reads both states, resolves any conflict, and pushes the winner into
    /// the target. Returns the conflict flag and the winning module's name.
    fn sync_pair(
        &mut self,
        source: &str,
        source_ref: &SharedState,
        target: &str,
        target_ref: &SharedState,
    ) -> Result<(bool, Option<String>), SyncError> {
        let source_state = source_ref
            .lock()
            .map_err(|_| SyncError::LockPoisoned(source.to_string()))?
            .state();
        let target_state = target_ref
            .lock()
            .map_err(|_| SyncError::LockPoisoned(target.to_string()))?
            .state();

        let conflict = detect_conflict(&source_state, &target_state);
        let (winning_state, winner) = if conflict {
            let source_side = SyncSide {
                module: source,
                state: &source_state,
                version: version_marker(&source_state).unwrap_or(0),
                updated_at: self.stamp_for(source),
            };
            let target_side = SyncSide {
                module: target,
                state: &target_state,
                version: version_marker(&target_state).unwrap_or(0),
                updated_at: self.stamp_for(target),
            };
            match self.resolver.resolve(&source_side, &target_side) {
                Winner::Source => (source_state, Some(source.to_string())),
                Winner::Target => (target_state, Some(target.to_string())),
            }
        } else {
            (source_state, None)
        };

        target_ref
            .lock()
            .map_err(|_| SyncError::LockPoisoned(target.to_string()))?
            .set_state(winning_state.clone());
        self.write_store(target, winning_state);

        Ok((conflict, winner))
    }

    fn sync_all(&mut self) -> Vec<SyncOutcome> {
        let order = self.order.clone();
        if order.len() < 2 {
            return Vec::new();
        }

        let mut outcomes = Vec::with_capacity(order.len());
        for (i, source) in order.iter().enumerate() {
            let target = &order[(i + 1) % order.len()];
            match self.sync(source, target) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    // One bad pair must not abort the remaining pairs.
                    log::warn!("Fleet sync {source} -> {target} failed: {e}");
                    outcomes.push(SyncOutcome {
                        success: false,
                        status: SyncStatus::Failed,
                        conflict_detected: false,
                        source_module: source.clone(),
                        target_module: target.clone(),
                    });
                }
            }
        }
        outcomes
    }

    fn get_state(&self, name: &str) -> Option<Value> {
        self.store.get(name).map(|stored| stored.value.clone())
    }

    fn set_state(&mut self, name: &str, state: Value) -> Result<(), SyncError> {
        let module = self
            .modules
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::ModuleNotRegistered(name.to_string()))?;
        module
            .lock()
            .map_err(|_| SyncError::LockPoisoned(name.to_string()))?
            .set_state(state.clone());
        self.write_store(name, state);
        Ok(())
    }

    fn create_snapshot(&mut self) -> StateSnapshot {
        let mut modules = HashMap::new();
        for name in &self.order {
            let Some(module) = self.modules.get(name) else {
                continue;
            };
            match module.lock() {
                Ok(module) => {
                    let state = module.state();
                    modules.insert(name.clone(), state);
                }
                Err(_) => log::warn!("Snapshot skipped poisoned module '{name}'."),
            }
        }
        // Refresh the internal copies with what was captured.
        for (name, state) in &modules {
            self.store.set(name.clone(), state.clone());
        }

        StateSnapshot {
            modules,
            timestamp: SystemTime::now(),
        }
    }

    fn restore_snapshot(&mut self, snapshot: &StateSnapshot) {
        for (name, state) in &snapshot.modules {
            if !self.modules.contains_key(name) {
                log::debug!("Snapshot entry '{name}' skipped: no longer registered.");
                continue;
            }
            if let Err(e) = self.set_state(name, state.clone()) {
                log::warn!("Snapshot restore failed for '{name}': {e}");
            }
        }
    }

    fn write_store(&mut self, name: &str, state: Value) {
        self.store.set(name, state.clone());
        let _ = self.events_tx.send(StateChangeEvent::new(name, state));
    }

    fn stamp_for(&self, name: &str) -> SystemTime {
        self.store
            .get(name)
            .map(|stored| stored.updated_at)
            .unwrap_or_else(SystemTime::now)
    }

    fn clear_registrations(&mut self) {
        self.modules.clear();
        self.order.clear();
        self.store.clear();
    }
}

/// Keeps the externally observable state of registered modules convergent.
///
/// The manager holds non-owning references: it never destroys a module it
/// did not create, and unregistering only discards the internal state copy.
///
/// Fleet ordering: [`sync_all`](Self::sync_all) walks the registration
/// order and synchronizes each module into its successor, wrapping around,
/// so a fleet of `n ≥ 2` modules yields `n` outcomes per pass.
pub struct StateSyncManager {
    config: StateSyncConfig,
    engine: Arc<Mutex<SyncEngine>>,
    scheduler: SyncScheduler,
    events: EventBus<StateChangeEvent>,
}

impl StateSyncManager {
    /// Creates a manager from its configuration. Call
    /// [`initialize`](Self::initialize) to start automatic synchronization.
    pub fn new(config: StateSyncConfig) -> Self {
        let events = EventBus::new();
        let engine = SyncEngine {
            modules: HashMap::new(),
            order: Vec::new(),
            store: StateStore::new(),
            history: SyncHistory::new(config.max_history_size),
            enable_history: config.enable_history,
            resolver: ConflictResolver::new(config.conflict_resolution),
            counters: SyncCounters::default(),
            events_tx: events.sender(),
        };

        Self {
            config,
            engine: Arc::new(Mutex::new(engine)),
            scheduler: SyncScheduler::new(),
            events,
        }
    }

    /// Starts the auto-sync worker when `enable_auto_sync` is set.
    pub fn initialize(&mut self) {
        if !self.config.enable_auto_sync || self.scheduler.is_running() {
            return;
        }
        let engine = Arc::clone(&self.engine);
        self.scheduler.start(self.config.sync_interval, move || {
            let outcomes = engine.lock().unwrap().sync_all();
            log::trace!("Auto-sync pass: {} pair(s).", outcomes.len());
        });
    }

    /// Registers `module` under `name` and captures its current state.
    ///
    /// Fails when the name is already registered.
    pub fn register_module(&self, name: &str, module: SharedState) -> Result<(), SyncError> {
        self.engine.lock().unwrap().register(name, module)
    }

    /// Removes the module and discards its stored state. Removing an
    /// unregistered name is a no-op, not an error.
    pub fn unregister_module(&self, name: &str) {
        self.engine.lock().unwrap().unregister(name);
    }

    /// Synchronizes `source` into `target`, resolving conflicts with the
    /// configured strategy and recording the outcome.
    pub fn sync(&self, source: &str, target: &str) -> Result<SyncOutcome, SyncError> {
        self.engine.lock().unwrap().sync(source, target)
    }

    /// Synchronizes the whole fleet in ring order (see the type docs).
    /// A failure on one pair never aborts the remaining pairs.
    pub fn sync_all(&self) -> Vec<SyncOutcome> {
        self.engine.lock().unwrap().sync_all()
    }

    /// Returns the manager's copy of a module's state, or `None` for an
    /// unregistered module.
    pub fn get_module_state(&self, name: &str) -> Option<Value> {
        self.engine.lock().unwrap().get_state(name)
    }

    /// Writes `state` directly into the module and the internal store,
    /// bypassing conflict resolution.
    pub fn set_module_state(&self, name: &str, state: Value) -> Result<(), SyncError> {
        self.engine.lock().unwrap().set_state(name, state)
    }

    /// Captures every registered module's current state.
    pub fn create_snapshot(&self) -> StateSnapshot {
        self.engine.lock().unwrap().create_snapshot()
    }

    /// Writes every snapshot entry back into its module, skipping names no
    /// longer registered.
    pub fn restore_snapshot(&self, snapshot: &StateSnapshot) {
        self.engine.lock().unwrap().restore_snapshot(snapshot);
    }

    /// Returns the bounded history for an ordered pair, oldest first.
    pub fn get_sync_history(&self, source: &str, target: &str) -> Vec<SyncRecord> {
        self.engine.lock().unwrap().history.for_pair(source, target)
    }

    /// Aggregate counters over every synchronization attempt.
    pub fn get_metrics(&self) -> SyncMetrics {
        let engine = self.engine.lock().unwrap();
        SyncMetrics::from_counters(&engine.counters, engine.modules.len())
    }

    /// Zeroes the aggregate counters without touching registrations or
    /// history.
    pub fn reset_metrics(&self) {
        self.engine.lock().unwrap().counters.reset();
    }

    /// Receiver for state-change notifications.
    pub fn state_events(&self) -> &flume::Receiver<StateChangeEvent> {
        self.events.receiver()
    }

    /// Returns `true` while the auto-sync worker is running.
    pub fn is_auto_syncing(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Stops the auto-sync worker and clears all registrations. Safe to
    /// call multiple times.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.engine.lock().unwrap().clear_registrations();
    }
}

impl Drop for StateSyncManager {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictResolutionStrategy;
    use conflux_core::StateAccess;
    use serde_json::json;
    use std::time::Duration;

    struct TestState {
        value: Value,
    }

    impl StateAccess for TestState {
        fn state(&self) -> Value {
            self.value.clone()
        }

        fn set_state(&mut self, state: Value) {
            self.value = state;
        }
    }

    fn stub(value: Value) -> Arc<Mutex<TestState>> {
        Arc::new(Mutex::new(TestState { value }))
    }

    fn manager() -> StateSyncManager {
        StateSyncManager::new(StateSyncConfig::default())
    }

    #[test]
    fn registration_captures_the_module_state() {
        let manager = manager();
        manager
            .register_module("analytics", stub(json!({"value": "test"})))
            .unwrap();

        assert_eq!(
            manager.get_module_state("analytics"),
            Some(json!({"value": "test"}))
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let manager = manager();
        manager.register_module("m", stub(json!(1))).unwrap();

        let err = manager.register_module("m", stub(json!(2))).unwrap_err();
        assert!(matches!(err, SyncError::AlreadyRegistered(name) if name == "m"));
    }

    #[test]
    fn unregister_discards_state_and_tolerates_unknown_names() {
        let manager = manager();
        manager.register_module("m", stub(json!(1))).unwrap();

        manager.unregister_module("m");
        assert_eq!(manager.get_module_state("m"), None);

        manager.unregister_module("never-registered");
    }

    #[test]
    fn sync_without_conflict_overwrites_the_target() {
        let manager = manager();
        let target = stub(json!({"value": "target"}));
        manager
            .register_module("source", stub(json!({"value": "source"})))
            .unwrap();
        manager.register_module("target", target.clone()).unwrap();

        let outcome = manager.sync("source", "target").unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.status, SyncStatus::Completed);
        assert!(!outcome.conflict_detected);
        assert_eq!(target.lock().unwrap().value, json!({"value": "source"}));
        assert_eq!(
            manager.get_module_state("target"),
            Some(json!({"value": "source"}))
        );
    }

    #[test]
    fn conflicting_versions_are_detected() {
        let manager = manager();
        manager
            .register_module("source", stub(json!({"value": "source", "version": 2})))
            .unwrap();
        manager
            .register_module("target", stub(json!({"value": "target", "version": 3})))
            .unwrap();

        let outcome = manager.sync("source", "target").unwrap();

        assert!(outcome.success);
        assert!(outcome.conflict_detected);
    }

    #[test]
    fn last_write_wins_keeps_the_higher_version() {
        let manager = manager();
        let target = stub(json!({"value": "target", "version": 3}));
        manager
            .register_module("source", stub(json!({"value": "source", "version": 2})))
            .unwrap();
        manager.register_module("target", target.clone()).unwrap();

        manager.sync("source", "target").unwrap();

        assert_eq!(
            target.lock().unwrap().value,
            json!({"value": "target", "version": 3})
        );
    }

    #[test]
    fn first_write_wins_keeps_the_lower_version() {
        let mut manager = StateSyncManager::new(StateSyncConfig {
            conflict_resolution: ConflictResolutionStrategy::FirstWriteWins,
            ..Default::default()
        });
        let target = stub(json!({"value": "target", "version": 3}));
        manager
            .register_module("source", stub(json!({"value": "source", "version": 2})))
            .unwrap();
        manager.register_module("target", target.clone()).unwrap();

        manager.sync("source", "target").unwrap();

        assert_eq!(
            target.lock().unwrap().value,
            json!({"value": "source", "version": 2})
        );
        manager.shutdown();
    }

    #[test]
    fn repeated_sync_under_last_write_wins_is_idempotent() {
        let manager = manager();
        let target = stub(json!({"value": "target", "version": 3}));
        manager
            .register_module("source", stub(json!({"value": "source", "version": 2})))
            .unwrap();
        manager.register_module("target", target.clone()).unwrap();

        manager.sync("source", "target").unwrap();
        manager.sync("source", "target").unwrap();

        assert_eq!(
            target.lock().unwrap().value,
            json!({"value": "target", "version": 3})
        );
    }

    #[test]
    fn sync_against_unregistered_module_is_an_error() {
        let manager = manager();
        manager.register_module("only", stub(json!(1))).unwrap();

        let err = manager.sync("only", "ghost").unwrap_err();
        assert!(matches!(err, SyncError::ModuleNotRegistered(name) if name == "ghost"));
    }

    #[test]
    fn history_is_recorded_per_pair_and_bounded() {
        let mut manager = StateSyncManager::new(StateSyncConfig {
            max_history_size: 2,
            ..Default::default()
        });
        manager
            .register_module("source", stub(json!({"value": "source"})))
            .unwrap();
        manager
            .register_module("target", stub(json!({"value": "target"})))
            .unwrap();

        for _ in 0..5 {
            manager.sync("source", "target").unwrap();
        }

        let history = manager.get_sync_history("source", "target");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].source_module, "source");
        assert_eq!(history[0].target_module, "target");
        assert!(manager.get_sync_history("target", "source").is_empty());
        manager.shutdown();
    }

    #[test]
    fn sync_all_walks_the_ring_and_isolates_failures() {
        let manager = manager();
        for name in ["m1", "m2", "m3"] {
            manager
                .register_module(name, stub(json!({"value": name})))
                .unwrap();
        }

        let outcomes = manager.sync_all();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.success));
        assert_eq!(outcomes[0].source_module, "m1");
        assert_eq!(outcomes[0].target_module, "m2");
        assert_eq!(outcomes[2].source_module, "m3");
        assert_eq!(outcomes[2].target_module, "m1");
    }

    #[test]
    fn sync_all_with_fewer_than_two_modules_does_nothing() {
        let manager = manager();
        assert!(manager.sync_all().is_empty());

        manager.register_module("solo", stub(json!(1))).unwrap();
        assert!(manager.sync_all().is_empty());
    }

    #[test]
    fn set_module_state_updates_module_and_store() {
        let manager = manager();
        let module = stub(json!({"value": "old"}));
        manager.register_module("m", module.clone()).unwrap();

        manager.set_module_state("m", json!({"value": "new"})).unwrap();

        assert_eq!(module.lock().unwrap().value, json!({"value": "new"}));
        assert_eq!(manager.get_module_state("m"), Some(json!({"value": "new"})));
    }

    #[test]
    fn state_changes_are_published() {
        let manager = manager();
        manager.register_module("m", stub(json!(0))).unwrap();

        manager.set_module_state("m", json!(1)).unwrap();

        let events: Vec<StateChangeEvent> = manager.state_events().try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].module, "m");
        assert_eq!(events[0].state, json!(1));
    }

    #[test]
    fn snapshot_captures_every_registered_module() {
        let manager = manager();
        manager
            .register_module("m1", stub(json!({"value": "one"})))
            .unwrap();
        manager
            .register_module("m2", stub(json!({"value": "two"})))
            .unwrap();

        let snapshot = manager.create_snapshot();

        assert_eq!(snapshot.modules.len(), 2);
        assert_eq!(snapshot.modules["m1"], json!({"value": "one"}));
        assert_eq!(snapshot.modules["m2"], json!({"value": "two"}));
    }

    #[test]
    fn restore_pushes_states_back_and_skips_unregistered_names() {
        let manager = manager();
        let module = stub(json!({"value": "current"}));
        manager.register_module("m", module.clone()).unwrap();

        let mut modules = HashMap::new();
        modules.insert("m".to_string(), json!({"value": "restored"}));
        modules.insert("ghost".to_string(), json!({"value": "ignored"}));
        let snapshot = StateSnapshot {
            modules,
            timestamp: SystemTime::now(),
        };

        manager.restore_snapshot(&snapshot);

        assert_eq!(module.lock().unwrap().value, json!({"value": "restored"}));
        assert_eq!(manager.get_module_state("ghost"), None);
    }

    #[test]
    fn metrics_count_attempts_and_reset_keeps_registrations() {
        let manager = manager();
        manager.register_module("source", stub(json!(1))).unwrap();
        manager.register_module("target", stub(json!(2))).unwrap();

        manager.sync("source", "target").unwrap();

        let metrics = manager.get_metrics();
        assert_eq!(metrics.total_syncs, 1);
        assert_eq!(metrics.successful_syncs, 1);
        assert_eq!(metrics.failed_syncs, 0);
        assert_eq!(metrics.registered_modules, 2);

        manager.reset_metrics();
        let metrics = manager.get_metrics();
        assert_eq!(metrics.total_syncs, 0);
        assert_eq!(metrics.registered_modules, 2);
    }

    #[test]
    fn auto_sync_runs_without_external_calls() {
        let mut manager = StateSyncManager::new(StateSyncConfig {
            enable_auto_sync: true,
            sync_interval: Duration::from_millis(10),
            ..Default::default()
        });
        manager
            .register_module("source", stub(json!({"value": "source"})))
            .unwrap();
        let target = stub(json!({"value": "target"}));
        manager.register_module("target", target.clone()).unwrap();

        manager.initialize();
        assert!(manager.is_auto_syncing());
        std::thread::sleep(Duration::from_millis(60));
        manager.shutdown();

        assert!(!manager.is_auto_syncing());
        assert!(manager.get_metrics().total_syncs >= 2);
        assert_eq!(target.lock().unwrap().value, json!({"value": "source"}));
    }

    #[test]
    fn full_modules_participate_through_the_state_seam() {
        use conflux_core::{Module, ModuleBehavior, ModuleConfig, ModuleError, ModuleHost};

        struct CounterBehavior {
            state: Value,
        }

        impl ModuleBehavior for CounterBehavior {
            fn module_type(&self) -> &str {
                "counter"
            }

            fn version(&self) -> &str {
                "1.0.0"
            }

            fn capabilities(&self) -> Vec<String> {
                vec!["count".to_string()]
            }

            fn process_data(&mut self, payload: &Value) -> Result<Value, ModuleError> {
                Ok(payload.clone())
            }

            fn current_state(&self) -> Value {
                self.state.clone()
            }

            fn apply_state(&mut self, state: Value) {
                self.state = state;
            }
        }

        let manager = manager();
        let mut source = ModuleHost::new(
            CounterBehavior {
                state: json!({"count": 9}),
            },
            ModuleConfig::new("source", "1.0.0"),
        );
        assert!(source.initialize(ModuleConfig::new("source", "1.0.0")).success);
        let source = source.shared();
        let target = ModuleHost::new(
            CounterBehavior {
                state: json!({"count": 0}),
            },
            ModuleConfig::new("target", "1.0.0"),
        )
        .shared();

        manager.register_module("source", source).unwrap();
        manager.register_module("target", target.clone()).unwrap();

        let outcome = manager.sync("source", "target").unwrap();

        assert!(outcome.success);
        assert_eq!(target.lock().unwrap().state(), json!({"count": 9}));
    }

    #[test]
    fn shutdown_is_idempotent_and_clears_registrations() {
        let mut manager = manager();
        manager.register_module("m", stub(json!(1))).unwrap();

        manager.shutdown();
        assert_eq!(manager.get_module_state("m"), None);
        assert_eq!(manager.get_metrics().registered_modules, 0);

        manager.shutdown();
    }
}

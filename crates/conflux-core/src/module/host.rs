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

//! The reusable module base.
//!
//! [`ModuleHost`] supplies everything a module implementation shares with
//! every other module — dependency bookkeeping, activity counters, event
//! dispatch, lifecycle orchestration — so a concrete module only provides
//! its own behavior through [`ModuleBehavior`]. Composition replaces the
//! base-class pattern: the host owns the behavior, not the other way
//! around.

use crate::event::module_event::{EventHandler, ModuleEvent};
use crate::module::config::ModuleConfig;
use crate::module::contract::{
    DataProcessingResult, DataTransferResult, HealthCheckResult, HealthStatus,
    InitializationResult, Module, ModuleError, ModuleMetrics, ModuleResult, ProcessingMetadata,
    ShutdownResult, SharedModule, StateSyncResult,
};
use crate::module::counters::ModuleCounters;
use crate::module::status::ModuleStatus;
use crate::state::StateAccess;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime};

/// The component-specific half of a module.
///
/// Implementations provide identity, the processing step for inbound data,
/// and the state accessors; the lifecycle hooks default to no-ops for
/// modules with nothing to set up or tear down.
pub trait ModuleBehavior: Send {
    /// The module's type tag (e.g. `"analytics"`).
    fn module_type(&self) -> &str;

    /// The module's semantic version.
    fn version(&self) -> &str;

    /// The capabilities this module advertises.
    fn capabilities(&self) -> Vec<String>;

    /// Component-specific setup. Runs at most once per lifecycle; a second
    /// `initialize` on a ready module does not re-enter this hook.
    fn on_initialize(&mut self, _config: &ModuleConfig) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Component-specific processing of an inbound payload.
    fn process_data(&mut self, payload: &Value) -> Result<Value, ModuleError>;

    /// The module's externally observable state.
    fn current_state(&self) -> Value;

    /// Replaces the module's externally observable state.
    fn apply_state(&mut self, state: Value);

    /// Component-specific teardown.
    fn on_shutdown(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Hosts a [`ModuleBehavior`] and implements the full [`Module`] contract
/// around it.
pub struct ModuleHost<B: ModuleBehavior> {
    behavior: B,
    config: ModuleConfig,
    status: ModuleStatus,
    initialized: bool,
    setup_done: bool,
    handlers: HashMap<String, Vec<EventHandler>>,
    dependencies: HashMap<String, SharedModule>,
    counters: ModuleCounters,
}

impl<B: ModuleBehavior> ModuleHost<B> {
    /// Creates an uninitialized host around `behavior`.
    pub fn new(behavior: B, config: ModuleConfig) -> Self {
        Self {
            behavior,
            config,
            status: ModuleStatus::Uninitialized,
            initialized: false,
            setup_done: false,
            handlers: HashMap::new(),
            dependencies: HashMap::new(),
            counters: ModuleCounters::new(),
        }
    }

    /// Wraps the host for shared, non-owning registration with peers.
    pub fn shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    /// The name this module is known by to its peers.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Immutable access to the hosted behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    fn fail_initialization(&mut self, message: String) -> InitializationResult {
        self.status = ModuleStatus::Degraded;
        log::warn!("Module '{}' failed to initialize: {message}", self.config.name);
        InitializationResult {
            success: false,
            message,
            initialized_at: SystemTime::now(),
        }
    }
}

impl<B: ModuleBehavior> StateAccess for ModuleHost<B> {
    fn state(&self) -> Value {
        self.behavior.current_state()
    }

    fn set_state(&mut self, state: Value) {
        self.behavior.apply_state(state);
    }
}

impl<B: ModuleBehavior> Module for ModuleHost<B> {
    fn module_type(&self) -> String {
        self.behavior.module_type().to_string()
    }

    fn version(&self) -> String {
        self.behavior.version().to_string()
    }

    fn capabilities(&self) -> Vec<String> {
        self.behavior.capabilities()
    }

    fn status(&self) -> ModuleStatus {
        self.status
    }

    fn initialize(&mut self, config: ModuleConfig) -> InitializationResult {
        if self.initialized && self.status == ModuleStatus::Ready {
            // Re-initializing a ready module is a no-op success; component
            // setup must not run twice.
            return InitializationResult {
                success: true,
                message: format!("{} module already initialized", self.behavior.module_type()),
                initialized_at: SystemTime::now(),
            };
        }

        self.status = ModuleStatus::Initializing;
        self.config = config;

        if !self.setup_done {
            if let Err(e) = self.behavior.on_initialize(&self.config) {
                return self.fail_initialization(format!(
                    "{} module setup failed: {e}",
                    self.behavior.module_type()
                ));
            }
            self.setup_done = true;
        }

        let missing = self
            .config
            .dependencies
            .iter()
            .find(|name| !self.dependencies.contains_key(*name))
            .cloned();
        if let Some(name) = missing {
            let error = ModuleError::DependencyMissing(name);
            return self.fail_initialization(format!(
                "{} module initialization failed: {error}",
                self.behavior.module_type()
            ));
        }

        self.initialized = true;
        self.status = ModuleStatus::Ready;
        self.counters.touch();
        log::info!("Module '{}' initialized.", self.config.name);

        InitializationResult {
            success: true,
            message: format!("{} module initialized", self.behavior.module_type()),
            initialized_at: SystemTime::now(),
        }
    }

    fn send_data(&mut self, target: &str, payload: Value) -> ModuleResult<DataTransferResult> {
        if self.status != ModuleStatus::Ready {
            return Err(ModuleError::NotInitialized);
        }

        let peer = self
            .dependencies
            .get(target)
            .cloned()
            .ok_or_else(|| ModuleError::TargetNotFound(target.to_string()))?;

        let transferred_bytes = serde_json::to_string(&payload).map(|s| s.len()).unwrap_or(0);
        let start = Instant::now();

        {
            let mut peer = peer
                .lock()
                .map_err(|_| ModuleError::ProcessingFailed(format!("peer '{target}' poisoned")))?;
            peer.receive_data(&self.config.name, payload);
        }

        let transfer_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.counters.record_transfer(transfer_time_ms);

        Ok(DataTransferResult {
            success: true,
            target_module: target.to_string(),
            transferred_bytes,
            transfer_time_ms,
        })
    }

    fn receive_data(&mut self, source: &str, payload: Value) -> DataProcessingResult {
        let start = Instant::now();
        self.counters.record_receive();

        let (success, processed_data) = match self.behavior.process_data(&payload) {
            Ok(processed) => (true, processed),
            Err(e) => {
                log::warn!(
                    "Module '{}' failed to process data from '{source}': {e}",
                    self.config.name
                );
                (false, Value::Null)
            }
        };

        DataProcessingResult {
            success,
            processed_data,
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            metadata: ProcessingMetadata {
                source_module: source.to_string(),
                processed_at: SystemTime::now(),
            },
        }
    }

    fn sync_state(&mut self, target: &str) -> ModuleResult<StateSyncResult> {
        let peer = self
            .dependencies
            .get(target)
            .cloned()
            .ok_or_else(|| ModuleError::TargetNotFound(target.to_string()))?;

        let state = self.behavior.current_state();
        {
            let mut peer = peer
                .lock()
                .map_err(|_| ModuleError::ProcessingFailed(format!("peer '{target}' poisoned")))?;
            peer.receive_data(&self.config.name, state);
        }
        self.counters.record_sync();

        Ok(StateSyncResult {
            success: true,
            target_module: target.to_string(),
            synced_at: SystemTime::now(),
        })
    }

    fn publish_event(&mut self, event: ModuleEvent) {
        if let Some(handlers) = self.handlers.get(&event.event_type) {
            for handler in handlers {
                if let Err(e) = handler(&event) {
                    log::warn!(
                        "Handler for '{}' on module '{}' failed: {e}",
                        event.event_type,
                        self.config.name
                    );
                }
            }
        }
        self.counters.record_publish();
    }

    fn subscribe_event(&mut self, event_type: &str, handler: EventHandler) {
        self.handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
        self.counters.record_subscribe();
    }

    fn health_check(&self) -> HealthCheckResult {
        let mut metrics = HashMap::new();
        metrics.insert("data_transfers".to_string(), self.counters.data_transfers as f64);
        metrics.insert("data_received".to_string(), self.counters.data_received as f64);
        metrics.insert("state_syncs".to_string(), self.counters.state_syncs as f64);
        metrics.insert(
            "events_published".to_string(),
            self.counters.events_published as f64,
        );
        metrics.insert(
            "events_subscribed".to_string(),
            self.counters.events_subscribed as f64,
        );
        metrics.insert("response_time_ms".to_string(), self.counters.last_transfer_ms);

        let status = if !self.initialized {
            HealthStatus::NotInitialized
        } else {
            let budget = self.config.performance.max_response_time_ms as f64;
            let response_time = self.counters.last_transfer_ms;
            if response_time > budget * 2.0 {
                HealthStatus::Unhealthy
            } else if response_time > budget {
                HealthStatus::Degraded
            } else {
                HealthStatus::Healthy
            }
        };

        HealthCheckResult {
            healthy: self.initialized && status == HealthStatus::Healthy,
            status,
            module_type: self.behavior.module_type().to_string(),
            version: self.behavior.version().to_string(),
            checked_at: SystemTime::now(),
            metrics,
        }
    }

    fn shutdown(&mut self) -> ShutdownResult {
        if self.status == ModuleStatus::Shutdown {
            return ShutdownResult {
                success: true,
                message: format!("{} module already shut down", self.behavior.module_type()),
                shutdown_at: SystemTime::now(),
            };
        }

        self.status = ModuleStatus::ShuttingDown;

        if let Err(e) = self.behavior.on_shutdown() {
            self.status = ModuleStatus::Degraded;
            return ShutdownResult {
                success: false,
                message: format!("{} module teardown failed: {e}", self.behavior.module_type()),
                shutdown_at: SystemTime::now(),
            };
        }

        self.handlers.clear();
        self.dependencies.clear();
        self.counters.clear();
        self.initialized = false;
        self.setup_done = false;
        self.status = ModuleStatus::Shutdown;
        log::info!("Module '{}' shut down.", self.config.name);

        ShutdownResult {
            success: true,
            message: format!("{} module shut down", self.behavior.module_type()),
            shutdown_at: SystemTime::now(),
        }
    }

    fn add_dependency(&mut self, name: &str, module: SharedModule) {
        self.dependencies.insert(name.to_string(), module);
        self.counters.touch();
    }

    fn remove_dependency(&mut self, name: &str) {
        self.dependencies.remove(name);
        self.counters.touch();
    }

    fn metrics(&self) -> ModuleMetrics {
        let mut dependencies: Vec<String> = self.dependencies.keys().cloned().collect();
        dependencies.sort();

        ModuleMetrics {
            module_type: self.behavior.module_type().to_string(),
            version: self.behavior.version().to_string(),
            initialized: self.initialized,
            dependencies,
            counters: self.counters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A minimal behavior that echoes payloads and keeps a JSON state.
    struct EchoBehavior {
        state: Value,
        fail_processing: bool,
        setup_calls: u32,
    }

    impl EchoBehavior {
        fn new() -> Self {
            Self {
                state: json!({}),
                fail_processing: false,
                setup_calls: 0,
            }
        }
    }

    impl ModuleBehavior for EchoBehavior {
        fn module_type(&self) -> &str {
            "echo"
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        fn capabilities(&self) -> Vec<String> {
            vec!["echo".to_string()]
        }

        fn on_initialize(&mut self, _config: &ModuleConfig) -> Result<(), ModuleError> {
            self.setup_calls += 1;
            Ok(())
        }

        fn process_data(&mut self, payload: &Value) -> Result<Value, ModuleError> {
            if self.fail_processing {
                return Err(ModuleError::ProcessingFailed("forced failure".to_string()));
            }
            Ok(payload.clone())
        }

        fn current_state(&self) -> Value {
            self.state.clone()
        }

        fn apply_state(&mut self, state: Value) {
            self.state = state;
        }
    }

    fn ready_host(name: &str) -> ModuleHost<EchoBehavior> {
        let mut host = ModuleHost::new(EchoBehavior::new(), ModuleConfig::new(name, "1.0.0"));
        let result = host.initialize(ModuleConfig::new(name, "1.0.0"));
        assert!(result.success);
        host
    }

    #[test]
    fn health_check_before_initialize_reports_not_initialized() {
        let host = ModuleHost::new(EchoBehavior::new(), ModuleConfig::new("echo", "1.0.0"));
        let health = host.health_check();

        assert!(!health.healthy);
        assert_eq!(health.status, HealthStatus::NotInitialized);
        assert_eq!(health.module_type, "echo");
    }

    #[test]
    fn initialize_fails_when_declared_dependency_is_absent() {
        let mut host = ModuleHost::new(EchoBehavior::new(), ModuleConfig::new("echo", "1.0.0"));
        let config = ModuleConfig::new("echo", "1.0.0").with_dependency("storage");

        let result = host.initialize(config);

        assert!(!result.success);
        assert!(result.message.contains("storage"));
        assert_eq!(host.status(), ModuleStatus::Degraded);
    }

    #[test]
    fn initialize_succeeds_after_dependency_is_registered() {
        let peer = ready_host("storage").shared();
        let mut host = ModuleHost::new(EchoBehavior::new(), ModuleConfig::new("echo", "1.0.0"));
        host.add_dependency("storage", peer);

        let result = host.initialize(ModuleConfig::new("echo", "1.0.0").with_dependency("storage"));

        assert!(result.success);
        assert_eq!(host.status(), ModuleStatus::Ready);
    }

    #[test]
    fn second_initialize_does_not_rerun_setup() {
        let mut host = ready_host("echo");
        let again = host.initialize(ModuleConfig::new("echo", "1.0.0"));

        assert!(again.success);
        assert_eq!(host.behavior().setup_calls, 1);
    }

    #[test]
    fn send_data_requires_initialization() {
        let mut host = ModuleHost::new(EchoBehavior::new(), ModuleConfig::new("echo", "1.0.0"));
        let err = host.send_data("anywhere", json!(1)).unwrap_err();
        assert!(matches!(err, ModuleError::NotInitialized));
    }

    #[test]
    fn send_data_to_unknown_target_fails() {
        let mut host = ready_host("echo");
        let err = host.send_data("missing", json!(1)).unwrap_err();
        assert!(matches!(err, ModuleError::TargetNotFound(name) if name == "missing"));
    }

    #[test]
    fn send_data_reaches_target_and_updates_both_counters() {
        let target = ready_host("sink").shared();
        let mut sender = ready_host("echo");
        sender.add_dependency("sink", target.clone());

        let result = sender.send_data("sink", json!({"n": 42})).unwrap();

        assert!(result.success);
        assert_eq!(result.target_module, "sink");
        assert!(result.transferred_bytes > 0);
        assert_eq!(sender.metrics().counters.data_transfers, 1);
        assert_eq!(target.lock().unwrap().metrics().counters.data_received, 1);
    }

    #[test]
    fn receive_data_counts_even_when_processing_fails() {
        let mut host = ready_host("echo");
        host.behavior.fail_processing = true;

        let result = host.receive_data("peer", json!(1));

        assert!(!result.success);
        assert_eq!(result.processed_data, Value::Null);
        assert_eq!(result.metadata.source_module, "peer");
        assert_eq!(host.metrics().counters.data_received, 1);
    }

    #[test]
    fn sync_state_pushes_current_state_to_target() {
        let target = ready_host("sink").shared();
        let mut source = ready_host("echo");
        source.behavior.state = json!({"value": "fresh"});
        source.add_dependency("sink", target.clone());

        let result = source.sync_state("sink").unwrap();

        assert!(result.success);
        assert_eq!(source.metrics().counters.state_syncs, 1);
        assert_eq!(target.lock().unwrap().metrics().counters.data_received, 1);
    }

    #[test]
    fn handlers_run_in_subscription_order_and_errors_do_not_stop_the_rest() {
        let mut host = ready_host("echo");
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        host.subscribe_event(
            "tick",
            Box::new(move |_| {
                first.lock().unwrap().push(1);
                Err(ModuleError::HandlerFailed("first always fails".to_string()))
            }),
        );
        let second = Arc::clone(&order);
        host.subscribe_event(
            "tick",
            Box::new(move |_| {
                second.lock().unwrap().push(2);
                Ok(())
            }),
        );

        host.publish_event(ModuleEvent::new("tick", "echo", Value::Null));

        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
        assert_eq!(host.metrics().counters.events_published, 1);
        assert_eq!(host.metrics().counters.events_subscribed, 2);
    }

    #[test]
    fn shutdown_clears_everything_and_is_idempotent() {
        let peer = ready_host("sink").shared();
        let mut host = ready_host("echo");
        host.add_dependency("sink", peer);
        host.send_data("sink", json!(1)).unwrap();

        let first = host.shutdown();
        assert!(first.success);
        assert_eq!(host.status(), ModuleStatus::Shutdown);
        assert_eq!(host.metrics().counters.data_transfers, 0);
        assert!(host.metrics().dependencies.is_empty());

        let second = host.shutdown();
        assert!(second.success);
        assert_eq!(host.status(), ModuleStatus::Shutdown);
    }

    #[test]
    fn add_dependency_overwrites_existing_entry() {
        let first = ready_host("a").shared();
        let second = ready_host("b").shared();
        let mut host = ready_host("echo");

        host.add_dependency("peer", first);
        host.add_dependency("peer", second);

        assert_eq!(host.metrics().dependencies, vec!["peer"]);
    }

    #[test]
    fn state_access_round_trip() {
        let mut host = ready_host("echo");
        host.set_state(json!({"cursor": 7}));
        assert_eq!(host.state(), json!({"cursor": 7}));
    }
}

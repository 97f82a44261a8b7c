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

//! A small driver wiring two modules, the sync manager, and the monitor.

use conflux_core::flow::{FlowOptions, FlowRouter};
use conflux_core::{Module, ModuleBehavior, ModuleConfig, ModuleError, ModuleHost, StateAccess};
use conflux_monitor::{MetricKind, MonitoringConfig, PerformanceMonitor, SystemCollector};
use conflux_sync::{StateSyncConfig, StateSyncManager};
use serde_json::{json, Value};
use std::time::Duration;

struct LedgerBehavior {
    state: Value,
}

impl ModuleBehavior for LedgerBehavior {
    fn module_type(&self) -> &str {
        "ledger"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn capabilities(&self) -> Vec<String> {
        vec!["record".to_string()]
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

fn ledger(name: &str, entries: u64, version: u64) -> ModuleHost<LedgerBehavior> {
    let mut host = ModuleHost::new(
        LedgerBehavior {
            state: json!({"entries": entries, "version": version}),
        },
        ModuleConfig::new(name, "0.1.0"),
    );
    let result = host.initialize(ModuleConfig::new(name, "0.1.0"));
    assert!(result.success, "{}", result.message);
    host
}

fn main() {
    env_logger::init();

    let primary = ledger("primary", 42, 7).shared();
    let replica = ledger("replica", 17, 3).shared();

    let mut manager = StateSyncManager::new(StateSyncConfig {
        enable_auto_sync: true,
        sync_interval: Duration::from_millis(200),
        ..Default::default()
    });
    manager.register_module("primary", primary.clone()).unwrap();
    manager.register_module("replica", replica.clone()).unwrap();
    manager.initialize();

    let mut monitor = PerformanceMonitor::new(MonitoringConfig {
        check_interval: Duration::from_millis(500),
        ..Default::default()
    });
    monitor.initialize();

    let mut collector = SystemCollector::new("host");
    for _ in 0..5 {
        collector.sample(&monitor);
        std::thread::sleep(Duration::from_millis(250));
    }

    let outcome = manager.sync("primary", "replica").unwrap();
    log::info!(
        "Manual sync {} -> {}: success={}, conflict={}",
        outcome.source_module,
        outcome.target_module,
        outcome.success,
        outcome.conflict_detected
    );
    monitor.record_metric(
        MetricKind::ResponseTime,
        "sync",
        manager.get_metrics().average_duration_ms,
        "ms",
    );

    let mut router = FlowRouter::new();
    let audit = replica.clone();
    router.register_route(
        "replica",
        Box::new(move |payload| {
            let mut replica = audit.lock().expect("replica lock");
            Ok(replica.receive_data("router", payload.clone()).processed_data)
        }),
    );
    let flow = router
        .send("primary", "replica", json!({"op": "append", "entries": 1}), &FlowOptions::default())
        .expect("flow delivery");
    log::info!("Flow {} delivered in {:.2}ms", flow.flow_id, flow.duration_ms);

    println!("replica state: {}", replica.lock().unwrap().state());
    println!("sync metrics: {:?}", manager.get_metrics());
    println!(
        "host cpu stats: {:?}",
        monitor.get_metric_stats("host", MetricKind::Cpu)
    );
    println!(
        "health: {:?}",
        primary.lock().unwrap().health_check().status
    );

    monitor.shutdown();
    manager.shutdown();
}

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

//! The module runtime contract.
//!
//! Defines the lifecycle, data-exchange, event, and health-check contract
//! every pluggable module implements ([`contract::Module`]), and a reusable
//! host ([`host::ModuleHost`]) that supplies dependency bookkeeping, counters,
//! and event dispatch so concrete modules only implement their own behavior.

pub mod config;
pub mod contract;
pub mod counters;
pub mod host;
pub mod status;

pub use self::config::{ModuleConfig, PerformanceSettings};
pub use self::contract::{
    DataProcessingResult, DataTransferResult, HealthCheckResult, HealthStatus,
    InitializationResult, Module, ModuleError, ModuleMetrics, ModuleResult, ShutdownResult,
    SharedModule, StateSyncResult,
};
pub use self::counters::ModuleCounters;
pub use self::host::{ModuleBehavior, ModuleHost};
pub use self::status::ModuleStatus;

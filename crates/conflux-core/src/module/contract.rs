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

//! The contract every pluggable module implements, and its result records.
//!
//! Operations that routinely fail for structural reasons (`send_data` on an
//! uninitialized module, an unknown target name) return [`ModuleResult`];
//! `initialize` deliberately never errors and instead reports through
//! [`InitializationResult`] so callers can inspect `success`/`message`
//! without exception handling.

use crate::event::module_event::{EventHandler, ModuleEvent};
use crate::module::config::ModuleConfig;
use crate::module::counters::ModuleCounters;
use crate::module::status::ModuleStatus;
use crate::state::StateAccess;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// A shared, non-owning handle to a module registered as a peer.
///
/// Holders never destroy the module behind the handle; dropping the handle
/// only releases the reference.
pub type SharedModule = Arc<Mutex<dyn Module>>;

/// A specialized `Result` type for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;

/// An error raised by a module operation.
#[derive(Debug, Clone)]
pub enum ModuleError {
    /// The operation requires a successfully initialized caller.
    NotInitialized,
    /// The named target is not among the caller's registered dependencies.
    TargetNotFound(String),
    /// A declared dependency was absent at initialization time.
    DependencyMissing(String),
    /// Component-specific processing failed.
    ProcessingFailed(String),
    /// An event handler reported a failure.
    HandlerFailed(String),
}

impl Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::NotInitialized => write!(f, "module is not initialized"),
            ModuleError::TargetNotFound(name) => write!(f, "target module not found: {name}"),
            ModuleError::DependencyMissing(name) => {
                write!(f, "declared dependency not registered: {name}")
            }
            ModuleError::ProcessingFailed(msg) => write!(f, "processing failed: {msg}"),
            ModuleError::HandlerFailed(msg) => write!(f, "event handler failed: {msg}"),
        }
    }
}

impl std::error::Error for ModuleError {}

/// Outcome of `initialize`. Always returned, never thrown.
#[derive(Debug, Clone, Serialize)]
pub struct InitializationResult {
    /// Whether initialization completed.
    pub success: bool,
    /// Human-readable explanation, useful on failure.
    pub message: String,
    /// When the attempt finished.
    pub initialized_at: SystemTime,
}

/// Outcome of a completed `send_data`.
#[derive(Debug, Clone, Serialize)]
pub struct DataTransferResult {
    /// Whether the transfer completed.
    pub success: bool,
    /// The dependency that received the payload.
    pub target_module: String,
    /// Serialized size of the payload.
    pub transferred_bytes: usize,
    /// Elapsed transfer time in milliseconds.
    pub transfer_time_ms: f64,
}

/// Outcome of `receive_data`.
#[derive(Debug, Clone, Serialize)]
pub struct DataProcessingResult {
    /// Whether component-specific processing succeeded.
    pub success: bool,
    /// The processed payload, or `Value::Null` when processing failed.
    pub processed_data: Value,
    /// Elapsed processing time in milliseconds.
    pub processing_time_ms: f64,
    /// Provenance of the processed payload.
    pub metadata: ProcessingMetadata,
}

/// Provenance attached to every processing result.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingMetadata {
    /// The module that sent the payload.
    pub source_module: String,
    /// When processing finished.
    pub processed_at: SystemTime,
}

/// Outcome of a completed `sync_state`.
#[derive(Debug, Clone, Serialize)]
pub struct StateSyncResult {
    /// Whether the push completed.
    pub success: bool,
    /// The dependency the state was pushed to.
    pub target_module: String,
    /// When the push finished.
    pub synced_at: SystemTime,
}

/// Qualitative health of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Initialized and within its performance thresholds.
    Healthy,
    /// Initialized but slower than its configured response-time budget.
    Degraded,
    /// Initialized but slower than twice its response-time budget.
    Unhealthy,
    /// `initialize` never completed successfully.
    NotInitialized,
}

/// Outcome of `health_check`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    /// `true` only when the module is initialized and `Healthy`.
    pub healthy: bool,
    /// The qualitative status backing `healthy`.
    pub status: HealthStatus,
    /// The module's type tag.
    pub module_type: String,
    /// The module's version.
    pub version: String,
    /// When the check ran.
    pub checked_at: SystemTime,
    /// Numeric observations backing the verdict (counters, response time).
    pub metrics: HashMap<String, f64>,
}

/// Outcome of `shutdown`.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownResult {
    /// Whether teardown completed.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
    /// When teardown finished.
    pub shutdown_at: SystemTime,
}

/// A snapshot of a module's identity and accumulated counters.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleMetrics {
    /// The module's type tag.
    pub module_type: String,
    /// The module's version.
    pub version: String,
    /// Whether `initialize` has completed successfully.
    pub initialized: bool,
    /// Names of the currently registered dependencies.
    pub dependencies: Vec<String>,
    /// The accumulated activity counters.
    pub counters: ModuleCounters,
}

/// The runtime contract every pluggable module implements.
///
/// Concrete modules normally implement [`ModuleBehavior`] and let
/// [`ModuleHost`] provide this trait; implementing it directly is only
/// useful for fully bespoke modules.
///
/// [`ModuleBehavior`]: crate::module::host::ModuleBehavior
/// [`ModuleHost`]: crate::module::host::ModuleHost
pub trait Module: StateAccess {
    /// The module's type tag (e.g. `"analytics"`).
    fn module_type(&self) -> String;

    /// The module's semantic version.
    fn version(&self) -> String;

    /// The capabilities this module advertises to its peers.
    fn capabilities(&self) -> Vec<String>;

    /// The module's current lifecycle state.
    fn status(&self) -> ModuleStatus;

    /// Runs component-specific setup, then validates that every declared
    /// dependency is registered. Never errors: failure is reported through
    /// the result record and leaves the module `Degraded`.
    fn initialize(&mut self, config: ModuleConfig) -> InitializationResult;

    /// Forwards `payload` to the named dependency's `receive_data`.
    ///
    /// Fails with [`ModuleError::NotInitialized`] when the caller is not
    /// `Ready`, and [`ModuleError::TargetNotFound`] when the target is not a
    /// registered dependency.
    fn send_data(&mut self, target: &str, payload: Value) -> ModuleResult<DataTransferResult>;

    /// Processes an inbound payload. Always counts the receipt and stamps
    /// activity, even when component-specific processing fails.
    fn receive_data(&mut self, source: &str, payload: Value) -> DataProcessingResult;

    /// Pushes the caller's current state to the named dependency.
    fn sync_state(&mut self, target: &str) -> ModuleResult<StateSyncResult>;

    /// Fans the event out to every handler subscribed to its type,
    /// synchronously and in subscription order. A failing handler is logged
    /// and never prevents the remaining handlers from running.
    fn publish_event(&mut self, event: ModuleEvent);

    /// Registers a handler for an event type on this instance.
    fn subscribe_event(&mut self, event_type: &str, handler: EventHandler);

    /// Reports the module's health. Before the first successful
    /// `initialize`, reports `healthy=false` with
    /// [`HealthStatus::NotInitialized`].
    fn health_check(&self) -> HealthCheckResult;

    /// Tears the module down: clears subscriptions, dependency references,
    /// and counters, and forces the status to `Shutdown`. Idempotent.
    fn shutdown(&mut self) -> ShutdownResult;

    /// Registers a peer under `name`. An existing entry for the same name is
    /// overwritten; last write wins.
    fn add_dependency(&mut self, name: &str, module: SharedModule);

    /// Removes the peer registered under `name`, if any.
    fn remove_dependency(&mut self, name: &str);

    /// Returns the module's identity and accumulated counters.
    fn metrics(&self) -> ModuleMetrics;
}

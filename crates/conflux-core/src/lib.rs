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

//! # Conflux Core
//!
//! Foundational crate containing the module runtime contract, core types,
//! and the event plumbing shared by the rest of the workspace.
//!
//! A *module* is an independently developed unit of functionality that
//! announces itself by name, declares its dependencies, exchanges data with
//! its peers, and can be health-checked and torn down safely. This crate
//! defines the contract every module implements ([`Module`]), a reusable
//! host that supplies the bookkeeping every implementation needs
//! ([`ModuleHost`]), and the data-flow router that moves payloads between
//! named modules ([`flow::FlowRouter`]).

#![warn(missing_docs)]

pub mod event;
pub mod flow;
pub mod module;
pub mod state;

pub use event::bus::EventBus;
pub use event::module_event::{EventHandler, ModuleEvent};
pub use module::config::{ModuleConfig, PerformanceSettings};
pub use module::contract::{Module, ModuleError, ModuleResult, SharedModule};
pub use module::host::{ModuleBehavior, ModuleHost};
pub use module::status::ModuleStatus;
pub use state::{SharedState, StateAccess};

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

//! State-change notifications.

use serde::Serialize;
use serde_json::Value;
use std::time::SystemTime;

/// Published whenever the manager writes a module's state — on sync, on a
/// direct `set_module_state`, and on snapshot restore.
#[derive(Debug, Clone, Serialize)]
pub struct StateChangeEvent {
    /// The module whose state changed.
    pub module: String,
    /// The state that was written.
    pub state: Value,
    /// When the write happened.
    pub timestamp: SystemTime,
}

impl StateChangeEvent {
    pub(crate) fn new(module: impl Into<String>, state: Value) -> Self {
        Self {
            module: module.into(),
            state,
            timestamp: SystemTime::now(),
        }
    }
}

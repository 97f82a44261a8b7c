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

//! Module lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The lifecycle state of a module.
///
/// A module starts `Uninitialized`, passes through `Initializing` on its way
/// to `Ready`, and ends at `Shutdown` after passing through `ShuttingDown`.
/// `Degraded` marks a module whose initialization or teardown failed; it can
/// leave that state through a successful re-initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Never initialized.
    Uninitialized,
    /// `initialize` is in flight.
    Initializing,
    /// Initialization completed; the module accepts work.
    Ready,
    /// A lifecycle step failed; the module is present but unhealthy.
    Degraded,
    /// `shutdown` is in flight.
    ShuttingDown,
    /// Torn down; counters and dependency references are cleared.
    Shutdown,
}

impl ModuleStatus {
    /// Returns the wire-friendly name of the state (e.g. `"ready"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Uninitialized => "uninitialized",
            ModuleStatus::Initializing => "initializing",
            ModuleStatus::Ready => "ready",
            ModuleStatus::Degraded => "degraded",
            ModuleStatus::ShuttingDown => "shutting_down",
            ModuleStatus::Shutdown => "shutdown",
        }
    }
}

impl Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_are_snake_case() {
        assert_eq!(ModuleStatus::Uninitialized.as_str(), "uninitialized");
        assert_eq!(ModuleStatus::ShuttingDown.as_str(), "shutting_down");
        assert_eq!(ModuleStatus::Ready.to_string(), "ready");
    }
}

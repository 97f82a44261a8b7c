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

//! Module configuration supplied at initialization time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Configuration handed to a module's `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// The name this module is known by to its peers.
    pub name: String,
    /// Semantic version of the configuration.
    pub version: String,
    /// Names of peer modules this module requires to be registered before it
    /// can finish initializing.
    pub dependencies: Vec<String>,
    /// Free-form component-specific settings.
    #[serde(default)]
    pub settings: HashMap<String, Value>,
    /// Thresholds used by health checks.
    #[serde(default)]
    pub performance: PerformanceSettings,
}

impl ModuleConfig {
    /// Creates a minimal configuration with no dependencies.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
            settings: HashMap::new(),
            performance: PerformanceSettings::default(),
        }
    }

    /// Declares a dependency on a peer module, returning the configuration.
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }
}

/// Performance thresholds a module is held to by its own health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSettings {
    /// A data transfer slower than this is considered degraded; slower than
    /// twice this, unhealthy.
    pub max_response_time_ms: u64,
    /// Upper bound on concurrent requests the module is expected to serve.
    pub max_concurrent_requests: u32,
    /// Whether the module may cache processed results.
    pub cache_enabled: bool,
    /// Whether the module reports its counters to the performance monitor.
    pub monitoring_enabled: bool,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            max_response_time_ms: 1000,
            max_concurrent_requests: 64,
            cache_enabled: true,
            monitoring_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_dependencies() {
        let config = ModuleConfig::new("analytics", "1.2.0")
            .with_dependency("storage")
            .with_dependency("events");

        assert_eq!(config.name, "analytics");
        assert_eq!(config.dependencies, vec!["storage", "events"]);
        assert_eq!(config.performance.max_response_time_ms, 1000);
    }
}

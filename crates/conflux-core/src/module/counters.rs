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

//! Per-module activity counters.
//!
//! Counters are explicit fields owned by the module instance and mutated
//! only through its own methods; there is no shared global state.

use serde::Serialize;
use std::time::SystemTime;

/// Accumulated activity counters for one module instance.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleCounters {
    /// Outbound transfers completed via `send_data`.
    pub data_transfers: u64,
    /// Inbound payloads processed via `receive_data`.
    pub data_received: u64,
    /// State pushes completed via `sync_state`.
    pub state_syncs: u64,
    /// Events fanned out via `publish_event`.
    pub events_published: u64,
    /// Handlers registered via `subscribe_event`.
    pub events_subscribed: u64,
    /// Duration of the most recent outbound transfer, in milliseconds.
    pub last_transfer_ms: f64,
    /// Wall-clock time of the most recent activity of any kind.
    pub last_activity: SystemTime,
}

impl ModuleCounters {
    pub(crate) fn new() -> Self {
        Self {
            data_transfers: 0,
            data_received: 0,
            state_syncs: 0,
            events_published: 0,
            events_subscribed: 0,
            last_transfer_ms: 0.0,
            last_activity: SystemTime::now(),
        }
    }

    pub(crate) fn record_transfer(&mut self, elapsed_ms: f64) {
        self.data_transfers += 1;
        self.last_transfer_ms = elapsed_ms;
        self.touch();
    }

    pub(crate) fn record_receive(&mut self) {
        self.data_received += 1;
        self.touch();
    }

    pub(crate) fn record_sync(&mut self) {
        self.state_syncs += 1;
        self.touch();
    }

    pub(crate) fn record_publish(&mut self) {
        self.events_published += 1;
        self.touch();
    }

    pub(crate) fn record_subscribe(&mut self) {
        self.events_subscribed += 1;
        self.touch();
    }

    /// Zeroes every counter. Called on shutdown.
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = SystemTime::now();
    }
}

impl Default for ModuleCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_clear() {
        let mut counters = ModuleCounters::new();
        counters.record_transfer(12.5);
        counters.record_transfer(3.0);
        counters.record_receive();
        counters.record_publish();

        assert_eq!(counters.data_transfers, 2);
        assert_eq!(counters.data_received, 1);
        assert_eq!(counters.events_published, 1);
        assert_eq!(counters.last_transfer_ms, 3.0);

        counters.clear();
        assert_eq!(counters.data_transfers, 0);
        assert_eq!(counters.last_transfer_ms, 0.0);
    }
}

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

//! Events published by modules and fanned out to per-instance subscribers.

use crate::module::contract::ModuleError;
use serde::Serialize;
use serde_json::Value;
use std::time::SystemTime;

/// An immutable record published by one module and delivered to every
/// subscriber of its type on that module.
///
/// There is no ordering guarantee across modules; within one module,
/// handlers for the same event type run in subscription order.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleEvent {
    /// The event type, matched against subscriptions.
    pub event_type: String,
    /// Name of the module that published the event.
    pub source: String,
    /// Arbitrary payload.
    pub payload: Value,
    /// When the event was created.
    pub timestamp: SystemTime,
}

impl ModuleEvent {
    /// Creates an event stamped with the current time.
    pub fn new(event_type: impl Into<String>, source: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            source: source.into(),
            payload,
            timestamp: SystemTime::now(),
        }
    }
}

/// A subscriber callback. A returned error is logged by the publisher and
/// never stops the remaining handlers.
pub type EventHandler = Box<dyn Fn(&ModuleEvent) -> Result<(), ModuleError> + Send>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_carries_payload_and_source() {
        let event = ModuleEvent::new("cache.invalidated", "storage", json!({"keys": 3}));
        assert_eq!(event.event_type, "cache.invalidated");
        assert_eq!(event.source, "storage");
        assert_eq!(event.payload["keys"], 3);
    }
}

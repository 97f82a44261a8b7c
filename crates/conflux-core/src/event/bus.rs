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

//! A generic, thread-safe notification channel.

/// A thread-safe channel for cross-component notifications.
///
/// The bus is generic over the event type `T` so this crate stays decoupled
/// from the event types defined by higher-level crates. Producers clone the
/// sender; the owning component drains the receiver at its own pace.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Sends an event, logging when the receiving side has gone away.
    pub fn publish(&self, event: T) {
        if self.sender.send(event).is_err() {
            log::warn!("Event dropped: all receivers disconnected.");
        }
    }

    /// Returns a sender handle for producers elsewhere in the system.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns the receiver end. Intended for the bus owner.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Drains and returns every event currently queued, without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);

    #[test]
    fn publish_then_drain_preserves_order() {
        let bus = EventBus::new();
        bus.publish(Ping(1));
        bus.publish(Ping(2));
        bus.publish(Ping(3));

        assert_eq!(bus.drain(), vec![Ping(1), Ping(2), Ping(3)]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn detached_sender_still_reaches_receiver() {
        let bus = EventBus::new();
        let sender = bus.sender();
        sender.send(Ping(7)).expect("send should succeed");

        assert_eq!(bus.drain(), vec![Ping(7)]);
    }

    #[test]
    fn publish_after_receiver_drop_does_not_panic() {
        let bus = EventBus::new();
        let sender = bus.sender();
        drop(bus);

        assert!(sender.send(Ping(0)).is_err());
    }
}

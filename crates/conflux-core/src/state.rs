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

//! The state-accessor seam consumed by the synchronization layer.
//!
//! State is opaque application data; the synchronization layer only needs a
//! way to read and replace it wholesale, never to understand it. Keeping the
//! seam this narrow lets any object with a gettable/settable state take part
//! in synchronization, not just full [`Module`](crate::Module)
//! implementations.

use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Read/write access to a component's externally observable state.
pub trait StateAccess: Send {
    /// Returns a snapshot of the current state.
    fn state(&self) -> Value;

    /// Replaces the current state wholesale.
    fn set_state(&mut self, state: Value);
}

/// A shared, non-owning handle to anything that exposes its state.
pub type SharedState = Arc<Mutex<dyn StateAccess>>;

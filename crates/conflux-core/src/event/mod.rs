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

//! Event types and channels.
//!
//! Two distinct mechanisms live here. [`module_event`] is the per-module
//! pub/sub surface: an explicit list of handlers per event type per
//! instance, invoked synchronously in subscription order. [`bus`] is a
//! generic channel for cross-component notifications where the consumer
//! drains at its own pace.

pub mod bus;
pub mod module_event;

pub use self::bus::EventBus;
pub use self::module_event::{EventHandler, ModuleEvent};

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

//! Data-flow routing between named modules.
//!
//! The [`FlowRouter`] moves payloads to registered per-module handlers with
//! retry, optional result caching, and bounded per-flow records. It sits a
//! level below the module contract: anything able to accept a JSON payload
//! can register a route, whether or not it is a full module.

pub mod cache;
pub mod retry;
pub mod router;

pub use self::cache::FlowCache;
pub use self::retry::RetryPolicy;
pub use self::router::{
    FlowError, FlowHandler, FlowMetrics, FlowOptions, FlowResult, FlowRouter, TransformFn,
};

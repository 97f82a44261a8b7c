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

//! The flow router: payload delivery with retry, caching, and records.

use crate::flow::cache::FlowCache;
use crate::flow::retry::RetryPolicy;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-(flow-kind) record lists are capped at this many entries.
const MAX_FLOW_RECORDS: usize = 1000;

/// A callback that accepts a payload for one named module.
pub type FlowHandler = Box<dyn Fn(&Value) -> Result<Value, FlowError> + Send>;

/// A payload transformation applied before delivery.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// An error raised by the flow router.
#[derive(Debug, Clone)]
pub enum FlowError {
    /// The payload was `null`; flows must carry data.
    EmptyPayload,
    /// No handler is registered for the target module.
    RouteNotFound(String),
    /// The handler kept failing after every retry.
    DeliveryFailed(String),
}

impl Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::EmptyPayload => write!(f, "flow payload must not be null"),
            FlowError::RouteNotFound(target) => write!(f, "no route registered for: {target}"),
            FlowError::DeliveryFailed(msg) => write!(f, "delivery failed: {msg}"),
        }
    }
}

impl std::error::Error for FlowError {}

/// Per-call delivery options.
#[derive(Clone, Default)]
pub struct FlowOptions {
    /// Serve a previously cached result for the same target and payload.
    pub use_cache: bool,
    /// Cache the result of this delivery.
    pub cache_result: bool,
    /// TTL for a cached result; `None` uses one hour.
    pub cache_ttl: Option<Duration>,
    /// Transformation applied to the payload before delivery.
    pub transform: Option<TransformFn>,
}

/// Outcome of one delivery.
#[derive(Debug, Clone)]
pub struct FlowResult {
    /// Whether delivery succeeded.
    pub success: bool,
    /// Generated identifier for this flow.
    pub flow_id: String,
    /// End-to-end duration in milliseconds.
    pub duration_ms: f64,
    /// The handler's result, or `Value::Null` on failure.
    pub result: Value,
}

#[derive(Debug, Clone)]
struct FlowRecord {
    #[allow(dead_code)]
    flow_id: String,
    duration_ms: f64,
    success: bool,
}

/// Aggregate flow counters.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMetrics {
    /// Deliveries that reached a handler and returned.
    pub total_flows: usize,
    /// Deliveries that succeeded.
    pub successful_flows: usize,
    /// Deliveries that failed (handler or routing).
    pub failed_flows: usize,
    /// Mean duration of completed deliveries, in milliseconds.
    pub average_duration_ms: f64,
    /// Cache hits over cache lookups, `0.0` when the cache was never used.
    pub cache_hit_rate: f64,
}

/// Routes payloads from source modules to per-target handlers.
///
/// Each delivery gets a generated flow id, retry with exponential backoff,
/// and a bounded record for later inspection. The router does not know what
/// a module is; it only knows names and handlers, which keeps it usable
/// below the module contract.
pub struct FlowRouter {
    routes: HashMap<String, FlowHandler>,
    cache: FlowCache,
    retry: RetryPolicy,
    records: VecDeque<FlowRecord>,
    failures: VecDeque<FlowRecord>,
    cache_hits: u64,
    cache_misses: u64,
}

impl FlowRouter {
    /// Creates a router with the default retry policy.
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    /// Creates a router with a custom retry policy.
    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            routes: HashMap::new(),
            cache: FlowCache::new(),
            retry,
            records: VecDeque::new(),
            failures: VecDeque::new(),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Registers the handler payloads for `module` are delivered to.
    /// An existing route for the same name is replaced.
    pub fn register_route(&mut self, module: impl Into<String>, handler: FlowHandler) {
        let module = module.into();
        log::debug!("Flow route registered for '{module}'.");
        self.routes.insert(module, handler);
    }

    /// Removes the route for `module`, if any.
    pub fn unregister_route(&mut self, module: &str) {
        self.routes.remove(module);
    }

    /// Delivers `payload` from `source` to `target`.
    pub fn send(
        &mut self,
        source: &str,
        target: &str,
        payload: Value,
        options: &FlowOptions,
    ) -> Result<FlowResult, FlowError> {
        let start = Instant::now();
        let flow_id = Uuid::new_v4().to_string();

        if payload.is_null() {
            self.push_failure(&flow_id, start);
            return Err(FlowError::EmptyPayload);
        }

        let payload = match &options.transform {
            Some(transform) => transform(payload),
            None => payload,
        };

        let cache_key = format!("{target}:{payload}");
        if options.use_cache {
            if let Some(cached) = self.cache.get(&cache_key) {
                self.cache_hits += 1;
                return Ok(FlowResult {
                    success: true,
                    flow_id,
                    duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                    result: cached,
                });
            }
            self.cache_misses += 1;
        }

        let handler = match self.routes.get(target) {
            Some(handler) => handler,
            None => {
                self.push_failure(&flow_id, start);
                return Err(FlowError::RouteNotFound(target.to_string()));
            }
        };

        match self.retry.execute(|| handler(&payload)) {
            Ok(result) => {
                if options.cache_result {
                    let ttl = options.cache_ttl.unwrap_or(Duration::from_secs(3600));
                    self.cache.set(cache_key, result.clone(), ttl);
                }
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                Self::push_bounded(
                    &mut self.records,
                    FlowRecord {
                        flow_id: flow_id.clone(),
                        duration_ms,
                        success: true,
                    },
                );
                Ok(FlowResult {
                    success: true,
                    flow_id,
                    duration_ms,
                    result,
                })
            }
            Err(e) => {
                log::warn!("Flow {source} -> {target} failed: {e}");
                self.push_failure(&flow_id, start);
                Err(FlowError::DeliveryFailed(e.to_string()))
            }
        }
    }

    /// Delivers `payload` to every target, isolating per-target failures.
    ///
    /// A failed target yields a `FlowResult` with `success=false` instead of
    /// aborting the remaining targets.
    pub fn broadcast(
        &mut self,
        source: &str,
        targets: &[&str],
        payload: Value,
        options: &FlowOptions,
    ) -> Vec<FlowResult> {
        targets
            .iter()
            .map(|target| {
                self.send(source, target, payload.clone(), options)
                    .unwrap_or_else(|_| FlowResult {
                        success: false,
                        flow_id: String::new(),
                        duration_ms: 0.0,
                        result: Value::Null,
                    })
            })
            .collect()
    }

    /// Aggregate counters over the bounded record window.
    pub fn metrics(&self) -> FlowMetrics {
        let total_flows = self.records.len();
        let successful_flows = self.records.iter().filter(|r| r.success).count();
        let average_duration_ms = if total_flows > 0 {
            self.records.iter().map(|r| r.duration_ms).sum::<f64>() / total_flows as f64
        } else {
            0.0
        };
        let lookups = self.cache_hits + self.cache_misses;
        let cache_hit_rate = if lookups > 0 {
            self.cache_hits as f64 / lookups as f64
        } else {
            0.0
        };

        FlowMetrics {
            total_flows,
            successful_flows,
            failed_flows: self.failures.len(),
            average_duration_ms,
            cache_hit_rate,
        }
    }

    /// Sweeps expired cache entries and clears the record windows.
    pub fn cleanup(&mut self) {
        self.cache.cleanup();
        self.records.clear();
        self.failures.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    fn push_failure(&mut self, flow_id: &str, start: Instant) {
        Self::push_bounded(
            &mut self.failures,
            FlowRecord {
                flow_id: flow_id.to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                success: false,
            },
        );
    }

    fn push_bounded(records: &mut VecDeque<FlowRecord>, record: FlowRecord) {
        if records.len() == MAX_FLOW_RECORDS {
            records.pop_front();
        }
        records.push_back(record);
    }
}

impl Default for FlowRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn echo_router() -> FlowRouter {
        let mut router = FlowRouter::with_retry(RetryPolicy::none());
        router.register_route("echo", Box::new(|payload| Ok(payload.clone())));
        router
    }

    #[test]
    fn send_delivers_to_registered_route() {
        let mut router = echo_router();
        let result = router
            .send("caller", "echo", json!({"n": 1}), &FlowOptions::default())
            .unwrap();

        assert!(result.success);
        assert_eq!(result.result, json!({"n": 1}));
        assert_eq!(router.metrics().total_flows, 1);
        assert_eq!(router.metrics().successful_flows, 1);
    }

    #[test]
    fn null_payload_is_rejected() {
        let mut router = echo_router();
        let err = router
            .send("caller", "echo", Value::Null, &FlowOptions::default())
            .unwrap_err();

        assert!(matches!(err, FlowError::EmptyPayload));
        assert_eq!(router.metrics().failed_flows, 1);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let mut router = echo_router();
        let err = router
            .send("caller", "nowhere", json!(1), &FlowOptions::default())
            .unwrap_err();

        assert!(matches!(err, FlowError::RouteNotFound(t) if t == "nowhere"));
    }

    #[test]
    fn transform_applies_before_delivery() {
        let mut router = echo_router();
        let options = FlowOptions {
            transform: Some(Arc::new(|payload| json!({"wrapped": payload}))),
            ..Default::default()
        };

        let result = router.send("caller", "echo", json!(7), &options).unwrap();
        assert_eq!(result.result, json!({"wrapped": 7}));
    }

    #[test]
    fn cached_result_short_circuits_the_handler() {
        let calls = Arc::new(Mutex::new(0u32));
        let seen = Arc::clone(&calls);
        let mut router = FlowRouter::with_retry(RetryPolicy::none());
        router.register_route(
            "counter",
            Box::new(move |payload| {
                *seen.lock().unwrap() += 1;
                Ok(payload.clone())
            }),
        );
        let options = FlowOptions {
            use_cache: true,
            cache_result: true,
            ..Default::default()
        };

        router.send("caller", "counter", json!(1), &options).unwrap();
        router.send("caller", "counter", json!(1), &options).unwrap();

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(router.metrics().cache_hit_rate > 0.0);
    }

    #[test]
    fn retry_recovers_from_transient_failures() {
        let calls = Arc::new(Mutex::new(0u32));
        let seen = Arc::clone(&calls);
        let mut router = FlowRouter::with_retry(RetryPolicy {
            max_retries: 2,
            backoff: Duration::from_millis(1),
        });
        router.register_route(
            "flaky",
            Box::new(move |payload| {
                let mut count = seen.lock().unwrap();
                *count += 1;
                if *count < 2 {
                    Err(FlowError::DeliveryFailed("transient".to_string()))
                } else {
                    Ok(payload.clone())
                }
            }),
        );

        let result = router
            .send("caller", "flaky", json!(1), &FlowOptions::default())
            .unwrap();

        assert!(result.success);
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn broadcast_isolates_per_target_failures() {
        let mut router = echo_router();
        let results = router.broadcast(
            "caller",
            &["echo", "missing", "echo"],
            json!(1),
            &FlowOptions::default(),
        );

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].success);
    }

    #[test]
    fn record_window_is_bounded() {
        let mut router = echo_router();
        for i in 0..(MAX_FLOW_RECORDS + 10) {
            router
                .send("caller", "echo", json!(i), &FlowOptions::default())
                .unwrap();
        }
        assert_eq!(router.metrics().total_flows, MAX_FLOW_RECORDS);
    }
}

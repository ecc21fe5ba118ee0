//! Simulation state registry.
//!
//! Architecture:
//! 1. Caller asks for a node birth, device birth or device data payload
//! 2. The generator produces N metrics (node: fixed count, device: configured count)
//! 3. The new name → metric set and timestamp replace the source's previous state
//! 4. The assembled payload is returned
//! 5. Membership queries and write acknowledgements run against recorded state
//! 6. Failures are contained per call and never touch recorded state
//! 7. Thread-safe for concurrent access

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info};
use serde::Serialize;

use crate::config::SimulatorConfig;
use crate::descriptor::{DeviceDescriptor, EdgeNodeDescriptor, SourceId};
use crate::error::{Result, SimulatorError};
use crate::generator::{self, ValueRanges};
use crate::metric::Metric;
use crate::payload::{Payload, PayloadBuilder, PayloadMap, PayloadMapBuilder};
use crate::rng::{self, SharedRng};

/// Name prefix of node metrics (`NT-0`, `NT-1`, ...).
pub const NODE_METRIC_PREFIX: &str = "NT";
/// Name prefix of device metrics (`DT-0`, `DT-1`, ...).
pub const DEVICE_METRIC_PREFIX: &str = "DT";

/// Upper bound on capacity reserved before generating a metric set.
const PREALLOC_METRICS: u32 = 1024;

/// Operations a telemetry simulator offers to the transport layer.
pub trait DataSimulator: Send + Sync {
    /// Build a node birth and record it as the node's current metric set.
    fn node_birth(&self, node: &EdgeNodeDescriptor) -> Result<PayloadMap>;

    /// Build a device birth and record it as the device's current metric set.
    fn device_birth(&self, device: &DeviceDescriptor) -> Result<Payload>;

    /// Build a device data payload. Regenerates the full set, like a birth.
    fn device_data(&self, device: &DeviceDescriptor) -> Result<Payload>;

    /// Whether `source` currently reports `metric_name`.
    fn has_metric(&self, source: &SourceId, metric_name: &str) -> bool;

    /// Accept a write. Returns the metric as though the value had been written.
    fn handle_metric_write(&self, source: &SourceId, metric: Metric) -> Metric;
}

/// Recorded state for one source.
struct SourceState {
    metrics: HashMap<String, Metric>,
    last_update_ms: u64,
    payloads: u64,
}

/// Simulator producing random, type-rotated metrics.
pub struct RandomDataSimulator {
    num_node_metrics: u32,
    num_device_metrics: HashMap<DeviceDescriptor, u32>,
    ranges: ValueRanges,
    rng: Mutex<SharedRng>,
    states: Mutex<HashMap<SourceId, SourceState>>,
    payloads_built: AtomicU64,
    failures: AtomicU64,
}

impl RandomDataSimulator {
    /// Create a simulator drawing from an OS-seeded generator.
    pub fn new(num_node_metrics: u32, num_device_metrics: HashMap<DeviceDescriptor, u32>) -> Self {
        Self::with_rng(num_node_metrics, num_device_metrics, rng::from_os())
    }

    /// Create a simulator drawing from the given generator.
    pub fn with_rng(
        num_node_metrics: u32,
        num_device_metrics: HashMap<DeviceDescriptor, u32>,
        rng: SharedRng,
    ) -> Self {
        Self {
            num_node_metrics,
            num_device_metrics,
            ranges: ValueRanges::default(),
            rng: Mutex::new(rng),
            states: Mutex::new(HashMap::new()),
            payloads_built: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Create a simulator from a configuration.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let sim = Self::with_rng(
            config.num_node_metrics,
            config.device_counts()?,
            rng::from_seed(config.seed),
        )
        .with_value_ranges(config.value_ranges);
        Ok(sim)
    }

    pub fn with_value_ranges(mut self, ranges: ValueRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn value_ranges(&self) -> ValueRanges {
        self.ranges
    }

    pub fn num_node_metrics(&self) -> u32 {
        self.num_node_metrics
    }

    /// Configured metric count for `device`, if any.
    pub fn device_metric_count(&self, device: &DeviceDescriptor) -> Option<u32> {
        self.num_device_metrics.get(device).copied()
    }

    /// Timestamp of the last successful birth/data call for `source`.
    pub fn last_update(&self, source: &SourceId) -> Option<u64> {
        lock(&self.states).get(source).map(|s| s.last_update_ms)
    }

    /// Currently recorded metric `name` of `source`.
    pub fn metric(&self, source: &SourceId, name: &str) -> Option<Metric> {
        lock(&self.states)
            .get(source)
            .and_then(|s| s.metrics.get(name))
            .cloned()
    }

    /// Names currently recorded for `source`, sorted.
    pub fn metric_names(&self, source: &SourceId) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.states)
            .get(source)
            .map(|s| s.metrics.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Every source with recorded state, sorted.
    pub fn sources(&self) -> Vec<SourceId> {
        let mut sources: Vec<SourceId> = lock(&self.states).keys().cloned().collect();
        sources.sort();
        sources
    }

    /// Drop all recorded state and counters.
    pub fn reset(&self) {
        lock(&self.states).clear();
        self.payloads_built.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }

    /// Report as structured data.
    pub fn report(&self) -> SimulatorReport {
        let states = lock(&self.states);
        let mut sources: Vec<SourceReport> = states
            .iter()
            .map(|(id, state)| SourceReport {
                source: id.to_string(),
                kind: id.kind(),
                metrics: state.metrics.len(),
                last_update_ms: state.last_update_ms,
                payloads: state.payloads,
            })
            .collect();
        drop(states);
        sources.sort_by(|a, b| a.source.cmp(&b.source));

        SimulatorReport {
            total: sources.len(),
            payloads_built: self.payloads_built.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            sources,
        }
    }

    /// Generate `count` metrics for `source`. Panics raised while generating
    /// are caught and returned as [`SimulatorError::Generation`].
    fn generate(&self, source: &SourceId, prefix: &str, count: u32) -> Result<Vec<Metric>> {
        let mut rng = lock(&self.rng);
        let mut index = 0u32;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Vec<Metric>> {
            let mut metrics = Vec::with_capacity(count.min(PREALLOC_METRICS) as usize);
            while index < count {
                metrics.push(generator::random_metric(&mut **rng, prefix, index, self.ranges)?);
                index += 1;
            }
            Ok(metrics)
        }));

        let reason = match outcome {
            Ok(Ok(metrics)) => return Ok(metrics),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        Err(SimulatorError::Generation {
            source_id: source.to_string(),
            index,
            reason,
        })
    }

    /// Swap in the new metric set for `source` in one step.
    fn record(&self, source: SourceId, metrics: &[Metric], now: u64) {
        let metrics: HashMap<String, Metric> = metrics
            .iter()
            .map(|m| (m.name().to_string(), m.clone()))
            .collect();
        let count = metrics.len();

        let mut states = lock(&self.states);
        let payloads = states.get(&source).map_or(0, |s| s.payloads) + 1;
        states.insert(
            source.clone(),
            SourceState {
                metrics,
                last_update_ms: now,
                payloads,
            },
        );
        drop(states);

        self.payloads_built.fetch_add(1, Ordering::Relaxed);
        info!("Recorded {count} metrics for {} {source}", source.kind());
    }

    fn fail(&self, kind: &str, source: &SourceId, e: &SimulatorError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        error!("Failed to get the {kind} for {source}: {e}");
    }

    fn device_payload(&self, device: &DeviceDescriptor, kind: &str) -> Result<Payload> {
        let source = SourceId::Device(device.clone());
        let now = now_millis();

        info!("Getting number of metrics for {device}");
        let metrics = self
            .device_metric_count(device)
            .ok_or_else(|| SimulatorError::UnknownDevice(device.clone()))
            .and_then(|count| self.generate(&source, DEVICE_METRIC_PREFIX, count))
            .inspect_err(|e| self.fail(kind, &source, e))?;

        self.record(source, &metrics, now);
        let payload = metrics
            .into_iter()
            .fold(PayloadBuilder::new().timestamp(now), PayloadBuilder::add_metric)
            .build();
        Ok(payload)
    }
}

impl DataSimulator for RandomDataSimulator {
    fn node_birth(&self, node: &EdgeNodeDescriptor) -> Result<PayloadMap> {
        let source = SourceId::Node(node.clone());
        let now = now_millis();

        let metrics = self
            .generate(&source, NODE_METRIC_PREFIX, self.num_node_metrics)
            .inspect_err(|e| self.fail("NBIRTH", &source, e))?;

        self.record(source, &metrics, now);
        let payload = metrics
            .into_iter()
            .fold(PayloadMapBuilder::new().timestamp(now), PayloadMapBuilder::add_metric)
            .build();
        Ok(payload)
    }

    fn device_birth(&self, device: &DeviceDescriptor) -> Result<Payload> {
        self.device_payload(device, "DBIRTH")
    }

    fn device_data(&self, device: &DeviceDescriptor) -> Result<Payload> {
        self.device_payload(device, "DDATA")
    }

    fn has_metric(&self, source: &SourceId, metric_name: &str) -> bool {
        lock(&self.states)
            .get(source)
            .is_some_and(|s| s.metrics.contains_key(metric_name))
    }

    fn handle_metric_write(&self, source: &SourceId, metric: Metric) -> Metric {
        debug!("Acknowledged write of {} for {source}", metric.name());
        metric
    }
}

/// Overall report for the simulator.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorReport {
    /// Number of sources with recorded state.
    pub total: usize,
    /// Successful birth/data payloads since creation or the last reset.
    pub payloads_built: u64,
    /// Birth/data calls that returned an error.
    pub failures: u64,
    /// Per-source details, sorted by source.
    pub sources: Vec<SourceReport>,
}

/// Recorded state of a single source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// `group/node` or `group/node/device`.
    pub source: String,
    /// `"node"` or `"device"`.
    pub kind: &'static str,
    /// Metrics in the current set.
    pub metrics: usize,
    /// Milliseconds since the Unix epoch.
    pub last_update_ms: u64,
    /// Successful birth/data payloads for this source.
    pub payloads: u64,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during metric generation".to_string()
    }
}

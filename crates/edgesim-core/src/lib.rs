//! # edgesim-core
//!
//! **Synthetic telemetry for an edge-node pipeline, no sensors required.**
//!
//! `edgesim-core` produces plausible, type-varied metric payloads for node
//! births, device births and device data, and keeps track of which metrics
//! each node or device currently reports.
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use edgesim_core::{DataSimulator, EdgeNodeDescriptor, RandomDataSimulator, SourceId};
//!
//! let node = EdgeNodeDescriptor::new("G1", "E1");
//! let device = node.device("D1");
//! let sim = RandomDataSimulator::new(14, HashMap::from([(device.clone(), 3)]));
//!
//! let nbirth = sim.node_birth(&node).unwrap();
//! assert_eq!(nbirth.len(), 14);
//!
//! let dbirth = sim.device_birth(&device).unwrap();
//! assert_eq!(dbirth.metrics()[2].name(), "DT-2");
//! assert!(sim.has_metric(&SourceId::from(device), "DT-2"));
//! ```
//!
//! ## Architecture
//!
//! Request → Generator (`index % 13` type rotation) → Registry (swap in new set) → Payload
//!
//! The type of metric `i` is fixed by `i % 13`; only its value is random. Each
//! birth or data call regenerates the source's complete metric set and
//! replaces what was recorded before. Failures are returned as
//! [`SimulatorError`] and leave recorded state untouched.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod metric;
pub mod payload;
pub mod rng;
pub mod simulator;

pub use config::{DEFAULT_NODE_METRICS, SimulatorConfig, parse_device_override};
pub use descriptor::{DeviceDescriptor, EdgeNodeDescriptor, SourceId};
pub use error::{Result, SimulatorError};
pub use generator::{ROTATION_LEN, ValueRanges, data_type_for_index, metric_name, random_metric};
pub use metric::{Metric, MetricBuilder, MetricDataType, MetricValue};
pub use payload::{Payload, PayloadBuilder, PayloadMap, PayloadMapBuilder};
pub use simulator::{
    DEVICE_METRIC_PREFIX, DataSimulator, NODE_METRIC_PREFIX, RandomDataSimulator,
    SimulatorReport, SourceReport,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

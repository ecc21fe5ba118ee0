//! Simulator configuration.
//!
//! Loaded from JSON, with every field optional:
//!
//! ```json
//! {
//!   "num_node_metrics": 10,
//!   "devices": { "G1/E1/D1": 3, "G1/E1/D2": 5 },
//!   "value_ranges": "nominal",
//!   "seed": 42
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{DeviceDescriptor, EdgeNodeDescriptor};
use crate::error::{Result, SimulatorError};
use crate::generator::ValueRanges;

/// Default number of metrics in a node birth.
pub const DEFAULT_NODE_METRICS: u32 = 10;

/// Configuration for a [`RandomDataSimulator`](crate::RandomDataSimulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Metrics in every node birth.
    pub num_node_metrics: u32,
    /// Metrics per device, keyed by `group/node/device`.
    pub devices: BTreeMap<String, u32>,
    pub value_ranges: ValueRanges,
    /// Fixed RNG seed; OS-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            num_node_metrics: DEFAULT_NODE_METRICS,
            devices: BTreeMap::new(),
            value_ranges: ValueRanges::default(),
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add or replace a device's metric count.
    pub fn set_device(&mut self, device: &DeviceDescriptor, count: u32) {
        self.devices.insert(device.to_string(), count);
    }

    /// Parsed per-device counts.
    pub fn device_counts(&self) -> Result<HashMap<DeviceDescriptor, u32>> {
        self.devices
            .iter()
            .map(|(key, count)| -> Result<(DeviceDescriptor, u32)> {
                let device = key.parse::<DeviceDescriptor>().map_err(|e| {
                    SimulatorError::Config(format!("device key {key:?}: {e}"))
                })?;
                Ok((device, *count))
            })
            .collect()
    }

    /// Configured devices attached to `node`, in key order.
    pub fn devices_of(&self, node: &EdgeNodeDescriptor) -> Vec<DeviceDescriptor> {
        self.devices
            .keys()
            .filter_map(|key| key.parse::<DeviceDescriptor>().ok())
            .filter(|device| &device.edge_node == node)
            .collect()
    }

    /// Check that every device key parses.
    pub fn validate(&self) -> Result<()> {
        self.device_counts().map(|_| ())
    }
}

/// Parse a `group/node/device=count` override.
pub fn parse_device_override(s: &str) -> Result<(DeviceDescriptor, u32)> {
    let (key, count) = s
        .split_once('=')
        .ok_or_else(|| SimulatorError::Config(format!("expected group/node/device=count, got {s:?}")))?;
    let device = key.parse::<DeviceDescriptor>()?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| SimulatorError::Config(format!("metric count in {s:?}: {e}")))?;
    Ok((device, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.num_node_metrics, DEFAULT_NODE_METRICS);
        assert!(config.devices.is_empty());
        assert_eq!(config.value_ranges, ValueRanges::Nominal);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimulatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = SimulatorConfig::from_json_str(
            r#"{"num_node_metrics": 14, "devices": {"G1/E1/D1": 3}, "value_ranges": "legacy", "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.num_node_metrics, 14);
        assert_eq!(config.value_ranges, ValueRanges::Legacy);
        assert_eq!(config.seed, Some(7));
        let counts = config.device_counts().unwrap();
        assert_eq!(counts.get(&DeviceDescriptor::new("G1", "E1", "D1")), Some(&3));
    }

    #[test]
    fn test_bad_device_key_rejected() {
        let err = SimulatorConfig::from_json_str(r#"{"devices": {"D1": 3}}"#).unwrap_err();
        assert!(matches!(err, SimulatorError::Config(_)));
    }

    #[test]
    fn test_unknown_ranges_rejected() {
        let err = SimulatorConfig::from_json_str(r#"{"value_ranges": "wide"}"#).unwrap_err();
        assert!(matches!(err, SimulatorError::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"num_node_metrics": 2, "devices": {{"G/E/D": 1}}}}"#).unwrap();
        let config = SimulatorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.num_node_metrics, 2);
        assert_eq!(config.devices.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulatorConfig::from_json_file("/nonexistent/edgesim.json").unwrap_err();
        assert!(matches!(err, SimulatorError::Io(_)));
    }

    #[test]
    fn test_devices_of_filters_by_node() {
        let mut config = SimulatorConfig::default();
        config.set_device(&DeviceDescriptor::new("G1", "E1", "D2"), 2);
        config.set_device(&DeviceDescriptor::new("G1", "E1", "D1"), 1);
        config.set_device(&DeviceDescriptor::new("G1", "E2", "D1"), 1);
        let devices = config.devices_of(&EdgeNodeDescriptor::new("G1", "E1"));
        assert_eq!(
            devices,
            vec![
                DeviceDescriptor::new("G1", "E1", "D1"),
                DeviceDescriptor::new("G1", "E1", "D2"),
            ]
        );
    }

    #[test]
    fn test_parse_device_override() {
        let (device, count) = parse_device_override("G1/E1/D1=5").unwrap();
        assert_eq!(device, DeviceDescriptor::new("G1", "E1", "D1"));
        assert_eq!(count, 5);
        assert!(parse_device_override("G1/E1/D1").is_err());
        assert!(parse_device_override("G1/E1/D1=x").is_err());
        assert!(parse_device_override("G1/E1=3").is_err());
    }
}

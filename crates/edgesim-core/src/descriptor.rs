//! Identifiers for the logical sources the simulator keeps state for.
//!
//! An edge node is addressed as `group/node`, a device attached to it as
//! `group/node/device`. The registry keys its state by [`SourceId`], which
//! treats both kinds uniformly.

use std::fmt;
use std::str::FromStr;

use crate::error::SimulatorError;

/// An edge node, identified by its group and node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeNodeDescriptor {
    pub group_id: String,
    pub edge_node_id: String,
}

impl EdgeNodeDescriptor {
    pub fn new(group_id: impl Into<String>, edge_node_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            edge_node_id: edge_node_id.into(),
        }
    }

    /// Descriptor of a device attached to this node.
    pub fn device(&self, device_id: impl Into<String>) -> DeviceDescriptor {
        DeviceDescriptor {
            edge_node: self.clone(),
            device_id: device_id.into(),
        }
    }
}

impl fmt::Display for EdgeNodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.edge_node_id)
    }
}

impl FromStr for EdgeNodeDescriptor {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_ids(s).as_slice() {
            [group, node] => Ok(Self::new(*group, *node)),
            _ => Err(SimulatorError::InvalidDescriptor {
                input: s.to_string(),
                expected: "group/node",
            }),
        }
    }
}

/// A device attached to an edge node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceDescriptor {
    pub edge_node: EdgeNodeDescriptor,
    pub device_id: String,
}

impl DeviceDescriptor {
    pub fn new(
        group_id: impl Into<String>,
        edge_node_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        EdgeNodeDescriptor::new(group_id, edge_node_id).device(device_id)
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.edge_node, self.device_id)
    }
}

impl FromStr for DeviceDescriptor {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_ids(s).as_slice() {
            [group, node, device] => Ok(Self::new(*group, *node, *device)),
            _ => Err(SimulatorError::InvalidDescriptor {
                input: s.to_string(),
                expected: "group/node/device",
            }),
        }
    }
}

/// Registry key: either a node or a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    Node(EdgeNodeDescriptor),
    Device(DeviceDescriptor),
}

impl SourceId {
    /// `"node"` or `"device"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Node(_) => "node",
            Self::Device(_) => "device",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => fmt::Display::fmt(node, f),
            Self::Device(device) => fmt::Display::fmt(device, f),
        }
    }
}

impl FromStr for SourceId {
    type Err = SimulatorError;

    /// Two segments parse as a node, three as a device.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_ids(s).len() {
            2 => s.parse().map(Self::Node),
            3 => s.parse().map(Self::Device),
            _ => Err(SimulatorError::InvalidDescriptor {
                input: s.to_string(),
                expected: "group/node or group/node/device",
            }),
        }
    }
}

impl From<EdgeNodeDescriptor> for SourceId {
    fn from(node: EdgeNodeDescriptor) -> Self {
        Self::Node(node)
    }
}

impl From<DeviceDescriptor> for SourceId {
    fn from(device: DeviceDescriptor) -> Self {
        Self::Device(device)
    }
}

/// Split on `/` and trim each segment. Any empty segment yields an empty
/// `Vec`, which fails every caller's arity check.
fn split_ids(s: &str) -> Vec<&str> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    if parts.iter().any(|p| p.trim().is_empty()) {
        return Vec::new();
    }
    parts.into_iter().map(str::trim).collect()
}

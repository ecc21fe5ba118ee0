//! Error type shared by every fallible simulator operation.

use thiserror::Error;

use crate::descriptor::DeviceDescriptor;
use crate::metric::MetricDataType;

/// Errors returned by the simulator, its builders and its configuration loader.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The device has no configured metric count.
    #[error("no metric count configured for device {0}")]
    UnknownDevice(DeviceDescriptor),

    /// Metric generation failed part way through a birth or data payload.
    #[error("failed to generate metric {index} for {source_id}: {reason}")]
    Generation {
        source_id: String,
        index: u32,
        reason: String,
    },

    /// A metric value does not match its declared data type.
    #[error("metric {name}: {actual} value does not match declared type {expected}")]
    TypeMismatch {
        name: String,
        expected: MetricDataType,
        actual: String,
    },

    #[error("invalid descriptor {input:?}, expected {expected}")]
    InvalidDescriptor {
        input: String,
        expected: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;

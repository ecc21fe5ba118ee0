//! Typed metrics: the data-type tags, the values they carry, and the builder
//! that keeps the two consistent.
//!
//! Unsigned kinds are stored widened into the next larger signed integer
//! (`UInt8` as `i16`, `UInt16` as `i32`, `UInt32` as `i64`), so a value can
//! be represented even when it falls outside the nominal width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulatorError};

/// The 13 data types a simulated metric can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Text,
}

impl MetricDataType {
    /// All kinds, in rotation order.
    pub const ALL: [MetricDataType; 13] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::DateTime,
        Self::Text,
    ];
}

impl fmt::Display for MetricDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8 => write!(f, "Int8"),
            Self::Int16 => write!(f, "Int16"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::UInt8 => write!(f, "UInt8"),
            Self::UInt16 => write!(f, "UInt16"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Float => write!(f, "Float"),
            Self::Double => write!(f, "Double"),
            Self::String => write!(f, "String"),
            Self::DateTime => write!(f, "DateTime"),
            Self::Text => write!(f, "Text"),
        }
    }
}

/// A metric value. Serializes as the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(i16),
    UInt16(i32),
    UInt32(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Text(String),
}

impl MetricValue {
    /// The data type this value variant represents.
    pub fn data_type(&self) -> MetricDataType {
        match self {
            Self::Int8(_) => MetricDataType::Int8,
            Self::Int16(_) => MetricDataType::Int16,
            Self::Int32(_) => MetricDataType::Int32,
            Self::Int64(_) => MetricDataType::Int64,
            Self::UInt8(_) => MetricDataType::UInt8,
            Self::UInt16(_) => MetricDataType::UInt16,
            Self::UInt32(_) => MetricDataType::UInt32,
            Self::UInt64(_) => MetricDataType::UInt64,
            Self::Float(_) => MetricDataType::Float,
            Self::Double(_) => MetricDataType::Double,
            Self::String(_) => MetricDataType::String,
            Self::DateTime(_) => MetricDataType::DateTime,
            Self::Text(_) => MetricDataType::Text,
        }
    }

    /// Interpret a bare JSON value as `data_type`. Returns `None` when the
    /// JSON value has the wrong shape or does not fit the storage type.
    pub fn from_json(data_type: MetricDataType, value: &serde_json::Value) -> Option<Self> {
        let int = || value.as_i64();
        Some(match data_type {
            MetricDataType::Int8 => Self::Int8(i8::try_from(int()?).ok()?),
            MetricDataType::Int16 => Self::Int16(i16::try_from(int()?).ok()?),
            MetricDataType::Int32 => Self::Int32(i32::try_from(int()?).ok()?),
            MetricDataType::Int64 => Self::Int64(int()?),
            MetricDataType::UInt8 => Self::UInt8(i16::try_from(int()?).ok()?),
            MetricDataType::UInt16 => Self::UInt16(i32::try_from(int()?).ok()?),
            MetricDataType::UInt32 => Self::UInt32(int()?),
            MetricDataType::UInt64 => Self::UInt64(value.as_u64()?),
            MetricDataType::Float => Self::Float(value.as_f64()? as f32),
            MetricDataType::Double => Self::Double(value.as_f64()?),
            MetricDataType::String => Self::String(value.as_str()?.to_string()),
            MetricDataType::DateTime => Self::DateTime(int()?),
            MetricDataType::Text => Self::Text(value.as_str()?.to_string()),
        })
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) | Self::UInt8(v) => write!(f, "{v}"),
            Self::Int32(v) | Self::UInt16(v) => write!(f, "{v}"),
            Self::Int64(v) | Self::UInt32(v) | Self::DateTime(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) | Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// An immutable, named, typed measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetric")]
pub struct Metric {
    name: String,
    data_type: MetricDataType,
    value: MetricValue,
}

impl Metric {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> MetricDataType {
        self.data_type
    }

    pub fn value(&self) -> &MetricValue {
        &self.value
    }
}

/// Builds a [`Metric`] from a name, a data-type tag and a typed value.
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    name: String,
    data_type: MetricDataType,
    value: MetricValue,
}

impl MetricBuilder {
    pub fn new(name: impl Into<String>, data_type: MetricDataType, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            data_type,
            value,
        }
    }

    /// Finish the metric, rejecting a value whose variant disagrees with the tag.
    pub fn build(self) -> Result<Metric> {
        let actual = self.value.data_type();
        if actual != self.data_type {
            return Err(SimulatorError::TypeMismatch {
                name: self.name,
                expected: self.data_type,
                actual: actual.to_string(),
            });
        }
        Ok(Metric {
            name: self.name,
            data_type: self.data_type,
            value: self.value,
        })
    }
}

/// Wire shape of a metric before its value is checked against its type.
#[derive(Deserialize)]
struct RawMetric {
    name: String,
    data_type: MetricDataType,
    value: serde_json::Value,
}

impl TryFrom<RawMetric> for Metric {
    type Error = SimulatorError;

    fn try_from(raw: RawMetric) -> Result<Self> {
        let value = MetricValue::from_json(raw.data_type, &raw.value).ok_or_else(|| {
            SimulatorError::TypeMismatch {
                name: raw.name.clone(),
                expected: raw.data_type,
                actual: raw.value.to_string(),
            }
        })?;
        MetricBuilder::new(raw.name, raw.data_type, value).build()
    }
}

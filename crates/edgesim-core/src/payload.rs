//! Birth and data payloads.
//!
//! A node birth is map-shaped ([`PayloadMap`], metrics keyed by name); device
//! births and data payloads are list-shaped ([`Payload`], metrics in
//! generation order). Both carry the millisecond timestamp at which they were
//! assembled.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metric::Metric;

/// List-shaped payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    timestamp: u64,
    metrics: Vec<Metric>,
}

impl Payload {
    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct PayloadBuilder {
    timestamp: u64,
    metrics: Vec<Metric>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn add_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn build(self) -> Payload {
        Payload {
            timestamp: self.timestamp,
            metrics: self.metrics,
        }
    }
}

/// Map-shaped payload. A later metric with the same name replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadMap {
    timestamp: u64,
    metrics: BTreeMap<String, Metric>,
}

impl PayloadMap {
    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Metrics ordered by name.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.values()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct PayloadMapBuilder {
    timestamp: u64,
    metrics: BTreeMap<String, Metric>,
}

impl PayloadMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn add_metric(mut self, metric: Metric) -> Self {
        self.metrics.insert(metric.name().to_string(), metric);
        self
    }

    pub fn build(self) -> PayloadMap {
        PayloadMap {
            timestamp: self.timestamp,
            metrics: self.metrics,
        }
    }
}

//! Integration tests for edgesim-core.
//!
//! These tests drive the public surface end to end:
//! configuration → simulator → birth/data payloads → lookups and writes.

use std::collections::HashMap;

use edgesim_core::{
    DataSimulator, DeviceDescriptor, EdgeNodeDescriptor, MetricBuilder, MetricDataType,
    MetricValue, RandomDataSimulator, SimulatorConfig, SimulatorError, SourceId, rng,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn node() -> EdgeNodeDescriptor {
    EdgeNodeDescriptor::new("Sparkplug B Devices", "Edge Node 1")
}

#[test]
fn node_birth_wraps_rotation_at_thirteen() {
    init_logging();
    let sim = RandomDataSimulator::new(14, HashMap::new());
    let payload = sim.node_birth(&node()).unwrap();
    assert_eq!(payload.len(), 14);

    let expected = [
        MetricDataType::Int8,
        MetricDataType::Int16,
        MetricDataType::Int32,
        MetricDataType::Int64,
        MetricDataType::UInt8,
        MetricDataType::UInt16,
        MetricDataType::UInt32,
        MetricDataType::UInt64,
        MetricDataType::Float,
        MetricDataType::Double,
        MetricDataType::String,
        MetricDataType::DateTime,
        MetricDataType::Text,
        MetricDataType::Int8,
    ];
    for (i, ty) in expected.iter().enumerate() {
        let metric = payload
            .get(&format!("NT-{i}"))
            .unwrap_or_else(|| panic!("NT-{i} missing"));
        assert_eq!(metric.data_type(), *ty, "NT-{i}");
    }
}

#[test]
fn device_birth_for_configured_and_unconfigured_devices() {
    init_logging();
    let d1 = node().device("D1");
    let d2 = node().device("D2");
    let sim = RandomDataSimulator::new(1, HashMap::from([(d1.clone(), 3)]));

    let payload = sim.device_birth(&d1).unwrap();
    let got: Vec<(&str, MetricDataType)> = payload
        .metrics()
        .iter()
        .map(|m| (m.name(), m.data_type()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("DT-0", MetricDataType::Int8),
            ("DT-1", MetricDataType::Int16),
            ("DT-2", MetricDataType::Int32),
        ]
    );

    let err = sim.device_birth(&d2).unwrap_err();
    assert!(matches!(err, SimulatorError::UnknownDevice(_)));
    assert_eq!(err.to_string(), format!("no metric count configured for device {d2}"));
}

#[test]
fn membership_follows_latest_birth() {
    init_logging();
    let sim = RandomDataSimulator::with_rng(5, HashMap::new(), rng::seeded(21));
    let source = SourceId::from(node());

    let first = sim.node_birth(&node()).unwrap();
    for metric in first.metrics() {
        assert!(sim.has_metric(&source, metric.name()));
    }
    assert!(!sim.has_metric(&source, "NT-5"));
    assert!(!sim.has_metric(&source, "nt-0"));

    let second = sim.node_birth(&node()).unwrap();
    assert!(second.timestamp() >= first.timestamp());
    for metric in second.metrics() {
        assert_eq!(sim.metric(&source, metric.name()).as_ref(), Some(metric));
    }
    assert_eq!(sim.last_update(&source), Some(second.timestamp()));
}

#[test]
fn unknown_source_lookups_are_false() {
    let sim = RandomDataSimulator::new(3, HashMap::new());
    let unknown = SourceId::from(DeviceDescriptor::new("G", "E", "nobody"));
    assert!(!sim.has_metric(&unknown, "DT-0"));
    assert!(!sim.has_metric(&unknown, ""));
}

#[test]
fn write_acknowledgement_echoes_and_changes_nothing() {
    let d1 = node().device("D1");
    let sim = RandomDataSimulator::new(2, HashMap::from([(d1.clone(), 2)]));
    sim.device_birth(&d1).unwrap();
    let source = SourceId::from(d1);
    let names_before = sim.metric_names(&source);

    let metric = MetricBuilder::new("DT-1", MetricDataType::Int8, MetricValue::Int8(-128))
        .build()
        .unwrap();
    let acked = sim.handle_metric_write(&source, metric.clone());
    assert_eq!(acked, metric);

    let stranger = SourceId::from(node().device("D9"));
    assert_eq!(sim.handle_metric_write(&stranger, metric.clone()), metric);
    assert!(!sim.has_metric(&stranger, "DT-1"));
    assert_eq!(sim.metric_names(&source), names_before);
}

#[test]
fn simulator_from_json_config() {
    init_logging();
    let config = SimulatorConfig::from_json_str(
        r#"{
            "num_node_metrics": 3,
            "devices": {"G1/E1/D1": 2, "G1/E1/D2": 13},
            "value_ranges": "legacy",
            "seed": 1234
        }"#,
    )
    .unwrap();
    let sim = RandomDataSimulator::from_config(&config).unwrap();
    let node = EdgeNodeDescriptor::new("G1", "E1");

    assert_eq!(sim.node_birth(&node).unwrap().len(), 3);
    for device in config.devices_of(&node) {
        let count = sim.device_metric_count(&device).unwrap();
        assert_eq!(sim.device_data(&device).unwrap().len(), count as usize);
    }
    assert_eq!(sim.report().total, 3);
}

#[test]
fn payloads_serialize_to_json() {
    let sim = RandomDataSimulator::with_rng(13, HashMap::new(), rng::seeded(8));
    let payload = sim.node_birth(&node()).unwrap();
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["timestamp"], payload.timestamp());
    let metrics = json["metrics"].as_object().unwrap();
    assert_eq!(metrics.len(), 13);
    assert_eq!(metrics["NT-10"]["data_type"], "String");
    assert!(metrics["NT-10"]["value"].is_string());
    assert!(metrics["NT-7"]["value"].is_u64());
}

#[test]
fn shared_across_threads() {
    use std::sync::Arc;

    let d1 = node().device("D1");
    let sim: Arc<dyn DataSimulator> =
        Arc::new(RandomDataSimulator::new(4, HashMap::from([(d1.clone(), 4)])));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sim = Arc::clone(&sim);
            let d1 = d1.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    assert_eq!(sim.device_data(&d1).unwrap().len(), 4);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(sim.has_metric(&SourceId::from(d1), "DT-3"));
}

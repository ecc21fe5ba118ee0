//! `edgesim stream`: emit a node's birth sequence followed by data cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use edgesim_core::{DataSimulator, EdgeNodeDescriptor, Result};
use log::{info, warn};
use serde::Serialize;

use super::{SimOptions, fail, make_simulator, parse_duration};

/// One streamed message.
#[derive(Serialize)]
struct StreamEvent<'a, T: Serialize> {
    kind: &'static str,
    source: String,
    payload: &'a T,
}

/// One compact JSON line, regardless of `--pretty`.
fn event_line<T: Serialize>(
    kind: &'static str,
    source: &str,
    payload: &T,
) -> serde_json::Result<String> {
    serde_json::to_string(&StreamEvent {
        kind,
        source: source.to_string(),
        payload,
    })
}

fn emit<T: Serialize>(kind: &'static str, source: impl ToString, result: Result<T>) {
    let source = source.to_string();
    let payload = match result {
        Ok(payload) => payload,
        Err(e) => {
            warn!("skipping {kind} for {source}: {e}");
            return;
        }
    };
    match event_line(kind, &source, &payload) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("skipping {kind} for {source}: {e}"),
    }
}

/// Run the stream command.
pub fn run(options: &SimOptions<'_>, node: &str, cycles: u64, interval: &str) {
    let node: EdgeNodeDescriptor = node.parse().unwrap_or_else(|e| fail(e));
    let interval = parse_duration(interval)
        .unwrap_or_else(|| fail(format!("invalid interval '{interval}' (try 500ms, 1s, 1m)")));
    let (config, sim) = make_simulator(options);
    let devices = config.devices_of(&node);
    if devices.is_empty() {
        warn!("no devices configured for {node}; streaming node birth only");
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        fail(format!("setting Ctrl+C handler: {e}"));
    }

    emit("NBIRTH", &node, sim.node_birth(&node));
    for device in &devices {
        emit("DBIRTH", device, sim.device_birth(device));
    }

    let mut completed = 0u64;
    while running.load(Ordering::SeqCst) && (cycles == 0 || completed < cycles) {
        let deadline = Instant::now() + interval;
        while Instant::now() < deadline && running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(10));
        }
        if !running.load(Ordering::SeqCst) {
            break;
        }
        for device in &devices {
            emit("DDATA", device, sim.device_data(device));
        }
        completed += 1;
    }

    let report = sim.report();
    info!(
        "stream finished: {completed} cycles, {} payloads, {} failures",
        report.payloads_built, report.failures
    );
}

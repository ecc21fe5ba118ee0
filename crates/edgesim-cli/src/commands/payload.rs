//! `edgesim node-birth`, `device-birth` and `device-data`: print one payload.

use edgesim_core::{DataSimulator, DeviceDescriptor, EdgeNodeDescriptor};

use super::{SimOptions, fail, make_simulator, print_json};

pub fn run_node_birth(options: &SimOptions<'_>, node: &str, pretty: bool) {
    let node: EdgeNodeDescriptor = node.parse().unwrap_or_else(|e| fail(e));
    let (_, sim) = make_simulator(options);
    match sim.node_birth(&node) {
        Ok(payload) => print_json(&payload, pretty),
        Err(e) => fail(e),
    }
}

pub fn run_device_birth(options: &SimOptions<'_>, device: &str, pretty: bool) {
    let device: DeviceDescriptor = device.parse().unwrap_or_else(|e| fail(e));
    let (_, sim) = make_simulator(options);
    match sim.device_birth(&device) {
        Ok(payload) => print_json(&payload, pretty),
        Err(e) => fail(e),
    }
}

pub fn run_device_data(options: &SimOptions<'_>, device: &str, pretty: bool) {
    let device: DeviceDescriptor = device.parse().unwrap_or_else(|e| fail(e));
    let (_, sim) = make_simulator(options);
    match sim.device_data(&device) {
        Ok(payload) => print_json(&payload, pretty),
        Err(e) => fail(e),
    }
}

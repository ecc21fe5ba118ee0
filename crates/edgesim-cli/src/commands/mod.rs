pub mod payload;
pub mod rotation;
pub mod server;
pub mod stream;

use std::time::Duration;

use edgesim_core::{
    RandomDataSimulator, SimulatorConfig, SimulatorError, ValueRanges, parse_device_override,
};
use serde::Serialize;

/// Simulator settings collected from the command line.
pub struct SimOptions<'a> {
    pub config_path: Option<&'a str>,
    pub node_metrics: Option<u32>,
    pub devices: &'a [String],
    pub seed: Option<u64>,
    pub legacy_ranges: bool,
}

/// Load the config file (if any) and apply command-line overrides on top.
pub fn load_config(options: &SimOptions<'_>) -> Result<SimulatorConfig, SimulatorError> {
    let mut config = match options.config_path {
        Some(path) => SimulatorConfig::from_json_file(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(n) = options.node_metrics {
        config.num_node_metrics = n;
    }
    for spec in options.devices {
        let (device, count) = parse_device_override(spec)?;
        config.set_device(&device, count);
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    if options.legacy_ranges {
        config.value_ranges = ValueRanges::Legacy;
    }
    Ok(config)
}

/// Build the simulator, exiting with a message on bad configuration.
pub fn make_simulator(options: &SimOptions<'_>) -> (SimulatorConfig, RandomDataSimulator) {
    let config = load_config(options).unwrap_or_else(|e| fail(e));
    let sim = RandomDataSimulator::from_config(&config).unwrap_or_else(|e| fail(e));
    (config, sim)
}

/// Print `value` as one JSON document.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => fail(e),
    }
}

/// Print the error and exit with status 1.
pub fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// Parse a duration string like "5m", "30s", "1h", "100ms". Bare numbers are seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();

    let (numeric, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60_000)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 3_600_000)
    } else {
        (s, 1000)
    };

    let value: u64 = numeric.trim().parse().ok()?;
    value.checked_mul(multiplier).map(Duration::from_millis)
}

//! CLI for edgesim: synthetic edge-node telemetry without sensors.

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "edgesim")]
#[command(about = "edgesim: synthetic node and device telemetry payloads")]
#[command(version = edgesim_core::VERSION)]
struct Cli {
    #[command(flatten)]
    sim: SimArgs,

    /// Pretty-print JSON output (single-payload commands)
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Simulator settings shared by every command.
#[derive(Args)]
struct SimArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Metrics per node birth (overrides the config file)
    #[arg(long, global = true)]
    node_metrics: Option<u32>,

    /// Device metric count as group/node/device=N (repeatable)
    #[arg(long = "device", global = true)]
    devices: Vec<String>,

    /// Fixed RNG seed for reproducible payloads
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Use compatibility value ranges instead of nominal bit widths
    #[arg(long, global = true)]
    legacy_ranges: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the index → data type rotation and the value rule of each type
    Rotation,

    /// Print a node birth payload (NBIRTH) as JSON
    NodeBirth {
        /// Node as group/node
        node: String,
    },

    /// Print a device birth payload (DBIRTH) as JSON
    DeviceBirth {
        /// Device as group/node/device
        device: String,
    },

    /// Print a device data payload (DDATA) as JSON
    DeviceData {
        /// Device as group/node/device
        device: String,
    },

    /// Stream NBIRTH, DBIRTHs, then DDATA cycles as JSON lines
    Stream {
        /// Node as group/node; its configured devices are streamed too
        #[arg(long)]
        node: String,

        /// Number of DDATA cycles (0 = until Ctrl+C)
        #[arg(long, default_value = "0")]
        cycles: u64,

        /// Delay between cycles (e.g. "500ms", "1s", "1m")
        #[arg(long, default_value = "1s")]
        interval: String,
    },

    /// Start an HTTP server exposing births, data, lookups and writes
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = commands::SimOptions {
        config_path: cli.sim.config.as_deref(),
        node_metrics: cli.sim.node_metrics,
        devices: &cli.sim.devices,
        seed: cli.sim.seed,
        legacy_ranges: cli.sim.legacy_ranges,
    };

    match cli.command {
        Commands::Rotation => commands::rotation::run(&options),
        Commands::NodeBirth { node } => commands::payload::run_node_birth(&options, &node, cli.pretty),
        Commands::DeviceBirth { device } => {
            commands::payload::run_device_birth(&options, &device, cli.pretty)
        }
        Commands::DeviceData { device } => {
            commands::payload::run_device_data(&options, &device, cli.pretty)
        }
        Commands::Stream {
            node,
            cycles,
            interval,
        } => commands::stream::run(&options, &node, cycles, &interval),
        Commands::Server { port, host } => commands::server::run(&options, &host, port),
    }
}

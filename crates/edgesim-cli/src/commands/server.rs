use super::{SimOptions, fail, make_simulator};

pub fn run(options: &SimOptions<'_>, host: &str, port: u16) {
    let (config, sim) = make_simulator(options);

    let base = format!("http://{host}:{port}");

    println!("edgesim server v{}", edgesim_core::VERSION);
    println!("   {base}");
    println!(
        "   {} node metrics, {} configured devices, {} ranges",
        config.num_node_metrics,
        config.devices.len(),
        config.value_ranges
    );
    println!();
    println!("   Endpoints:");
    println!("     GET  /                                          API index (try: curl {base})");
    println!("     GET  /nodes/{{group}}/{{node}}/birth                 Node birth (NBIRTH)");
    println!("     GET  /devices/{{group}}/{{node}}/{{device}}/birth      Device birth (DBIRTH)");
    println!("     GET  /devices/{{group}}/{{node}}/{{device}}/data       Device data (DDATA)");
    println!("     GET  .../metrics/{{name}}                          Metric lookup");
    println!("     POST .../metrics                                 Acknowledge a metric write");
    println!("     GET  /sources                                    Recorded state per source");
    println!("     GET  /health                                     Health check");
    println!();
    println!("   Examples:");
    println!("     curl {base}/nodes/G1/E1/birth");
    println!("     curl {base}/devices/G1/E1/D1/data");
    println!("     curl {base}/nodes/G1/E1/metrics/NT-0");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
    if let Err(e) = rt.block_on(edgesim_server::run_server(sim, host, port)) {
        fail(e);
    }
}

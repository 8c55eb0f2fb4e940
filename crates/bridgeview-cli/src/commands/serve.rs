use std::time::Duration;

pub fn run(host: &str, port: u16, interval: f64) {
    let base = format!("http://{host}:{port}");

    println!("bridgeview demo endpoint v{}", bridgeview_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET  /api/data               Full metric history (JSON array)");
    println!("     GET  /api/start-metrics      Start synthesizing samples");
    println!("     POST /api/start-translation  Start the (demo) translation bridge");
    println!("     GET  /api/health             Liveness check");
    println!();
    println!("   Try:");
    println!("     curl {base}/api/start-metrics");
    println!("     curl {base}/api/data");
    println!("     bridgeview dashboard --url {base}");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(bridgeview_server::run_server(
        host,
        port,
        Duration::from_secs_f64(interval),
    ));
}

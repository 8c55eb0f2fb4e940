use std::path::PathBuf;

use bridgeview_core::parse_window;
use time::OffsetDateTime;

use crate::client::{self, BridgeClient};

pub fn run(url: &str, output: Option<PathBuf>) {
    let client = match BridgeClient::new(url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("client setup failed: {e}");
            std::process::exit(1);
        }
    };

    let payload = match client.fetch_raw() {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("fetch failed: {e}");
            std::process::exit(1);
        }
    };

    // Validate before writing, but keep the bridge's own JSON verbatim so the
    // export round-trips.
    let window = match parse_window(&payload) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("bad payload from {}: {e}", client.base());
            std::process::exit(1);
        }
    };

    let path = output.unwrap_or_else(|| {
        PathBuf::from(client::export_file_name(OffsetDateTime::now_utc().date()))
    });

    if let Err(e) = std::fs::write(&path, payload) {
        eprintln!("write failed for {}: {e}", path.display());
        std::process::exit(1);
    }
    println!("wrote {} records to {}", window.len(), path.display());
}

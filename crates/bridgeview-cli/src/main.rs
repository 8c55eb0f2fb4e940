//! CLI for bridgeview — NAT64 bridge telemetry in your terminal.

mod client;
mod commands;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bridgeview")]
#[command(about = "bridgeview — NAT64 bridge telemetry in your terminal")]
#[command(version = bridgeview_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: packets, loss, and RTT charts with hover inspection
    Dashboard {
        /// Base URL of the bridge
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Poll interval in seconds
        #[arg(long, default_value = "5.0")]
        refresh: f64,

        /// Also fire the translation-bridge start trigger on startup
        #[arg(long)]
        start_translation: bool,
    },

    /// Download the current metrics payload to a date-stamped JSON file
    Export {
        /// Base URL of the bridge
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Output path (default: ./bridge-metrics-<date>.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the demo metrics endpoint (no bridge required)
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Bind port
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Seconds between synthesized samples
        #[arg(long, default_value = "5.0")]
        interval: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard {
            url,
            refresh,
            start_translation,
        } => commands::dashboard::run(&url, refresh, start_translation),
        Commands::Export { url, output } => commands::export::run(&url, output),
        Commands::Serve {
            host,
            port,
            interval,
        } => commands::serve::run(&host, port, interval),
    }
}

//! vpndash
//!
//! Terminal dashboard for a VPN control server.

use anyhow::Result;
use clap::Parser;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use vpndash_client::console::console_view;
use vpndash_client::{
    DashboardConfig, DashboardController, HostEvent, HttpControlApi, IndicatorClass, RunSettings,
};

/// vpndash - VPN connection dashboard
#[derive(Parser, Debug)]
#[command(name = "vpndash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "vpndash.toml")]
    config: String,

    /// Control server root, overrides api.base_url
    #[arg(long)]
    api: Option<String>,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("vpndash v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = DashboardConfig::load_or_default(&args.config).await?;
    if let Some(api) = args.api {
        config.api.base_url = api;
    }
    config.validate()?;
    info!("Control server at {}", config.api.base_url);

    let api = Arc::new(HttpControlApi::new(&config.api)?);
    let view = console_view(IndicatorClass::Disconnected, config.log.max_entries);
    let (controller, completions) = DashboardController::new(api, view, &config.session);

    let (tx, rx) = mpsc::channel(16);
    // Blocking reads on stdin cannot be cancelled, so they live on their own
    // thread; it is left behind when the process exits.
    let stdin_tx = tx.clone();
    thread::Builder::new()
        .name("vpndash-stdin".to_string())
        .spawn(move || read_commands(stdin_tx))?;
    let signal_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(HostEvent::Unload).await;
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    println!("Commands: connect (c), disconnect (d), refresh (r), quit (q)");
    vpndash_client::run(controller, completions, rx, RunSettings::from(&config)).await;

    // Cleanup
    signal_handle.abort();
    info!("vpndash stopped");

    Ok(())
}

/// Map stdin lines to host events until stdin closes or the loop is gone
fn read_commands(tx: mpsc::Sender<HostEvent>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read command: {}", e);
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let Some(event) = HostEvent::from_command(&line) else {
            println!("Unknown command: {}", line.trim());
            continue;
        };

        if tx.blocking_send(event).is_err() {
            return;
        }
    }
}

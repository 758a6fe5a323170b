//! vpndash Control CLI
//!
//! One-shot commands against the VPN control server.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tabled::Tabled;
use vpndash_client::config::ApiConfig;
use vpndash_client::{ControlApi, HttpControlApi};
use vpndash_protocol::{ActionResponse, StatusResponse};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    api: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the current connection status
    Status,
    /// Ask the server to bring the tunnel up
    Connect,
    /// Ask the server to tear the tunnel down
    Disconnect,
    /// Refresh the server-side activity timestamp
    KeepAlive,
}

#[derive(Debug, Tabled)]
struct StatusRow {
    connected: bool,
    status: String,
    last_updated: String,
}

impl From<StatusResponse> for StatusRow {
    fn from(status: StatusResponse) -> Self {
        Self {
            connected: status.connected,
            status: status.status.unwrap_or_else(|| "-".to_string()),
            last_updated: status.last_updated,
        }
    }
}

fn report(action: &str, resp: ActionResponse) -> Result<()> {
    if resp.success {
        println!("{} request succeeded: {}", action, resp.message);
        Ok(())
    } else {
        bail!("{} failed: {}", action, resp.message)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = HttpControlApi::new(&ApiConfig {
        base_url: args.api,
        request_timeout: args.timeout,
    })?;

    match args.command {
        Commands::Status => {
            let status = client.status().await?;
            let table = tabled::Table::new(vec![StatusRow::from(status)]).to_string();
            println!("{}", table);
        }
        Commands::Connect => report("Connect", client.connect().await?)?,
        Commands::Disconnect => report("Disconnect", client.disconnect().await?)?,
        Commands::KeepAlive => {
            client.keep_alive().await?;
            println!("Keep-alive sent");
        }
    }

    Ok(())
}

//! Bundestag MCP Server
//!
//! A Model Context Protocol server that gives chat clients access to the
//! plenary protocols of the German Bundestag.
//!
//! # Usage
//!
//! ```bash
//! bundestag-mcp [--api-key <key>] [--base-url <url>] [--timeout <secs>]
//! ```
//!
//! # Environment Variables
//!
//! - `BUNDESTAG_API_KEY`: DIP API key (required for tool calls)
//! - `BUNDESTAG_API_BASE`: DIP API base URL
//! - `BUNDESTAG_API_TIMEOUT`: Request timeout in seconds
//! - `RUST_LOG`: Control log verbosity (default: `bt_mcp=info,bt_dip=info,bundestag_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::time::Duration;

use bt_dip::config::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV};
use bt_dip::{DipClient, DipConfig};
use bt_mcp::BundestagMcpServer;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "bt_mcp=info,bt_dip=info,bundestag_mcp=info";

/// MCP server for Bundestag plenary protocols
#[derive(Parser)]
#[command(name = "bundestag-mcp")]
#[command(about = "MCP server for Bundestag plenary protocols (DIP API)")]
#[command(version)]
struct Args {
    /// DIP API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// DIP API base URL
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = TIMEOUT_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = DipConfig::new(args.api_key, args.base_url, Duration::from_secs(args.timeout));
    tracing::info!(base_url = %config.base_url, "Starting bundestag-mcp server");

    let client = DipClient::new(config)?;
    let mut server = BundestagMcpServer::new(client);
    server.run().await?;

    Ok(())
}

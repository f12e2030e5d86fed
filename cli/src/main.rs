//! `kong-admin`: terminal front end for the Kong gateway admin screens.

mod commands;
mod logging;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use kong_admin_business::{HttpClient, HttpConfig};
use tracing::debug;

use crate::commands::{ReportedError, UsersArgs, run_users};

#[derive(Parser)]
#[command(name = "kong-admin")]
#[command(about = "Admin console for the Kong gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gateway base URL; falls back to GW_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds; falls back to GW_TIMEOUT_MS, then 1000
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List users as a sortable, filterable, paginated table
    Users(UsersArgs),
}

impl Cli {
    fn http_config(&self) -> Result<HttpConfig> {
        let config = match &self.base_url {
            Some(base_url) => HttpConfig::new(base_url.as_str()),
            None => HttpConfig::from_env().context("Failed to read gateway config from env")?,
        };
        Ok(match self.timeout_ms {
            Some(ms) => config.with_timeout(Duration::from_millis(ms)),
            None => config,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init_tracing(cli.verbose);

    let config = cli.http_config()?;
    debug!(base_url = %config.base_url, timeout = ?config.timeout, "gateway config");
    let client = HttpClient::new(config);

    let result = match &cli.command {
        Commands::Users(args) => run_users(&client, args).await,
    };
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is::<ReportedError>() => Ok(ExitCode::FAILURE),
        Err(err) => Err(err),
    }
}

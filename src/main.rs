use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use scanjob::api::ApiClient;
use scanjob::config::{AppConfig, DEFAULT_CONFIG_PATH};
use scanjob::core::{CreateResourceResponse, LoginToken, ResultRecord, ScanProcess};
use scanjob::logging::{self, LogConfig};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

const MIN_POLL_SECS: u64 = 1;

#[derive(Parser)]
#[command(name = "scanjob")]
#[command(about = "Track remote plagiarism scan processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Access token from the service login endpoint
    #[arg(long, global = true, env = "SCANJOB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Token expiry (RFC 3339). Defaults to one hour from now.
    #[arg(long, global = true)]
    token_expires: Option<DateTime<Utc>>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Print scan progress out of 100
    Status { id: Uuid },
    /// Print scan results as JSON, highest similarity first
    Results { id: Uuid },
    /// Delete the process on the service
    Delete { id: Uuid },
    /// Poll until the scan completes, then print its results
    Wait {
        id: Uuid,
        /// Seconds between polls (overrides poll_interval_secs)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Args, Serialize)]
struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true")]
    verbose: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long = "json", global = true, num_args = 0..=1, default_missing_value = "true")]
    json_logs: Option<bool>,

    #[serde(skip_serializing_if = "ServiceOverrides::is_empty")]
    #[command(flatten)]
    service: ServiceOverrides,
}

#[derive(Args, Serialize)]
struct ServiceOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true)]
    entry_point: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true)]
    page: Option<String>,
}

impl ServiceOverrides {
    fn is_empty(&self) -> bool {
        self.entry_point.is_none() && self.page.is_none()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new(&cli.config, Some(&cli.overrides))?;

    logging::init(LogConfig {
        json: config.json_logs,
        verbose: config.verbose,
    });

    match &cli.command {
        Commands::Status { id } => {
            let progress = open_process(&cli, &config, *id)?
                .current_progress()
                .await
                .context("Failed to fetch scan progress")?;
            println!("{}", progress);
        }
        Commands::Results { id } => {
            let results = open_process(&cli, &config, *id)?
                .results()
                .await
                .context("Failed to fetch scan results")?;
            print_results(&results)?;
        }
        Commands::Delete { id } => {
            open_process(&cli, &config, *id)?
                .delete()
                .await
                .context("Failed to delete process")?;
        }
        Commands::Wait { id, interval } => {
            let process = open_process(&cli, &config, *id)?;
            let interval = poll_interval(*interval, config.poll_interval_secs);
            process
                .wait_for_completion(interval)
                .await
                .context("Failed while waiting for scan")?;
            let results = process
                .results()
                .await
                .context("Failed to fetch scan results")?;
            print_results(&results)?;
        }
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn open_process(cli: &Cli, config: &AppConfig, id: Uuid) -> Result<ScanProcess> {
    let access_token = cli
        .token
        .clone()
        .context("A login token is required (--token or SCANJOB_TOKEN)")?;
    let expires = cli
        .token_expires
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    let client = ApiClient::new(config.service.clone()).context("Failed to build HTTP client")?;
    debug!(
        entry_point = %client.config().entry_point,
        page = %client.config().page,
        process_id = %id,
        "Opening scan process"
    );
    let response = CreateResourceResponse {
        process_id: id,
        creation_time_utc: Utc::now(),
    };

    Ok(ScanProcess::from_creation(
        Arc::new(client),
        Arc::new(LoginToken::new(access_token, expires)),
        response,
        HashMap::new(),
    ))
}

/// A configured interval of 0 would poll the service in a tight loop.
fn poll_interval(cli_secs: Option<u64>, configured_secs: u64) -> Duration {
    Duration::from_secs(cli_secs.unwrap_or(configured_secs).max(MIN_POLL_SECS))
}

fn print_results(results: &[ResultRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

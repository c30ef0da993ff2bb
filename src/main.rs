//! Cypress Teams reporter - main entry point.
//!
//! Loads configuration, runs the reporting pipeline once and maps the outcome
//! to the process exit code.

use clap::Parser;
use tracing::{error, info};

use cypress_teams_reporter::cli::Cli;
use cypress_teams_reporter::config::{EnvSnapshot, RunConfig};
use cypress_teams_reporter::error::{AppError, EXIT_CONFIG, EXIT_SUCCESS, error_chain};
use cypress_teams_reporter::logging::init_tracing;
use cypress_teams_reporter::services::{DispatchOutcome, Dispatcher};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load before logging so a config-file `verbose` can raise the level
    let env = EnvSnapshot::from_process();
    let json_logs = env.json_logs();
    let loaded = RunConfig::load(&cli, env);
    let verbose = loaded.as_ref().map_or(cli.verbose, |c| c.verbose);

    if let Err(e) = init_tracing(verbose, json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Running version: {}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match Dispatcher::new(config).run().await {
        Ok(DispatchOutcome::Sent) | Ok(DispatchOutcome::Skipped) => EXIT_SUCCESS,
        Err(e) => {
            log_failure(&e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

fn log_failure(err: &AppError) {
    let detail = error_chain(err);
    match err {
        AppError::Config(_) => error!("Configuration error: {}", detail),
        AppError::Report(_) => error!("Cannot build the summary: {}", detail),
        AppError::Delivery(_) => error!("Failed to send Teams notification: {}", detail),
        AppError::HttpClient(_) => error!("Failed to set up HTTP client: {}", detail),
    }
}

//! Command-line flags.
//!
//! Flags carry no clap defaults: an absent flag means "not set on the command
//! line", which lets the config loader layer defaults, the config file and the
//! environment underneath it. Defaults live in [`crate::config::defaults`].

use std::path::PathBuf;

use clap::Parser;

/// Send Cypress Mochawesome results to a Microsoft Teams channel
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "cypress-teams-reporter",
    version,
    about = "Summarize a Cypress Mochawesome report and post it to Microsoft Teams",
    long_about = "Reads <report-dir>/html/<report-filename>, resolves a CI artifact URL and \
                  posts a MessageCard to the webhook in TEAMS_WEBHOOK_URL."
)]
pub struct Cli {
    /// CI provider [github|bitbucket|circleci|jenkins|local|none] (default: github)
    #[arg(long, value_name = "PROVIDER")]
    pub ci_provider: Option<String>,

    /// Report URL to link instead of the CI artifact URL
    #[arg(long, value_name = "URL")]
    pub custom_url: Option<String>,

    /// Mochawesome report directory (default: cypress/reports)
    #[arg(long, value_name = "PATH")]
    pub report_dir: Option<PathBuf>,

    /// Mochawesome JSON file name inside <report-dir>/html (default: index.json)
    #[arg(long, value_name = "NAME")]
    pub report_filename: Option<String>,

    /// Cypress screenshot directory (default: cypress/screenshots)
    #[arg(long, value_name = "PATH")]
    pub screenshot_dir: Option<PathBuf>,

    /// Cypress video directory (default: cypress/videos)
    #[arg(long, value_name = "PATH")]
    pub video_dir: Option<PathBuf>,

    /// Show detailed log output
    #[arg(long)]
    pub verbose: bool,

    /// Only send a notification when at least one test failed
    #[arg(long)]
    pub only_failed: bool,

    /// Additional text in the Teams message
    #[arg(long, value_name = "TEXT")]
    pub custom_text: Option<String>,

    /// Module name associated with the test run
    #[arg(long, value_name = "NAME")]
    pub module_name: Option<String>,

    /// Team name receiving the test report
    #[arg(long, value_name = "NAME")]
    pub team_name: Option<String>,

    /// JSON or TOML config file (default: teamsReport.config.json, optional)
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Link REPORT_URL when the GitHub artifact lookup fails
    #[arg(long)]
    pub fallback_to_report_url: bool,

    /// Timeout in seconds for every outgoing HTTP request (default: 30)
    #[arg(long, value_name = "SECS")]
    pub http_timeout_secs: Option<u64>,
}

//! Run configuration loaded from defaults, a config file, environment
//! variables and CLI flags.
//!
//! This is the only module that reads reporter settings from the process
//! environment. Everything downstream receives an immutable [`RunConfig`] or
//! the [`EnvSnapshot`] it carries. The one exception is `RUST_LOG`, which the
//! tracing filter reads itself.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::cli::Cli;
use crate::models::Fact;

/// Default values used when neither the config file, the environment nor the
/// command line provide one.
pub mod defaults {
    pub const REPORT_DIR: &str = "cypress/reports";
    pub const REPORT_FILENAME: &str = "index.json";
    pub const REPORT_TITLE: &str = "Cypress Test Results";
    pub const SCREENSHOT_DIR: &str = "cypress/screenshots";
    pub const VIDEO_DIR: &str = "cypress/videos";
    pub const CONFIG_FILE: &str = "teamsReport.config.json";
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// Every environment variable the reporter reads.
pub mod vars {
    pub const TEAMS_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";
    pub const REPORT_URL: &str = "REPORT_URL";
    pub const MODULE_NAME: &str = "MODULE_NAME";
    pub const TEAM_NAME: &str = "TEAM_NAME";
    pub const REPORT_DIR: &str = "REPORT_DIR";
    pub const REPORT_FILENAME: &str = "REPORT_FILENAME";
    pub const CI_PROVIDER: &str = "CI_PROVIDER";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";

    pub const GITHUB_RUN_ID: &str = "GITHUB_RUN_ID";
    pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
    pub const GITHUB_SERVER_URL: &str = "GITHUB_SERVER_URL";

    pub const BITBUCKET_WORKSPACE: &str = "BITBUCKET_WORKSPACE";
    pub const BITBUCKET_REPO_SLUG: &str = "BITBUCKET_REPO_SLUG";
    pub const BITBUCKET_BUILD_NUMBER: &str = "BITBUCKET_BUILD_NUMBER";

    pub const CIRCLE_PROJECT_USERNAME: &str = "CIRCLE_PROJECT_USERNAME";
    pub const CIRCLE_PROJECT_REPONAME: &str = "CIRCLE_PROJECT_REPONAME";
    pub const CIRCLE_BUILD_NUM: &str = "CIRCLE_BUILD_NUM";
    pub const CIRCLE_WORKFLOW_ID: &str = "CIRCLE_WORKFLOW_ID";
    pub const CIRCLE_PROJECT_ID: &str = "CIRCLE_PROJECT_ID";

    pub const JENKINS_URL: &str = "JENKINS_URL";
    pub const JOB_NAME: &str = "JOB_NAME";
    pub const BUILD_URL: &str = "BUILD_URL";

    pub const ALL: &[&str] = &[
        TEAMS_WEBHOOK_URL,
        REPORT_URL,
        MODULE_NAME,
        TEAM_NAME,
        REPORT_DIR,
        REPORT_FILENAME,
        CI_PROVIDER,
        LOG_FORMAT,
        GITHUB_RUN_ID,
        GITHUB_REPOSITORY,
        GITHUB_TOKEN,
        GITHUB_API_URL,
        GITHUB_SERVER_URL,
        BITBUCKET_WORKSPACE,
        BITBUCKET_REPO_SLUG,
        BITBUCKET_BUILD_NUMBER,
        CIRCLE_PROJECT_USERNAME,
        CIRCLE_PROJECT_REPONAME,
        CIRCLE_BUILD_NUM,
        CIRCLE_WORKFLOW_ID,
        CIRCLE_PROJECT_ID,
        JENKINS_URL,
        JOB_NAME,
        BUILD_URL,
    ];

    /// Credentials that must never be printed.
    pub const SECRETS: &[&str] = &[TEAMS_WEBHOOK_URL, GITHUB_TOKEN];
}

/// Immutable snapshot of the environment variables in [`vars::ALL`].
///
/// Empty values are treated as unset. `Debug` output redacts [`vars::SECRETS`].
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    values: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the reporter's variables from the process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(
            vars::ALL
                .iter()
                .filter_map(|name| env::var(name).ok().map(|value| (*name, value))),
        )
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        Self { values }
    }

    /// Get a non-empty variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Names from `names` that are unset.
    pub fn missing<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| self.get(name).is_none())
            .collect()
    }

    /// `LOG_FORMAT=json` selects structured log output.
    pub fn json_logs(&self) -> bool {
        self.get(vars::LOG_FORMAT)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();

        let mut map = f.debug_map();
        for name in names {
            if vars::SECRETS.contains(&name.as_str()) {
                map.entry(name, &"[REDACTED]");
            } else {
                map.entry(name, &self.values[name]);
            }
        }
        map.finish()
    }
}

/// Contents of the optional config file.
///
/// Keys mirror the `teamsReport.config.js` object used by the Node reporter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub teams_webhook_url: Option<String>,
    pub report_dir: Option<PathBuf>,
    pub report_filename: Option<String>,
    pub report_title: Option<String>,
    pub ci_provider: Option<String>,
    #[serde(default)]
    pub custom_facts: Vec<Fact>,
    pub report_url: Option<String>,
    pub custom_url: Option<String>,
    pub custom_text: Option<String>,
    pub module_name: Option<String>,
    pub team_name: Option<String>,
    pub screenshot_dir: Option<PathBuf>,
    pub video_dir: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub only_failed: Option<bool>,
    pub fallback_to_report_url: Option<bool>,
    pub http_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load a config file, choosing the parser from the extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self, String> = match ext.as_deref() {
            Some("json") => |s| serde_json::from_str(s).map_err(|e| e.to_string()),
            Some("toml") => |s| toml::from_str(s).map_err(|e| e.to_string()),
            _ => return Err(ConfigError::UnsupportedConfigFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        parse(&content).map_err(|message| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Resolved settings for one reporter run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Provider name as given; resolution and defaulting happen in `CiProvider::resolve`
    pub ci_provider: Option<String>,
    /// Explicit report link that bypasses the provider
    pub custom_url: Option<String>,
    /// Override link from REPORT_URL / `reportUrl`
    pub report_url: Option<String>,
    pub report_dir: PathBuf,
    pub report_filename: String,
    pub report_title: String,
    pub screenshot_dir: PathBuf,
    pub video_dir: PathBuf,
    /// Teams incoming webhook; required before anything is sent
    pub webhook_url: Option<SecretString>,
    pub custom_text: Option<String>,
    pub module_name: String,
    pub team_name: String,
    pub custom_facts: Vec<Fact>,
    pub verbose: bool,
    pub only_failed: bool,
    /// Use `report_url` when the GitHub artifact lookup fails
    pub fallback_to_report_url: bool,
    pub http_timeout: Duration,
    /// CI variables captured at startup
    pub env: EnvSnapshot,
}

impl RunConfig {
    /// Build the run configuration.
    ///
    /// Precedence: defaults < config file < environment < explicit CLI flags.
    /// The default config file is optional; a path passed with `--config-file`
    /// must exist.
    pub fn load(cli: &Cli, env: EnvSnapshot) -> Result<Self, ConfigError> {
        let file = match &cli.config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::ConfigFileNotFound(path.clone()));
            }
            Some(path) => FileConfig::load(path)?,
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.exists() {
                    FileConfig::load(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Self::merge(cli, file, env)
    }

    /// Merge already-loaded layers.
    pub fn merge(cli: &Cli, file: FileConfig, env: EnvSnapshot) -> Result<Self, ConfigError> {
        let env_string = |name: &str| env.get(name).map(str::to_string);

        let report_dir = cli
            .report_dir
            .clone()
            .or_else(|| env.get(vars::REPORT_DIR).map(PathBuf::from))
            .or(file.report_dir)
            .unwrap_or_else(|| PathBuf::from(defaults::REPORT_DIR));

        let report_filename = cli
            .report_filename
            .clone()
            .or_else(|| env_string(vars::REPORT_FILENAME))
            .or(file.report_filename)
            .unwrap_or_else(|| defaults::REPORT_FILENAME.to_string());

        if report_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("report directory must not be empty"));
        }
        if report_filename.trim().is_empty() {
            return Err(ConfigError::InvalidValue("report filename must not be empty"));
        }

        let webhook_url = env_string(vars::TEAMS_WEBHOOK_URL)
            .or(file.teams_webhook_url)
            .filter(|url| !url.trim().is_empty())
            .map(SecretString::from);

        let ci_provider = non_empty(cli.ci_provider.clone())
            .or_else(|| env_string(vars::CI_PROVIDER))
            .or(non_empty(file.ci_provider));

        let custom_url = non_empty(cli.custom_url.clone()).or(non_empty(file.custom_url));
        let report_url = env_string(vars::REPORT_URL).or(non_empty(file.report_url));

        let module_name = cli
            .module_name
            .clone()
            .or_else(|| env_string(vars::MODULE_NAME))
            .or(file.module_name)
            .unwrap_or_default();

        let team_name = cli
            .team_name
            .clone()
            .or_else(|| env_string(vars::TEAM_NAME))
            .or(file.team_name)
            .unwrap_or_default();

        let http_timeout_secs = cli
            .http_timeout_secs
            .or(file.http_timeout_secs)
            .unwrap_or(defaults::HTTP_TIMEOUT_SECS);
        if http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("HTTP timeout must be at least 1 second"));
        }

        Ok(RunConfig {
            ci_provider,
            custom_url,
            report_url,
            report_dir,
            report_filename,
            report_title: non_empty(file.report_title)
                .unwrap_or_else(|| defaults::REPORT_TITLE.to_string()),
            screenshot_dir: cli
                .screenshot_dir
                .clone()
                .or(file.screenshot_dir)
                .unwrap_or_else(|| PathBuf::from(defaults::SCREENSHOT_DIR)),
            video_dir: cli
                .video_dir
                .clone()
                .or(file.video_dir)
                .unwrap_or_else(|| PathBuf::from(defaults::VIDEO_DIR)),
            webhook_url,
            custom_text: non_empty(cli.custom_text.clone()).or(non_empty(file.custom_text)),
            module_name,
            team_name,
            custom_facts: file.custom_facts,
            verbose: cli.verbose || file.verbose.unwrap_or(false),
            only_failed: cli.only_failed || file.only_failed.unwrap_or(false),
            fallback_to_report_url: cli.fallback_to_report_url
                || file.fallback_to_report_url.unwrap_or(false),
            http_timeout: Duration::from_secs(http_timeout_secs),
            env,
        })
    }

    /// Path of the Mochawesome JSON: `<report_dir>/html/<report_filename>`.
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join("html").join(&self.report_filename)
    }

    /// The webhook URL, or a configuration error when it is missing.
    pub fn require_webhook(&self) -> Result<&SecretString, ConfigError> {
        self.webhook_url
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar(vars::TEAMS_WEBHOOK_URL))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("Unsupported config file {} (use .json or .toml; JavaScript config files cannot be evaluated)", .0.display())]
    UnsupportedConfigFormat(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    ConfigFileParse { path: PathBuf, message: String },
}

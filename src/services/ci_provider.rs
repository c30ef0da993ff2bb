//! CI provider strategies.
//!
//! Each provider derives an artifact URL for the current build from the
//! variables its CI system exports. Only GitHub performs a network call.

use std::fmt;

use secrecy::SecretString;
use tracing::{error, info, warn};

use crate::config::{EnvSnapshot, RunConfig, vars};
use crate::services::github_artifacts::GitHubArtifactClient;

/// Supported CI systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiProvider {
    GitHub,
    Bitbucket,
    CircleCi,
    Jenkins,
    /// No CI: use the REPORT_URL override
    Local,
}

/// What a provider strategy does when asked for an artifact URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Calls a remote API
    pub network_lookup: bool,
    /// Builds the URL from environment variables alone
    pub deterministic: bool,
}

/// Inputs shared by every provider strategy.
pub struct ProviderContext<'a> {
    pub env: &'a EnvSnapshot,
    pub http_client: &'a reqwest::Client,
    /// REPORT_URL override
    pub report_url: Option<&'a str>,
    /// Return `report_url` when the GitHub lookup fails
    pub fallback_to_report_url: bool,
}

impl<'a> ProviderContext<'a> {
    pub fn from_config(config: &'a RunConfig, http_client: &'a reqwest::Client) -> Self {
        Self {
            env: &config.env,
            http_client,
            report_url: config.report_url.as_deref(),
            fallback_to_report_url: config.fallback_to_report_url,
        }
    }
}

impl CiProvider {
    pub const ALL: [CiProvider; 5] = [
        CiProvider::GitHub,
        CiProvider::Bitbucket,
        CiProvider::CircleCi,
        CiProvider::Jenkins,
        CiProvider::Local,
    ];

    /// Parse a provider name (case-insensitive). `none` is an alias of `local`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "bitbucket" => Some(Self::Bitbucket),
            "circleci" => Some(Self::CircleCi),
            "jenkins" => Some(Self::Jenkins),
            "local" | "none" => Some(Self::Local),
            _ => None,
        }
    }

    /// Resolve the configured provider. Defaults to GitHub; unknown names
    /// are logged and fall back to GitHub.
    pub fn resolve(name: Option<&str>) -> Self {
        let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
            return Self::GitHub;
        };

        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown CI provider: {}. Defaulting to GitHub.", name);
            Self::GitHub
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Bitbucket => "bitbucket",
            Self::CircleCi => "circleci",
            Self::Jenkins => "jenkins",
            Self::Local => "local",
        }
    }

    /// Environment variables the strategy needs before it produces a URL.
    pub fn required_vars(&self) -> &'static [&'static str] {
        match self {
            Self::GitHub => &[vars::GITHUB_RUN_ID, vars::GITHUB_REPOSITORY, vars::GITHUB_TOKEN],
            Self::Bitbucket => &[
                vars::BITBUCKET_WORKSPACE,
                vars::BITBUCKET_REPO_SLUG,
                vars::BITBUCKET_BUILD_NUMBER,
            ],
            Self::CircleCi => &[
                vars::CIRCLE_PROJECT_USERNAME,
                vars::CIRCLE_PROJECT_REPONAME,
                vars::CIRCLE_BUILD_NUM,
                vars::CIRCLE_WORKFLOW_ID,
                vars::CIRCLE_PROJECT_ID,
            ],
            Self::Jenkins => &[vars::JENKINS_URL, vars::JOB_NAME, vars::BUILD_URL],
            Self::Local => &[],
        }
    }

    pub fn capabilities(&self) -> ProviderCapabilities {
        match self {
            Self::GitHub => ProviderCapabilities {
                network_lookup: true,
                deterministic: false,
            },
            Self::Bitbucket | Self::CircleCi | Self::Jenkins | Self::Local => {
                ProviderCapabilities {
                    network_lookup: false,
                    deterministic: true,
                }
            }
        }
    }

    /// Artifact URL for the current build, or `None` when it cannot be derived.
    ///
    /// Missing variables never trigger a network call.
    pub async fn artifact_url(&self, ctx: &ProviderContext<'_>) -> Option<String> {
        if *self == Self::Local {
            info!("Running locally, using REPORT_URL from environment");
            return ctx.report_url.map(str::to_string);
        }

        let missing = ctx.env.missing(self.required_vars());
        if !missing.is_empty() {
            warn!(
                "Missing {} variables ({}). Skipping artifact retrieval.",
                self,
                missing.join(", ")
            );
            return None;
        }

        match self {
            Self::GitHub => github_artifact_url(ctx).await,
            _ => {
                let url = self.deterministic_url(ctx.env)?;
                info!("{} artifact URL: {}", self, url);
                Some(url)
            }
        }
    }

    /// URL template of the providers that need no network call.
    fn deterministic_url(&self, env: &EnvSnapshot) -> Option<String> {
        match self {
            Self::Bitbucket => Some(format!(
                "https://bitbucket.org/{}/{}/pipelines/results/{}",
                env.get(vars::BITBUCKET_WORKSPACE)?,
                env.get(vars::BITBUCKET_REPO_SLUG)?,
                env.get(vars::BITBUCKET_BUILD_NUMBER)?,
            )),
            Self::CircleCi => Some(format!(
                "https://app.circleci.com/pipelines/github/{}/{}/{}/workflows/{}/jobs/{}/artifacts",
                env.get(vars::CIRCLE_PROJECT_USERNAME)?,
                env.get(vars::CIRCLE_PROJECT_REPONAME)?,
                env.get(vars::CIRCLE_PROJECT_ID)?,
                env.get(vars::CIRCLE_WORKFLOW_ID)?,
                env.get(vars::CIRCLE_BUILD_NUM)?,
            )),
            Self::Jenkins => env.get(vars::BUILD_URL).map(str::to_string),
            Self::GitHub | Self::Local => None,
        }
    }
}

impl fmt::Display for CiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::GitHub => "GitHub",
            Self::Bitbucket => "Bitbucket",
            Self::CircleCi => "CircleCI",
            Self::Jenkins => "Jenkins",
            Self::Local => "local",
        };
        write!(f, "{}", label)
    }
}

/// Browsable page of the run's first artifact.
async fn github_artifact_url(ctx: &ProviderContext<'_>) -> Option<String> {
    let env = ctx.env;
    let repository = env.get(vars::GITHUB_REPOSITORY)?;
    let run_id = env.get(vars::GITHUB_RUN_ID)?;
    let token = SecretString::from(env.get(vars::GITHUB_TOKEN)?.to_string());

    let client = GitHubArtifactClient::new(
        ctx.http_client,
        env.get(vars::GITHUB_API_URL),
        env.get(vars::GITHUB_SERVER_URL),
        token,
    );

    match client.list_artifacts(repository, run_id).await {
        Ok(artifacts) => {
            let Some(first) = artifacts.first() else {
                warn!("No artifacts found for GitHub run {}", run_id);
                return None;
            };
            let url = client.artifact_page_url(repository, run_id, first.id);
            info!("GitHub artifact '{}' URL: {}", first.name, url);
            Some(url)
        }
        Err(e) => {
            error!("Failed to fetch GitHub artifact URL: {}", e);
            if ctx.fallback_to_report_url
                && let Some(url) = ctx.report_url
            {
                info!("Falling back to REPORT_URL: {}", url);
                return Some(url.to_string());
            }
            None
        }
    }
}

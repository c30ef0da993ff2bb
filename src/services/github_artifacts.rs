//! GitHub Actions artifact lookup.
//!
//! One authenticated read of the artifact listing for a workflow run.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

/// Default REST endpoint when `GITHUB_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default web host when `GITHUB_SERVER_URL` is unset.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Artifact listing errors.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Workflow run artifact as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ArtifactList {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

/// Client for `GET /repos/{repo}/actions/runs/{run_id}/artifacts`.
pub struct GitHubArtifactClient<'a> {
    http_client: &'a reqwest::Client,
    api_url: String,
    server_url: String,
    token: SecretString,
}

impl<'a> GitHubArtifactClient<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        api_url: Option<&str>,
        server_url: Option<&str>,
        token: SecretString,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.unwrap_or(DEFAULT_API_URL).trim_end_matches('/').to_string(),
            server_url: server_url
                .unwrap_or(DEFAULT_SERVER_URL)
                .trim_end_matches('/')
                .to_string(),
            token,
        }
    }

    /// List the artifacts uploaded by a workflow run.
    pub async fn list_artifacts(
        &self,
        repository: &str,
        run_id: &str,
    ) -> Result<Vec<Artifact>, GitHubError> {
        let url = format!(
            "{}/repos/{}/actions/runs/{}/artifacts",
            self.api_url, repository, run_id
        );
        debug!("Fetching GitHub artifacts from {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status { status, body });
        }

        let list: ArtifactList = response.json().await?;
        debug!("GitHub run {} has {} artifact(s)", run_id, list.artifacts.len());
        Ok(list.artifacts)
    }

    /// Browsable page of one artifact.
    pub fn artifact_page_url(&self, repository: &str, run_id: &str, artifact_id: u64) -> String {
        format!(
            "{}/{}/actions/runs/{}/artifacts/{}",
            self.server_url, repository, run_id, artifact_id
        )
    }
}

//! E2E tests: GitHub artifact resolution against the mock API.

use cypress_teams_reporter::config::{EnvSnapshot, vars};
use cypress_teams_reporter::services::{CiProvider, Dispatcher, ProviderContext, build_http_client};
use std::time::Duration;

use super::mock_servers::{GitHubReply, MockGitHubApi, MockTeamsWebhook};
use super::test_helpers::*;

const REPORT_URL: &str = "https://reports.example.com/fallback";

fn github_env(api_url: &str) -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        (vars::GITHUB_RUN_ID, "987654"),
        (vars::GITHUB_REPOSITORY, "acme/shop"),
        (vars::GITHUB_TOKEN, "ghs_test_token"),
        (vars::GITHUB_API_URL, api_url),
        (vars::GITHUB_SERVER_URL, "https://github.example.com"),
    ])
}

async fn resolve(env: &EnvSnapshot, fallback: bool) -> Option<String> {
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    let ctx = ProviderContext {
        env,
        http_client: &client,
        report_url: Some(REPORT_URL),
        fallback_to_report_url: fallback,
    };
    CiProvider::GitHub.artifact_url(&ctx).await
}

/// (1) Artifacts present → browsable page of the first one.
#[actix_rt::test]
async fn test_first_artifact_page() {
    let mock = MockGitHubApi::start(GitHubReply::Artifacts(vec![501, 502])).await;

    let url = resolve(&github_env(&mock.api_url), false).await;

    assert_eq!(
        url.as_deref(),
        Some("https://github.example.com/acme/shop/actions/runs/987654/artifacts/501")
    );

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/repos/acme/shop/actions/runs/987654/artifacts");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer ghs_test_token")
    );
    assert_eq!(
        requests[0].accept.as_deref(),
        Some("application/vnd.github.v3+json")
    );
}

/// (2) No artifacts → absent.
#[actix_rt::test]
async fn test_no_artifacts() {
    let mock = MockGitHubApi::start(GitHubReply::Artifacts(vec![])).await;
    assert_eq!(resolve(&github_env(&mock.api_url), true).await, None);
}

/// (3) API failure → absent without fallback, REPORT_URL with fallback.
#[actix_rt::test]
async fn test_api_failure_fallback_is_opt_in() {
    let mock = MockGitHubApi::start(GitHubReply::Status(500)).await;
    let env = github_env(&mock.api_url);

    assert_eq!(resolve(&env, false).await, None);
    assert_eq!(resolve(&env, true).await.as_deref(), Some(REPORT_URL));
    assert_eq!(mock.requests().len(), 2);
}

/// (4) Any missing variable → absent and no request reaches the API.
#[actix_rt::test]
async fn test_missing_variable_makes_no_request() {
    let mock = MockGitHubApi::start(GitHubReply::Artifacts(vec![1])).await;

    for missing in [vars::GITHUB_RUN_ID, vars::GITHUB_REPOSITORY, vars::GITHUB_TOKEN] {
        let env = EnvSnapshot::from_pairs(
            [
                (vars::GITHUB_RUN_ID, "987654"),
                (vars::GITHUB_REPOSITORY, "acme/shop"),
                (vars::GITHUB_TOKEN, "ghs_test_token"),
                (vars::GITHUB_API_URL, mock.api_url.as_str()),
            ]
            .into_iter()
            .filter(|(name, _)| *name != missing),
        );
        assert_eq!(resolve(&env, true).await, None, "without {}", missing);
    }

    assert!(mock.requests().is_empty());
}

/// (5) Default provider is GitHub: the dispatcher links the artifact page.
#[actix_rt::test]
async fn test_dispatch_with_default_provider() {
    let github = MockGitHubApi::start(GitHubReply::Artifacts(vec![77])).await;
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(3, 0, &[]));

    let config = run_config(
        &fixture.report_dir(),
        &[
            (vars::TEAMS_WEBHOOK_URL, webhook.url.as_str()),
            (vars::GITHUB_RUN_ID, "987654"),
            (vars::GITHUB_REPOSITORY, "acme/shop"),
            (vars::GITHUB_TOKEN, "ghs_test_token"),
            (vars::GITHUB_API_URL, github.api_url.as_str()),
        ],
    );
    assert!(config.ci_provider.is_none());

    Dispatcher::new(config).run().await.unwrap();

    assert_eq!(
        webhook.received()[0]["potentialAction"][0]["targets"][0]["uri"],
        "https://github.com/acme/shop/actions/runs/987654/artifacts/77"
    );
}

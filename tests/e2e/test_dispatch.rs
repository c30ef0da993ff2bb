//! E2E tests: full pipeline against the mock webhook.

use cypress_teams_reporter::config::vars;
use cypress_teams_reporter::error::{AppError, DeliveryError, ReportError, error_chain};
use cypress_teams_reporter::services::{DispatchOutcome, Dispatcher};
use serde_json::json;

use super::mock_servers::{GitHubReply, MockGitHubApi, MockTeamsWebhook};
use super::test_helpers::*;

/// (1) Failed run → red card with one block per failure, in report order.
#[actix_rt::test]
async fn test_failed_run_posts_red_card() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(7, 1, &["adds to cart", "applies coupon"]));
    let config = run_config(
        &fixture.report_dir(),
        &local_env(&webhook.url, "https://reports.example.com/run/42"),
    );

    let outcome = Dispatcher::new(config).run().await.expect("dispatch should succeed");
    assert_eq!(outcome, DispatchOutcome::Sent);

    let received = webhook.received();
    assert_eq!(received.len(), 1);
    let card = &received[0];

    assert_eq!(card["@type"], "MessageCard");
    assert_eq!(card["@context"], "http://schema.org/extensions");
    assert_eq!(card["themeColor"], "FF0000");
    assert_eq!(card["sections"][0]["facts"][1]["value"], "❌ 2 (20.0%)");

    let failures = card["sections"][2]["text"].as_str().unwrap();
    let first = failures.find("**adds to cart**").expect("first failure");
    let second = failures.find("**applies coupon**").expect("second failure");
    assert!(first < second);
    assert!(failures.contains("`applies coupon broke`"));

    let action = &card["potentialAction"][0];
    assert_eq!(action["@type"], "OpenUri");
    assert_eq!(action["name"], "View Full Report (Some Tests Failed)");
    assert_eq!(action["targets"][0]["uri"], "https://reports.example.com/run/42");
}

/// (2) Green run → green card, verbatim success text.
#[actix_rt::test]
async fn test_green_run_posts_green_card() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(4, 0, &[]));
    let config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));

    Dispatcher::new(config).run().await.unwrap();

    let card = &webhook.received()[0];
    assert_eq!(card["themeColor"], "00FF00");
    assert_eq!(card["sections"][2]["text"], "All tests executed successfully!");
    assert_eq!(
        card["potentialAction"][0]["targets"][0]["uri"],
        "No report URL available"
    );
}

/// (3) --only-failed with a green run → nothing is sent.
#[actix_rt::test]
async fn test_only_failed_skips_green_run() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(4, 0, &[]));
    let mut config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));
    config.only_failed = true;

    let outcome = Dispatcher::new(config).run().await.unwrap();

    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert!(webhook.received().is_empty());
}

/// (4) --only-failed with failures → sent as usual.
#[actix_rt::test]
async fn test_only_failed_sends_failed_run() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(1, 0, &["checks out"]));
    let mut config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));
    config.only_failed = true;

    let outcome = Dispatcher::new(config).run().await.unwrap();

    assert_eq!(outcome, DispatchOutcome::Sent);
    assert_eq!(webhook.received().len(), 1);
}

/// (5) Missing report → report error, no POST.
#[actix_rt::test]
async fn test_missing_report_aborts_before_delivery() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::empty();
    let config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));

    let err = Dispatcher::new(config).run().await.unwrap_err();

    assert!(matches!(err, AppError::Report(ReportError::NotFound(_))));
    assert_eq!(err.exit_code(), 1);
    assert!(webhook.received().is_empty());
}

/// (6) Webhook answers 400 → delivery error with status and body.
#[actix_rt::test]
async fn test_rejected_delivery_is_error() {
    let webhook = MockTeamsWebhook::start(400).await;
    let fixture = ReportFixture::write(&report_with(1, 0, &[]));
    let config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));

    let err = Dispatcher::new(config).run().await.unwrap_err();

    match &err {
        AppError::Delivery(DeliveryError::Rejected { status, body }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body, "Summary or Text is required.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    // Exactly one attempt
    assert_eq!(webhook.received().len(), 1);
}

/// (7) No webhook configured → config error before any network call.
#[actix_rt::test]
async fn test_missing_webhook_is_config_error() {
    let github = MockGitHubApi::start(GitHubReply::Artifacts(vec![1])).await;
    let fixture = ReportFixture::write(&report_with(1, 0, &[]));
    let config = run_config(
        &fixture.report_dir(),
        &[
            (vars::CI_PROVIDER, "github"),
            (vars::GITHUB_RUN_ID, "987654"),
            (vars::GITHUB_REPOSITORY, "acme/shop"),
            (vars::GITHUB_TOKEN, "ghs_test_token"),
            (vars::GITHUB_API_URL, github.api_url.as_str()),
        ],
    );

    let err = Dispatcher::new(config).run().await.unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(github.requests().is_empty());
}

/// (8) --custom-url wins over the provider.
#[actix_rt::test]
async fn test_custom_url_overrides_provider() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(1, 0, &[]));
    let mut config = run_config(
        &fixture.report_dir(),
        &[
            (vars::TEAMS_WEBHOOK_URL, webhook.url.as_str()),
            (vars::CI_PROVIDER, "jenkins"),
            (vars::JENKINS_URL, "https://ci.acme.io/"),
            (vars::JOB_NAME, "shop"),
            (vars::BUILD_URL, "https://ci.acme.io/job/shop/9/"),
        ],
    );
    config.custom_url = Some("https://dashboards.acme.io/cypress/9".to_string());

    Dispatcher::new(config).run().await.unwrap();

    assert_eq!(
        webhook.received()[0]["potentialAction"][0]["targets"][0]["uri"],
        "https://dashboards.acme.io/cypress/9"
    );
}

/// (9) Failed test screenshots and videos are linked in the failure block.
#[actix_rt::test]
async fn test_failure_block_links_local_media() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&report_with(0, 0, &["applies coupon"]));
    let root = fixture.report_dir();
    let shots = root.join("screenshots/shop.cy.ts");
    std::fs::create_dir_all(&shots).unwrap();
    std::fs::write(shots.join("Shop -- applies coupon (failed).png"), b"png").unwrap();
    std::fs::create_dir_all(root.join("videos")).unwrap();
    std::fs::write(root.join("videos/shop.cy.ts.mp4"), b"mp4").unwrap();

    let config = run_config(&root, &local_env(&webhook.url, ""));
    Dispatcher::new(config).run().await.unwrap();

    let text = webhook.received()[0]["sections"][2]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.contains("shop.cy.ts.mp4"), "{}", text);
    assert!(text.contains("Screenshot: "), "{}", text);
    assert!(text.contains("Shop -- applies coupon (failed).png"), "{}", text);
}

/// (10) Empty run → no NaN anywhere in the payload.
#[actix_rt::test]
async fn test_zero_tests_payload_has_no_nan() {
    let webhook = MockTeamsWebhook::start(200).await;
    let fixture = ReportFixture::write(&json!({
        "stats": {"tests": 0, "passes": 0, "pending": 0, "failures": 0,
                  "start": "2025-01-15T10:00:00.000Z", "end": "2025-01-15T10:00:00.000Z",
                  "duration": 0},
        "results": []
    }));
    let config = run_config(&fixture.report_dir(), &local_env(&webhook.url, ""));

    Dispatcher::new(config).run().await.unwrap();

    let payload = webhook.received()[0].to_string();
    assert!(!payload.contains("NaN"));
    assert!(payload.contains("No tests were executed."));
}

/// (11) Unreachable webhook → transport error that never reveals the URL.
#[actix_rt::test]
async fn test_transport_error_hides_webhook_url() {
    // Bind then release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let webhook_url = format!("http://127.0.0.1:{}/webhookb2/SECRETHOOK", port);
    let fixture = ReportFixture::write(&report_with(1, 0, &[]));
    let config = run_config(&fixture.report_dir(), &local_env(&webhook_url, ""));

    let err = Dispatcher::new(config).run().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Delivery(DeliveryError::Transport(_))
    ));
    assert_eq!(err.exit_code(), 1);

    let logged = error_chain(&err);
    assert!(!err.to_string().contains("SECRETHOOK"), "{}", err);
    assert!(!logged.contains("SECRETHOOK"), "{}", logged);
    // The root cause is kept
    assert!(logged.len() > err.to_string().len(), "{}", logged);
}

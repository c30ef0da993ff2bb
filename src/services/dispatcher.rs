//! End-to-end reporting pipeline.
//!
//! config → provider → artifact URL → report → summary → card → webhook.
//! Runs once; nothing is retried.

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::AppResult;
use crate::services::build_http_client;
use crate::services::ci_provider::{CiProvider, ProviderContext};
use crate::services::composer::{NO_REPORT_URL, compose};
use crate::services::media::attach_media;
use crate::services::report_aggregator::{load_report, summarize};
use crate::services::webhook::TeamsWebhook;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The card was accepted by the webhook
    Sent,
    /// `only_failed` was set and every test passed
    Skipped,
}

pub struct Dispatcher {
    config: RunConfig,
}

impl Dispatcher {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> AppResult<DispatchOutcome> {
        let config = &self.config;

        // Checked first so a missing webhook never causes network traffic
        let webhook_url = config.require_webhook()?.clone();
        let http_client = build_http_client(config.http_timeout)?;

        let provider = CiProvider::resolve(config.ci_provider.as_deref());
        debug!(
            "CI provider {} (network lookup: {})",
            provider,
            provider.capabilities().network_lookup
        );

        let artifact_url = match &config.custom_url {
            Some(url) => Some(url.clone()),
            None => {
                provider
                    .artifact_url(&ProviderContext::from_config(config, &http_client))
                    .await
            }
        };
        info!(
            "Report URL: {}",
            artifact_url.as_deref().unwrap_or(NO_REPORT_URL)
        );

        let report_path = config.report_path();
        info!("Reading report from {}", report_path.display());
        let report = load_report(&report_path).await?;

        let mut summary = summarize(&report);
        attach_media(
            &mut summary.failed_tests,
            &config.screenshot_dir,
            &config.video_dir,
        )
        .await;

        info!(
            "Summary: {} total, {} passed, {} failed, {} pending in {}s",
            summary.total, summary.passed, summary.failed, summary.pending, summary.duration
        );

        if config.only_failed && summary.all_passed() {
            info!("All tests passed and --only-failed is set; not sending a notification");
            return Ok(DispatchOutcome::Skipped);
        }

        let card = compose(&summary, artifact_url.as_deref(), config);
        if config.verbose {
            debug!(
                "MessageCard payload:\n{}",
                serde_json::to_string_pretty(&card).unwrap_or_default()
            );
        }

        TeamsWebhook::new(&http_client, webhook_url).send(&card).await?;
        info!("Teams notification sent successfully");

        Ok(DispatchOutcome::Sent)
    }
}

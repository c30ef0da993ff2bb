//! Business logic services.

pub mod ci_provider;
pub mod composer;
pub mod dispatcher;
pub mod github_artifacts;
pub mod media;
pub mod report_aggregator;
pub mod webhook;

use std::time::Duration;

pub use ci_provider::{CiProvider, ProviderCapabilities, ProviderContext};
pub use composer::compose;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use report_aggregator::{load_report, summarize};
pub use webhook::TeamsWebhook;

use crate::error::AppError;

/// Upper bound on the connect phase of any request.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client for the GitHub lookup and the webhook POST.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::HttpClient(e.to_string()))
}

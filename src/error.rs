//! Domain error types for the Teams reporter.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Exit code for a successful (or intentionally skipped) run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for report and delivery failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for configuration errors (matches clap's usage error code).
pub const EXIT_CONFIG: i32 = 2;

/// Errors raised while loading the Mochawesome report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report file does not exist
    #[error("Report file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Report file exists but could not be read
    #[error("Failed to read report {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report is not valid JSON or lacks required fields
    #[error("Malformed report {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while posting to the Teams webhook.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The request never got a response (DNS, TLS, timeout, ...)
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered with a non-2xx status
    #[error("Webhook rejected the message ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required configuration missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report absent, unreadable or malformed
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Webhook delivery failed
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            AppError::Report(_) | AppError::Delivery(_) | AppError::HttpClient(_) => EXIT_FAILURE,
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// `err` followed by every cause not already part of the message, joined
/// with `": "`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

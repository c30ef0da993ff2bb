//! Mochawesome report loading and aggregation.
//!
//! Counts come from the report's `stats` block; the suite tree is only walked
//! to collect failed tests.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::models::summary::NO_ERROR_MESSAGE;
use crate::models::{
    FailedTest, MochawesomeReport, MochawesomeSuite, MochawesomeTest, Percentages, ReportSummary,
    SegmentBar,
};

/// A test together with the spec file it came from.
#[derive(Debug, Clone, Copy)]
pub struct CollectedTest<'a> {
    pub test: &'a MochawesomeTest,
    pub spec_file: Option<&'a str>,
}

/// Read and parse the report at `path`.
pub async fn load_report(path: &Path) -> Result<MochawesomeReport, ReportError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound(path.to_path_buf())
        } else {
            ReportError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let report: MochawesomeReport =
        serde_json::from_str(&content).map_err(|source| ReportError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        "Parsed mochawesome report: {} tests, {} passes, {} failures, {} pending",
        report.stats.tests, report.stats.passes, report.stats.failures, report.stats.pending
    );

    Ok(report)
}

/// Flatten every result depth-first: a result's root-level tests, then its
/// suites; within a suite its own tests before nested suites.
pub fn collect_tests(report: &MochawesomeReport) -> Vec<CollectedTest<'_>> {
    let mut collected = Vec::new();

    for result in &report.results {
        let spec_file = result.spec_file();
        collected.extend(
            result
                .tests
                .iter()
                .map(|test| CollectedTest { test, spec_file }),
        );
        for suite in &result.suites {
            collect_suite(suite, spec_file, &mut collected);
        }
    }

    collected
}

fn collect_suite<'a>(
    suite: &'a MochawesomeSuite,
    spec_file: Option<&'a str>,
    collected: &mut Vec<CollectedTest<'a>>,
) {
    collected.extend(suite.tests.iter().map(|test| CollectedTest { test, spec_file }));
    for nested in &suite.suites {
        collect_suite(nested, spec_file, collected);
    }
}

/// Summarize a report.
pub fn summarize(report: &MochawesomeReport) -> ReportSummary {
    let stats = &report.stats;
    let total = stats.tests;

    let failed_tests: Vec<FailedTest> = collect_tests(report)
        .into_iter()
        .filter(|c| c.test.is_failed())
        .map(|c| FailedTest {
            title: c.test.title.clone(),
            error: c
                .test
                .error_message()
                .unwrap_or(NO_ERROR_MESSAGE)
                .to_string(),
            context: c.test.context.as_ref().and_then(parse_context),
            spec_file: c.spec_file.map(str::to_string),
            screenshot: None,
            video: None,
        })
        .collect();

    if failed_tests.len() != stats.failures as usize {
        debug!(
            "stats.failures is {} but {} failed test(s) were found in the suite tree",
            stats.failures,
            failed_tests.len()
        );
    }

    ReportSummary {
        total,
        passed: stats.passes,
        failed: stats.failures,
        pending: stats.pending,
        duration: format!("{:.2}", stats.duration as f64 / 1000.0),
        start: format_timestamp(&stats.start),
        end: format_timestamp(&stats.end),
        percentages: Percentages::new(stats.passes, stats.failures, stats.pending, total),
        bar: SegmentBar::new(stats.passes, stats.failures, stats.pending, total),
        failed_tests,
    }
}

/// First value of an `addContext` entry.
///
/// Accepts the JSON-encoded string mochawesome writes (an array of
/// `{title, value}` objects or strings, or a single one) as well as an inline
/// JSON value. A string that is not JSON is used as-is.
pub fn parse_context(raw: &Value) -> Option<String> {
    let parsed = match raw {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
        other => other.clone(),
    };

    let first = match parsed {
        Value::Array(items) => items.into_iter().next()?,
        single => single,
    };

    match first {
        Value::Object(mut entry) => entry.remove("value").and_then(context_text),
        other => context_text(other),
    }
}

fn context_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// `2025-01-15T10:00:00.000Z` → `2025-01-15 10:00:00 UTC`; unparsable input is kept.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

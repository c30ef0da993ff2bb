//! Mochawesome report document.
//!
//! Only `stats` is required; everything else is read best-effort so reports
//! from older or newer reporter versions still parse.

use serde::Deserialize;

/// Root structure of a mochawesome report JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct MochawesomeReport {
    pub stats: MochawesomeStats,
    #[serde(default)]
    pub results: Vec<MochawesomeResult>,
}

/// Statistics section of the mochawesome report.
#[derive(Debug, Clone, Deserialize)]
pub struct MochawesomeStats {
    #[serde(default)]
    pub suites: u32,
    pub tests: u32,
    pub passes: u32,
    pub pending: u32,
    pub failures: u32,
    #[serde(default)]
    pub skipped: u32,
    pub start: String,
    pub end: String,
    /// Milliseconds
    pub duration: u64,
}

/// A result entry representing a spec file with its suites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MochawesomeResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub full_file: String,
    #[serde(default)]
    pub file: String,
    /// Tests declared outside any describe block
    #[serde(default)]
    pub tests: Vec<MochawesomeTest>,
    #[serde(default)]
    pub suites: Vec<MochawesomeSuite>,
}

impl MochawesomeResult {
    /// Spec file path, preferring `file` (relative) over `fullFile`.
    pub fn spec_file(&self) -> Option<&str> {
        [self.file.as_str(), self.full_file.as_str()]
            .into_iter()
            .find(|f| !f.is_empty())
    }
}

/// A test suite (describe block) in the mochawesome report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MochawesomeSuite {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tests: Vec<MochawesomeTest>,
    #[serde(default)]
    pub suites: Vec<MochawesomeSuite>,
}

/// An individual test case (it block) in the mochawesome report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MochawesomeTest {
    pub title: String,
    #[serde(default)]
    pub full_title: String,
    #[serde(default)]
    pub state: Option<String>,
    /// JSON-encoded string written by `addContext`, or an inline value
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub err: serde_json::Value,
}

impl MochawesomeTest {
    pub fn is_failed(&self) -> bool {
        self.state.as_deref() == Some("failed")
    }

    /// `err.message`, when present and non-empty.
    pub fn error_message(&self) -> Option<&str> {
        self.err
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
    }
}

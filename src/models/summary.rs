//! Aggregated view of a test run.

use std::fmt;
use std::path::PathBuf;

/// Number of glyphs in the distribution bar.
pub const BAR_SEGMENTS: u32 = 11;

pub const PASSED_GLYPH: &str = "🟢";
pub const FAILED_GLYPH: &str = "🔴";
pub const PENDING_GLYPH: &str = "⚠️";
pub const EMPTY_GLYPH: &str = "⚪";

/// Placeholder used when a failed test carries no error message.
pub const NO_ERROR_MESSAGE: &str = "No error message available";

/// Share of each outcome in percent. All zero when no tests ran.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Percentages {
    pub passed: f64,
    pub failed: f64,
    pub pending: f64,
}

impl Percentages {
    pub fn new(passed: u32, failed: u32, pending: u32, total: u32) -> Self {
        if total == 0 {
            return Self::default();
        }
        let pct = |count: u32| f64::from(count) / f64::from(total) * 100.0;
        Self {
            passed: pct(passed),
            failed: pct(failed),
            pending: pct(pending),
        }
    }
}

/// Render a percentage with one decimal, e.g. `80.0`.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}", value)
}

/// Segment counts of the 11-glyph distribution bar.
///
/// Counts are never negative and always sum to [`BAR_SEGMENTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBar {
    pub passed: u32,
    pub failed: u32,
    pub pending: u32,
    pub empty: u32,
}

impl SegmentBar {
    /// Round each category to the nearest segment. When rounding overshoots the
    /// bar, the category that was rounded up the most gives a segment back until
    /// the bar fits; any remainder is empty.
    pub fn new(passed: u32, failed: u32, pending: u32, total: u32) -> Self {
        if total == 0 {
            return Self {
                passed: 0,
                failed: 0,
                pending: 0,
                empty: BAR_SEGMENTS,
            };
        }

        let exact = [passed, failed, pending]
            .map(|count| f64::from(count) / f64::from(total) * f64::from(BAR_SEGMENTS));
        let mut rounded = exact.map(|share| share.round() as u32);

        while rounded.iter().sum::<u32>() > BAR_SEGMENTS {
            let (idx, _) = rounded
                .iter()
                .zip(exact.iter())
                .enumerate()
                .filter(|(_, (r, _))| **r > 0)
                .map(|(i, (r, e))| (i, f64::from(*r) - e))
                .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
            rounded[idx] -= 1;
        }

        let [passed, failed, pending] = rounded;
        Self {
            passed,
            failed,
            pending,
            empty: BAR_SEGMENTS - (passed + failed + pending),
        }
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.pending + self.empty
    }
}

impl fmt::Display for SegmentBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (glyph, count) in [
            (PASSED_GLYPH, self.passed),
            (FAILED_GLYPH, self.failed),
            (PENDING_GLYPH, self.pending),
            (EMPTY_GLYPH, self.empty),
        ] {
            write!(f, "{}", glyph.repeat(count as usize))?;
        }
        Ok(())
    }
}

/// A failed test as shown in the notification.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedTest {
    pub title: String,
    pub error: String,
    /// First `addContext` value, usually a video or screenshot link
    pub context: Option<String>,
    /// Spec file the test belongs to
    pub spec_file: Option<String>,
    /// Screenshot located on disk
    pub screenshot: Option<PathBuf>,
    /// Video located on disk
    pub video: Option<PathBuf>,
}

/// Summary statistics for a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub pending: u32,
    /// Seconds with two decimals, e.g. `4.20`
    pub duration: String,
    pub start: String,
    pub end: String,
    pub percentages: Percentages,
    pub bar: SegmentBar,
    /// In depth-first report order
    pub failed_tests: Vec<FailedTest>,
}

impl ReportSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

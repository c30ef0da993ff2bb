//! Builds the Teams MessageCard for a summarized run.

use crate::config::RunConfig;
use crate::models::message_card::{MESSAGE_CARD_CONTEXT, MESSAGE_CARD_TYPE};
use crate::models::summary::{FAILED_GLYPH, PASSED_GLYPH, PENDING_GLYPH};
use crate::models::{
    FailedTest, Fact, MessageCard, PotentialAction, ReportSummary, Section, format_percentage,
};

pub const PASSED_COLOR: &str = "00FF00";
pub const FAILED_COLOR: &str = "FF0000";

/// Button target when no artifact URL could be resolved.
pub const NO_REPORT_URL: &str = "No report URL available";

pub const ALL_PASSED_TEXT: &str = "All tests executed successfully!";
pub const NO_TESTS_TEXT: &str = "No tests were executed.";

const CYPRESS_LOGO: &str = "https://d2ef4hkqu4id.cloudfront.net/cy_logo_a009bb69d4.jpeg";

/// Compose the card. Pure: no I/O.
pub fn compose(summary: &ReportSummary, artifact_url: Option<&str>, config: &RunConfig) -> MessageCard {
    let all_passed = summary.all_passed();
    let pct = &summary.percentages;
    let passed_pct = format_percentage(pct.passed);
    let failed_pct = format_percentage(pct.failed);
    let pending_pct = format_percentage(pct.pending);

    let activity_title = if config.module_name.trim().is_empty() {
        config.report_title.clone()
    } else {
        format!("{} QA Test Report Summary", config.module_name)
    };

    let mut facts = vec![
        Fact::new("Passed", format!("✅ {} ({}%)", summary.passed, passed_pct)),
        Fact::new("Failed", format!("❌ {} ({}%)", summary.failed, failed_pct)),
        Fact::new("Pending", format!("⚠️ {} ({}%)", summary.pending, pending_pct)),
    ];
    if !config.team_name.trim().is_empty() {
        facts.push(Fact::new("Team", config.team_name.clone()));
    }
    facts.extend(config.custom_facts.iter().cloned());

    let header = Section {
        activity_title: Some(activity_title),
        activity_subtitle: Some(format!(
            "Test Run: {} - {}\nTotal Tests: {} | Duration: {}s",
            summary.start, summary.end, summary.total, summary.duration
        )),
        activity_image: Some(CYPRESS_LOGO.to_string()),
        facts,
        markdown: true,
        ..Default::default()
    };

    let distribution = Section {
        title: Some("Test Status Distribution".to_string()),
        text: Some(format!(
            "📊 **Pie Chart**: {}\n\n✅ Passed: {}% {}\n❌ Failed: {}% {}\n⚠️ Pending: {}% {}\n",
            summary.bar,
            passed_pct,
            PASSED_GLYPH,
            failed_pct,
            FAILED_GLYPH,
            pending_pct,
            PENDING_GLYPH
        )),
        markdown: true,
        ..Default::default()
    };

    let (results_title, results_text) = if summary.is_empty() {
        ("No Tests Executed", NO_TESTS_TEXT.to_string())
    } else if all_passed {
        ("All Tests Passed!", ALL_PASSED_TEXT.to_string())
    } else {
        ("Failed Tests", failure_blocks(&summary.failed_tests))
    };

    let mut sections = vec![
        header,
        distribution,
        Section {
            title: Some(results_title.to_string()),
            text: Some(results_text),
            markdown: true,
            ..Default::default()
        },
    ];

    if let Some(text) = &config.custom_text {
        sections.push(Section {
            text: Some(text.clone()),
            markdown: true,
            ..Default::default()
        });
    }

    let button = if all_passed {
        "View Full Report (All Tests Passed)"
    } else {
        "View Full Report (Some Tests Failed)"
    };

    MessageCard {
        card_type: MESSAGE_CARD_TYPE.to_string(),
        context: MESSAGE_CARD_CONTEXT.to_string(),
        theme_color: (if all_passed { PASSED_COLOR } else { FAILED_COLOR }).to_string(),
        summary: config.report_title.clone(),
        sections,
        potential_action: vec![PotentialAction::open_uri(
            button,
            artifact_url.unwrap_or(NO_REPORT_URL),
        )],
    }
}

/// One markdown block per failed test, separated by blank lines.
fn failure_blocks(failed_tests: &[FailedTest]) -> String {
    failed_tests
        .iter()
        .map(|t| {
            let video = t
                .context
                .clone()
                .or_else(|| t.video.as_ref().map(|p| p.display().to_string()))
                .unwrap_or_else(|| "N/A".to_string());
            let mut block = format!("❌ **{}**\nError:\n`{}`\nVideo: {}\n", t.title, t.error, video);
            if let Some(screenshot) = &t.screenshot {
                block.push_str(&format!("Screenshot: {}\n", screenshot.display()));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

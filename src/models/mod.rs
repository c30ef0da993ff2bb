//! Domain models for the Teams reporter.

pub mod message_card;
pub mod mochawesome;
pub mod summary;

// Re-export commonly used types
pub use message_card::{Fact, MessageCard, PotentialAction, Section, Target};
pub use mochawesome::{
    MochawesomeReport, MochawesomeResult, MochawesomeStats, MochawesomeSuite, MochawesomeTest,
};
pub use summary::{FailedTest, Percentages, ReportSummary, SegmentBar, format_percentage};

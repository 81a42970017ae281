//! Keyword-taxonomy issue analysis over review text.

mod analyzer;
mod summary;
mod taxonomy;

pub use analyzer::{
    analyze_issues, CategoryStats, Example, IssueAnalyzer, IssuesReport, KeywordMatch, Timeframe,
    DEFAULT_MAX_EXAMPLES, HEADLINE_CATEGORIES,
};
pub use summary::{CategorySummary, SummaryPayload};
pub use taxonomy::IssueCategory;

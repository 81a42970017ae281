//! Pure review analytics.
//!
//! Everything in this crate is synchronous and deterministic over its inputs:
//! raw records go through [`normalize`], the canonical reviews are narrowed by
//! [`filter`] and ordered by [`sort`], then rolled up by [`ratings`],
//! [`metrics`] and [`issues`]. Moderation decisions arrive as an
//! [`ApprovalMap`](reviewlens_common::ApprovalMap) snapshot per call.

pub mod filter;
pub mod issues;
pub mod metrics;
pub mod normalize;
pub mod ratings;
pub mod sentiment;
pub mod sort;
pub mod status;

pub use filter::filter_reviews;
pub use issues::{
    analyze_issues, CategoryStats, Example, IssueAnalyzer, IssueCategory, IssuesReport,
    KeywordMatch, SummaryPayload, Timeframe, DEFAULT_MAX_EXAMPLES, HEADLINE_CATEGORIES,
};
pub use metrics::{channel_options, property_options, slugify, DashboardMetrics, TopChannel};
pub use normalize::{
    extract_rows, normalize, normalize_at, normalize_google, normalize_hostaway, RawRecord,
    SourceAdapter,
};
pub use ratings::{
    average, channel_distribution, computed_rating, timeseries_average, ChannelCount,
    TimeseriesPoint,
};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use sort::sort_reviews;
pub use status::{approval_map, resolve_status};

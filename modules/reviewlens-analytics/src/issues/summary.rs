use serde::{Deserialize, Serialize};

use super::analyzer::{IssuesReport, Timeframe};
use super::taxonomy::IssueCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: IssueCategory,
    pub mentions: u32,
    pub positive: u32,
    pub negative: u32,
}

/// Aggregates handed to the text summarizer. Carries no review text or ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub timeframe: Timeframe,
    pub top_categories: Vec<IssueCategory>,
    pub categories: Vec<CategorySummary>,
}

impl SummaryPayload {
    pub fn from_report(report: &IssuesReport) -> Self {
        Self {
            timeframe: report.timeframe,
            top_categories: report.top_categories.clone(),
            categories: report
                .categories
                .iter()
                .map(|c| CategorySummary {
                    category: c.category,
                    mentions: c.mentions,
                    positive: c.positive,
                    negative: c.negative,
                })
                .collect(),
        }
    }
}

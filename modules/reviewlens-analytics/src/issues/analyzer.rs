use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reviewlens_common::{iso_millis, Review};

use super::taxonomy::IssueCategory;
use crate::sentiment::SentimentScorer;

pub const DEFAULT_MAX_EXAMPLES: usize = 3;
pub const HEADLINE_CATEGORIES: usize = 5;
const SNIPPET_MAX_CHARS: usize = 160;
const ELLIPSIS: char = '…';

/// How taxonomy keywords are located in review text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// Plain containment: "bed" matches inside "bedroom".
    #[default]
    Substring,
    /// Keywords must sit on word boundaries.
    WordBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: IssueCategory,
    pub mentions: u32,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub examples: Vec<Example>,
    /// `YYYY-MM` -> mentions that month.
    pub by_month: BTreeMap<String, u32>,
}

impl CategoryStats {
    fn empty(category: IssueCategory) -> Self {
        Self {
            category,
            mentions: 0,
            positive: 0,
            negative: 0,
            neutral: 0,
            examples: Vec::new(),
            by_month: BTreeMap::new(),
        }
    }
}

/// Earliest and latest submission among analyzed reviews; both `None` when no
/// review had text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeframe {
    #[serde(default, with = "iso_millis::option")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_millis::option")]
    pub end: Option<DateTime<Utc>>,
}

impl Timeframe {
    fn include(&mut self, at: DateTime<Utc>) {
        self.start = Some(self.start.map_or(at, |s| s.min(at)));
        self.end = Some(self.end.map_or(at, |e| e.max(at)));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesReport {
    /// One entry per taxonomy category, in taxonomy order.
    pub categories: Vec<CategoryStats>,
    pub top_categories: Vec<IssueCategory>,
    pub timeframe: Timeframe,
}

impl IssuesReport {
    pub fn stats(&self, category: IssueCategory) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Multi-label keyword classifier with sentiment counters per category.
pub struct IssueAnalyzer<'a> {
    scorer: &'a dyn SentimentScorer,
    max_examples: usize,
    keyword_match: KeywordMatch,
}

impl<'a> IssueAnalyzer<'a> {
    pub fn new(scorer: &'a dyn SentimentScorer) -> Self {
        Self {
            scorer,
            max_examples: DEFAULT_MAX_EXAMPLES,
            keyword_match: KeywordMatch::default(),
        }
    }

    pub fn max_examples(mut self, max_examples: usize) -> Self {
        self.max_examples = max_examples;
        self
    }

    pub fn keyword_match(mut self, keyword_match: KeywordMatch) -> Self {
        self.keyword_match = keyword_match;
        self
    }

    pub fn analyze(&self, reviews: &[Review]) -> IssuesReport {
        let matchers = self.matchers();
        let mut stats: Vec<CategoryStats> =
            IssueCategory::ALL.into_iter().map(CategoryStats::empty).collect();
        let mut timeframe = Timeframe::default();
        let mut analyzed = 0usize;

        for review in reviews {
            if review.text.trim().is_empty() {
                continue;
            }
            analyzed += 1;

            let lower = review.text.to_lowercase();
            let score = self.scorer.score(&review.text);
            let month = review.submitted_at.format("%Y-%m").to_string();
            timeframe.include(review.submitted_at);

            for (bucket, matcher) in stats.iter_mut().zip(&matchers) {
                if !matcher.is_match(&lower) {
                    continue;
                }
                bucket.mentions += 1;
                match score.signum() {
                    1 => bucket.positive += 1,
                    -1 => bucket.negative += 1,
                    _ => bucket.neutral += 1,
                }
                *bucket.by_month.entry(month.clone()).or_insert(0) += 1;
                if bucket.examples.len() < self.max_examples {
                    bucket.examples.push(Example {
                        id: review.id.clone(),
                        snippet: snippet(&review.text),
                    });
                }
            }
        }

        debug!(total = reviews.len(), analyzed, "Analyzed review issues");

        IssuesReport {
            top_categories: rank_headlines(&stats),
            categories: stats,
            timeframe,
        }
    }

    fn matchers(&self) -> Vec<Matcher> {
        IssueCategory::ALL
            .into_iter()
            .map(|category| match self.keyword_match {
                KeywordMatch::Substring => Matcher::Substring(category.keywords()),
                KeywordMatch::WordBoundary => word_boundary_regex(category.keywords())
                    .map(Matcher::Regex)
                    .unwrap_or(Matcher::Substring(category.keywords())),
            })
            .collect()
    }
}

/// Analyze with the default (substring) keyword matching.
pub fn analyze_issues(
    reviews: &[Review],
    scorer: &dyn SentimentScorer,
    max_examples: usize,
) -> IssuesReport {
    IssueAnalyzer::new(scorer).max_examples(max_examples).analyze(reviews)
}

enum Matcher {
    Substring(&'static [&'static str]),
    Regex(Regex),
}

impl Matcher {
    /// `text` must already be lowercase.
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Substring(keywords) => keywords.iter().any(|k| text.contains(k)),
            Matcher::Regex(re) => re.is_match(text),
        }
    }
}

fn word_boundary_regex(keywords: &[&str]) -> Option<Regex> {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).ok()
}

/// Top categories by mentions, then negatives. The sort is stable, so full ties keep
/// taxonomy order.
fn rank_headlines(stats: &[CategoryStats]) -> Vec<IssueCategory> {
    let mut ranked: Vec<&CategoryStats> = stats.iter().collect();
    ranked.sort_by(|a, b| {
        b.mentions
            .cmp(&a.mentions)
            .then_with(|| b.negative.cmp(&a.negative))
    });
    ranked
        .into_iter()
        .take(HEADLINE_CATEGORIES)
        .map(|s| s.category)
        .collect()
}

/// Text longer than 160 characters is cut to 159 plus an ellipsis.
fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(SNIPPET_MAX_CHARS - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

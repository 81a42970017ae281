use serde::{Deserialize, Serialize};

use reviewlens_common::{ApprovalMap, Channel, Review, ALL};

use crate::ratings::{average, channel_distribution, computed_rating};
use crate::sort::locale_cmp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopChannel {
    pub channel: Channel,
    pub count: usize,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total: usize,
    pub avg_rating: Option<f64>,
    /// Whole percent of reviews with an approved decision.
    pub approval_rate: Option<u32>,
    pub top_channel: Option<TopChannel>,
}

impl DashboardMetrics {
    pub fn compute(reviews: &[Review], approvals: &ApprovalMap) -> Self {
        let ratings: Vec<f64> = reviews.iter().filter_map(computed_rating).collect();

        let approval_rate = if reviews.is_empty() {
            None
        } else {
            let approved = reviews
                .iter()
                .filter(|r| approvals.get(&r.id).copied().unwrap_or(false))
                .count();
            Some((approved as f64 * 100.0 / reviews.len() as f64).round() as u32)
        };

        // max_by_key keeps the last maximum, so walk in reverse for first-seen ties.
        let top_channel = channel_distribution(reviews)
            .into_iter()
            .rev()
            .max_by_key(|c| c.count)
            .map(|c| TopChannel {
                channel: Channel::coerce(&c.name),
                count: c.count,
            });

        Self {
            total: reviews.len(),
            avg_rating: average(&ratings),
            approval_rate,
            top_channel,
        }
    }
}

/// `"all"` followed by the distinct listing names, sorted.
pub fn property_options(reviews: &[Review]) -> Vec<String> {
    options(reviews.iter().filter_map(|r| r.listing_name.as_deref()))
}

/// `"all"` followed by the distinct channels present, sorted.
pub fn channel_options(reviews: &[Review]) -> Vec<String> {
    options(reviews.iter().map(|r| r.channel.as_str()))
}

fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct.sort_by(|a, b| locale_cmp(a, b));

    std::iter::once(ALL)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/// URL-safe property key: lowercase, runs of anything non-alphanumeric become `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reviewlens_common::Review;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    /// `YYYY-MM-DD` in UTC.
    pub day: String,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCount {
    pub name: String,
    pub count: usize,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean rounded to two decimals; `None` for an empty or all-NaN input.
pub fn average(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(round2(finite.iter().sum::<f64>() / finite.len() as f64))
}

/// The single effective rating of a review: the overall rating when present,
/// otherwise the mean of its category ratings, otherwise `None`.
pub fn computed_rating(review: &Review) -> Option<f64> {
    review.rating_overall.or_else(|| {
        let ratings: Vec<f64> = review.ratings_by_category.iter().map(|c| c.rating).collect();
        average(&ratings)
    })
}

/// Per-day mean of computed ratings, ascending by day. Unrated reviews are skipped.
pub fn timeseries_average(reviews: &[Review]) -> Vec<TimeseriesPoint> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for review in reviews {
        let Some(rating) = computed_rating(review) else {
            continue;
        };
        let day = review.submitted_at.format("%Y-%m-%d").to_string();
        buckets.entry(day).or_default().push(rating);
    }

    buckets
        .into_iter()
        .filter_map(|(day, ratings)| average(&ratings).map(|avg| TimeseriesPoint { day, avg }))
        .collect()
}

/// Review count per channel, in first-seen order. Ordering by count is up to the caller.
pub fn channel_distribution(reviews: &[Review]) -> Vec<ChannelCount> {
    let mut counts: Vec<ChannelCount> = Vec::new();
    for review in reviews {
        let name = review.channel.as_str();
        match counts.iter_mut().find(|c| c.name == name) {
            Some(entry) => entry.count += 1,
            None => counts.push(ChannelCount {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

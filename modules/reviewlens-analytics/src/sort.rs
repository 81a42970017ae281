use std::cmp::Ordering;

use reviewlens_common::{ApprovalMap, Review, SortDirection, SortKey};

use crate::ratings::computed_rating;
use crate::status::resolve_status;

/// Unrated reviews sort below every real rating.
const UNRATED: f64 = -1.0;

/// A reordered copy of `reviews`. The sort is stable: equal keys keep input order
/// in both directions.
pub fn sort_reviews(
    reviews: &[Review],
    key: SortKey,
    direction: SortDirection,
    approvals: &ApprovalMap,
) -> Vec<Review> {
    let mut sorted = reviews.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key, approvals);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Review, b: &Review, key: SortKey, approvals: &ApprovalMap) -> Ordering {
    match key {
        SortKey::Date => a.submitted_at.cmp(&b.submitted_at),
        SortKey::Rating => {
            let ra = computed_rating(a).unwrap_or(UNRATED);
            let rb = computed_rating(b).unwrap_or(UNRATED);
            ra.total_cmp(&rb)
        }
        SortKey::Channel => locale_cmp(a.channel.as_str(), b.channel.as_str()),
        SortKey::Listing => locale_cmp(
            a.listing_name.as_deref().unwrap_or(""),
            b.listing_name.as_deref().unwrap_or(""),
        ),
        SortKey::Status => locale_cmp(
            resolve_status(&a.id, approvals).as_str(),
            resolve_status(&b.id, approvals).as_str(),
        ),
    }
}

/// Approximates a locale collation: letters compare case-insensitively first,
/// then by code point so the order stays total.
pub(crate) fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

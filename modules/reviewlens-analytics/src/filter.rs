use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use reviewlens_common::{ApprovalMap, Filters, Review};

use crate::ratings::computed_rating;
use crate::status::resolve_status;

/// Reviews that satisfy every active predicate in `filters`, in input order.
/// Neutral filters return the input unchanged.
pub fn filter_reviews(reviews: &[Review], filters: &Filters, approvals: &ApprovalMap) -> Vec<Review> {
    let bounds = DayBounds::from_filters(filters);
    let kept: Vec<Review> = reviews
        .iter()
        .filter(|r| matches(r, filters, &bounds, approvals))
        .cloned()
        .collect();
    debug!(input = reviews.len(), kept = kept.len(), "Filtered reviews");
    kept
}

struct DayBounds {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl DayBounds {
    fn from_filters(filters: &Filters) -> Self {
        Self {
            from: filters.date_from.map(start_of_day),
            to: filters.date_to.map(end_of_day),
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 makes the upper bound cover the whole calendar day.
fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(last_milli).and_utc()
}

fn matches(review: &Review, filters: &Filters, bounds: &DayBounds, approvals: &ApprovalMap) -> bool {
    if let Some(property) = &filters.property {
        if review.listing_name.as_deref() != Some(property.as_str()) {
            return false;
        }
    }

    if let Some(channel) = &filters.channel {
        if !review.channel.as_str().eq_ignore_ascii_case(channel) {
            return false;
        }
    }

    if let Some(category) = &filters.category {
        let has_category = review
            .ratings_by_category
            .iter()
            .any(|c| c.category.eq_ignore_ascii_case(category));
        if !has_category {
            return false;
        }
    }

    if filters.min_rating > 0.0 && computed_rating(review).unwrap_or(0.0) < filters.min_rating {
        return false;
    }

    if let Some(from) = bounds.from {
        if review.submitted_at < from {
            return false;
        }
    }

    if let Some(to) = bounds.to {
        if review.submitted_at > to {
            return false;
        }
    }

    if let Some(status) = filters.status {
        if resolve_status(&review.id, approvals) != status {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_at, RawRecord};
    use chrono::TimeZone;
    use reviewlens_common::ModerationStatus;
    use serde_json::json;

    fn fixture() -> Vec<Review> {
        let rows = vec![
            json!({"id": 1, "listingName": "Camden Flat", "channel": "airbnb", "rating": 9,
                   "submittedAt": "2024-01-10T08:00:00Z",
                   "reviewCategory": [{"category": "cleanliness", "rating": 9}]}),
            json!({"id": 2, "listingName": "Shoreditch Loft", "channel": "booking", "rating": 5,
                   "submittedAt": "2024-01-31T23:59:59.500Z"}),
            json!({"id": 3, "listingName": "Camden Flat", "channel": "direct",
                   "submittedAt": "2024-02-01T00:00:00Z"}),
            json!({"id": 4, "channel": "airbnb", "rating": 7,
                   "submittedAt": "2023-12-31T23:59:59Z"}),
        ];
        let records: Vec<RawRecord> = rows.into_iter().map(RawRecord::hostaway).collect();
        normalize_at(&records, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_neutral_filters_are_identity() {
        let reviews = fixture();
        let out = filter_reviews(&reviews, &Filters::default(), &ApprovalMap::new());
        assert_eq!(out, reviews);
    }

    #[test]
    fn test_property_and_channel() {
        let reviews = fixture();
        let filters = Filters {
            property: Some("Camden Flat".into()),
            channel: Some("airbnb".into()),
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        assert_eq!(ids(&out), vec!["hostaway-1"]);
    }

    #[test]
    fn test_min_rating_treats_unrated_as_zero() {
        let reviews = fixture();
        let filters = Filters {
            min_rating: 6.0,
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        assert_eq!(ids(&out), vec!["hostaway-1", "hostaway-4"]);
    }

    #[test]
    fn test_date_to_covers_whole_day() {
        let reviews = fixture();
        let filters = Filters {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        assert_eq!(ids(&out), vec!["hostaway-1", "hostaway-2"]);
    }

    #[test]
    fn test_day_bounds_are_utc_days() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(start_of_day(day), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end_of_day(day).to_rfc3339(), "2024-01-01T23:59:59.999+00:00");

        // 23:59:59Z on Dec 31 is still Dec 31 in UTC, whatever the local offset.
        let reviews = fixture();
        let filters = Filters {
            date_from: Some(day),
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        assert!(!ids(&out).contains(&"hostaway-4"));
    }

    #[test]
    fn test_category_membership() {
        let reviews = fixture();
        let filters = Filters {
            category: Some("Cleanliness".into()),
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        assert_eq!(ids(&out), vec!["hostaway-1"]);
    }

    #[test]
    fn test_status_uses_approval_snapshot() {
        let reviews = fixture();
        let mut approvals = ApprovalMap::new();
        approvals.insert("hostaway-1".into(), true);
        approvals.insert("hostaway-2".into(), false);

        let by_status = |status| {
            let filters = Filters {
                status: Some(status),
                ..Default::default()
            };
            ids(&filter_reviews(&reviews, &filters, &approvals))
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(by_status(ModerationStatus::Approved), vec!["hostaway-1"]);
        assert_eq!(by_status(ModerationStatus::Denied), vec!["hostaway-2"]);
        assert_eq!(by_status(ModerationStatus::Pending), vec!["hostaway-3", "hostaway-4"]);
    }

    #[test]
    fn test_output_is_subset_satisfying_predicates() {
        let reviews = fixture();
        let filters = Filters {
            channel: Some("airbnb".into()),
            min_rating: 8.0,
            ..Default::default()
        };
        let out = filter_reviews(&reviews, &filters, &ApprovalMap::new());
        for r in &out {
            assert!(reviews.contains(r));
            assert_eq!(r.channel.as_str(), "airbnb");
            assert!(computed_rating(r).unwrap_or(0.0) >= 8.0);
        }
    }
}

mod adapters;
mod fields;

pub use adapters::SourceAdapter;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use reviewlens_common::{
    Attribution, Channel, PublicationStatus, Review, ReviewRole,
};

use fields::{
    category_ratings, first_array, first_non_blank, first_number, first_present,
    first_scalar_string, in_scale, parse_timestamp,
};

/// One upstream record together with the adapter that knows how to read it.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub adapter: SourceAdapter,
    pub payload: Value,
}

impl RawRecord {
    pub fn new(adapter: SourceAdapter, payload: Value) -> Self {
        Self { adapter, payload }
    }

    pub fn hostaway(payload: Value) -> Self {
        Self::new(SourceAdapter::Hostaway, payload)
    }
}

/// Normalize a heterogeneous batch. Missing or unparseable timestamps become "now".
pub fn normalize(records: &[RawRecord]) -> Vec<Review> {
    normalize_at(records, Utc::now())
}

/// Normalize with an explicit substitute for missing timestamps.
/// Deterministic except for random ids on records that carry no id at all.
pub fn normalize_at(records: &[RawRecord], now: DateTime<Utc>) -> Vec<Review> {
    let reviews: Vec<Review> = records
        .iter()
        .map(|record| normalize_one(&record.adapter, &record.payload, now))
        .collect();
    debug!(count = reviews.len(), "Normalized review batch");
    reviews
}

/// Normalize Hostaway rows (API `result` array or the mock dataset).
pub fn normalize_hostaway(rows: &[Value]) -> Vec<Review> {
    let records: Vec<RawRecord> = rows.iter().cloned().map(RawRecord::hostaway).collect();
    normalize(&records)
}

/// Keys checked, in order, when a raw dump is an object instead of a bare array.
const ROW_CONTAINER_KEYS: &[&str] = &["result", "reviews", "data"];

/// The record array inside a raw dump: the value itself when it is an array,
/// otherwise the first array under `result`, `reviews` or `data`. Anything else
/// yields no rows.
pub fn extract_rows(dump: &Value) -> Vec<Value> {
    if let Value::Array(rows) = dump {
        return rows.clone();
    }
    ROW_CONTAINER_KEYS
        .iter()
        .find_map(|key| dump.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// Normalize the `result.reviews` array of a Google Place Details response.
pub fn normalize_google(place_name: &str, place_id: &str, reviews: &[Value]) -> Vec<Review> {
    let adapter = SourceAdapter::google(place_id, place_name);
    let records: Vec<RawRecord> = reviews
        .iter()
        .cloned()
        .map(|payload| RawRecord::new(adapter.clone(), payload))
        .collect();
    normalize(&records)
}

fn normalize_one(adapter: &SourceAdapter, payload: &Value, now: DateTime<Utc>) -> Review {
    let empty = Map::new();
    let obj = payload.as_object().unwrap_or(&empty);
    let aliases = adapter.aliases();
    let source = adapter.source();

    let local_id = adapter.local_id(first_scalar_string(obj, aliases.id));

    let role = adapter.fixed_role().unwrap_or_else(|| {
        aliases
            .role
            .iter()
            .filter_map(|key| obj.get(*key).and_then(Value::as_str))
            .find_map(ReviewRole::from_literal)
            .unwrap_or_default()
    });

    let status = adapter.fixed_status().unwrap_or_else(|| {
        first_scalar_string(obj, aliases.status)
            .and_then(|s| PublicationStatus::from_literal(&s))
            .unwrap_or_default()
    });

    let channel = adapter.fixed_channel().unwrap_or_else(|| {
        first_scalar_string(obj, aliases.channel)
            .map(|c| Channel::coerce(&c))
            .unwrap_or(Channel::Other)
    });

    let ratings_by_category = first_array(obj, aliases.categories)
        .map(|entries| category_ratings(entries))
        .unwrap_or_default();

    let rating_overall = first_number(obj, aliases.rating).and_then(in_scale);

    let listing_name = adapter
        .fixed_listing_name()
        .map(str::to_string)
        .or_else(|| first_non_blank(obj, aliases.listing_name));
    let listing_id = first_non_blank(obj, aliases.listing_id);

    let reviewer_name = first_non_blank(obj, aliases.reviewer_name)
        .unwrap_or_else(|| adapter.default_reviewer().to_string());

    let text = first_scalar_string(obj, aliases.text).unwrap_or_default();

    let submitted_at = first_present(obj, aliases.submitted_at)
        .and_then(parse_timestamp)
        .unwrap_or(now);

    let attribution = match adapter {
        SourceAdapter::Google { .. } => Some(Attribution {
            author_url: first_non_blank(obj, aliases.author_url),
            powered_by: "google".to_string(),
        }),
        SourceAdapter::Hostaway => None,
    };

    Review {
        id: format!("{}-{}", source.as_str(), local_id),
        source,
        listing_id,
        listing_name,
        reviewer_name,
        role,
        status,
        rating_overall,
        ratings_by_category,
        channel,
        submitted_at,
        text,
        attribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reviewlens_common::{CategoryRating, ReviewSource};
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_hostaway_api_row() {
        let row = json!({
            "id": 7453,
            "type": "host-to-guest",
            "status": "published",
            "rating": null,
            "publicReview": "Shane and family are wonderful! Would definitely host again :)",
            "reviewCategory": [
                {"category": "cleanliness", "rating": 10},
                {"category": "communication", "rating": 10},
                {"category": "respect_house_rules", "rating": 10}
            ],
            "submittedAt": "2020-08-21 22:45:14",
            "guestName": "Shane Finkelstein",
            "listingName": "2B N1 A - 29 Shoreditch Heights",
            "channel": "Airbnb"
        });
        let reviews = normalize_at(&[RawRecord::hostaway(row)], fixed_now());
        let r = &reviews[0];

        assert_eq!(r.id, "hostaway-7453");
        assert_eq!(r.source, ReviewSource::Hostaway);
        assert_eq!(r.role, ReviewRole::HostToGuest);
        assert_eq!(r.status, PublicationStatus::Published);
        assert_eq!(r.rating_overall, None);
        assert_eq!(r.ratings_by_category.len(), 3);
        assert_eq!(r.channel, Channel::Airbnb);
        assert_eq!(r.reviewer_name, "Shane Finkelstein");
        assert_eq!(r.listing_name.as_deref(), Some("2B N1 A - 29 Shoreditch Heights"));
        assert_eq!(
            r.submitted_at,
            Utc.with_ymd_and_hms(2020, 8, 21, 22, 45, 14).unwrap()
        );
        assert!(r.attribution.is_none());
    }

    #[test]
    fn test_alias_fallbacks() {
        let row = json!({
            "reviewId": "abc",
            "reviewType": "guest-to-host",
            "overall": 8.5,
            "categories": [{"name": "Value", "rating": 7}],
            "propertyName": "Camden Flat",
            "propertyId": 42,
            "reviewerName": "Ana",
            "comment": "Great value",
            "createdAt": "2024-02-03T10:00:00Z",
            "source": "BOOKING"
        });
        let r = &normalize_at(&[RawRecord::hostaway(row)], fixed_now())[0];

        assert_eq!(r.id, "hostaway-abc");
        assert_eq!(r.rating_overall, Some(8.5));
        assert_eq!(
            r.ratings_by_category,
            vec![CategoryRating { category: "value".into(), rating: 7.0 }]
        );
        assert_eq!(r.listing_name.as_deref(), Some("Camden Flat"));
        assert_eq!(r.listing_id.as_deref(), Some("42"));
        assert_eq!(r.reviewer_name, "Ana");
        assert_eq!(r.text, "Great value");
        assert_eq!(r.channel, Channel::Booking);
    }

    #[test]
    fn test_garbage_record_gets_defaults() {
        let row = json!({
            "type": "owner-review",
            "status": "archived",
            "channel": "vrbo",
            "rating": "ten",
            "submittedAt": "not a date",
            "reviewCategory": "cleanliness"
        });
        let r = &normalize_at(&[RawRecord::hostaway(row)], fixed_now())[0];

        assert!(r.id.starts_with("hostaway-"));
        assert!(r.id.len() > "hostaway-".len());
        assert_eq!(r.role, ReviewRole::GuestToHost);
        assert_eq!(r.status, PublicationStatus::Published);
        assert_eq!(r.channel, Channel::Other);
        assert_eq!(r.rating_overall, None);
        assert!(r.ratings_by_category.is_empty());
        assert_eq!(r.reviewer_name, "Guest");
        assert_eq!(r.text, "");
        assert_eq!(r.submitted_at, fixed_now());
        assert_eq!(r.listing_name, None);
    }

    #[test]
    fn test_non_object_payload_is_total() {
        let reviews = normalize_at(
            &[RawRecord::hostaway(json!(null)), RawRecord::hostaway(json!([1, 2]))],
            fixed_now(),
        );
        assert_eq!(reviews.len(), 2);
        assert_ne!(reviews[0].id, reviews[1].id);
    }

    #[test]
    fn test_google_adapter_fixes_channel_and_role() {
        let review = json!({
            "author_name": "Priya",
            "author_url": "https://www.google.com/maps/contrib/1",
            "rating": 4,
            "text": "Quiet street, very clean",
            "time": 1705320000
        });
        let reviews = normalize_google("Shoreditch Heights", "ChIJabc", &[review]);
        let r = &reviews[0];

        assert_eq!(r.id, "google-ChIJabc-1705320000");
        assert_eq!(r.source, ReviewSource::Google);
        assert_eq!(r.channel, Channel::Google);
        assert_eq!(r.role, ReviewRole::GuestToHost);
        assert_eq!(r.listing_name.as_deref(), Some("Shoreditch Heights"));
        assert_eq!(r.rating_overall, Some(4.0));
        assert_eq!(
            r.submitted_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
        let attribution = r.attribution.as_ref().unwrap();
        assert_eq!(attribution.powered_by, "google");
        assert_eq!(
            attribution.author_url.as_deref(),
            Some("https://www.google.com/maps/contrib/1")
        );
    }

    #[test]
    fn test_google_missing_author_uses_google_default() {
        let r = &normalize_google("Place", "P1", &[json!({"author_name": "", "time": 1})])[0];
        assert_eq!(r.reviewer_name, "Google User");
    }

    #[test]
    fn test_heterogeneous_batch_ids_do_not_collide() {
        let records = vec![
            RawRecord::hostaway(json!({"id": 1, "submittedAt": "2024-01-01"})),
            RawRecord::new(
                SourceAdapter::google("P1", "Place"),
                json!({"time": 1, "text": "ok"}),
            ),
        ];
        let reviews = normalize_at(&records, fixed_now());
        assert_eq!(reviews[0].id, "hostaway-1");
        assert_eq!(reviews[1].id, "google-P1-1");
    }

    #[test]
    fn test_missing_timestamp_only_changes_submitted_at() {
        let records = vec![RawRecord::hostaway(
            json!({"id": 42, "rating": 8, "publicReview": "Nice"}),
        )];
        let first_now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let second_now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 30, 0).unwrap();

        let a = normalize_at(&records, first_now);
        let b = normalize_at(&records, second_now);
        assert_eq!(a[0].submitted_at, first_now);
        assert_eq!(b[0].submitted_at, second_now);

        let mut a_moved = a[0].clone();
        a_moved.submitted_at = second_now;
        assert_eq!(a_moved, b[0]);
    }

    #[test]
    fn test_normalization_is_deterministic_given_timestamp() {
        let row = json!({"id": 9, "rating": 9, "submittedAt": "2024-05-05T08:00:00Z"});
        let a = normalize(&[RawRecord::hostaway(row.clone())]);
        let b = normalize(&[RawRecord::hostaway(row)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_rows_from_dump_shapes() {
        assert_eq!(extract_rows(&json!([{"id": 1}])).len(), 1);
        assert_eq!(extract_rows(&json!({"status": "success", "result": [{"id": 1}, {"id": 2}]})).len(), 2);
        assert_eq!(extract_rows(&json!({"reviews": [{"id": 1}]})).len(), 1);
        assert_eq!(extract_rows(&json!({"data": []})).len(), 0);
        assert!(extract_rows(&json!({"result": "nope"})).is_empty());
        assert!(extract_rows(&json!("text")).is_empty());
    }
}

// Lookups over loosely-typed JSON objects. None of these fail; a field that is
// missing or has the wrong shape simply does not match.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use reviewlens_common::{CategoryRating, RATING_SCALE_MAX};

/// Epoch values below this are seconds, at or above it milliseconds.
/// 10^11 seconds is the year 5138; 10^11 millis is March 1973.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// First alias holding a non-null value.
pub(crate) fn first_present<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| !v.is_null())
}

/// First alias holding a string or number, rendered as a string.
pub(crate) fn first_scalar_string(obj: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().filter_map(|key| obj.get(*key)).find_map(scalar_string)
}

/// Like [`first_scalar_string`] but skips blank strings.
pub(crate) fn first_non_blank(obj: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(scalar_string)
        .find(|s| !s.trim().is_empty())
}

/// First alias holding a JSON number. Strings like `"8"` do not count.
pub(crate) fn first_number(obj: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(Value::as_f64)
}

/// First alias holding an array.
pub(crate) fn first_array<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(Value::as_array)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ratings outside the platform scale, or non-finite, are treated as absent.
pub(crate) fn in_scale(rating: f64) -> Option<f64> {
    (rating.is_finite() && (0.0..=RATING_SCALE_MAX).contains(&rating)).then_some(rating)
}

/// Keep entries that carry a name (or category) and a numeric in-scale rating.
pub(crate) fn category_ratings(entries: &[Value]) -> Vec<CategoryRating> {
    entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let category = first_non_blank(obj, &["name", "category"])?;
            let rating = obj.get("rating").and_then(Value::as_f64).and_then(in_scale)?;
            Some(CategoryRating {
                category: category.to_lowercase(),
                rating,
            })
        })
        .collect()
}

/// Parse epoch seconds, epoch millis, RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
/// Zone-less forms are read as UTC.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() < EPOCH_MILLIS_THRESHOLD {
        value * 1000.0
    } else {
        value
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    s.parse::<f64>().ok().and_then(from_epoch)
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReviewLensError;
use crate::types::ModerationStatus;

/// Sentinel accepted by every selector to mean "do not filter on this".
pub const ALL: &str = "all";

/// Immutable review query. `None` selectors and dates are inactive predicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    /// Exact listing name.
    pub property: Option<String>,
    /// Channel tag, compared case-insensitively.
    pub channel: Option<String>,
    /// Rating category the review must carry.
    pub category: Option<String>,
    pub status: Option<ModerationStatus>,
    /// Inclusive lower calendar-day bound. Days are UTC days, not the viewer's
    /// local day, so a review written late evening west of UTC lands on the next day.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper calendar-day bound, covering the whole UTC day up to
    /// 23:59:59.999 UTC.
    pub date_to: Option<NaiveDate>,
    /// Reviews without a rating count as 0 against this threshold.
    pub min_rating: f64,
}

/// Partial update in the loose string shape a query string or form produces.
/// Absent fields keep their current value; `"all"` or `""` clears a selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersPatch {
    pub property: Option<String>,
    pub channel: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub min_rating: Option<f64>,
}

impl Filters {
    pub fn is_neutral(&self) -> bool {
        *self == Filters::default()
    }

    /// Returns a new `Filters` with the patch applied. `self` is left untouched.
    pub fn apply(&self, patch: &FiltersPatch) -> Result<Filters, ReviewLensError> {
        let mut next = self.clone();

        if let Some(property) = &patch.property {
            next.property = selector(property);
        }
        if let Some(channel) = &patch.channel {
            next.channel = selector(channel).map(|c| c.to_lowercase());
        }
        if let Some(category) = &patch.category {
            next.category = selector(category).map(|c| c.to_lowercase());
        }
        if let Some(status) = &patch.status {
            next.status = match selector(status) {
                None => None,
                Some(s) => Some(s.parse().map_err(ReviewLensError::Validation)?),
            };
        }
        if let Some(from) = &patch.date_from {
            next.date_from = parse_day(from)?;
        }
        if let Some(to) = &patch.date_to {
            next.date_to = parse_day(to)?;
        }
        if let Some(min) = patch.min_rating {
            if !min.is_finite() || min < 0.0 {
                return Err(ReviewLensError::Validation(format!(
                    "minRating must be a non-negative number, got {min}"
                )));
            }
            next.min_rating = min;
        }

        Ok(next)
    }
}

fn selector(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_day(value: &str) -> Result<Option<NaiveDate>, ReviewLensError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| ReviewLensError::Validation(format!("invalid date {trimmed:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        assert!(Filters::default().is_neutral());
    }

    #[test]
    fn test_apply_returns_new_value() {
        let base = Filters::default();
        let patch = FiltersPatch {
            property: Some("Camden Flat".into()),
            min_rating: Some(7.5),
            ..Default::default()
        };
        let next = base.apply(&patch).unwrap();
        assert!(base.is_neutral());
        assert_eq!(next.property.as_deref(), Some("Camden Flat"));
        assert_eq!(next.min_rating, 7.5);
    }

    #[test]
    fn test_all_and_empty_clear_selectors() {
        let base = Filters {
            property: Some("Camden Flat".into()),
            channel: Some("airbnb".into()),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let patch = FiltersPatch {
            property: Some("all".into()),
            channel: Some("".into()),
            date_from: Some("".into()),
            ..Default::default()
        };
        assert!(base.apply(&patch).unwrap().is_neutral());
    }

    #[test]
    fn test_absent_fields_are_kept() {
        let base = Filters {
            channel: Some("booking".into()),
            ..Default::default()
        };
        let next = base
            .apply(&FiltersPatch {
                status: Some("pending".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(next.channel.as_deref(), Some("booking"));
        assert_eq!(next.status, Some(ModerationStatus::Pending));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = Filters::default();
        let bad_status = FiltersPatch {
            status: Some("maybe".into()),
            ..Default::default()
        };
        assert!(base.apply(&bad_status).is_err());

        let bad_date = FiltersPatch {
            date_to: Some("31/01/2024".into()),
            ..Default::default()
        };
        assert!(base.apply(&bad_date).is_err());

        let bad_rating = FiltersPatch {
            min_rating: Some(-1.0),
            ..Default::default()
        };
        assert!(base.apply(&bad_rating).is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Recurring review themes. Order here is the tie-break order of the headline ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Cleanliness,
    Noise,
    Communication,
    Amenities,
    Location,
    Checkin,
    Wifi,
    Comfort,
    Value,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 9] = [
        IssueCategory::Cleanliness,
        IssueCategory::Noise,
        IssueCategory::Communication,
        IssueCategory::Amenities,
        IssueCategory::Location,
        IssueCategory::Checkin,
        IssueCategory::Wifi,
        IssueCategory::Comfort,
        IssueCategory::Value,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Cleanliness => "cleanliness",
            IssueCategory::Noise => "noise",
            IssueCategory::Communication => "communication",
            IssueCategory::Amenities => "amenities",
            IssueCategory::Location => "location",
            IssueCategory::Checkin => "checkin",
            IssueCategory::Wifi => "wifi",
            IssueCategory::Comfort => "comfort",
            IssueCategory::Value => "value",
        }
    }

    /// Lowercase keyword substrings. Matching is plain containment, so short
    /// keywords also hit inside longer words ("bed" in "bedroom", "ac" in "place").
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            IssueCategory::Cleanliness => &["clean", "spotless", "dirty", "dust", "stain", "smell"],
            IssueCategory::Noise => &["noisy", "noise", "loud", "quiet", "street", "construction"],
            IssueCategory::Communication => {
                &["host", "responsive", "communication", "reply", "helpful"]
            }
            IssueCategory::Amenities => &[
                "amenities",
                "kitchen",
                "shower",
                "bed",
                "heating",
                "ac",
                "air conditioning",
            ],
            IssueCategory::Location => {
                &["location", "neighborhood", "area", "close to", "distance", "walk"]
            }
            IssueCategory::Checkin => &[
                "check-in",
                "check in",
                "check-out",
                "check out",
                "late",
                "early",
                "keys",
                "lockbox",
            ],
            IssueCategory::Wifi => &["wifi", "wi-fi", "internet", "connection", "speed"],
            IssueCategory::Comfort => &["comfortable", "comfort", "bed", "mattress", "pillow", "cozy"],
            IssueCategory::Value => &["price", "expensive", "cheap", "value", "worth"],
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        for category in IssueCategory::ALL {
            let keywords = category.keywords();
            assert!(!keywords.is_empty(), "{category} has no keywords");
            for keyword in keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(IssueCategory::Checkin).unwrap(),
            serde_json::json!("checkin")
        );
    }
}

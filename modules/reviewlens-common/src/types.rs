use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of the rating scale shared by every source (Hostaway rates 0-10,
/// Google 1-5).
pub const RATING_SCALE_MAX: f64 = 10.0;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Hostaway,
    Google,
}

impl ReviewSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSource::Hostaway => "hostaway",
            ReviewSource::Google => "google",
        }
    }
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who wrote the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewRole {
    #[default]
    GuestToHost,
    HostToGuest,
}

impl ReviewRole {
    /// Accepts only the two exact wire literals.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "guest-to-host" => Some(ReviewRole::GuestToHost),
            "host-to-guest" => Some(ReviewRole::HostToGuest),
            _ => None,
        }
    }
}

/// The source's own publication state. Not the moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Published,
    Draft,
    Hidden,
}

impl PublicationStatus {
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "published" => Some(PublicationStatus::Published),
            "draft" => Some(PublicationStatus::Draft),
            "hidden" => Some(PublicationStatus::Hidden),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Airbnb,
    Booking,
    Direct,
    Google,
    #[default]
    Other,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Airbnb,
        Channel::Booking,
        Channel::Direct,
        Channel::Google,
        Channel::Other,
    ];

    /// Case-insensitive lookup; anything outside the closed set becomes `Other`.
    pub fn coerce(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .unwrap_or(Channel::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Airbnb => "airbnb",
            Channel::Booking => "booking",
            Channel::Direct => "direct",
            Channel::Google => "google",
            Channel::Other => "other",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state moderation status derived from the approval mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Approved,
    Denied,
    Pending,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Approved => "approved",
            ModerationStatus::Denied => "denied",
            ModerationStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(ModerationStatus::Approved),
            "denied" => Ok(ModerationStatus::Denied),
            "pending" => Ok(ModerationStatus::Pending),
            other => Err(format!("unknown moderation status: {other}")),
        }
    }
}

// --- Review ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRating {
    pub category: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    pub powered_by: String,
}

/// Canonical, source-agnostic review. Produced only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub source: ReviewSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_name: Option<String>,
    pub reviewer_name: String,
    #[serde(default)]
    pub role: ReviewRole,
    #[serde(default)]
    pub status: PublicationStatus,
    pub rating_overall: Option<f64>,
    #[serde(default)]
    pub ratings_by_category: Vec<CategoryRating>,
    #[serde(default)]
    pub channel: Channel,
    #[serde(with = "iso_millis")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-03-01T09:30:00.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&super::format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let s: Option<String> = Option::deserialize(deserializer)?;
            s.map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}

// --- Approvals ---

/// One persisted moderation decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub review_id: String,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(
        default,
        with = "iso_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved_at: Option<DateTime<Utc>>,
}

/// Snapshot of moderation decisions: review id -> approved.
/// A missing key means no decision has been recorded.
pub type ApprovalMap = HashMap<String, bool>;

// --- Sorting ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    Rating,
    Channel,
    Listing,
    Status,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "rating" => Ok(SortKey::Rating),
            "channel" => Ok(SortKey::Channel),
            "listing" => Ok(SortKey::Listing),
            "status" => Ok(SortKey::Status),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Current sort selection of a review table. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Selecting the active key flips direction; a different key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if key == self.key {
            SortState {
                key,
                direction: self.direction.flip(),
            }
        } else {
            SortState {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

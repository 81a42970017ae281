use reviewlens_common::{Channel, PublicationStatus, ReviewRole, ReviewSource};

/// Raw field names consulted for each canonical field, in priority order.
#[derive(Debug)]
pub(crate) struct FieldAliases {
    pub id: &'static [&'static str],
    pub role: &'static [&'static str],
    pub status: &'static [&'static str],
    pub channel: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub rating: &'static [&'static str],
    pub listing_name: &'static [&'static str],
    pub listing_id: &'static [&'static str],
    pub reviewer_name: &'static [&'static str],
    pub text: &'static [&'static str],
    pub submitted_at: &'static [&'static str],
    pub author_url: &'static [&'static str],
}

/// Covers both the Hostaway API row shape and the mock/export shape.
static HOSTAWAY_ALIASES: FieldAliases = FieldAliases {
    id: &["id", "reviewId"],
    role: &["type", "reviewType"],
    status: &["status"],
    channel: &["channel", "source"],
    categories: &["reviewCategory", "categories"],
    rating: &["rating", "overall"],
    listing_name: &["listingName", "propertyName", "listing_title"],
    listing_id: &["listingId", "propertyId"],
    reviewer_name: &["guestName", "reviewerName", "author_name"],
    text: &["publicReview", "comment", "text"],
    submitted_at: &["submittedAt", "createdAt", "time"],
    author_url: &[],
};

/// Place Details `result.reviews[]` entries.
static GOOGLE_ALIASES: FieldAliases = FieldAliases {
    id: &["time"],
    role: &[],
    status: &[],
    channel: &[],
    categories: &[],
    rating: &["rating"],
    listing_name: &[],
    listing_id: &[],
    reviewer_name: &["author_name"],
    text: &["text"],
    submitted_at: &["time"],
    author_url: &["author_url"],
};

/// Chooses the alias list and the fixed values for one upstream source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAdapter {
    Hostaway,
    /// Google exposes no role, status or channel; everything public is a guest review.
    Google { place_id: String, place_name: String },
}

impl SourceAdapter {
    pub fn google(place_id: impl Into<String>, place_name: impl Into<String>) -> Self {
        SourceAdapter::Google {
            place_id: place_id.into(),
            place_name: place_name.into(),
        }
    }

    pub fn source(&self) -> ReviewSource {
        match self {
            SourceAdapter::Hostaway => ReviewSource::Hostaway,
            SourceAdapter::Google { .. } => ReviewSource::Google,
        }
    }

    pub(crate) fn aliases(&self) -> &'static FieldAliases {
        match self {
            SourceAdapter::Hostaway => &HOSTAWAY_ALIASES,
            SourceAdapter::Google { .. } => &GOOGLE_ALIASES,
        }
    }

    pub(crate) fn fixed_channel(&self) -> Option<Channel> {
        match self {
            SourceAdapter::Hostaway => None,
            SourceAdapter::Google { .. } => Some(Channel::Google),
        }
    }

    pub(crate) fn fixed_role(&self) -> Option<ReviewRole> {
        match self {
            SourceAdapter::Hostaway => None,
            SourceAdapter::Google { .. } => Some(ReviewRole::GuestToHost),
        }
    }

    pub(crate) fn fixed_status(&self) -> Option<PublicationStatus> {
        match self {
            SourceAdapter::Hostaway => None,
            SourceAdapter::Google { .. } => Some(PublicationStatus::Published),
        }
    }

    pub(crate) fn fixed_listing_name(&self) -> Option<&str> {
        match self {
            SourceAdapter::Hostaway => None,
            SourceAdapter::Google { place_name, .. } => Some(place_name.as_str()),
        }
    }

    pub(crate) fn default_reviewer(&self) -> &'static str {
        match self {
            SourceAdapter::Hostaway => "Guest",
            SourceAdapter::Google { .. } => "Google User",
        }
    }

    /// The source-local part of the id. Google review times are only unique per place,
    /// so the place id is folded in.
    pub(crate) fn local_id(&self, raw: Option<String>) -> String {
        let raw = raw.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        match self {
            SourceAdapter::Hostaway => raw,
            SourceAdapter::Google { place_id, .. } => format!("{place_id}-{raw}"),
        }
    }
}

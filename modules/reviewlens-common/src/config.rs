use std::env;

use tracing::info;

use crate::error::ReviewLensError;

/// A Google place the dashboard tracks, keyed by a URL-friendly slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRef {
    pub slug: String,
    pub place_id: String,
}

/// Application configuration loaded from environment variables.
/// Every upstream integration is optional; missing credentials disable it.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Approvals (Postgres). `None` keeps decisions in memory.
    pub database_url: Option<String>,

    // Hostaway
    pub hostaway_account_id: Option<String>,
    pub hostaway_api_key: Option<String>,

    // Google Places
    pub google_maps_api_key: Option<String>,
    pub google_places: Vec<PlaceRef>,

    // AI summary
    pub ai_provider: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub public_base_url: String,

    // Snapshot cache
    pub cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ReviewLensError> {
        Ok(Self {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: parse_env("API_PORT", 3000)?,
            database_url: optional_env("DATABASE_URL"),
            hostaway_account_id: optional_env("HOSTAWAY_ACCOUNT_ID"),
            hostaway_api_key: optional_env("HOSTAWAY_API_KEY"),
            google_maps_api_key: optional_env("GOOGLE_MAPS_API_KEY"),
            google_places: parse_places(&env::var("GOOGLE_PLACES").unwrap_or_default())?,
            ai_provider: optional_env("AI_PROVIDER").map(|p| p.to_lowercase()),
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            public_base_url: parse_base_url(
                &optional_env("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:3000".to_string()),
            )?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 60)?,
        })
    }

    /// Hostaway credentials, if both halves are present.
    pub fn hostaway_credentials(&self) -> Option<(&str, &str)> {
        match (&self.hostaway_account_id, &self.hostaway_api_key) {
            (Some(id), Some(key)) => Some((id.as_str(), key.as_str())),
            _ => None,
        }
    }

    /// Log which integrations are enabled without printing any secret.
    pub fn log_redacted(&self) {
        info!(
            host = self.api_host.as_str(),
            port = self.api_port,
            postgres = self.database_url.is_some(),
            hostaway = self.hostaway_credentials().is_some(),
            google = self.google_maps_api_key.is_some(),
            google_places = self.google_places.len(),
            ai_provider = self.ai_provider.as_deref().unwrap_or("none"),
            cache_ttl_secs = self.cache_ttl_secs,
            "Configuration loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ReviewLensError> {
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ReviewLensError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}

/// Absolute http(s) URL, trailing slash removed. Sent as the referer on AI requests.
pub fn parse_base_url(raw: &str) -> Result<String, ReviewLensError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| ReviewLensError::Config(format!("PUBLIC_BASE_URL {raw:?} is invalid: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ReviewLensError::Config(format!(
            "PUBLIC_BASE_URL {raw:?} must be http or https"
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Parse `slug=placeId,slug=placeId`.
pub fn parse_places(raw: &str) -> Result<Vec<PlaceRef>, ReviewLensError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (slug, place_id) = entry.split_once('=').ok_or_else(|| {
                ReviewLensError::Config(format!("GOOGLE_PLACES entry {entry:?} must be slug=placeId"))
            })?;
            let (slug, place_id) = (slug.trim(), place_id.trim());
            if slug.is_empty() || place_id.is_empty() {
                return Err(ReviewLensError::Config(format!(
                    "GOOGLE_PLACES entry {entry:?} has an empty slug or place id"
                )));
            }
            Ok(PlaceRef {
                slug: slug.to_string(),
                place_id: place_id.to_string(),
            })
        })
        .collect()
}

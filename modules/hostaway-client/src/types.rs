use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tokens are refreshed this long before they actually expire.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Form body for `POST /v1/accessTokens`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub scope: &'static str,
}

impl<'a> TokenRequest<'a> {
    pub fn client_credentials(client_id: &'a str, client_secret: &'a str) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id,
            client_secret,
            scope: "general",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// A cached bearer token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn from_response(resp: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime = resp.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Self {
            token: resp.access_token,
            expires_at: issued_at + Duration::seconds(lifetime),
        }
    }

    /// Usable at `now` with at least the refresh skew left.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(EXPIRY_SKEW_SECS)
    }
}

/// Envelope of `GET /v1/reviews`. Rows stay raw; normalization happens downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl ReviewsResponse {
    /// The `result` array, or nothing when it is missing or not an array.
    pub fn into_rows(self) -> Vec<Value> {
        match self.result {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        }
    }
}

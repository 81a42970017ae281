pub mod error;
pub mod types;

pub use error::{HostawayError, Result};
pub use types::{AccessToken, ReviewsResponse, TokenRequest, TokenResponse};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

const BASE_URL: &str = "https://api.hostaway.com/v1";

/// Client-credentials Hostaway client. Owns its token cache; callers never see the token.
pub struct HostawayClient {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    api_key: String,
    token: Mutex<Option<AccessToken>>,
}

impl HostawayClient {
    pub fn new(account_id: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            account_id,
            api_key,
            token: Mutex::new(None),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Return the cached token, exchanging credentials for a new one when it is
    /// missing or inside the refresh skew. Concurrent callers share one refresh.
    pub async fn ensure_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.token.clone());
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        if self.account_id.is_empty() || self.api_key.is_empty() {
            return Err(HostawayError::MissingCredentials);
        }

        let issued_at = Utc::now();
        let url = format!("{}/accessTokens", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Cache-Control", "no-cache")
            .form(&TokenRequest::client_credentials(&self.account_id, &self.api_key))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HostawayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let token_resp: TokenResponse = resp.json().await?;
        let token = AccessToken::from_response(token_resp, issued_at);
        tracing::info!(expires_at = %token.expires_at, "Obtained Hostaway access token");
        Ok(token)
    }

    /// Fetch raw review rows (`result` array of `GET /reviews`).
    pub async fn fetch_reviews(&self) -> Result<Vec<Value>> {
        let token = self.ensure_token().await?;
        let url = format!("{}/reviews", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HostawayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: ReviewsResponse = resp.json().await?;
        let rows = body.into_rows();
        tracing::info!(count = rows.len(), "Fetched Hostaway reviews");
        Ok(rows)
    }
}

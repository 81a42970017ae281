use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::{AiError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse, Message};

/// Anything that turns a conversation into a single text completion.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String>;
}

/// Chat completion client for an OpenAI-compatible provider.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    app_name: Option<String>,
    site_url: Option<String>,
}

impl ChatClient {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            base_url: provider.base_url().to_string(),
            temperature: None,
            max_tokens: None,
            app_name: None,
            site_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sent as `X-Title` (OpenRouter only).
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sent as `HTTP-Referer` (OpenRouter only).
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        if self.api_key.is_empty() {
            return Err(AiError::Config(format!(
                "{} is not set",
                self.provider.api_key_var()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.provider == Provider::OpenRouter {
            if let Some(ref url) = self.site_url {
                if let Ok(val) = HeaderValue::from_str(url) {
                    headers.insert("HTTP-Referer", val);
                }
            }
            if let Some(ref name) = self.app_name {
                if let Ok(val) = HeaderValue::from_str(name) {
                    headers.insert("X-Title", val);
                }
            }
        }

        Ok(headers)
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(provider = %self.provider, model = %self.model, "Chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        chat.first_content().ok_or(AiError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openrouter_headers() {
        let client = ChatClient::new(Provider::OpenRouter, "sk-test")
            .with_app_name("ReviewLens")
            .with_site_url("http://localhost:3000");
        let headers = client.headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers["X-Title"], "ReviewLens");
        assert_eq!(headers["HTTP-Referer"], "http://localhost:3000");
    }

    #[test]
    fn test_groq_skips_openrouter_headers() {
        let client = ChatClient::new(Provider::Groq, "gsk-test").with_app_name("ReviewLens");
        let headers = client.headers().unwrap();
        assert!(headers.get("X-Title").is_none());
        assert_eq!(client.model(), "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = ChatClient::new(Provider::OpenRouter, "");
        let err = client.complete(vec![Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, AiError::Config(_)));
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use ai_client::{ChatClient, ChatCompletion, Message, Provider};
use reviewlens_analytics::SummaryPayload;
use reviewlens_common::Config;

const SYSTEM_PROMPT: &str = "You are a product analyst. Summarize guest review themes for a \
property manager in 4-6 bullet points. Be concise and actionable. Mention positives and negatives.";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 300;
const APP_NAME: &str = "ReviewLens Dashboard";

/// Optional natural-language summary of an issues report. `None` means "no
/// summary", never an error: the statistics stand on their own.
#[async_trait]
pub trait IssueSummarizer: Send + Sync {
    async fn summarize(&self, payload: &SummaryPayload) -> Option<String>;
}

/// Used when no AI provider is configured.
pub struct NoopSummarizer;

#[async_trait]
impl IssueSummarizer for NoopSummarizer {
    async fn summarize(&self, _payload: &SummaryPayload) -> Option<String> {
        None
    }
}

pub struct AiSummarizer {
    chat: Box<dyn ChatCompletion>,
}

impl AiSummarizer {
    pub fn new(chat: Box<dyn ChatCompletion>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl IssueSummarizer for AiSummarizer {
    async fn summarize(&self, payload: &SummaryPayload) -> Option<String> {
        let messages = match build_messages(payload) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "Could not serialize summary payload");
                return None;
            }
        };

        match self.chat.complete(messages).await {
            Ok(text) => {
                let preview: String = text.chars().take(80).collect();
                debug!(preview = %preview, "AI summary received");
                Some(text)
            }
            Err(e) => {
                warn!(error = %e, "AI summary failed");
                None
            }
        }
    }
}

fn build_messages(payload: &SummaryPayload) -> Result<Vec<Message>, serde_json::Error> {
    let data = serde_json::to_string(payload)?;
    Ok(vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Based on this data, summarize recurring issues and wins:\n{data}"
        )),
    ])
}

/// Summarizer for the configured provider; the no-op one when the provider is
/// unset, unknown, or missing its key.
pub fn summarizer_from_config(config: &Config) -> Arc<dyn IssueSummarizer> {
    let Some(name) = config.ai_provider.as_deref() else {
        return Arc::new(NoopSummarizer);
    };

    let provider: Provider = match name.parse() {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %e, "AI summaries disabled");
            return Arc::new(NoopSummarizer);
        }
    };

    let key = match provider {
        Provider::OpenRouter => config.openrouter_api_key.clone(),
        Provider::Groq => config.groq_api_key.clone(),
    };
    let Some(key) = key else {
        warn!(provider = %provider, var = provider.api_key_var(), "AI provider selected without a key");
        return Arc::new(NoopSummarizer);
    };

    let client = ChatClient::new(provider, key)
        .with_temperature(TEMPERATURE)
        .with_max_tokens(MAX_TOKENS)
        .with_app_name(APP_NAME)
        .with_site_url(config.public_base_url.clone());
    Arc::new(AiSummarizer::new(Box::new(client)))
}

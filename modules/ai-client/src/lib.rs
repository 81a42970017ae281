//! Minimal chat completion client for hosted OpenAI-compatible providers.
//!
//! ```rust,ignore
//! use ai_client::{ChatClient, ChatCompletion, Message, Provider};
//!
//! let client = ChatClient::new(Provider::Groq, api_key)
//!     .with_temperature(0.2)
//!     .with_max_tokens(300);
//! let text = client.complete(vec![Message::user("Hello")]).await?;
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{ChatClient, ChatCompletion};
pub use error::{AiError, Result};
pub use provider::Provider;
pub use types::{Message, MessageRole};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostawayError>;

#[derive(Debug, Error)]
pub enum HostawayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Hostaway credentials are not configured")]
    MissingCredentials,
}

impl From<reqwest::Error> for HostawayError {
    fn from(err: reqwest::Error) -> Self {
        HostawayError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for HostawayError {
    fn from(err: serde_json::Error) -> Self {
        HostawayError::Parse(err.to_string())
    }
}

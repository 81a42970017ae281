use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacesError>;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 200 but the body's `status` was not `OK`.
    #[error("Place Details returned {status}: {message}")]
    Status { status: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("GOOGLE_MAPS_API_KEY is not set")]
    MissingApiKey,
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(err: serde_json::Error) -> Self {
        PlacesError::Parse(err.to_string())
    }
}

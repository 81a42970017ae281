use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error ({source_name}): {message}")]
    Upstream { source_name: String, message: String },

    #[error("Approval store error: {0}")]
    Approval(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

use reviewlens_common::ReviewLensError;

pub type Result<T> = std::result::Result<T, ApprovalError>;

#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error("Invalid review id: {0:?}")]
    InvalidReviewId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<ApprovalError> for ReviewLensError {
    fn from(err: ApprovalError) -> Self {
        ReviewLensError::Approval(err.to_string())
    }
}

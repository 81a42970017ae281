use async_trait::async_trait;

use reviewlens_common::{ApprovalMap, ApprovalRecord};

use crate::error::{ApprovalError, Result};

/// Recorded when a decision arrives without an actor.
pub const DEFAULT_APPROVER: &str = "manager";

/// Durable key-value record of moderation decisions, keyed by review id.
///
/// `set` is an upsert; `clear` deletes the row so the review reads as pending again.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<ApprovalRecord>>;

    async fn set(&self, review_id: &str, approved: bool, approved_by: Option<&str>) -> Result<()>;

    /// Returns whether a row existed.
    async fn clear(&self, review_id: &str) -> Result<bool>;

    /// Snapshot consumed by the analytics pipeline.
    async fn snapshot(&self) -> Result<ApprovalMap> {
        let records = self.get_all().await?;
        Ok(records
            .into_iter()
            .map(|r| (r.review_id, r.approved))
            .collect())
    }
}

pub(crate) fn validate_review_id(review_id: &str) -> Result<&str> {
    let trimmed = review_id.trim();
    if trimmed.is_empty() {
        return Err(ApprovalError::InvalidReviewId(review_id.to_string()));
    }
    Ok(trimmed)
}

pub(crate) fn approver_or_default(approved_by: Option<&str>) -> String {
    approved_by
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_APPROVER)
        .to_string()
}

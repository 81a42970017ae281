use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use reviewlens_common::ApprovalRecord;

use crate::error::Result;
use crate::store::{approver_or_default, validate_review_id, ApprovalStore};

/// Process-local store. Decisions are lost on restart.
#[derive(Default)]
pub struct MemoryApprovalStore {
    rows: RwLock<HashMap<String, ApprovalRecord>>,
}

impl MemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApprovalStore for MemoryApprovalStore {
    async fn get_all(&self) -> Result<Vec<ApprovalRecord>> {
        let rows = self.rows.read().await;
        let mut records: Vec<ApprovalRecord> = rows.values().cloned().collect();
        records.sort_by(|a, b| a.review_id.cmp(&b.review_id));
        Ok(records)
    }

    async fn set(&self, review_id: &str, approved: bool, approved_by: Option<&str>) -> Result<()> {
        let review_id = validate_review_id(review_id)?;
        let record = ApprovalRecord {
            review_id: review_id.to_string(),
            approved,
            approved_by: Some(approver_or_default(approved_by)),
            approved_at: Some(Utc::now()),
        };
        self.rows.write().await.insert(record.review_id.clone(), record);
        Ok(())
    }

    async fn clear(&self, review_id: &str) -> Result<bool> {
        let review_id = validate_review_id(review_id)?;
        Ok(self.rows.write().await.remove(review_id).is_some())
    }
}

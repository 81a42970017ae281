use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use reviewlens_common::ApprovalRecord;

use crate::error::Result;
use crate::store::{approver_or_default, validate_review_id, ApprovalStore};

pub struct PgApprovalStore {
    pool: PgPool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ApprovalRow {
    review_id: String,
    approved: bool,
    approved_by: Option<String>,
    approved_at: Option<DateTime<Utc>>,
}

impl From<ApprovalRow> for ApprovalRecord {
    fn from(row: ApprovalRow) -> Self {
        ApprovalRecord {
            review_id: row.review_id,
            approved: row.approved,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
        }
    }
}

impl PgApprovalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Approval migrations applied");
        Ok(())
    }
}

#[async_trait]
impl ApprovalStore for PgApprovalStore {
    async fn get_all(&self) -> Result<Vec<ApprovalRecord>> {
        let rows = sqlx::query_as::<_, ApprovalRow>(
            "SELECT review_id, approved, approved_by, approved_at
             FROM approvals
             ORDER BY review_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ApprovalRecord::from).collect())
    }

    async fn set(&self, review_id: &str, approved: bool, approved_by: Option<&str>) -> Result<()> {
        let review_id = validate_review_id(review_id)?;
        sqlx::query(
            r#"
            INSERT INTO approvals (review_id, approved, approved_by, approved_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (review_id) DO UPDATE SET
                approved = EXCLUDED.approved,
                approved_by = EXCLUDED.approved_by,
                approved_at = EXCLUDED.approved_at
            "#,
        )
        .bind(review_id)
        .bind(approved)
        .bind(approver_or_default(approved_by))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self, review_id: &str) -> Result<bool> {
        let review_id = validate_review_id(review_id)?;
        let result = sqlx::query("DELETE FROM approvals WHERE review_id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

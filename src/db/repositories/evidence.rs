use crate::{db::models::Evidence, error::Error};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct EvidenceRepository {
    pool: Arc<PgPool>,
}

impl EvidenceRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Latest evidence captured within `[from, to]`
    pub async fn latest_in_window(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Evidence>> {
        let result = sqlx::query_as::<_, Evidence>(
            r#"
            SELECT id, camera_id, status_id, captured_at, path, type, note
            FROM evidence
            WHERE camera_id = $1 AND captured_at >= $2 AND captured_at <= $3
            ORDER BY captured_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(camera_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get evidence: {}", e)))?;

        Ok(result)
    }
}

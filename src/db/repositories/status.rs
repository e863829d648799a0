use crate::{
    db::models::{NewStatusEvent, StatusEvent},
    error::Error,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

/// Append-only store of camera status events
#[derive(Clone)]
pub struct StatusRepository {
    pool: Arc<PgPool>,
}

impl StatusRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Record a status event
    pub async fn create(&self, event: &NewStatusEvent) -> Result<StatusEvent> {
        let result = sqlx::query_as::<_, StatusEvent>(
            r#"
            INSERT INTO camera_status (camera_id, is_online, at, source)
            VALUES ($1, $2, $3, $4)
            RETURNING id, camera_id, is_online, at, source
            "#,
        )
        .bind(event.camera_id)
        .bind(event.is_online)
        .bind(event.at)
        .bind(&event.source)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Error::NotFound(format!("Camera {}", event.camera_id))
            }
            e => Error::Database(format!("Failed to create status event: {}", e)),
        })?;

        Ok(result)
    }

    /// Most recent event at or before `at`. Among events sharing that
    /// timestamp, the last one stored wins.
    pub async fn latest_at_or_before(
        &self,
        camera_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<StatusEvent>> {
        let result = sqlx::query_as::<_, StatusEvent>(
            r#"
            SELECT id, camera_id, is_online, at, source
            FROM camera_status
            WHERE camera_id = $1 AND at <= $2
            ORDER BY at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(camera_id)
        .bind(at)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get prior status: {}", e)))?;

        Ok(result)
    }

    /// Events within `[from, to]`, ascending by time then arrival order
    pub async fn in_window(
        &self,
        camera_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StatusEvent>> {
        let result = sqlx::query_as::<_, StatusEvent>(
            r#"
            SELECT id, camera_id, is_online, at, source
            FROM camera_status
            WHERE camera_id = $1 AND at >= $2 AND at <= $3
            ORDER BY at ASC, id ASC
            "#,
        )
        .bind(camera_id)
        .bind(from)
        .bind(to)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get status events in window: {}", e)))?;

        Ok(result)
    }
}

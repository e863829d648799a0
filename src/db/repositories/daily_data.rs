use crate::{
    db::models::{CameraDailyData, CameraDailyRow, DailyUpdate},
    error::Error,
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Per-camera daily status records
#[derive(Clone)]
pub struct DailyDataRepository {
    pool: Arc<PgPool>,
}

impl DailyDataRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Daily rows for `date` joined with their camera, ordered by camera id
    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<CameraDailyRow>> {
        let result = sqlx::query_as::<_, CameraDailyRow>(
            r#"
            SELECT d.id, d.camera_id, d.date, d.is_online, d.playback_status, d.uptime_pct,
                   d.usage, d.note, d.incidents, d.updated_at,
                   c.code, c.name, c.location
            FROM camera_daily_data d
            JOIN cameras c ON c.id = d.camera_id
            WHERE d.date = $1
            ORDER BY d.camera_id
            "#,
        )
        .bind(date)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get daily data: {}", e)))?;

        Ok(result)
    }

    /// Daily rows for `date` without the camera join
    pub async fn get_raw_by_date(&self, date: NaiveDate) -> Result<Vec<CameraDailyData>> {
        let result = sqlx::query_as::<_, CameraDailyData>(
            r#"
            SELECT id, camera_id, date, is_online, playback_status, uptime_pct,
                   usage, note, incidents, updated_at
            FROM camera_daily_data
            WHERE date = $1
            ORDER BY camera_id
            "#,
        )
        .bind(date)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get daily data: {}", e)))?;

        Ok(result)
    }

    /// Insert a default row for each roster camera that has none for `date`.
    /// Returns the number of rows created.
    pub async fn initialize_date(&self, date: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO camera_daily_data
                (camera_id, date, is_online, playback_status, uptime_pct, usage, note, incidents)
            SELECT c.id, $1, FALSE, 'OK', 0, '', '', 0
            FROM cameras c
            WHERE COALESCE(c.is_active, TRUE)
              AND NOT EXISTS (
                  SELECT 1 FROM camera_daily_data d
                  WHERE d.camera_id = c.id AND d.date = $1
              )
            "#,
        )
        .bind(date)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to initialize daily data: {}", e)))?;

        info!("Initialized {} daily rows for {}", result.rows_affected(), date);
        Ok(result.rows_affected())
    }

    /// Apply a bulk update for `date` atomically
    pub async fn apply_updates(&self, date: NaiveDate, updates: &[DailyUpdate]) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        let now = Utc::now();
        let mut updated = 0;
        for update in updates {
            let result = sqlx::query(
                r#"
                UPDATE camera_daily_data
                SET is_online = $1, playback_status = $2, uptime_pct = $3,
                    usage = $4, note = $5, incidents = COALESCE($6, incidents),
                    updated_at = $7
                WHERE camera_id = $8 AND date = $9
                "#,
            )
            .bind(update.is_online)
            .bind(&update.playback_status)
            .bind(update.uptime_pct())
            .bind(&update.usage)
            .bind(&update.note)
            .bind(update.incidents)
            .bind(now)
            .bind(update.camera_id)
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                Error::Database(format!(
                    "Failed to update daily data for camera {}: {}",
                    update.camera_id, e
                ))
            })?;
            updated += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit daily update: {}", e)))?;

        Ok(updated)
    }

    /// Delete every daily row for `date` together with its analytics row
    pub async fn delete_date(&self, date: NaiveDate) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        let deleted = sqlx::query("DELETE FROM camera_daily_data WHERE date = $1")
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete daily data: {}", e)))?
            .rows_affected();

        sqlx::query("DELETE FROM daily_analytics WHERE date = $1")
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete daily analytics: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit delete: {}", e)))?;

        Ok(deleted)
    }
}

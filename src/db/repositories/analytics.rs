use crate::{db::models::DailyAnalytics, error::Error};
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

/// Stored daily fleet summaries
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: Arc<PgPool>,
}

impl AnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Option<DailyAnalytics>> {
        let result = sqlx::query_as::<_, DailyAnalytics>(
            r#"
            SELECT date, total_cameras, total_online, total_offline, avg_uptime,
                   total_incidents, updated_at
            FROM daily_analytics
            WHERE date = $1
            "#,
        )
        .bind(date)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get daily analytics: {}", e)))?;

        Ok(result)
    }

    /// Summaries for `[start, end]`, most recent first
    pub async fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyAnalytics>> {
        let result = sqlx::query_as::<_, DailyAnalytics>(
            r#"
            SELECT date, total_cameras, total_online, total_offline, avg_uptime,
                   total_incidents, updated_at
            FROM daily_analytics
            WHERE date >= $1 AND date <= $2
            ORDER BY date DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get analytics range: {}", e)))?;

        Ok(result)
    }

    /// Insert or replace the summary for its date
    pub async fn upsert(&self, day: &DailyAnalytics) -> Result<DailyAnalytics> {
        let result = sqlx::query_as::<_, DailyAnalytics>(
            r#"
            INSERT INTO daily_analytics
                (date, total_cameras, total_online, total_offline, avg_uptime, total_incidents, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (date) DO UPDATE
            SET total_cameras = EXCLUDED.total_cameras,
                total_online = EXCLUDED.total_online,
                total_offline = EXCLUDED.total_offline,
                avg_uptime = EXCLUDED.avg_uptime,
                total_incidents = EXCLUDED.total_incidents,
                updated_at = EXCLUDED.updated_at
            RETURNING date, total_cameras, total_online, total_offline, avg_uptime,
                      total_incidents, updated_at
            "#,
        )
        .bind(day.date)
        .bind(day.total_cameras)
        .bind(day.total_online)
        .bind(day.total_offline)
        .bind(day.avg_uptime)
        .bind(day.total_incidents)
        .bind(day.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to upsert daily analytics: {}", e)))?;

        Ok(result)
    }
}

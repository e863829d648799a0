use crate::db::models::{AnalyticsSummary, CameraDailyData, CameraDailyRow, DailyAnalytics, DailyUpdate};
use crate::db::repositories::{AnalyticsRepository, DailyDataRepository};
use crate::error::Error;
use anyhow::Result;
use chrono::{Duration, Months, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;

/// Fleet summary for one day of operator-recorded rows
pub fn summarize_day(date: NaiveDate, rows: &[CameraDailyData]) -> DailyAnalytics {
    let total = rows.len() as i32;
    let online = rows.iter().filter(|row| row.is_online).count() as i32;
    let avg_uptime = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|row| row.uptime_pct).sum::<f64>() / rows.len() as f64
    };

    DailyAnalytics {
        date,
        total_cameras: total,
        total_online: online,
        total_offline: total - online,
        avg_uptime,
        total_incidents: rows.iter().map(|row| row.incidents).sum(),
        updated_at: Some(Utc::now()),
    }
}

/// Average a range of daily summaries.
///
/// Camera count comes from the most recent day, online/offline counts are
/// rounded means, uptime is the mean of daily averages and incidents are
/// summed. An empty range yields all zeros.
pub fn summarize_period(days: &[DailyAnalytics]) -> AnalyticsSummary {
    let Some(latest) = days.iter().max_by_key(|day| day.date) else {
        return AnalyticsSummary::default();
    };

    let count = days.len() as f64;
    let mean = |f: fn(&DailyAnalytics) -> f64| days.iter().map(f).sum::<f64>() / count;

    AnalyticsSummary {
        total_cameras: latest.total_cameras,
        total_online: mean(|d: &DailyAnalytics| d.total_online as f64).round() as i32,
        total_offline: mean(|d: &DailyAnalytics| d.total_offline as f64).round() as i32,
        avg_uptime: mean(|d: &DailyAnalytics| d.avg_uptime),
        total_incidents: days.iter().map(|day| day.total_incidents).sum(),
    }
}

/// Named reporting period ending today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreset {
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl FromStr for PeriodPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            other => Err(Error::Validation(format!("Unknown period: {}", other))),
        }
    }
}

impl PeriodPreset {
    /// Date range for this preset. Calendar months that are too short clamp
    /// to their last day (Mar 31 minus one month is Feb 28/29).
    pub fn resolve(
        self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(NaiveDate, NaiveDate), Error> {
        let start = match self {
            Self::Weekly => today - Duration::days(7),
            Self::Monthly => today
                .checked_sub_months(Months::new(1))
                .ok_or_else(|| Error::Validation("Date out of range".to_string()))?,
            Self::Yearly => today
                .checked_sub_months(Months::new(12))
                .ok_or_else(|| Error::Validation("Date out of range".to_string()))?,
            Self::Custom => {
                let (Some(start), Some(end)) = (start, end) else {
                    return Err(Error::Validation(
                        "Start and end dates are required".to_string(),
                    ));
                };
                if start > end {
                    return Err(Error::Validation(format!(
                        "Start date {} is after end date {}",
                        start, end
                    )));
                }
                return Ok((start, end));
            }
        };

        Ok((start, today))
    }
}

/// Analytics for one day as shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub cameras: Vec<CameraDailyRow>,
    pub summary: AnalyticsSummary,
}

/// Analytics over a date range
#[derive(Debug, Clone, Serialize)]
pub struct PeriodView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
    pub summary: AnalyticsSummary,
    pub data: Vec<DailyAnalytics>,
}

/// Daily status bookkeeping and the summaries derived from it
pub struct DailyAnalyticsService {
    daily: DailyDataRepository,
    analytics: AnalyticsRepository,
}

impl DailyAnalyticsService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            daily: DailyDataRepository::new(Arc::clone(&pool)),
            analytics: AnalyticsRepository::new(pool),
        }
    }

    pub async fn day_view(&self, date: NaiveDate) -> Result<DayView> {
        let cameras = self.daily.get_by_date(date).await?;
        let summary = self
            .analytics
            .get_by_date(date)
            .await?
            .map(|day| AnalyticsSummary::from(&day))
            .unwrap_or_default();

        Ok(DayView {
            date,
            cameras,
            summary,
        })
    }

    pub async fn period_view(&self, start: NaiveDate, end: NaiveDate) -> Result<PeriodView> {
        let data = self.analytics.get_range(start, end).await?;

        Ok(PeriodView {
            start,
            end,
            days: data.len(),
            summary: summarize_period(&data),
            data,
        })
    }

    /// Recompute and store the summary for `date`
    pub async fn regenerate(&self, date: NaiveDate) -> Result<DailyAnalytics> {
        let rows = self.daily.get_raw_by_date(date).await?;
        let day = summarize_day(date, &rows);
        self.analytics.upsert(&day).await
    }

    /// Create missing daily rows for `date`; returns how many were created
    pub async fn initialize_day(&self, date: NaiveDate) -> Result<u64> {
        let created = self.daily.initialize_date(date).await?;
        self.regenerate(date).await?;
        info!("Initialized {} camera records for {}", created, date);
        Ok(created)
    }

    pub async fn update_day(&self, date: NaiveDate, updates: &[DailyUpdate]) -> Result<u64> {
        let updated = self.daily.apply_updates(date, updates).await?;
        self.regenerate(date).await?;
        info!("Updated {} camera records for {}", updated, date);
        Ok(updated)
    }

    pub async fn delete_day(&self, date: NaiveDate) -> Result<u64> {
        let deleted = self.daily.delete_date(date).await?;
        info!("Deleted {} camera records for {}", deleted, date);
        Ok(deleted)
    }
}

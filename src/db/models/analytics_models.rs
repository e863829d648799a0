use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored fleet summary for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyAnalytics {
    pub date: NaiveDate,
    pub total_cameras: i32,
    pub total_online: i32,
    pub total_offline: i32,
    pub avg_uptime: f64,
    pub total_incidents: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fleet summary as returned by the analytics endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_cameras: i32,
    pub total_online: i32,
    pub total_offline: i32,
    pub avg_uptime: f64,
    pub total_incidents: i32,
}

impl From<&DailyAnalytics> for AnalyticsSummary {
    fn from(day: &DailyAnalytics) -> Self {
        Self {
            total_cameras: day.total_cameras,
            total_online: day.total_online,
            total_offline: day.total_offline,
            avg_uptime: day.avg_uptime,
            total_incidents: day.total_incidents,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Operator-recorded status of one camera for one day
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CameraDailyData {
    pub id: i64,
    pub camera_id: i64,
    pub date: NaiveDate,
    pub is_online: bool,
    pub playback_status: String,
    pub uptime_pct: f64,
    pub usage: String,
    pub note: String,
    pub incidents: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Daily row joined with the camera it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CameraDailyRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub data: CameraDailyData,
    pub code: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// One entry of a bulk daily update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUpdate {
    pub camera_id: i64,
    pub is_online: bool,
    #[serde(default = "default_playback_status")]
    pub playback_status: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub note: String,
    /// Left unchanged when absent
    #[serde(default)]
    pub incidents: Option<i32>,
}

pub fn default_playback_status() -> String {
    "OK".to_string()
}

impl DailyUpdate {
    /// Daily uptime follows the recorded state: fully up or fully down.
    pub fn uptime_pct(&self) -> f64 {
        if self.is_online {
            100.0
        } else {
            0.0
        }
    }
}

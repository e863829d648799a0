use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uploaded screenshot backing a camera's reported status
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Evidence {
    pub id: i64,
    pub camera_id: i64,
    pub status_id: Option<i64>,
    pub captured_at: DateTime<Utc>,
    /// Object path inside the evidence bucket
    pub path: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub note: Option<String>,
}

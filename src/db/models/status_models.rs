use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One online/offline observation for a camera.
///
/// `is_online` is the state starting at `at` and holding until the next
/// event for the same camera. Events are never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusEvent {
    pub id: i64,
    pub camera_id: i64,
    pub is_online: bool,
    pub at: DateTime<Utc>,
    pub source: Option<String>,
}

/// Status event as submitted, before it has an id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStatusEvent {
    pub camera_id: i64,
    pub is_online: bool,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub source: Option<String>,
}

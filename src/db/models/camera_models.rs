use serde::{Deserialize, Serialize};

/// Camera model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Camera {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Payload for registering a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCamera {
    pub code: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

use crate::{
    db::models::{Camera, NewCamera},
    error::Error,
};
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Cameras repository for handling camera operations
#[derive(Clone)]
pub struct CamerasRepository {
    pool: Arc<PgPool>,
}

impl CamerasRepository {
    /// Create a new cameras repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Register a new camera
    pub async fn create(&self, camera: &NewCamera) -> Result<Camera> {
        info!("Creating new camera: {}", camera.code);

        let result = sqlx::query_as::<_, Camera>(
            r#"
            INSERT INTO cameras (code, name, location, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, code, name, location, is_active
            "#,
        )
        .bind(&camera.code)
        .bind(&camera.name)
        .bind(&camera.location)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::AlreadyExists(format!("Camera code {}", camera.code))
            }
            e => Error::Database(format!("Failed to create camera: {}", e)),
        })?;

        Ok(result)
    }

    /// Get camera by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Camera>> {
        let result = sqlx::query_as::<_, Camera>(
            r#"
            SELECT id, code, name, location, is_active
            FROM cameras
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get camera by ID: {}", e)))?;

        Ok(result)
    }

    /// Get all cameras, active or not
    pub async fn get_all(&self) -> Result<Vec<Camera>> {
        let result = sqlx::query_as::<_, Camera>(
            r#"
            SELECT id, code, name, location, is_active
            FROM cameras
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get cameras: {}", e)))?;

        Ok(result)
    }

    /// Cameras under monitoring, ordered by id. A NULL `is_active` counts as active.
    pub async fn roster(&self) -> Result<Vec<Camera>> {
        let result = sqlx::query_as::<_, Camera>(
            r#"
            SELECT id, code, name, location, is_active
            FROM cameras
            WHERE COALESCE(is_active, TRUE)
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get camera roster: {}", e)))?;

        Ok(result)
    }
}

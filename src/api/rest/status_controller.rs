use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::{Camera, NewCamera, NewStatusEvent};
use crate::db::repositories::{CamerasRepository, StatusRepository};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use log::info;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StatusRecorded {
    pub ok: bool,
    pub id: i64,
}

/// Record one status observation
pub async fn record_status(
    State(state): State<AppState>,
    WithRejection(Json(event), _): WithRejection<Json<NewStatusEvent>, ApiError>,
) -> ApiResult<Json<StatusRecorded>> {
    let repo = StatusRepository::new(Arc::clone(&state.db_pool));
    let stored = repo.create(&event).await?;

    info!(
        "Camera {} reported {} at {}",
        stored.camera_id,
        if stored.is_online { "online" } else { "offline" },
        stored.at
    );

    Ok(Json(StatusRecorded { ok: true, id: stored.id }))
}

pub async fn get_cameras(State(state): State<AppState>) -> ApiResult<Json<Vec<Camera>>> {
    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    let cameras = repo.get_all().await?;
    Ok(Json(cameras))
}

pub async fn create_camera(
    State(state): State<AppState>,
    WithRejection(Json(camera), _): WithRejection<Json<NewCamera>, ApiError>,
) -> ApiResult<(StatusCode, Json<Camera>)> {
    if camera.code.trim().is_empty() {
        return Err(ApiError::bad_request("Camera code is required"));
    }

    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&camera).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_camera_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Camera>> {
    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    let camera = repo.get_by_id(id).await?.ok_or_else(|| ApiError {
        message: format!("Camera not found: {}", id),
        status: StatusCode::NOT_FOUND.as_u16(),
    })?;

    Ok(Json(camera))
}

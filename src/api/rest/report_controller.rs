use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::services::document::{build_document, CameraUsage, DocumentRequest, ReportDocument};
use crate::services::report::UptimeReport;
use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub company: Option<String>,
    pub monitoring: Option<String>,
    pub notes: Option<String>,
    /// JSON array of `{camera_id, usage}`
    pub usages: Option<String>,
}

/// Parse an RFC 3339 instant, or a bare date as midnight UTC
pub fn parse_instant(name: &str, value: Option<&str>) -> ApiResult<DateTime<Utc>> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Query parameter {} is required", name)))?;

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(ApiError::bad_request(format!(
        "Query parameter {} is not a valid date or timestamp: {}",
        name, value
    )))
}

fn parse_usages(raw: Option<&str>) -> ApiResult<Vec<CameraUsage>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ApiError::bad_request(format!("Invalid usages parameter: {}", e))),
        None => Ok(Vec::new()),
    }
}

fn non_empty(value: Option<String>, fallback: &str) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| (!fallback.is_empty()).then(|| fallback.to_string()))
}

/// Per-camera uptime over `[from, to]`
pub async fn get_report(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ReportParams>, ApiError>,
) -> ApiResult<Json<UptimeReport>> {
    let from = parse_instant("from", params.from.as_deref())?;
    let to = parse_instant("to", params.to.as_deref())?;

    let report = state.reports.assemble(from, to).await?;
    Ok(Json(report))
}

/// Layout-ready report document for a renderer
pub async fn get_document(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<DocumentParams>, ApiError>,
) -> ApiResult<Json<ReportDocument>> {
    let from = parse_instant("from", params.from.as_deref())?;
    let to = parse_instant("to", params.to.as_deref())?;

    let config = state.reports.config();
    let company = non_empty(params.company, &config.company)
        .ok_or_else(|| ApiError::bad_request("Query parameter company is required"))?;
    let monitoring = non_empty(params.monitoring, &config.monitoring)
        .ok_or_else(|| ApiError::bad_request("Query parameter monitoring is required"))?;

    let request = DocumentRequest {
        company,
        monitoring,
        notes: params.notes.filter(|n| !n.trim().is_empty()),
        usages: parse_usages(params.usages.as_deref())?,
    };

    let report = state.reports.assemble(from, to).await?;
    let document = build_document(
        &report,
        &request,
        config.online_threshold_pct,
        config.max_evidence,
        Utc::now(),
    );

    info!(
        "Built report document for {} cameras with {} evidence pages",
        document.cameras.len(),
        document.evidence.len()
    );

    Ok(Json(document))
}

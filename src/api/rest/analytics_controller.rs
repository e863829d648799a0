use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::DailyUpdate;
use crate::services::analytics::{DayView, PeriodPreset, PeriodView};
use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DateBody {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    pub date: NaiveDate,
    pub updates: Vec<DailyUpdate>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub period: Option<String>,
}

/// Envelope used by every analytics response
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

fn ok<T: Serialize>(body: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        body,
    })
}

/// Daily rows and summary; defaults to today (UTC)
pub async fn get_day(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<DateParams>, ApiError>,
) -> ApiResult<Json<Envelope<DayView>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let view = state.analytics.day_view(date).await?;
    Ok(ok(view))
}

pub async fn initialize_day(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<DateBody>, ApiError>,
) -> ApiResult<Json<Envelope<Message>>> {
    let created = state.analytics.initialize_day(body.date).await?;
    Ok(ok(Message {
        message: format!("Initialized {} camera records for {}", created, body.date),
    }))
}

pub async fn update_day(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateBody>, ApiError>,
) -> ApiResult<Json<Envelope<Message>>> {
    state.analytics.update_day(body.date, &body.updates).await?;
    Ok(ok(Message {
        message: format!("Updated {} camera records", body.updates.len()),
    }))
}

pub async fn delete_day(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<DateParams>, ApiError>,
) -> ApiResult<Json<Envelope<Message>>> {
    let date = params
        .date
        .ok_or_else(|| ApiError::bad_request("Date parameter is required"))?;

    state.analytics.delete_day(date).await?;
    Ok(ok(Message {
        message: format!("Deleted all data for {}", date),
    }))
}

/// Resolve the requested range: a preset, or explicit start and end
pub fn resolve_period(params: &PeriodParams, today: NaiveDate) -> ApiResult<(NaiveDate, NaiveDate)> {
    let preset = match params.period.as_deref() {
        Some(name) => name.parse::<PeriodPreset>()?,
        None => PeriodPreset::Custom,
    };

    Ok(preset.resolve(today, params.start, params.end)?)
}

pub async fn get_period(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<PeriodParams>, ApiError>,
) -> ApiResult<Json<Envelope<PeriodView>>> {
    let (start, end) = resolve_period(&params, Utc::now().date_naive())?;
    let view = state.analytics.period_view(start, end).await?;
    Ok(ok(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_range_is_bad_request() {
        let params = PeriodParams {
            start: Some(date(2024, 1, 1)),
            end: None,
            period: None,
        };
        let err = resolve_period(&params, date(2024, 3, 1)).unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_preset_overrides_explicit_dates() {
        let params = PeriodParams {
            start: Some(date(2020, 1, 1)),
            end: Some(date(2020, 1, 2)),
            period: Some("weekly".to_string()),
        };
        assert_eq!(
            resolve_period(&params, date(2024, 3, 8)).unwrap(),
            (date(2024, 3, 1), date(2024, 3, 8))
        );
    }

    #[test]
    fn test_envelope_flattens_body() {
        let value = serde_json::to_value(Envelope {
            success: true,
            body: Message {
                message: "done".to_string(),
            },
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "message": "done"}));
    }
}

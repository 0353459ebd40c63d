//! Current schedule endpoints

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use caseboard_core::{ics, tidy};
use chrono::{Datelike, Local};
use serde_json::{Value, json};

use crate::routes::{AppError, RecordResponse};
use crate::state::AppState;

pub fn router(base: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{base}/api/schedule"), get(get_schedule).post(save_schedule))
        .route(&format!("{base}/api/schedule.ics"), get(export_schedule))
        .route(&format!("{base}/api/tidy/format"), post(format_text))
        .route(&format!("{base}/api/tidy/group"), post(group_text))
}

/// GET /api/schedule - The saved record, or `{}` before the first save
async fn get_schedule(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let value = match state.schedule.current().await? {
        Some(record) => serde_json::to_value(record)?,
        None => json!({}),
    };
    Ok(Json(value))
}

/// POST /api/schedule - Parse the raw text body, save it and archive it
async fn save_schedule(State(state): State<AppState>, raw_text: String) -> Result<Json<RecordResponse>, AppError> {
    let record = state.schedule.save(raw_text).await?;

    Ok(Json(RecordResponse {
        message: state.config.locale.saved(),
        data: record,
    }))
}

/// GET /api/schedule.ics - The saved events as an iCalendar file
async fn export_schedule(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state
        .schedule
        .current()
        .await?
        .map(|record| record.events)
        .unwrap_or_default();

    let headers = [
        (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=\"schedule.ics\""),
    ];
    Ok((headers, ics::export(&events)).into_response())
}

/// POST /api/tidy/format - Normalize spacing in the text body
async fn format_text(body: String) -> String {
    tidy::format_text(&body)
}

/// POST /api/tidy/group - Regroup the text body by case
async fn group_text(body: String) -> String {
    tidy::group_by_case(&body, Local::now().year())
}

//! Backup history endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use caseboard_core::{BackupSummary, ScheduleError};
use serde::Deserialize;

use crate::routes::{AppError, RecordResponse, error_response};
use crate::state::AppState;

pub fn router(base: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{base}/api/backups"), get(list_backups))
        .route(&format!("{base}/api/restore"), post(restore_backup))
}

/// GET /api/backups - Saved snapshots, newest first
async fn list_backups(State(state): State<AppState>) -> Result<Json<Vec<BackupSummary>>, AppError> {
    Ok(Json(state.schedule.backups().await?))
}

#[derive(Deserialize)]
pub struct RestoreRequest {
    #[serde(rename = "backupId")]
    pub backup_id: String,
}

/// POST /api/restore - Make a snapshot the current schedule again
async fn restore_backup(
    State(state): State<AppState>,
    Json(req): Json<RestoreRequest>,
) -> Result<Response, AppError> {
    let locale = state.config.locale;

    match state.schedule.restore(&req.backup_id).await {
        Ok(record) => Ok(Json(RecordResponse {
            message: locale.restored(),
            data: record,
        })
        .into_response()),
        Err(ScheduleError::BackupNotFound(_)) => {
            Ok(error_response(StatusCode::NOT_FOUND, locale.backup_not_found()))
        }
        Err(e) => Err(e.into()),
    }
}

pub mod auth;
pub mod backups;
pub mod schedule;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use caseboard_core::ScheduleRecord;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::edge::edge_guard;
use crate::pages;
use crate::session;
use crate::state::AppState;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Confirmation message plus the record that is now current
#[derive(Serialize)]
pub struct RecordResponse {
    pub message: &'static str,
    pub data: ScheduleRecord,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {:#}", self.0);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Build the full application router.
///
/// Everything the editor talks to lives under the configured app path; the
/// schedule and backup endpoints need a session, login does not.
pub fn app(state: AppState) -> Router {
    let base = state.config.app_path.clone();

    let protected = Router::new()
        .merge(schedule::router(&base))
        .merge(backups::router(&base))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(root))
        .route(&base, get(app_page))
        .route(&format!("{base}/"), get(app_page))
        .merge(auth::router(&base))
        .merge(protected)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), edge_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session::is_authenticated(state.store.as_ref(), &state.config, &headers).await? {
        return Ok(next.run(request).await);
    }
    Ok(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

async fn app_page(State(state): State<AppState>) -> Html<String> {
    pages::app_page(&state.config)
}

/// The bare domain shows the not-found page so the app path stays unadvertised.
async fn root(State(state): State<AppState>) -> Html<String> {
    pages::not_found_page(state.config.locale)
}

async fn not_found(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, pages::not_found_page(state.config.locale))
}

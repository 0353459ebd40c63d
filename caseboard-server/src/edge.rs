//! Checks that run before routing: HTTPS upgrade and the region allow-list.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;

pub async fn edge_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();

    if state.config.force_https && forwarded_proto(headers) == Some("http") {
        if let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
            let path = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            let location = format!("https://{host}{path}");
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }
    }

    if let Some(country) = headers.get("cf-ipcountry").and_then(|v| v.to_str().ok()) {
        if !state.config.allows_country(country) {
            debug!(country = %country, "rejecting request from blocked region");
            return (StatusCode::FORBIDDEN, "Access Denied").into_response();
        }
    }

    next.run(request).await
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok())
}

//! Login endpoint

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{ConnectInfo, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::routes::{AppError, error_response};
use crate::session::{self, LoginOutcome};
use crate::state::AppState;

/// A password is a few bytes; anything far larger is refused unread.
const LOGIN_BODY_LIMIT: usize = 16 * 1024;

pub fn router(base: &str) -> Router<AppState> {
    Router::new().route(&format!("{base}/api/login"), post(login))
}

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
}

/// POST /api/login - Exchange the password for a session cookie
async fn login(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let config = state.config.as_ref();
    let locale = config.locale;
    let store = state.store.as_ref();

    let (parts, body) = request.into_parts();
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = session::client_ip(&parts.headers, peer, config.trust_proxy_headers);
    let now = Utc::now();

    if let Some(remaining) = session::active_lock(store, config, &ip, now).await? {
        let message = locale.ip_locked(remaining.num_hours(), remaining.num_minutes() % 60);
        return Ok(error_response(StatusCode::FORBIDDEN, message));
    }

    let Ok(body) = to_bytes(body, LOGIN_BODY_LIMIT).await else {
        return Ok((StatusCode::BAD_REQUEST, locale.bad_request()).into_response());
    };
    let Ok(request) = serde_json::from_slice::<LoginRequest>(&body) else {
        return Ok((StatusCode::BAD_REQUEST, locale.bad_request()).into_response());
    };

    let response = match session::attempt_login(store, config, &ip, &request.password, now).await? {
        LoginOutcome::LoggedIn { token, expires } => {
            let cookie = session::session_cookie(config, &token, expires);
            ([(header::SET_COOKIE, cookie)], Json(LoginResponse { success: true })).into_response()
        }
        LoginOutcome::Rejected { remaining_attempts } => {
            error_response(StatusCode::UNAUTHORIZED, locale.wrong_password(remaining_attempts))
        }
        LoginOutcome::LockedOut => {
            error_response(StatusCode::FORBIDDEN, locale.too_many_attempts(config.lockout_secs / 3600))
        }
    };

    Ok(response)
}

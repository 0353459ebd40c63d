//! Login sessions and per-IP lockout.
//!
//! A session is a random token stored as `session:<token>` with a TTL and
//! handed to the browser in a cookie. Failed logins are counted per client IP;
//! reaching the limit writes a lock record that blocks the IP until it expires.

use axum::http::HeaderMap;
use caseboard_core::store::{get_json, put_json_expiring};
use caseboard_core::{KvStore, ScheduleResult};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ServerConfig;

const SESSION_VALUE: &str = "valid";
const ATTEMPTS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const UNKNOWN_IP: &str = "unknown-ip";

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

fn attempts_key(ip: &str) -> String {
    format!("login_attempts:{ip}")
}

fn lock_key(ip: &str) -> String {
    format!("login_lock:{ip}")
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LoginAttempts {
    count: u32,
    /// Unix seconds of the last failure
    #[serde(default)]
    timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct LoginLock {
    locked: bool,
    /// Unix seconds when the lock was set
    timestamp: i64,
}

#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    LoggedIn { token: String, expires: DateTime<Utc> },
    /// Wrong password, more tries left
    Rejected { remaining_attempts: u32 },
    /// Wrong password and this failure set the lock
    LockedOut,
}

/// Client address used for the login lockout.
///
/// With `trust_proxy_headers` the edge proxy's `CF-Connecting-IP`, then the
/// first `X-Forwarded-For` hop, wins over the socket peer. Without it only the
/// peer counts, so a client can't pick its own lockout key.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = header_str(headers, "cf-connecting-ip") {
            return ip.to_string();
        }
        if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
            if let Some(first) = forwarded.split(',').next() {
                return first.trim().to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_IP.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Time left on the lock for `ip`, if it is locked. An expired lock is removed.
pub async fn active_lock(
    store: &dyn KvStore,
    config: &ServerConfig,
    ip: &str,
    now: DateTime<Utc>,
) -> ScheduleResult<Option<TimeDelta>> {
    let Some(lock) = get_json::<LoginLock>(store, &lock_key(ip)).await? else {
        return Ok(None);
    };
    if !lock.locked {
        return Ok(None);
    }

    let lockout_secs = i64::try_from(config.lockout_secs).unwrap_or(i64::MAX);
    let remaining = lock.timestamp.saturating_add(lockout_secs) - now.timestamp();
    if remaining > 0 {
        return Ok(Some(TimeDelta::seconds(remaining)));
    }

    store.delete(&lock_key(ip)).await?;
    Ok(None)
}

/// Check `password` and update the failure bookkeeping for `ip`.
pub async fn attempt_login(
    store: &dyn KvStore,
    config: &ServerConfig,
    ip: &str,
    password: &str,
    now: DateTime<Utc>,
) -> ScheduleResult<LoginOutcome> {
    if password == config.password {
        let token = uuid::Uuid::new_v4().to_string();
        let ttl = config.session_ttl();
        let expires = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        store.put_expiring(&session_key(&token), SESSION_VALUE.to_string(), ttl).await?;
        store.delete(&attempts_key(ip)).await?;

        info!(ip = %ip, "login succeeded");
        return Ok(LoginOutcome::LoggedIn { token, expires });
    }

    let mut attempts = get_json::<LoginAttempts>(store, &attempts_key(ip))
        .await?
        .unwrap_or_default();
    attempts.count += 1;
    attempts.timestamp = now.timestamp();
    put_json_expiring(store, &attempts_key(ip), &attempts, ATTEMPTS_TTL).await?;

    if attempts.count >= config.max_login_attempts {
        let lock = LoginLock {
            locked: true,
            timestamp: now.timestamp(),
        };
        put_json_expiring(store, &lock_key(ip), &lock, config.lockout()).await?;

        warn!(ip = %ip, attempts = attempts.count, "too many failed logins, locking ip");
        return Ok(LoginOutcome::LockedOut);
    }

    warn!(ip = %ip, attempts = attempts.count, "login failed");
    Ok(LoginOutcome::Rejected {
        remaining_attempts: config.max_login_attempts - attempts.count,
    })
}

/// Whether the request's cookie names a live session.
pub async fn is_authenticated(store: &dyn KvStore, config: &ServerConfig, headers: &HeaderMap) -> ScheduleResult<bool> {
    let Some(token) = session_token(headers, &config.cookie_name) else {
        return Ok(false);
    };
    Ok(store.get(&session_key(token)).await?.as_deref() == Some(SESSION_VALUE))
}

fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let cookie_header = header_str(headers, "cookie")?;
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(config: &ServerConfig, token: &str, expires: DateTime<Utc>) -> String {
    format!(
        "{}={}; Expires={}; Path=/; HttpOnly; Secure; SameSite=Strict",
        config.cookie_name,
        token,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use caseboard_core::MemoryStore;
    use chrono::TimeZone;

    fn config() -> ServerConfig {
        ServerConfig::from_toml("password = \"secret\"").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 10, 12, 0, 0).unwrap()
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    fn peer() -> Option<SocketAddr> {
        Some(SocketAddr::from(([9, 9, 9, 9], 40000)))
    }

    #[test]
    fn test_client_ip_prefers_cloudflare_header() {
        let h = headers(&[("cf-connecting-ip", "1.1.1.1"), ("x-forwarded-for", "2.2.2.2")]);
        assert_eq!(client_ip(&h, peer(), true), "1.1.1.1");

        let h = headers(&[("x-forwarded-for", " 2.2.2.2 , 3.3.3.3")]);
        assert_eq!(client_ip(&h, peer(), true), "2.2.2.2");

        assert_eq!(client_ip(&HeaderMap::new(), peer(), true), "9.9.9.9");
        assert_eq!(client_ip(&HeaderMap::new(), None, true), "unknown-ip");
    }

    #[test]
    fn test_client_ip_ignores_headers_when_proxy_untrusted() {
        let h = headers(&[("cf-connecting-ip", "1.1.1.1"), ("x-forwarded-for", "2.2.2.2")]);
        assert_eq!(client_ip(&h, peer(), false), "9.9.9.9");
        assert_eq!(client_ip(&h, None, false), "unknown-ip");
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        let h = headers(&[("cookie", "theme=dark; caseboard_session_token=abc-123; other=1")]);
        assert_eq!(session_token(&h, "caseboard_session_token"), Some("abc-123"));

        let h = headers(&[("cookie", "caseboard_session_token=")]);
        assert_eq!(session_token(&h, "caseboard_session_token"), None);
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie(&config(), "tok", now());
        assert_eq!(
            cookie,
            "caseboard_session_token=tok; Expires=Fri, 10 Oct 2025 12:00:00 GMT; Path=/; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[tokio::test]
    async fn test_successful_login_creates_session() {
        let store = MemoryStore::new();
        let config = config();

        let outcome = attempt_login(&store, &config, "1.1.1.1", "secret", now()).await.unwrap();
        let LoginOutcome::LoggedIn { token, expires } = outcome else {
            panic!("expected login, got {outcome:?}");
        };
        assert_eq!(expires, now() + TimeDelta::days(7));

        let cookie = format!("caseboard_session_token={token}");
        let mut h = HeaderMap::new();
        h.insert("cookie", HeaderValue::from_str(&cookie).unwrap());
        assert!(is_authenticated(&store, &config, &h).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_authenticated() {
        let store = MemoryStore::new();
        let h = headers(&[("cookie", "caseboard_session_token=forged")]);
        assert!(!is_authenticated(&store, &config(), &h).await.unwrap());
        assert!(!is_authenticated(&store, &config(), &HeaderMap::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_failures_count_down_then_lock() {
        let store = MemoryStore::new();
        let config = config();
        let ip = "9.9.9.9";

        let first = attempt_login(&store, &config, ip, "nope", now()).await.unwrap();
        assert_eq!(first, LoginOutcome::Rejected { remaining_attempts: 2 });
        let second = attempt_login(&store, &config, ip, "nope", now()).await.unwrap();
        assert_eq!(second, LoginOutcome::Rejected { remaining_attempts: 1 });
        let third = attempt_login(&store, &config, ip, "nope", now()).await.unwrap();
        assert_eq!(third, LoginOutcome::LockedOut);

        let remaining = active_lock(&store, &config, ip, now() + TimeDelta::hours(1))
            .await
            .unwrap();
        assert_eq!(remaining, Some(TimeDelta::hours(23)));

        // other addresses are unaffected
        assert_eq!(active_lock(&store, &config, "1.1.1.1", now()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_lock_is_cleared() {
        let store = MemoryStore::new();
        let config = config();
        let ip = "9.9.9.9";
        for _ in 0..3 {
            attempt_login(&store, &config, ip, "nope", now()).await.unwrap();
        }

        let later = now() + TimeDelta::hours(25);
        assert_eq!(active_lock(&store, &config, ip, later).await.unwrap(), None);
        assert_eq!(store.get("login_lock:9.9.9.9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let store = MemoryStore::new();
        let config = config();
        let ip = "9.9.9.9";

        attempt_login(&store, &config, ip, "nope", now()).await.unwrap();
        attempt_login(&store, &config, ip, "secret", now()).await.unwrap();
        let next = attempt_login(&store, &config, ip, "nope", now()).await.unwrap();

        assert_eq!(next, LoginOutcome::Rejected { remaining_attempts: 2 });
    }
}

//! Server configuration at ~/.config/caseboard/server.toml
//!
//! ```toml
//! password = "change me"
//! bind = "0.0.0.0:8787"
//! app_path = "/schedule"
//! allowed_countries = ["HK", "TW", "CN"]
//! store_dir = "~/.local/share/caseboard"
//! ```
//!
//! Only `password` is required. `$CASEBOARD_CONFIG` points at another file.
//!
//! The server expects to sit behind Cloudflare or a similar proxy. With
//! `trust_proxy_headers` on (the default) the login lockout keys on
//! `CF-Connecting-IP` / `X-Forwarded-For`, which any client can set when the
//! bind address is reachable directly. Set it to `false` on an exposed bind to
//! key the lockout on the socket peer address instead. The HTTPS redirect and
//! the country gate read proxy headers too and are only meaningful behind one.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::messages::Locale;

const CONFIG_ENV: &str = "CASEBOARD_CONFIG";

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_app_path() -> String {
    "/schedule".to_string()
}

fn default_cookie_name() -> String {
    "caseboard_session_token".to_string()
}

fn default_max_login_attempts() -> u32 {
    3
}

fn default_lockout_secs() -> u64 {
    24 * 60 * 60
}

fn default_session_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_force_https() -> bool {
    true
}

fn default_trust_proxy_headers() -> bool {
    true
}

fn default_max_backups() -> usize {
    caseboard_core::MAX_BACKUP_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub password: String,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// Prefix every app route lives under, e.g. `/schedule`
    #[serde(default = "default_app_path")]
    pub app_path: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Two-letter codes from `CF-IPCountry`; unset lets every region in
    #[serde(default)]
    pub allowed_countries: Option<Vec<String>>,

    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Redirect requests the edge proxy marks as plain http
    #[serde(default = "default_force_https")]
    pub force_https: bool,

    /// Take the client IP from proxy headers rather than the socket peer
    #[serde(default = "default_trust_proxy_headers")]
    pub trust_proxy_headers: bool,

    #[serde(default)]
    pub locale: Locale,

    /// Directory for the file store; unset keeps everything in memory
    #[serde(default)]
    pub store_dir: Option<String>,

    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

impl ServerConfig {
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("caseboard");
        Ok(config_dir.join("server.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: ServerConfig = toml::from_str(content)?;

        if config.password.is_empty() {
            bail!("password must not be empty");
        }

        config.app_path = config.app_path.trim_end_matches('/').to_string();
        if !config.app_path.starts_with('/') {
            bail!("app_path must start with '/' and not be the site root");
        }

        if let Some(countries) = &mut config.allowed_countries {
            for code in countries.iter_mut() {
                *code = code.to_ascii_uppercase();
            }
        }

        Ok(config)
    }

    /// `store_dir` with `~` expanded.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }

    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn allows_country(&self, country: &str) -> bool {
        match &self.allowed_countries {
            Some(allowed) => allowed.iter().any(|code| code.eq_ignore_ascii_case(country)),
            None => true,
        }
    }
}

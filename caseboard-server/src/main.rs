mod config;
mod edge;
mod messages;
mod pages;
mod routes;
mod session;
mod singleton;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use caseboard_core::store::{FileStore, KvStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

/// How often expired sessions and lockout records are swept from the store
const PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseboard_server=info,caseboard_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;

    // The lock guard lives until main returns so no second process shares the store
    let (store, _lock) = match config.store_path() {
        Some(dir) => {
            let store = FileStore::open(&dir)
                .await
                .with_context(|| format!("Failed to open store at {}", dir.display()))?;
            let lock = singleton::acquire_lock(store.path())?;
            tracing::info!(path = %dir.display(), "using file store");
            let store: Arc<dyn KvStore> = Arc::new(store);
            (store, Some(lock))
        }
        None => {
            tracing::warn!("no store_dir configured, schedule will not survive a restart");
            let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    spawn_purge(store.clone());

    let bind = config.bind.clone();
    let app_path = config.app_path.clone();
    let app = routes::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!("caseboard-server listening on http://{bind}{app_path}");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

/// Periodically drop expired keys, including ones that are never read again.
fn spawn_purge(store: Arc<dyn KvStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "purged expired keys"),
                Err(e) => tracing::warn!(error = %e, "failed to purge expired keys"),
            }
        }
    });
}

use std::sync::Arc;

use caseboard_core::{BackupRing, KvStore, Schedule};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Sessions and lockout records live next to the schedule
    pub store: Arc<dyn KvStore>,
    pub schedule: Schedule,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn KvStore>) -> Self {
        let backups = BackupRing::with_capacity(store.clone(), config.max_backups);
        let schedule = Schedule::with_backups(store.clone(), backups);

        AppState {
            config: Arc::new(config),
            store,
            schedule,
        }
    }
}

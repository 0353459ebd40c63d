//! The current schedule and its history.

use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing::info;

use crate::backup::{BackupRing, BackupSummary};
use crate::error::ScheduleResult;
use crate::event::ScheduleRecord;
use crate::parser;
use crate::store::{KvStore, SCHEDULE_KEY, get_json, put_json};

/// Saves, loads and rolls back the single current `ScheduleRecord`.
#[derive(Clone)]
pub struct Schedule {
    store: Arc<dyn KvStore>,
    backups: BackupRing,
}

impl Schedule {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let backups = BackupRing::new(store.clone());
        Schedule { store, backups }
    }

    pub fn with_backups(store: Arc<dyn KvStore>, backups: BackupRing) -> Self {
        Schedule { store, backups }
    }

    pub fn backup_ring(&self) -> &BackupRing {
        &self.backups
    }

    /// The saved record, if anything has been saved yet.
    pub async fn current(&self) -> ScheduleResult<Option<ScheduleRecord>> {
        get_json(self.store.as_ref(), SCHEDULE_KEY).await
    }

    /// Parse `raw_text` against this year, make it current, then archive it.
    pub async fn save(&self, raw_text: String) -> ScheduleResult<ScheduleRecord> {
        self.save_in_year(raw_text, Local::now().year()).await
    }

    /// Like `save`, with short dates placed in `reference_year`.
    pub async fn save_in_year(&self, raw_text: String, reference_year: i32) -> ScheduleResult<ScheduleRecord> {
        let events = parser::parse(&raw_text, reference_year);
        let record = ScheduleRecord::new(raw_text, events);

        put_json(self.store.as_ref(), SCHEDULE_KEY, &record).await?;
        let snapshot = self.backups.archive(&record).await?;

        info!(events = record.events.len(), backup = %snapshot.id, "saved schedule");
        Ok(record)
    }

    /// Make the snapshot `id` current again and return it.
    ///
    /// The restored state is not archived on its own; the next save will be.
    pub async fn restore(&self, id: &str) -> ScheduleResult<ScheduleRecord> {
        let record = self.backups.restore(id).await?;
        put_json(self.store.as_ref(), SCHEDULE_KEY, &record).await?;

        info!(backup = %id, events = record.events.len(), "restored schedule");
        Ok(record)
    }

    pub async fn backups(&self) -> ScheduleResult<Vec<BackupSummary>> {
        self.backups.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_save_stores_record_and_archives_it() {
        let schedule = Schedule::new(Arc::new(MemoryStore::new()));
        let text = "2025年10月10日|13:30-20:00|陳大文|地點:大廈\n// note".to_string();

        let saved = schedule.save(text.clone()).await.unwrap();
        assert_eq!(saved.raw_text, text);
        assert_eq!(saved.events.len(), 1);

        assert_eq!(schedule.current().await.unwrap(), Some(saved.clone()));
        let backups = schedule.backups().await.unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(schedule.backup_ring().restore(&backups[0].id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_save_in_year_places_short_dates() {
        let schedule = Schedule::new(Arc::new(MemoryStore::new()));
        let saved = schedule
            .save_in_year("10月10日|13:30|王small|備註".to_string(), 2031)
            .await
            .unwrap();

        assert_eq!(saved.events[0].start.year(), 2031);
    }

    #[tokio::test]
    async fn test_current_is_none_before_first_save() {
        let schedule = Schedule::new(Arc::new(MemoryStore::new()));
        assert_eq!(schedule.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_overwrites_current_without_new_backup() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let ring = BackupRing::new(store.clone());
        let schedule = Schedule::with_backups(store.clone(), ring.clone());

        let old = ScheduleRecord::new("old", vec![]);
        ring.archive_at(&old, 1).await.unwrap();
        schedule.save("new".to_string()).await.unwrap();

        let restored = schedule.restore("1").await.unwrap();
        assert_eq!(restored, old);
        assert_eq!(schedule.current().await.unwrap(), Some(old));
        assert_eq!(ring.index().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_unknown_id_leaves_current_alone() {
        let schedule = Schedule::new(Arc::new(MemoryStore::new()));
        let saved = schedule.save("keep me".to_string()).await.unwrap();

        let result = schedule.restore("never-archived").await;
        assert!(matches!(result, Err(ScheduleError::BackupNotFound(_))));
        assert_eq!(schedule.current().await.unwrap(), Some(saved));
    }
}

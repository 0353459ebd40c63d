//! Bounded history of saved schedules.
//!
//! Every save is archived as an immutable snapshot under `backup:<id>`, and its
//! id is pushed onto the front of `backup_index`. The index holds at most
//! `capacity` ids; older snapshots are evicted together with their index
//! entries.
//!
//! The index update is a plain read-modify-write. Two archives running at the
//! same time can lose one of the new ids (the snapshot itself stays stored but
//! unlisted).

use std::sync::Arc;

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::ScheduleRecord;
use crate::store::{BACKUP_INDEX_KEY, KvStore, backup_key, get_json, put_json};

/// Default number of snapshots kept.
pub const MAX_BACKUP_COUNT: usize = 100;

/// Characters of raw text shown in a snapshot preview.
pub const PREVIEW_CHARS: usize = 100;

/// Zone used for the human-readable snapshot date.
pub const BACKUP_TIMEZONE: Tz = chrono_tz::Asia::Hong_Kong;

/// Day first, then a 12-hour clock behind a 上午/下午 marker, as zh-HK prints it.
const DATE_FORMAT: &str = "%d/%m/%Y";
const CLOCK_FORMAT: &str = "%I:%M:%S";
const PREVIEW_ELLIPSIS: &str = "...";

/// One archived schedule record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    /// `timestamp` as a string
    pub id: String,
    /// Unix milliseconds of the save
    pub timestamp: i64,
    /// `timestamp` rendered in `BACKUP_TIMEZONE`
    pub date: String,
    pub data: ScheduleRecord,
    pub preview: String,
}

/// What the history view shows for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub id: String,
    pub date: String,
    pub preview: String,
}

impl BackupSnapshot {
    pub fn new(data: ScheduleRecord, timestamp_millis: i64) -> Self {
        BackupSnapshot {
            id: timestamp_millis.to_string(),
            timestamp: timestamp_millis,
            date: format_backup_date(timestamp_millis),
            preview: preview_of(&data.raw_text),
            data,
        }
    }

    pub fn summary(&self) -> BackupSummary {
        BackupSummary {
            id: self.id.clone(),
            date: self.date.clone(),
            preview: self.preview.clone(),
        }
    }
}

fn format_backup_date(timestamp_millis: i64) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(timestamp_millis) else {
        return timestamp_millis.to_string();
    };

    let local = utc.with_timezone(&BACKUP_TIMEZONE);
    let meridiem = if local.hour() < 12 { "上午" } else { "下午" };
    format!("{} {}{}", local.format(DATE_FORMAT), meridiem, local.format(CLOCK_FORMAT))
}

fn preview_of(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }
    let mut preview: String = raw_text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(PREVIEW_ELLIPSIS);
    preview
}

/// Archive, list and restore snapshots in a `KvStore`.
#[derive(Clone)]
pub struct BackupRing {
    store: Arc<dyn KvStore>,
    capacity: usize,
}

impl BackupRing {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_capacity(store, MAX_BACKUP_COUNT)
    }

    /// A ring keeping `capacity` snapshots (at least one).
    pub fn with_capacity(store: Arc<dyn KvStore>, capacity: usize) -> Self {
        BackupRing {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Archive `record` stamped with the current time.
    pub async fn archive(&self, record: &ScheduleRecord) -> ScheduleResult<BackupSnapshot> {
        self.archive_at(record, chrono::Utc::now().timestamp_millis()).await
    }

    /// Archive `record` as a snapshot taken at `timestamp_millis`.
    ///
    /// A snapshot saved in the same millisecond as an existing one replaces it.
    pub async fn archive_at(&self, record: &ScheduleRecord, timestamp_millis: i64) -> ScheduleResult<BackupSnapshot> {
        let snapshot = BackupSnapshot::new(record.clone(), timestamp_millis);
        put_json(self.store.as_ref(), &backup_key(&snapshot.id), &snapshot).await?;

        let mut index = self.index().await?;
        index.insert(0, snapshot.id.clone());

        if index.len() <= self.capacity {
            put_json(self.store.as_ref(), BACKUP_INDEX_KEY, &index).await?;
            debug!(id = %snapshot.id, kept = index.len(), "archived schedule");
            return Ok(snapshot);
        }

        // The shortened index is written before anything is deleted: a failed
        // delete leaves an unlisted file, never a listed id without a file.
        let evicted = index.split_off(self.capacity);
        put_json(self.store.as_ref(), BACKUP_INDEX_KEY, &index).await?;

        for id in &evicted {
            if let Err(e) = self.store.delete(&backup_key(id)).await {
                warn!(id = %id, error = %e, "could not delete evicted backup, leaving it orphaned");
            }
        }

        debug!(id = %snapshot.id, evicted = evicted.len(), "archived schedule");
        Ok(snapshot)
    }

    /// Snapshot ids, newest first.
    pub async fn index(&self) -> ScheduleResult<Vec<String>> {
        Ok(get_json(self.store.as_ref(), BACKUP_INDEX_KEY).await?.unwrap_or_default())
    }

    pub async fn snapshot(&self, id: &str) -> ScheduleResult<Option<BackupSnapshot>> {
        get_json(self.store.as_ref(), &backup_key(id)).await
    }

    /// Summaries in index order. Ids whose snapshot is gone are skipped.
    pub async fn list(&self) -> ScheduleResult<Vec<BackupSummary>> {
        let mut summaries = Vec::new();
        for id in self.index().await? {
            match self.snapshot(&id).await? {
                Some(snapshot) => summaries.push(snapshot.summary()),
                None => debug!(id = %id, "backup index points at a missing snapshot"),
            }
        }
        Ok(summaries)
    }

    /// The record archived under `id`, unchanged.
    ///
    /// Only reads: the index is untouched and no new snapshot is taken.
    pub async fn restore(&self, id: &str) -> ScheduleResult<ScheduleRecord> {
        self.snapshot(id)
            .await?
            .map(|snapshot| snapshot.data)
            .ok_or_else(|| ScheduleError::BackupNotFound(id.to_string()))
    }
}

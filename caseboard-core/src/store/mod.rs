//! Key-value storage.
//!
//! Everything caseboard persists goes through `KvStore`: the current schedule,
//! the backup index, one snapshot per save, and the server's session and
//! lockout records. Stores offer plain last-write-wins semantics; there is no
//! compare-and-swap.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ScheduleResult;

/// Key of the current `ScheduleRecord`.
pub const SCHEDULE_KEY: &str = "schedule_data";

/// Key of the newest-first list of snapshot ids.
pub const BACKUP_INDEX_KEY: &str = "backup_index";

/// Key of one archived snapshot.
pub fn backup_key(id: &str) -> String {
    format!("backup:{id}")
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, or `None` if absent or expired
    async fn get(&self, key: &str) -> ScheduleResult<Option<String>>;

    /// Store `value` under `key` without expiry, replacing any previous value
    async fn put(&self, key: &str, value: String) -> ScheduleResult<()>;

    /// Store `value` under `key`; reads return `None` once `ttl` has passed
    async fn put_expiring(&self, key: &str, value: String, ttl: Duration) -> ScheduleResult<()>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> ScheduleResult<()>;

    /// Remove every expired entry, including ones nobody reads again.
    /// Returns how many were removed.
    async fn purge_expired(&self) -> ScheduleResult<usize>;
}

/// Read and decode a JSON value.
pub async fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> ScheduleResult<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value.
pub async fn put_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> ScheduleResult<()> {
    store.put(key, serde_json::to_string(value)?).await
}

/// Encode and store a JSON value that expires after `ttl`.
pub async fn put_json_expiring<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> ScheduleResult<()> {
    store.put_expiring(key, serde_json::to_string(value)?, ttl).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_helpers_roundtrip_through_store() {
        let store = MemoryStore::new();
        put_json(&store, BACKUP_INDEX_KEY, &vec!["2", "1"]).await.unwrap();

        let index: Option<Vec<String>> = get_json(&store, BACKUP_INDEX_KEY).await.unwrap();
        assert_eq!(index, Some(vec!["2".to_string(), "1".to_string()]));

        let missing: Option<Vec<String>> = get_json(&store, "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_json_reports_corrupt_values() {
        let store = MemoryStore::new();
        store.put(BACKUP_INDEX_KEY, "not json".to_string()).await.unwrap();

        let result: ScheduleResult<Option<Vec<String>>> = get_json(&store, BACKUP_INDEX_KEY).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_backup_key_format() {
        assert_eq!(backup_key("1760000000000"), "backup:1760000000000");
    }
}

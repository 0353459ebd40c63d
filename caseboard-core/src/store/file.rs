//! Directory-backed store: one JSON file per key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::KvStore;
use crate::error::ScheduleResult;

const FILE_EXTENSION: &str = "json";

/// On-disk wrapper around a stored value.
#[derive(Serialize, Deserialize)]
struct Envelope {
    value: String,
    /// Unix seconds after which the value reads as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
}

impl Envelope {
    fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| now_secs >= at)
    }
}

/// A `KvStore` that keeps each key in its own file under a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a reader
/// never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> ScheduleResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(FileStore { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{FILE_EXTENSION}", encode_key(key)))
    }

    async fn write(&self, key: &str, envelope: &Envelope) -> ScheduleResult<()> {
        let path = self.path_for(key);
        let temp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

        tokio::fs::write(&temp, serde_json::to_vec(envelope)?).await?;
        tokio::fs::rename(&temp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> ScheduleResult<Option<String>> {
        let content = match tokio::fs::read(self.path_for(key)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope = serde_json::from_slice(&content)?;
        if envelope.is_expired(Utc::now().timestamp()) {
            self.delete(key).await?;
            return Ok(None);
        }
        Ok(Some(envelope.value))
    }

    async fn put(&self, key: &str, value: String) -> ScheduleResult<()> {
        self.write(key, &Envelope { value, expires_at: None }).await
    }

    async fn put_expiring(&self, key: &str, value: String, ttl: Duration) -> ScheduleResult<()> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = Utc::now().timestamp().saturating_add(ttl_secs);
        self.write(key, &Envelope { value, expires_at: Some(expires_at) }).await
    }

    async fn delete(&self, key: &str) -> ScheduleResult<()> {
        remove_if_present(&self.path_for(key)).await
    }

    async fn purge_expired(&self) -> ScheduleResult<usize> {
        let now = Utc::now().timestamp();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }

            let content = match tokio::fs::read(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let Ok(envelope) = serde_json::from_slice::<Envelope>(&content) else {
                debug!(path = %path.display(), "skipping unreadable store file");
                continue;
            };

            if envelope.is_expired(now) {
                remove_if_present(&path).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

async fn remove_if_present(path: &Path) -> ScheduleResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Make a key safe to use as a file name. ASCII letters, digits, `-` and `_`
/// pass through; every other byte becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

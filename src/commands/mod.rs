pub mod backups;
pub mod export;
pub mod parse;
pub mod restore;
pub mod save;
pub mod show;
pub mod tidy;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use caseboard_core::{FileStore, Schedule};
use chrono::{Datelike, Local};
use tokio::io::AsyncReadExt;

const STDIN_PATH: &str = "-";

/// Open the schedule kept in `store_dir`, or in the user data directory.
pub async fn open_schedule(store_dir: Option<PathBuf>) -> Result<Schedule> {
    let dir = match store_dir {
        Some(dir) => dir,
        None => default_store_dir()?,
    };

    let store = FileStore::open(&dir)
        .await
        .with_context(|| format!("Failed to open schedule store at {}", dir.display()))?;
    Ok(Schedule::new(Arc::new(store)))
}

fn default_store_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data_dir.join("caseboard"))
}

/// Read a whole text file, with `-` meaning stdin.
pub async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Local::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schedule_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();

        let schedule = open_schedule(Some(dir.path().to_path_buf())).await.unwrap();
        save::run(&schedule, "10月10日|9:00|甲|一".to_string(), 2025).await.unwrap();

        let reopened = open_schedule(Some(dir.path().to_path_buf())).await.unwrap();
        let record = reopened.current().await.unwrap().unwrap();
        assert_eq!(record.events.len(), 1);
        assert_eq!(reopened.backups().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_unknown_backup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = open_schedule(Some(dir.path().to_path_buf())).await.unwrap();

        let err = restore::run(&schedule, "missing").await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_export_writes_calendar_file() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = open_schedule(Some(dir.path().join("store"))).await.unwrap();
        save::run(&schedule, "2025年10月10日|13:30-20:00|陳大文|大廈".to_string(), 2025)
            .await
            .unwrap();

        let out = dir.path().join("schedule.ics");
        export::run(&schedule, Some(&out)).await.unwrap();

        let ics = std::fs::read_to_string(&out).unwrap();
        assert!(ics.contains("DTSTART:20251010T133000"));
    }

    #[tokio::test]
    async fn test_format_write_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        std::fs::write(&path, "10月10日|9:00|甲|一\n\n\n10月11日|9:00|乙|二").unwrap();

        tidy::format(&path, true).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "10月10日 | 9:00 | 甲 | 一\n\n10月11日 | 9:00 | 乙 | 二");
    }

    #[test]
    fn test_year_or_current_prefers_explicit_year() {
        assert_eq!(year_or_current(Some(2031)), 2031);
        assert_eq!(year_or_current(None), Local::now().year());
    }
}

//! Core types for caseboard.
//!
//! This crate turns freeform, line-delimited appointment text into calendar
//! events and keeps a bounded history of saved schedules:
//! - `parser` converts raw text into `Event`s with a stable color per case
//! - `backup` archives saved records into a newest-first ring of snapshots
//! - `store` is the key-value seam both of them persist through
//! - `schedule` ties parsing, persistence and archival together

pub mod backup;
pub mod error;
pub mod event;
pub mod ics;
pub mod palette;
pub mod parser;
pub mod schedule;
pub mod store;
pub mod tidy;

pub use backup::{BackupRing, BackupSnapshot, BackupSummary, MAX_BACKUP_COUNT};
pub use error::{ScheduleError, ScheduleResult};
pub use event::{Event, ScheduleRecord};
pub use parser::{parse, parse_with};
pub use schedule::Schedule;
pub use store::{FileStore, KvStore, MemoryStore};

//! Schedule record and parsed event types.
//!
//! Field names serialize in camelCase so stored records keep the same JSON
//! shape the browser calendar reads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used for event start/end: local wall-clock time, no offset.
pub const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The single current schedule: the text the user typed plus what it parsed to.
///
/// `events` is always derived from `raw_text`; it is never edited on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub raw_text: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl ScheduleRecord {
    pub fn new(raw_text: impl Into<String>, events: Vec<Event>) -> Self {
        ScheduleRecord {
            raw_text: raw_text.into(),
            events,
        }
    }
}

/// One parsed appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// `event-<stamp>-<line index>`, unique within one parse
    pub id: String,
    pub title: String,
    #[serde(with = "local_iso")]
    pub start: NaiveDateTime,
    #[serde(with = "local_iso")]
    pub end: NaiveDateTime,
    /// Remaining fields of the source line joined with `" | "`
    pub details: String,
    /// Hex color from the case palette
    pub color: String,
    pub case_name: String,
    /// Date field exactly as written (trimmed)
    #[serde(default)]
    pub original_date: String,
    /// Time field exactly as written (trimmed)
    #[serde(default)]
    pub original_time: String,
}

mod local_iso {
    use super::LOCAL_ISO_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(LOCAL_ISO_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, LOCAL_ISO_FORMAT).map_err(serde::de::Error::custom)
    }
}

//! ICS export of parsed events.
//!
//! Times are written floating (no `Z`, no `TZID`), matching the naive local
//! times the parser produces.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component};

use crate::event::Event;

const ICS_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Property carrying the raw case name, so grouping survives a round trip.
pub const CASE_PROPERTY: &str = "X-CASEBOARD-CASE";

/// Build one VCALENDAR holding every event.
pub fn export(events: &[Event]) -> String {
    export_at(events, Utc::now())
}

/// Like `export`, with `DTSTAMP` set to `stamp`.
pub fn export_at(events: &[Event], stamp: DateTime<Utc>) -> String {
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}@caseboard", event.id));
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.summary(&event.title);
        ics_event.add_property("DTSTART", event.start.format(ICS_DATETIME_FORMAT).to_string());
        ics_event.add_property("DTEND", event.end.format(ICS_DATETIME_FORMAT).to_string());

        if !event.details.is_empty() {
            ics_event.description(&event.details);
        }

        ics_event.add_property("COLOR", &event.color);
        ics_event.add_property(CASE_PROPERTY, &event.case_name);

        cal.push(ics_event.done());
    }

    strip_ics_bloat(&cal.done().to_string())
}

/// Replace the library PRODID and drop the default CALSCALE.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:CASEBOARD\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_with;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_export_writes_floating_times() {
        let events = parse_with("2025年10月10日|13:30-20:00|陳大文|大廈", 2025, 42);
        let ics = export_at(&events, stamp());

        assert!(ics.contains("DTSTART:20251010T133000\r\n"), "ICS:\n{ics}");
        assert!(ics.contains("DTEND:20251010T200000\r\n"), "ICS:\n{ics}");
        assert!(ics.contains("UID:event-42-0@caseboard"), "ICS:\n{ics}");
        assert!(ics.contains("X-CASEBOARD-CASE:陳大文"), "ICS:\n{ics}");
        assert!(ics.contains("PRODID:CASEBOARD"), "ICS:\n{ics}");
        assert!(!ics.contains("CALSCALE"), "ICS:\n{ics}");
    }

    #[test]
    fn test_export_one_vevent_per_event() {
        let text = "10月10日|9:00|甲|一\n10月11日|9:00|乙|二\n// skipped";
        let events = parse_with(text, 2025, 1);
        let ics = export_at(&events, stamp());

        let count = ics.lines().filter(|l| *l == "BEGIN:VEVENT").count();
        assert_eq!(count, 2, "ICS:\n{ics}");
    }

    #[test]
    fn test_export_empty_schedule_is_valid_calendar() {
        let ics = export_at(&[], stamp());
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    }
}

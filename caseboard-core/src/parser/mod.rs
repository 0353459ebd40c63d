//! Freeform schedule text parsing.
//!
//! Each non-comment line is one appointment:
//!
//! ```text
//! 2025年10月10日 | 13:30-20:00 | 陳大文 | 地點:大廈
//! 10月11日，9:00，王小明，覆診，帶文件
//! ```
//!
//! Fields are separated by `|`, `｜`, `,` or `，`. Field 0 is the date, 1 the
//! time, 2 the case name, and everything after becomes the details. Lines that
//! don't fit are skipped without complaint.

pub mod date;
pub mod time;

use chrono::{TimeDelta, Utc};

use crate::event::Event;
use crate::palette::CaseColors;

use self::date::parse_date;
use self::time::{DEFAULT_DURATION_HOURS, TimeSpec, parse_time};

/// Prefix of every event title.
pub const TITLE_PREFIX: &str = "個案：";

/// Date, time, case name and at least one details field.
pub const MIN_FIELDS: usize = 4;

const COMMENT_MARKERS: [&str; 3] = ["--", "//", "#"];
const FIELD_DELIMITERS: [char; 4] = ['|', '｜', ',', '，'];

/// Parse `text` into events, stamping ids with the current time.
///
/// Short dates (`10月10日`) are placed in `reference_year`.
pub fn parse(text: &str, reference_year: i32) -> Vec<Event> {
    parse_with(text, reference_year, Utc::now().timestamp_millis())
}

/// Parse `text` into events with ids built from `stamp_millis`.
///
/// Colors are assigned per case name in order of first appearance and are
/// only stable within this one call.
pub fn parse_with(text: &str, reference_year: i32, stamp_millis: i64) -> Vec<Event> {
    let mut colors = CaseColors::new();
    let mut events = Vec::new();

    for (index, line) in kept_lines(text).enumerate() {
        if let Some(event) = parse_line(line, index, reference_year, stamp_millis, &mut colors) {
            events.push(event);
        }
    }

    events
}

/// Trimmed lines that are neither blank nor comments, in input order.
pub fn kept_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_comment(line))
}

/// `-- heading --`, `// note` and `# note` lines never become events.
pub fn is_comment(trimmed: &str) -> bool {
    COMMENT_MARKERS.iter().any(|marker| trimmed.starts_with(marker))
}

/// Split on every accepted delimiter and trim each field.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(&FIELD_DELIMITERS[..]).map(str::trim).collect()
}

fn parse_line(
    line: &str,
    index: usize,
    reference_year: i32,
    stamp_millis: i64,
    colors: &mut CaseColors,
) -> Option<Event> {
    let fields = split_fields(line);
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let (date_field, time_field, case_name) = (fields[0], fields[1], fields[2]);

    // Claimed before any other check: a case whose first line is malformed,
    // and even an empty case name, still holds its slot.
    let color = colors.color_for(case_name);
    if case_name.is_empty() {
        return None;
    }

    let date = parse_date(date_field, reference_year)?;
    let spec = parse_time(time_field)?;

    let start_time = spec.start();
    let start = date.at(start_time.hour, start_time.minute)?;
    let end = match spec {
        TimeSpec::Range { end, .. } => date.at(end.hour, end.minute)?,
        TimeSpec::Start(_) => start.checked_add_signed(TimeDelta::hours(DEFAULT_DURATION_HOURS))?,
    };

    Some(Event {
        id: format!("event-{stamp_millis}-{index}"),
        title: format!("{TITLE_PREFIX}{case_name}"),
        start,
        end,
        details: fields[3..].join(" | "),
        color: color.to_string(),
        case_name: case_name.to_string(),
        original_date: date_field.to_string(),
        original_time: time_field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use chrono::{NaiveDate, NaiveDateTime};

    const STAMP: i64 = 1_760_000_000_000;

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_full_date_with_range() {
        let events = parse_with("2025年10月10日|13:30-20:00|陳大文|地點:大廈", 2030, STAMP);

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.start, ymd_hm(2025, 10, 10, 13, 30));
        assert_eq!(event.end, ymd_hm(2025, 10, 10, 20, 0));
        assert_eq!(event.case_name, "陳大文");
        assert_eq!(event.title, "個案：陳大文");
        assert_eq!(event.details, "地點:大廈");
        assert_eq!(event.color, PALETTE[0]);
        assert_eq!(event.id, format!("event-{STAMP}-0"));
        assert_eq!(event.original_date, "2025年10月10日");
        assert_eq!(event.original_time, "13:30-20:00");
    }

    #[test]
    fn test_short_date_uses_reference_year_and_default_duration() {
        let events = parse_with("10月10日|13:30|王small|備註", 2027, STAMP);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, ymd_hm(2027, 10, 10, 13, 30));
        assert_eq!(events[0].end - events[0].start, TimeDelta::hours(2));
    }

    #[test]
    fn test_default_duration_crosses_midnight_and_year() {
        let events = parse_with("12月31日|23:00|跨年|倒數", 2025, STAMP);

        assert_eq!(events[0].start, ymd_hm(2025, 12, 31, 23, 0));
        assert_eq!(events[0].end, ymd_hm(2026, 1, 1, 1, 0));
    }

    #[test]
    fn test_three_fields_never_parse() {
        for line in [
            "10月10日|13:30|陳大文",
            "10月10日,13:30,陳大文",
            "10月10日｜13:30，陳大文",
            "10月10日，13:30|陳大文",
        ] {
            assert!(parse_with(line, 2025, STAMP).is_empty(), "line parsed: {line}");
        }
    }

    #[test]
    fn test_mixed_delimiters_are_all_accepted() {
        let events = parse_with("10月10日｜13:30，陳大文,覆診|帶文件", 2025, STAMP);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].case_name, "陳大文");
        assert_eq!(events[0].details, "覆診 | 帶文件");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let events = parse_with("  10月10日 | 13:30 - 15:00 |  陳大文  | 地點 ", 2025, STAMP);

        assert_eq!(events[0].case_name, "陳大文");
        assert_eq!(events[0].details, "地點");
        assert_eq!(events[0].end, ymd_hm(2025, 10, 10, 15, 0));
    }

    #[test]
    fn test_empty_details_field_still_counts() {
        let events = parse_with("10月10日|13:30|陳大文|", 2025, STAMP);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details, "");
    }

    #[test]
    fn test_comment_and_blank_lines_are_skipped() {
        let text = "\
-- 10月10日|13:30|陳大文|備註 --
// 10月10日|13:30|陳大文|備註
# 10月10日|13:30|陳大文|備註

   \t
10月11日|9:00|李四|覆診";

        let events = parse_with(text, 2025, STAMP);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].case_name, "李四");
        assert_eq!(events[0].id, format!("event-{STAMP}-0"));
    }

    #[test]
    fn test_malformed_lines_are_dropped_silently() {
        let text = "\
明天|13:30|陳大文|備註
10月10日|全日|陳大文|備註
10月10日|13:30||備註
just some notes
10月12日|10:00|李四|覆診";

        let events = parse_with(text, 2025, STAMP);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].case_name, "李四");
        // index counts every kept line, not only the ones that parsed
        assert_eq!(events[0].id, format!("event-{STAMP}-4"));
    }

    #[test]
    fn test_calendar_invalid_values_roll_over() {
        let events = parse_with("2025年2月30日|25:00|陳大文|備註", 2025, STAMP);

        assert_eq!(events[0].start, ymd_hm(2025, 3, 3, 1, 0));
        assert_eq!(events[0].end, ymd_hm(2025, 3, 3, 3, 0));
    }

    #[test]
    fn test_range_end_stays_on_start_date() {
        let events = parse_with("10月10日|22:00-01:00|夜更|備註", 2025, STAMP);

        assert_eq!(events[0].start, ymd_hm(2025, 10, 10, 22, 0));
        assert_eq!(events[0].end, ymd_hm(2025, 10, 10, 1, 0));
    }

    #[test]
    fn test_same_case_shares_color_and_distinct_cases_differ() {
        let text = "\
10月10日|13:30|陳大文|一
10月11日|13:30|李四|二
10月12日|13:30|陳大文|三";

        let events = parse_with(text, 2025, STAMP);
        assert_eq!(events[0].color, events[2].color);
        assert_ne!(events[0].color, events[1].color);
    }

    #[test]
    fn test_colors_cycle_after_twenty_cases() {
        let text: String = (0..21)
            .map(|i| format!("10月10日|13:30|case-{i}|備註\n"))
            .collect();

        let events = parse_with(&text, 2025, STAMP);
        assert_eq!(events.len(), 21);
        assert_eq!(events[20].color, events[0].color);
        assert_ne!(events[19].color, events[0].color);
    }

    #[test]
    fn test_colors_follow_text_order_not_history() {
        let first = parse_with("10月10日|13:30|甲|一\n10月10日|15:30|乙|二", 2025, STAMP);
        let reordered = parse_with("10月10日|15:30|乙|二\n10月10日|13:30|甲|一", 2025, STAMP);

        assert_eq!(first[0].case_name, "甲");
        assert_eq!(reordered[0].case_name, "乙");
        assert_eq!(first[0].color, reordered[0].color);
    }

    #[test]
    fn test_malformed_line_still_claims_color() {
        let text = "\
壞日期|13:30|甲|一
10月10日|13:30|乙|二";

        let events = parse_with(text, 2025, STAMP);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].color, PALETTE[1]);
    }

    #[test]
    fn test_empty_case_name_still_claims_color() {
        let text = "10月10日|13:30||x\n10月10日|13:30|甲|y";

        let events = parse_with(text, 2025, STAMP);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].case_name, "甲");
        assert_eq!(events[0].color, PALETTE[1]);
    }

    #[test]
    fn test_every_event_comes_from_a_single_line() {
        let text = "\
10月10日|13:30|陳大文|甲
-- 分隔 --
10月11日|9:00-10:00|李四|乙|丙";

        let events = parse_with(text, 2025, STAMP);
        let lines: Vec<&str> = kept_lines(text).collect();
        for event in &events {
            assert!(
                lines.iter().any(|line| line.contains(&event.case_name)
                    && line.contains(&event.original_date)
                    && event.details.split(" | ").all(|part| line.contains(part))),
                "event {:?} not traceable to one line",
                event.id
            );
        }
    }

    #[test]
    fn test_windows_line_endings() {
        let events = parse_with("10月10日|13:30|甲|一\r\n10月11日|13:30|乙|二\r\n", 2025, STAMP);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details, "一");
    }
}

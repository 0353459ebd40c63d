//! Text clean-up tools for the schedule editor.
//!
//! Both functions work on `|`-separated lines only and leave the text alone
//! when it is blank.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;

use crate::parser::date::parse_date;

static GROUP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--\s*(.+?)\s*--$").expect("valid group header regex"));

/// Fields a line needs before the tools treat it as an appointment.
const MIN_TIDY_FIELDS: usize = 3;

/// Normalize spacing.
///
/// - `-- heading --` lines get a blank line before and after
/// - appointment lines are re-joined with `" | "`; `|` lines with fewer than
///   three fields are removed
/// - runs of blank lines collapse to one
/// - anything else is trimmed and kept
pub fn format_text(content: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    let mut formatted: Vec<String> = Vec::new();
    let mut last_was_empty = false;

    for line in content.split('\n') {
        let trimmed = line.trim();

        if trimmed.starts_with("--") && trimmed.ends_with("--") {
            if !last_was_empty && !formatted.is_empty() {
                formatted.push(String::new());
            }
            formatted.push(trimmed.to_string());
            formatted.push(String::new());
            last_was_empty = true;
        } else if trimmed.contains('|') {
            let parts = pipe_fields(trimmed);
            if parts.len() >= MIN_TIDY_FIELDS {
                formatted.push(parts.join(" | "));
                last_was_empty = false;
            }
        } else if trimmed.is_empty() {
            if !last_was_empty {
                formatted.push(String::new());
                last_was_empty = true;
            }
        } else {
            formatted.push(trimmed.to_string());
            last_was_empty = false;
        }
    }

    formatted.join("\n")
}

/// Regroup appointment lines by case.
///
/// A `-- name --` header collects the appointment lines under it until the
/// next plain text line; lines outside any header are grouped by their case
/// name. Plain text lines move to the top. Groups are ordered by their
/// earliest date (then name) and lines inside a group by date. Short dates
/// are read in `reference_year`.
pub fn group_by_case(content: &str, reference_year: i32) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    let mut groups: IndexMap<String, Vec<&str>> = IndexMap::new();
    let mut others: Vec<&str> = Vec::new();
    let mut current_group: Option<String> = None;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = GROUP_HEADER.captures(trimmed) {
            current_group = Some(caps[1].to_string());
            continue;
        }

        if trimmed.contains('|') {
            let parts = pipe_fields(trimmed);
            if parts.len() >= MIN_TIDY_FIELDS {
                let key = current_group.clone().unwrap_or_else(|| parts[2].to_string());
                groups.entry(key).or_default().push(trimmed);
            }
        } else {
            others.push(trimmed);
            current_group = None;
        }
    }

    let mut result: Vec<String> = others.iter().map(|line| line.to_string()).collect();
    if !others.is_empty() {
        result.push(String::new());
    }

    let mut ordered: Vec<(String, Vec<&str>)> = groups.into_iter().collect();
    for (_, lines) in &mut ordered {
        lines.sort_by_key(|line| line_date(line, reference_year));
    }
    ordered.sort_by(|(name_a, lines_a), (name_b, lines_b)| {
        let earliest_a = lines_a.first().map(|l| line_date(l, reference_year));
        let earliest_b = lines_b.first().map(|l| line_date(l, reference_year));
        earliest_a.cmp(&earliest_b).then_with(|| name_a.cmp(name_b))
    });

    let group_count = ordered.len();
    for (position, (name, lines)) in ordered.into_iter().enumerate() {
        if lines.len() > 1 || group_count > 1 {
            result.push(format!("-- {name} --"));
        }
        result.extend(lines.into_iter().map(str::to_string));
        if position + 1 < group_count {
            result.push(String::new());
        }
    }

    result.join("\n")
}

fn pipe_fields(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

/// Date of an appointment line for sorting; undated lines sort first.
fn line_date(line: &str, reference_year: i32) -> NaiveDateTime {
    let date_field = line.split('|').next().unwrap_or_default().trim();
    parse_date(date_field, reference_year)
        .and_then(|parts| parts.midnight())
        .unwrap_or_else(undated)
}

fn undated() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

//! Terminal rendering for caseboard types.
//!
//! Case names are drawn in the palette color the parser assigned them, so the
//! terminal view matches the browser calendar.

use caseboard_core::{BackupSummary, Event};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"));
        let case = paint(&self.case_name, &self.color);

        if self.details.is_empty() {
            format!("   {} {}", time, case)
        } else {
            format!("   {} {} {}", time, case, self.details.dimmed())
        }
    }
}

impl Render for BackupSummary {
    fn render(&self) -> String {
        let preview = self.preview.replace('\n', " ");
        format!("{} {}\n   {}", self.id.bold(), self.date.dimmed(), preview)
    }
}

/// Events sorted by start time under one heading per day.
pub fn render_events(events: &[Event]) -> String {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| event.start);

    let mut lines = Vec::new();
    let mut current_day = None;

    for event in sorted {
        let day = event.start.date();
        if current_day != Some(day) {
            if current_day.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("📅 {}", day.format("%Y-%m-%d (%a)")).bold().to_string());
            current_day = Some(day);
        }
        lines.push(event.render());
    }

    lines.join("\n")
}

/// Color `text` with a `#rrggbb` palette color, or leave it plain.
fn paint(text: &str, hex: &str) -> String {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::render_events;

pub fn run(text: &str, reference_year: i32, json: bool) -> Result<()> {
    let events = caseboard_core::parse(text, reference_year);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No appointments found".dimmed());
        return Ok(());
    }

    println!("{}", render_events(&events));
    Ok(())
}

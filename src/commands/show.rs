use anyhow::Result;
use caseboard_core::Schedule;
use owo_colors::OwoColorize;

use crate::render::render_events;

pub async fn run(schedule: &Schedule, json: bool) -> Result<()> {
    let Some(record) = schedule.current().await? else {
        println!("{}", "Nothing saved yet".dimmed());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else if record.events.is_empty() {
        println!("{}", "No appointments in the saved schedule".dimmed());
    } else {
        println!("{}", render_events(&record.events));
    }

    Ok(())
}

use std::path::Path;

use anyhow::{Context, Result};
use caseboard_core::{Schedule, ics};
use owo_colors::OwoColorize;

pub async fn run(schedule: &Schedule, output: Option<&Path>) -> Result<()> {
    let events = schedule
        .current()
        .await?
        .map(|record| record.events)
        .unwrap_or_default();
    let calendar = ics::export(&events);

    let Some(path) = output else {
        print!("{calendar}");
        return Ok(());
    };

    tokio::fs::write(path, calendar)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Exported {} events to {}", "✓".green(), events.len(), path.display());
    Ok(())
}

use anyhow::Result;
use caseboard_core::Schedule;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(schedule: &Schedule) -> Result<()> {
    let backups = schedule.backups().await?;

    if backups.is_empty() {
        println!("{}", "No backups yet".dimmed());
        return Ok(());
    }

    for backup in &backups {
        println!("{}", backup.render());
    }
    Ok(())
}

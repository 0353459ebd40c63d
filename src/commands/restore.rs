use anyhow::Result;
use caseboard_core::{Schedule, ScheduleError};
use owo_colors::OwoColorize;

pub async fn run(schedule: &Schedule, id: &str) -> Result<()> {
    match schedule.restore(id).await {
        Ok(record) => {
            println!(
                "{} Restored backup {} ({} appointments)",
                "✓".green(),
                id,
                record.events.len()
            );
            Ok(())
        }
        Err(ScheduleError::BackupNotFound(_)) => {
            anyhow::bail!("Backup '{id}' not found. Run `caseboard backups` to see saved backups.")
        }
        Err(e) => Err(e.into()),
    }
}

use anyhow::Result;
use caseboard_core::Schedule;
use owo_colors::OwoColorize;

pub async fn run(schedule: &Schedule, text: String, reference_year: i32) -> Result<()> {
    let record = schedule.save_in_year(text, reference_year).await?;

    let count = record.events.len();
    let noun = if count == 1 { "appointment" } else { "appointments" };
    println!("{} Saved {} {}", "✓".green(), count, noun);
    Ok(())
}

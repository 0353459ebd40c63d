use std::path::Path;

use anyhow::{Context, Result};
use caseboard_core::tidy;
use owo_colors::OwoColorize;

use super::{STDIN_PATH, read_input};

pub async fn format(path: &Path, write: bool) -> Result<()> {
    let text = read_input(path).await?;
    emit(path, &tidy::format_text(&text), write).await
}

pub async fn group(path: &Path, write: bool, reference_year: i32) -> Result<()> {
    let text = read_input(path).await?;
    emit(path, &tidy::group_by_case(&text, reference_year), write).await
}

async fn emit(path: &Path, result: &str, write: bool) -> Result<()> {
    if !write {
        println!("{result}");
        return Ok(());
    }

    if path.as_os_str() == STDIN_PATH {
        anyhow::bail!("--write needs a file, not stdin");
    }

    tokio::fs::write(path, result)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Rewrote {}", "✓".green(), path.display());
    Ok(())
}

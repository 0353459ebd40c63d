mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "caseboard")]
#[command(about = "Parse, save and roll back freeform appointment schedules")]
struct Cli {
    /// Schedule store directory (defaults to the user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schedule file without saving it
    Parse {
        /// Text file to parse, or "-" for stdin
        file: PathBuf,

        /// Print the events as JSON
        #[arg(long)]
        json: bool,

        /// Year for dates written without one (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Save a schedule file as the current schedule and archive it
    Save {
        /// Text file to save, or "-" for stdin
        file: PathBuf,

        /// Year for dates written without one (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show the current schedule
    Show {
        /// Print the whole record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved backups, newest first
    Backups,
    /// Make a backup the current schedule again
    Restore {
        /// Backup id as shown by `caseboard backups`
        id: String,
    },
    /// Normalize spacing in a schedule file
    Format {
        file: PathBuf,

        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },
    /// Regroup a schedule file by case
    Group {
        file: PathBuf,

        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,

        /// Year for dates written without one (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Export the current schedule as an .ics file
    Export {
        /// Output path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, json, year } => {
            let text = commands::read_input(&file).await?;
            commands::parse::run(&text, commands::year_or_current(year), json)
        }
        Commands::Save { file, year } => {
            let text = commands::read_input(&file).await?;
            let schedule = commands::open_schedule(cli.store).await?;
            commands::save::run(&schedule, text, commands::year_or_current(year)).await
        }
        Commands::Show { json } => {
            let schedule = commands::open_schedule(cli.store).await?;
            commands::show::run(&schedule, json).await
        }
        Commands::Backups => {
            let schedule = commands::open_schedule(cli.store).await?;
            commands::backups::run(&schedule).await
        }
        Commands::Restore { id } => {
            let schedule = commands::open_schedule(cli.store).await?;
            commands::restore::run(&schedule, &id).await
        }
        Commands::Format { file, write } => commands::tidy::format(&file, write).await,
        Commands::Group { file, write, year } => {
            commands::tidy::group(&file, write, commands::year_or_current(year)).await
        }
        Commands::Export { output } => {
            let schedule = commands::open_schedule(cli.store).await?;
            commands::export::run(&schedule, output.as_deref()).await
        }
    }
}

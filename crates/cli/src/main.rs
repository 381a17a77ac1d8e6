//! paperscope CLI — the main entry point.
//!
//! Commands:
//! - `init`   — Write default config & research interests skeleton
//! - `run`    — Run the triage pipeline for a date (re-invocable)
//! - `status` — Show per-stage cache state for a date
//! - `show`   — Print a day's report

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "paperscope",
    about = "paperscope — daily arXiv triage against your research interests",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the research interests file
    Init,

    /// Run the triage pipeline
    Run {
        /// Process this date instead of today (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Fetch and cache the dataset, then stop before any model call
        #[arg(long)]
        dry_run: bool,
    },

    /// Show per-stage cache state for a date
    Status {
        /// Date to inspect (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Print a day's report
    Show {
        /// Date of the report (defaults to the latest one)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Run { date, dry_run } => commands::run::run(date, dry_run).await?,
        Commands::Status { date } => commands::status::run(date).await?,
        Commands::Show { date } => commands::show::run(date).await?,
    }

    Ok(())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the Ecozync carbon calculator.
//!
//! ```text
//! ecozync survey [--user <id>]
//! ecozync calculate <file.json|file.toml> [--json]
//! ecozync history [--user <id>] [--limit 10]
//! ecozync stats --user <id> [--months 12]
//! ecozync clear
//! ecozync serve
//! ```
//!
//! Running `ecozync` with no subcommand enters interactive mode.
//!
//! Without `--user`, results are kept in the anonymous on-device cache
//! (`ECOZYNC_CACHE_DIR`, default `data/anonymous`). With a user they are
//! saved to the history database (`ECOZYNC_DB_PATH`).

mod commands;
mod interactive;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ecozync", about = "Estimate and track your carbon footprint")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the survey and calculate your footprint
    Survey {
        /// Save the result to this user's history
        #[arg(long)]
        user: Option<String>,
    },
    /// Calculate a footprint from a JSON or TOML answers file
    Calculate {
        /// Assessment or survey response file
        file: PathBuf,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show saved calculations
    History {
        /// User whose history to show (defaults to this device's history)
        #[arg(long)]
        user: Option<String>,
        /// Maximum number of calculations to show
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Show statistics over a user's history
    Stats {
        /// User whose history to summarize
        #[arg(long)]
        user: String,
        /// Trend window in months
        #[arg(long, default_value = "12")]
        months: u32,
    },
    /// Delete anonymous data stored on this device
    Clear,
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Survey { user } => commands::survey(user.as_deref()).await?,
        Commands::Calculate { file, json } => commands::calculate_file(&file, json)?,
        Commands::History { user, limit } => commands::history(user.as_deref(), limit).await?,
        Commands::Stats { user, months } => commands::stats(&user, months).await?,
        Commands::Clear => commands::clear()?,
        Commands::Serve => commands::serve().await?,
    }

    Ok(())
}

//! asvs-resources CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ClearCommand, DownloadCommand, PathCommand, StatusCommand};

#[derive(Parser)]
#[command(name = "asvs-resources")]
#[command(version)]
#[command(about = "Download and manage ASVS compliance resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show resource cache status
    Status,
    /// Download missing resources
    Download {
        /// Re-download resources even if they are already cached
        #[arg(long)]
        force: bool,
        /// Suppress progress output
        #[arg(long, short)]
        quiet: bool,
    },
    /// Clear cached resources
    Clear,
    /// Print the resolved directory for a resource type
    Path {
        /// Resource type (e.g. `templates`, `core_reference`)
        resource_type: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => StatusCommand::execute(),
        Commands::Download { force, quiet } => {
            let cmd = DownloadCommand::new(force, quiet);
            cmd.execute()
        }
        Commands::Clear => ClearCommand::execute(),
        Commands::Path { resource_type } => {
            let cmd = PathCommand::new(resource_type);
            cmd.execute()
        }
    }
}

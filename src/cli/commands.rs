use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sitrep")]
#[command(version, about = "Turns status-report decks into a queryable team record store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the report database
    #[arg(long, global = true, default_value = "sitrep.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse every report document in a directory and load it into the store
    Migrate {
        /// Directory containing report documents
        #[arg(value_name = "DIR")]
        reports_dir: PathBuf,
    },

    /// Parse a single document and print the extracted report
    Parse {
        /// Report document to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load one report from pre-parsed JSON
    Ingest {
        /// JSON file containing a parsed report
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Replace the stored report if one exists for the same period-end date
        #[arg(long)]
        replace: bool,
    },

    /// Show one stored report with all nested data
    Show {
        /// Period-end date (YYYY-MM-DD)
        #[arg(value_name = "DATE")]
        date: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute store statistics and summarize what is persisted
    Validate,
}

//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// idfeed CLI
#[derive(Parser, Debug)]
#[command(name = "idfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream all identifiers from the endpoint, one per line
    Export {
        /// Base URL of the REST API (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,

        /// Path of the identifiers endpoint
        #[arg(long)]
        path: Option<String>,

        /// Maximum calls per second
        #[arg(long)]
        rate: Option<u32>,

        /// Queue capacity (small values force backpressure)
        #[arg(long)]
        capacity: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file without contacting the server
    Validate,
}

//! CLI module
//!
//! Thin command-line glue around the retrieval subsystem.
//!
//! # Commands
//!
//! - `export` - Stream all identifiers from the endpoint to stdout or a file
//! - `validate` - Check a configuration file without contacting the server

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

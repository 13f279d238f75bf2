//! PeritoAI CLI library.
//!
//! Argument parsing, per-user settings, command execution and output
//! formatting for the `perito` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{OutputFormat, Settings};
pub use error::{CliError, Result};
pub use output::Formatter;

//! CLI module for aeroproxy
//!
//! Provides command-line interface for:
//! - check: validate a schema directory
//! - describe: print one class schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, describe, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};

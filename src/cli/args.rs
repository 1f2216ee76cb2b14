//! CLI argument definitions using clap
//!
//! Commands:
//! - aeroproxy check --dir <path>
//! - aeroproxy describe --dir <path> --class <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aeroproxy - schema tooling for object proxies
#[derive(Parser, Debug)]
#[command(name = "aeroproxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every schema file and print the descriptor tables
    Check {
        /// Directory holding schema_<class>.json files
        #[arg(long, default_value = "./schemas")]
        dir: PathBuf,
    },

    /// Print one class schema as JSON
    Describe {
        /// Directory holding schema_<class>.json files
        #[arg(long, default_value = "./schemas")]
        dir: PathBuf,

        /// Class to describe
        #[arg(long)]
        class: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

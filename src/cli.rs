//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for deeplinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// deeplinker - Deep link generation for edited documents
#[derive(Parser)]
#[command(name = "deeplinker")]
#[command(version)]
#[command(about = "Derive long or short deep links for documents", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a link for a document
    ///
    /// Usage: generate <DOCUMENT_JSON> [--shorten | --long] [--value <LINK>]
    /// - Without --value the link is generated automatically
    /// - With --value the existing link decides the default mode
    Generate {
        /// Path to the document JSON file ("-" for stdin)
        document: String,

        /// Force a remote short link
        #[arg(long, conflicts_with = "long")]
        shorten: bool,

        /// Force a local long link
        #[arg(long)]
        long: bool,

        /// Existing link value of the field
        #[arg(long)]
        value: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Requested mode override: `Some(true)` short, `Some(false)` long
    pub fn mode_override(shorten: bool, long: bool) -> Option<bool> {
        match (shorten, long) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

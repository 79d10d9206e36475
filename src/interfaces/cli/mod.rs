//! CLI interface module
//!
//! This module provides command-line interface functionality for deeplinker.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use commands::{config_generate, generate_link};

#[derive(Debug)]
pub enum CliError {
    ConfigError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::DeepLinkError> for CliError {
    fn from(err: crate::errors::DeepLinkError) -> Self {
        match err {
            crate::errors::DeepLinkError::Configuration(_) => {
                CliError::ConfigError(err.message().to_string())
            }
            crate::errors::DeepLinkError::Serialization(_) => {
                CliError::ParseError(err.message().to_string())
            }
            other => CliError::CommandError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Generate {
            document,
            shorten,
            long,
            value,
        } => generate_link(document, Commands::mode_override(shorten, long), value).await,

        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_generate(output_path, force).await
            }
        },
    }
}

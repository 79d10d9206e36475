//! Generate link command

use std::io::Read;
use std::sync::Arc;

use colored::Colorize;
use tracing::debug;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::link::{
    ChangeSink, Document, FieldOptions, LinkUpdateCoordinator, PatchEvent, UpdateOutcome,
};
use crate::sdk::BranchApiClient;

/// The CLI has no document store to patch, so proposed values are only logged
struct LoggingSink;

impl ChangeSink for LoggingSink {
    fn on_change(&self, patch: PatchEvent) {
        debug!("Field change proposed: {:?}", patch);
    }
}

fn read_document(source: &str) -> Result<Document, CliError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::CommandError(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| CliError::CommandError(format!("Failed to read {}: {}", source, e)))?
    };

    serde_json::from_str(&raw)
        .map_err(|e| CliError::ParseError(format!("Invalid document JSON: {}", e)))
}

pub async fn generate_link(
    document_path: String,
    mode_override: Option<bool>,
    value: Option<String>,
) -> Result<(), CliError> {
    let config = get_config();
    config.validate()?;

    let document = read_document(&document_path)?;
    let has_identity = document.identity().is_some();
    let sink = Arc::new(LoggingSink);
    let sdk = Arc::new(BranchApiClient::from_config(&config.link));
    let coordinator = LinkUpdateCoordinator::new(
        FieldOptions::from_config(&config),
        sdk,
        sink,
        value,
    );

    // 先调整模式再挂载，避免按旧模式多生成一次
    if let Some(shorten) = mode_override
        && shorten != coordinator.is_shortened()
    {
        coordinator.toggle_shorten().await;
    }

    let mut outcome = coordinator.mount(document).await;
    if outcome == UpdateOutcome::NotTriggered {
        outcome = coordinator.update().await;
    }

    let state = coordinator.snapshot();
    let mode = if state.shorten { "short" } else { "long" };

    match outcome {
        UpdateOutcome::Changed(link) => {
            println!(
                "{} Link generated ({}): {}",
                "✓".bold().green(),
                mode.cyan(),
                link.blue().underline()
            );
            if let Some(error) = state.error {
                println!("{} {}", "⚠".bold().yellow(), error.yellow());
            }
            Ok(())
        }
        UpdateOutcome::Unchanged => {
            println!(
                "{} Link unchanged ({}): {}",
                "ℹ".bold().blue(),
                mode.cyan(),
                state.value.unwrap_or_default().blue()
            );
            Ok(())
        }
        UpdateOutcome::Empty => {
            report_empty(has_identity, state.error)?;
            println!(
                "{} No link generated: document has no _id yet",
                "ℹ".bold().blue()
            );
            Ok(())
        }
        UpdateOutcome::Failed(e) => Err(e.into()),
        UpdateOutcome::Stale | UpdateOutcome::NotTriggered => Err(CliError::CommandError(
            format!("Link update did not complete (status: {})", state.status),
        )),
    }
}

/// 没有生成链接时：文档缺少 `_id` 不算错误，其余情况报告记录下的错误
fn report_empty(has_identity: bool, error: Option<String>) -> Result<(), CliError> {
    match error {
        Some(error) if has_identity => Err(CliError::ConfigError(error)),
        _ => Ok(()),
    }
}

//! Chat command handler.
//!
//! Answers the last turn of a conversation read from a JSON file with the
//! chat-read-retrieve-read strategy.

use super::{build_approach, parse_overrides, print_result};
use clap::Args;
use docent_approaches::{ApproachKind, ChatTurn};
use docent_core::{config::AppConfig, AppError, AppResult};
use std::path::{Path, PathBuf};

/// Answer the latest turn of a conversation
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// JSON file with `[{"user": ..., "bot": ...}, ..., {"user": ...}]`
    #[arg(long)]
    pub history: PathBuf,

    /// Per-request overrides as a JSON object
    #[arg(long)]
    pub overrides: Option<String>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let history = load_history(&self.history)?;
        tracing::debug!("Loaded {} turns from {:?}", history.len(), self.history);

        let overrides = parse_overrides(self.overrides.as_deref())?;
        let approach = build_approach(config, ApproachKind::ChatReadRetrieveRead)?;
        let result = approach.answer(&history, &overrides).await?;

        print_result(&result)
    }
}

fn load_history(path: &Path) -> AppResult<Vec<ChatTurn>> {
    let contents = std::fs::read_to_string(path)?;
    let history: Vec<ChatTurn> = serde_json::from_str(&contents).map_err(|e| {
        AppError::Request(format!("Invalid conversation file {:?}: {}", path, e))
    })?;

    if history.is_empty() {
        return Err(AppError::Request(format!(
            "Conversation file {:?} has no turns",
            path
        )));
    }
    Ok(history)
}

//! Ask command handler.
//!
//! Answers a single question with the retrieve-then-read or
//! read-decompose-ask strategy.

use super::{build_approach, parse_overrides, print_result};
use clap::Args;
use docent_approaches::{ApproachKind, ChatTurn};
use docent_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Ask a single question over the configured corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Strategy: rtr (retrieve-then-read) or rda (read-decompose-ask)
    #[arg(short, long, default_value = "rtr")]
    pub approach: String,

    /// Per-request overrides as a JSON object
    #[arg(long)]
    pub overrides: Option<String>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let kind = ApproachKind::parse(&self.approach)
            .ok_or_else(|| AppError::Config(format!("Unknown approach: {}", self.approach)))?;
        if kind == ApproachKind::ChatReadRetrieveRead {
            return Err(AppError::Config(
                "The chat approach needs a conversation; use `docent chat`".to_string(),
            ));
        }

        let question = self.question()?;
        let overrides = parse_overrides(self.overrides.as_deref())?;

        let approach = build_approach(config, kind)?;
        let result = approach
            .answer(&[ChatTurn::question(question)], &overrides)
            .await?;

        print_result(&result)
    }

    fn question(&self) -> AppResult<String> {
        let text = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(AppError::Config("No question provided".to_string()));
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Request("Question is empty".to_string()));
        }
        Ok(text.to_string())
    }
}

//! Prompts command handler.
//!
//! Lists the prompt definitions a workspace overrides.

use clap::Args;
use docent_core::{config::AppConfig, AppResult};
use docent_prompt::{list_prompts, load_prompt, PROMPTS_DIR};

/// List workspace prompt overrides
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    /// Execute the prompts command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let ids = list_prompts(&config.workspace)?;
        tracing::debug!("Found {} prompt definitions in {}", ids.len(), PROMPTS_DIR);

        let mut definitions = Vec::with_capacity(ids.len());
        for id in &ids {
            definitions.push(load_prompt(&config.workspace, id)?);
        }

        if self.json {
            let output: Vec<serde_json::Value> = definitions
                .iter()
                .map(|def| {
                    serde_json::json!({
                        "id": def.id,
                        "title": def.title,
                        "apiVersion": def.api_version,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if definitions.is_empty() {
            println!("No prompt overrides in {}", PROMPTS_DIR);
        } else {
            for def in &definitions {
                println!("{}\t{}", def.id, def.title);
            }
        }

        Ok(())
    }
}

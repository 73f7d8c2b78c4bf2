//! Retrieve-then-read: one search with the raw question, one completion.

use crate::approach::{Approach, ApproachKind};
use crate::completion::{CompletionInvoker, Sampling};
use crate::history::{current_question, ChatTurn};
use crate::overrides::Overrides;
use crate::passage::{data_points, join_passages};
use crate::prompts;
use crate::result::{html_lines, AnswerResult};
use crate::retriever::Retriever;
use docent_core::AppResult;
use docent_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1024;

/// Answers a single question from the top retrieved passages.
pub struct RetrieveThenRead {
    retriever: Retriever,
    completion: CompletionInvoker,
    template: PromptDefinition,
}

impl RetrieveThenRead {
    pub fn new(retriever: Retriever, completion: CompletionInvoker) -> Self {
        Self {
            retriever,
            completion,
            template: prompts::retrieve_then_read(),
        }
    }

    /// Use a different default template.
    pub fn with_template(mut self, template: PromptDefinition) -> Self {
        self.template = template;
        self
    }
}

#[async_trait::async_trait]
impl Approach for RetrieveThenRead {
    fn kind(&self) -> ApproachKind {
        ApproachKind::RetrieveThenRead
    }

    async fn answer(&self, history: &[ChatTurn], overrides: &Overrides) -> AppResult<AnswerResult> {
        let question = current_question(history)?;
        tracing::info!("Retrieve-then-read for question: {}", question);

        let passages = self.retriever.retrieve(question, overrides).await?;
        tracing::info!("Retrieved {} passages", passages.len());

        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("sources".to_string(), join_passages(&passages));

        let prompt = build_prompt(&self.template, &overrides.prompt_source(), variables)?;
        tracing::debug!("Prompt:\n{}", prompt.text);

        let sampling = Sampling::new(
            overrides.temperature_or(DEFAULT_TEMPERATURE),
            MAX_TOKENS,
            ["\n"],
        );
        let answer = self.completion.complete(&prompt.text, &sampling).await?;

        Ok(AnswerResult::new(
            answer,
            data_points(&passages),
            format!(
                "Question:<br>{}<br><br>Prompt:<br>{}",
                question,
                html_lines(&prompt.text)
            ),
        ))
    }
}

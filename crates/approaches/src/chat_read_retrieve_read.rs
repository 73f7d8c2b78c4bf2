//! Chat-read-retrieve-read: rewrite the conversation into a search query,
//! retrieve, then answer with the passages and the transcript.

use crate::approach::{Approach, ApproachKind};
use crate::completion::{CompletionInvoker, Sampling};
use crate::history::{current_question, linearize, ChatTurn, TokenBudget};
use crate::overrides::Overrides;
use crate::passage::{data_points, join_passages};
use crate::prompts;
use crate::result::{html_lines, AnswerResult};
use crate::retriever::Retriever;
use docent_core::AppResult;
use docent_prompt::{build_prompt, render_template, PromptDefinition};
use std::collections::HashMap;

const REWRITE_TEMPERATURE: f32 = 0.0;
const REWRITE_MAX_TOKENS: u32 = 32;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

/// Conversational strategy.
///
/// The query rewrite and the answer may run on different engines: the
/// rewrite uses `query_completion`, the answer `answer_completion`.
pub struct ChatReadRetrieveRead {
    retriever: Retriever,
    query_completion: CompletionInvoker,
    answer_completion: CompletionInvoker,
    budget: TokenBudget,
    query_template: PromptDefinition,
    answer_template: PromptDefinition,
}

impl ChatReadRetrieveRead {
    pub fn new(
        retriever: Retriever,
        query_completion: CompletionInvoker,
        answer_completion: CompletionInvoker,
        budget: TokenBudget,
    ) -> Self {
        Self {
            retriever,
            query_completion,
            answer_completion,
            budget,
            query_template: prompts::chat_query_rewrite(),
            answer_template: prompts::chat_answer(),
        }
    }

    pub fn with_templates(
        mut self,
        query_template: PromptDefinition,
        answer_template: PromptDefinition,
    ) -> Self {
        self.query_template = query_template;
        self.answer_template = answer_template;
        self
    }

    /// Search query for the current question, in the context of prior turns.
    async fn rewrite_query(&self, history: &[ChatTurn]) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert(
            "chat_history".to_string(),
            linearize(history, false, self.budget.max_chars()),
        );
        variables.insert("question".to_string(), current_question(history)?.to_string());

        let prompt = render_template(&self.query_template.template, &variables)?;
        let sampling = Sampling::new(REWRITE_TEMPERATURE, REWRITE_MAX_TOKENS, ["\n"]);
        let query = self.query_completion.complete(&prompt, &sampling).await?;

        Ok(query.trim().to_string())
    }
}

#[async_trait::async_trait]
impl Approach for ChatReadRetrieveRead {
    fn kind(&self) -> ApproachKind {
        ApproachKind::ChatReadRetrieveRead
    }

    async fn answer(&self, history: &[ChatTurn], overrides: &Overrides) -> AppResult<AnswerResult> {
        let question = current_question(history)?;
        tracing::info!(
            "Chat-read-retrieve-read over {} turns, question: {}",
            history.len(),
            question
        );

        let query = self.rewrite_query(history).await?;
        tracing::info!("Rewritten search query: {}", query);

        let passages = self.retriever.retrieve(&query, overrides).await?;
        tracing::info!("Retrieved {} passages", passages.len());

        let follow_up = if overrides.suggest_followup_questions {
            prompts::FOLLOW_UP_QUESTIONS
        } else {
            ""
        };

        let mut variables = HashMap::new();
        variables.insert("sources".to_string(), join_passages(&passages));
        variables.insert(
            "chat_history".to_string(),
            linearize(history, true, self.budget.max_chars()),
        );
        variables.insert("follow_up_questions_prompt".to_string(), follow_up.to_string());

        let prompt = build_prompt(&self.answer_template, &overrides.prompt_source(), variables)?;
        tracing::debug!("Prompt:\n{}", prompt.text);

        let sampling = Sampling::new(
            overrides.temperature_or(DEFAULT_TEMPERATURE),
            MAX_TOKENS,
            ["<|im_end|>", "<|im_start|>"],
        );
        let answer = self.answer_completion.complete(&prompt.text, &sampling).await?;

        Ok(AnswerResult::new(
            answer,
            data_points(&passages),
            format!(
                "Searched for:<br>{}<br><br>Prompt:<br>{}",
                query,
                html_lines(&prompt.text)
            ),
        ))
    }
}

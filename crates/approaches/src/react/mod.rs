//! Read-decompose-ask: a bounded reasoning loop that breaks a question into
//! Search and Lookup steps until it can finish with a cited answer.
//!
//! Each step sends the instructions, the worked examples, the question and
//! the scratchpad so far to the completion backend, which continues with a
//! thought and an action line. The action runs, its observation joins the
//! scratchpad, and the loop continues until a Finish action or the
//! iteration cap.

pub mod action;
pub mod prompt;
pub mod scratchpad;
pub mod trace;

use crate::approach::{Approach, ApproachKind};
use crate::completion::{CompletionInvoker, Sampling};
use crate::history::{current_question, ChatTurn};
use crate::overrides::Overrides;
use crate::passage::{data_points, join_passages, Passage};
use crate::prompts;
use crate::result::AnswerResult;
use crate::retriever::Retriever;
use action::{first_line, Action, Emitted, Tool};
use docent_core::AppResult;
use docent_prompt::PromptDefinition;
use scratchpad::{Scratchpad, Step};
use trace::Trace;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 256;

/// Characters of document content a Search observation keeps per hit.
pub const SEARCH_CONTENT_CAP: usize = 500;

/// Iterations allowed when configuration does not say otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

const NO_SEARCH_RESULTS: &str = "Keine Ergebnisse gefunden.";
const NO_ANSWER: &str = "Ich konnte die Frage nicht innerhalb der erlaubten Schritte beantworten.";

/// Replace round parentheses with square brackets so citations written as
/// `(doc.pdf)` read `[doc.pdf]`. Parentheses in the answer text are changed too.
pub fn square_citations(answer: &str) -> String {
    answer.replace('(', "[").replace(')', "]")
}

/// The iterative reasoning strategy.
pub struct ReadDecomposeAsk {
    retriever: Retriever,
    completion: CompletionInvoker,
    max_iterations: usize,
    prefix: PromptDefinition,
}

impl ReadDecomposeAsk {
    /// Search observations are capped at `SEARCH_CONTENT_CAP` characters of
    /// content per hit.
    pub fn new(retriever: Retriever, completion: CompletionInvoker) -> Self {
        Self {
            retriever: retriever.with_content_cap(SEARCH_CONTENT_CAP),
            completion,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            prefix: prompts::read_decompose_ask(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Use a different default instruction prefix.
    pub fn with_prefix(mut self, prefix: PromptDefinition) -> Self {
        self.prefix = prefix;
        self
    }

    /// Ask for step `n`. A completion without an action line is continued
    /// once with the action cue.
    async fn next_step(
        &self,
        step_prompt: &str,
        n: usize,
        sampling: &Sampling,
    ) -> AppResult<(String, Action)> {
        let output = self.completion.complete(step_prompt, sampling).await?;
        let emitted = Emitted::parse(&output);

        if let Some(action) = emitted.action {
            return Ok((emitted.thought, Action::parse(&action)));
        }

        tracing::debug!("Step {} named no action, asking for one", n);
        let separator = if output.starts_with(char::is_whitespace) {
            ""
        } else {
            " "
        };
        let retry_prompt = format!(
            "{}{}{}{}",
            step_prompt,
            separator,
            output.trim_end(),
            prompt::action_cue(n)
        );
        let retry = self.completion.complete(&retry_prompt, sampling).await?;

        Ok((emitted.thought, Action::parse(first_line(&retry))))
    }

    /// Run a tool. Search replaces `pool` with its passages.
    async fn observe(
        &self,
        action: &Action,
        overrides: &Overrides,
        pool: &mut Vec<Passage>,
    ) -> AppResult<String> {
        match action {
            Action::Call {
                tool: Tool::Search,
                input,
            } => {
                *pool = self.retriever.retrieve(input, overrides).await?;
                if pool.is_empty() {
                    Ok(NO_SEARCH_RESULTS.to_string())
                } else {
                    Ok(join_passages(pool))
                }
            }
            Action::Call {
                tool: Tool::Lookup,
                input,
            } => Ok(self
                .retriever
                .lookup(input)
                .await?
                .unwrap_or_else(|| format!("Kein Ergebnis für [{}] gefunden.", input))),
            Action::Call {
                tool: Tool::Finish,
                ..
            } => Ok(String::new()),
            Action::Unknown { tool, .. } => Ok(format!(
                "{} ist keine gültige Aktion. Verwenden Sie Suche[...], Nachschlagen[...] oder Fertig[...].",
                tool
            )),
            Action::Malformed(_) => Ok(
                "Die Aktion konnte nicht gelesen werden. Verwenden Sie Suche[...], Nachschlagen[...] oder Fertig[...]."
                    .to_string(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl Approach for ReadDecomposeAsk {
    fn kind(&self) -> ApproachKind {
        ApproachKind::ReadDecomposeAsk
    }

    async fn answer(&self, history: &[ChatTurn], overrides: &Overrides) -> AppResult<AnswerResult> {
        let question = current_question(history)?;
        tracing::info!(
            "Read-decompose-ask for question: {} (max {} steps)",
            question,
            self.max_iterations
        );

        let prefix = prompt::resolve_prefix(&self.prefix.template, &overrides.prompt_source());
        let base = prompt::base_prompt(&prefix, question);
        let temperature = overrides.temperature_or(DEFAULT_TEMPERATURE);

        let mut scratchpad = Scratchpad::default();
        let mut trace = Trace::default();
        let mut pool: Vec<Passage> = Vec::new();

        trace.push(format!("Frage: {}", question));

        for n in 1..=self.max_iterations {
            let step_prompt = format!("{}{}{}", base, scratchpad.render(), prompt::thought_cue(n));
            let sampling = Sampling::new(temperature, MAX_TOKENS, [prompt::observation_stop(n)]);

            let (thought, action) = self.next_step(&step_prompt, n, &sampling).await?;
            tracing::debug!("Step {}: {}", n, action);

            trace.push(format!("{} {}: {}", prompt::THOUGHT_LABEL, n, thought));
            trace.push(format!("{} {}: {}", prompt::ACTION_LABEL, n, action));

            if let Action::Call {
                tool: Tool::Finish,
                input,
            } = &action
            {
                tracing::info!("Finished after {} steps", n);
                let answer = square_citations(input);
                trace.push(format!("Antwort: {}", answer));
                return Ok(AnswerResult::new(answer, data_points(&pool), trace.render()));
            }

            let observation = self.observe(&action, overrides, &mut pool).await?;
            trace.push(format!(
                "{} {}: {}",
                prompt::OBSERVATION_LABEL,
                n,
                observation
            ));

            scratchpad.push(Step {
                thought,
                action,
                observation,
            });
        }

        tracing::warn!(
            "Reasoning loop stopped after {} steps without a final answer",
            self.max_iterations
        );

        let partial = scratchpad.last_thought().unwrap_or(NO_ANSWER);
        let answer = square_citations(partial);
        trace.push(format!(
            "Abgebrochen nach {} Schritten ohne abschließende Antwort.",
            self.max_iterations
        ));
        trace.push(format!("Antwort: {}", answer));

        Ok(AnswerResult::new(answer, data_points(&pool), trace.render()))
    }
}

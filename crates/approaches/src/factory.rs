//! Strategy factory.
//!
//! Builds an `Approach` from configuration and shared backends.

use crate::approach::{Approach, ApproachKind};
use crate::chat_read_retrieve_read::ChatReadRetrieveRead;
use crate::completion::CompletionInvoker;
use crate::prompts;
use crate::react::ReadDecomposeAsk;
use crate::retrieve_then_read::RetrieveThenRead;
use crate::retriever::Retriever;
use docent_core::{AppConfig, AppResult};
use docent_llm::LlmClient;
use docent_prompt::resolve_prompt;
use docent_search::SearchClient;
use std::sync::Arc;

/// Create the strategy `kind`.
///
/// Completions use `config.model`, except the chat strategy's answer which
/// uses `config.chat_model`. Default templates are replaced by definitions
/// found under the workspace's `.docent/prompts/`.
///
/// # Errors
/// Returns `AppError::Prompt` if a workspace prompt definition is invalid.
pub fn create_approach(
    kind: ApproachKind,
    config: &AppConfig,
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
) -> AppResult<Arc<dyn Approach>> {
    tracing::debug!(
        "Creating {} approach (llm: {}, search: {})",
        kind,
        llm.provider_name(),
        search.backend_name()
    );

    let retriever = Retriever::new(search, &config.search);
    let workspace = config.workspace.as_path();

    let approach: Arc<dyn Approach> = match kind {
        ApproachKind::RetrieveThenRead => Arc::new(
            RetrieveThenRead::new(retriever, CompletionInvoker::new(llm, config.model.as_str()))
                .with_template(resolve_prompt(workspace, prompts::retrieve_then_read())?),
        ),
        ApproachKind::ChatReadRetrieveRead => Arc::new(
            ChatReadRetrieveRead::new(
                retriever,
                CompletionInvoker::new(llm.clone(), config.model.as_str()),
                CompletionInvoker::new(llm, config.chat_model.as_str()),
                config.history.into(),
            )
            .with_templates(
                resolve_prompt(workspace, prompts::chat_query_rewrite())?,
                resolve_prompt(workspace, prompts::chat_answer())?,
            ),
        ),
        ApproachKind::ReadDecomposeAsk => Arc::new(
            ReadDecomposeAsk::new(retriever, CompletionInvoker::new(llm, config.model.as_str()))
                .with_max_iterations(config.react.max_iterations)
                .with_prefix(resolve_prompt(workspace, prompts::read_decompose_ask())?),
        ),
    };

    Ok(approach)
}

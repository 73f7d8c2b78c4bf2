//! Completion invoker: one prompt in, the first choice's text out.

use docent_core::AppResult;
use docent_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl Sampling {
    pub fn new<I, S>(temperature: f32, max_tokens: u32, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            temperature,
            max_tokens,
            stop: stop.into_iter().map(Into::into).collect(),
        }
    }
}

/// Completion calls against one engine or deployment.
#[derive(Clone)]
pub struct CompletionInvoker {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl CompletionInvoker {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Complete `prompt` with `n = 1`. Backend errors propagate unchanged.
    pub async fn complete(&self, prompt: &str, sampling: &Sampling) -> AppResult<String> {
        let request = LlmRequest::new(prompt, self.model.as_str())
            .with_temperature(sampling.temperature)
            .with_max_tokens(sampling.max_tokens)
            .with_stop(sampling.stop.iter().cloned());

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Completion finished ({} tokens, reason: {:?})",
            response.usage.total_tokens,
            response.finish_reason
        );

        Ok(response.content)
    }
}

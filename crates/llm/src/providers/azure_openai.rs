//! Azure OpenAI completions provider.
//!
//! Calls the deployment-scoped completions endpoint:
//! `POST {endpoint}/openai/deployments/{deployment}/completions?api-version=...`

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docent_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// API version used when the configuration does not name one.
pub const DEFAULT_API_VERSION: &str = "2022-12-01";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    n: u32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<LlmUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Azure OpenAI completions client.
///
/// The request's `model` is the deployment name.
pub struct AzureOpenAiClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Create a client for `https://<resource>.openai.azure.com`.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the REST API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }
}

#[async_trait::async_trait]
impl LlmClient for AzureOpenAiClient {
    fn provider_name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(deployment = %request.model, "Sending completion request to Azure OpenAI");

        let body = CompletionRequest {
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: request.n,
            stop: &request.stop,
        };

        let response = self
            .client
            .post(self.completions_url(&request.model))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Azure OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Azure OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse Azure OpenAI response: {}", e))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Azure OpenAI returned no choices".to_string()))?;

        Ok(LlmResponse {
            content: choice.text,
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            usage: parsed.usage.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::test_support::serve_once;

    #[test]
    fn test_completions_url() {
        let client = AzureOpenAiClient::new("https://example.openai.azure.com/", "key");
        assert_eq!(
            client.completions_url("davinci"),
            "https://example.openai.azure.com/openai/deployments/davinci/completions?api-version=2022-12-01"
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let (endpoint, request_rx) = serve_once(
            200,
            r#"{"model":"text-davinci-003","choices":[{"text":" Zahnarzt [info1.txt]","index":0,"finish_reason":"stop"}],"usage":{"prompt_tokens":20,"completion_tokens":5,"total_tokens":25}}"#,
        )
        .await
        .unwrap();

        let client = AzureOpenAiClient::new(endpoint, "secret").with_api_version("2023-05-15");
        let request = LlmRequest::new("Frage", "davinci")
            .with_temperature(0.3)
            .with_max_tokens(1024)
            .with_stop(["\n"]);
        let response = client.complete(&request).await.unwrap();

        assert_eq!(response.content, " Zahnarzt [info1.txt]");
        assert_eq!(response.usage.total_tokens, 25);

        let raw_request = request_rx.await.unwrap();
        assert!(raw_request
            .starts_with("POST /openai/deployments/davinci/completions?api-version=2023-05-15"));
        assert!(raw_request.to_lowercase().contains("api-key: secret"));
        assert!(raw_request.contains(r#""max_tokens":1024"#));
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_an_error() {
        let (endpoint, _rx) = serve_once(200, r#"{"choices":[]}"#).await.unwrap();

        let client = AzureOpenAiClient::new(endpoint, "secret");
        let result = client.complete(&LlmRequest::new("Frage", "davinci")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}

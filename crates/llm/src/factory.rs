//! Completion provider factory.
//!
//! Builds an `LlmClient` from a provider name, endpoint and secret.

use crate::client::LlmClient;
use crate::providers::{AzureOpenAiClient, OllamaClient};
use crate::types::ProviderType;
use docent_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("azure-openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL (required for Azure OpenAI)
/// * `api_key` - Optional API key (required for Azure OpenAI)
/// * `api_version` - Optional REST API version (Azure OpenAI only)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// endpoint/secret is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    api_version: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    tracing::debug!("Creating {} completion client", provider_type.as_str());

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        ProviderType::AzureOpenAI => {
            let endpoint = endpoint.ok_or_else(|| {
                AppError::Config("Azure OpenAI provider requires an endpoint".to_string())
            })?;
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Azure OpenAI provider requires API key".to_string())
            })?;

            let mut client = AzureOpenAiClient::new(endpoint, api_key);
            if let Some(version) = api_version {
                client = client.with_api_version(version);
            }
            Ok(Arc::new(client))
        }
    }
}

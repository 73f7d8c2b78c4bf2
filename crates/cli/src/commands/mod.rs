//! Command handlers for the Docent CLI.
//!
//! This module organizes all CLI commands into separate submodules, plus the
//! backend wiring they share.

pub mod ask;
pub mod chat;
pub mod prompts;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use prompts::PromptsCommand;

use docent_approaches::{create_approach, Approach, AnswerResult, ApproachKind, Overrides};
use docent_core::config::{AppConfig, ProviderConfig};
use docent_core::{AppError, AppResult};
use docent_llm::create_client;
use docent_search::create_search_client;
use std::sync::Arc;

/// Build the strategy `kind` over the configured completion and search backends.
pub(crate) fn build_approach(config: &AppConfig, kind: ApproachKind) -> AppResult<Arc<dyn Approach>> {
    config.validate()?;

    let provider_config = config.get_provider_config(&config.provider);
    let endpoint = provider_config.map(ProviderConfig::endpoint);
    let api_version = match provider_config {
        Some(ProviderConfig::AzureOpenAI { api_version, .. }) => api_version.as_deref(),
        _ => None,
    };
    let api_key = config.resolve_api_key(&config.provider);

    let llm = create_client(&config.provider, endpoint, api_key.as_deref(), api_version)?;
    let search_key = config.resolve_search_api_key();
    let search = create_search_client(&config.search, search_key.as_deref())?;

    tracing::debug!(
        "Backends ready (llm: {}, search: {})",
        llm.provider_name(),
        search.backend_name()
    );

    create_approach(kind, config, llm, search)
}

/// Parse the `--overrides` JSON argument.
pub(crate) fn parse_overrides(raw: Option<&str>) -> AppResult<Overrides> {
    match raw {
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| AppError::Request(format!("Overrides are not valid JSON: {}", e)))?;
            Overrides::from_json(value)
        }
        None => Ok(Overrides::default()),
    }
}

/// Print the result as JSON on stdout.
pub(crate) fn print_result(result: &AnswerResult) -> AppResult<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let overrides =
            parse_overrides(Some(r#"{"top": 5, "exclude_category": "intern"}"#)).unwrap();
        assert_eq!(overrides.top(), 5);
        assert_eq!(overrides.exclude_category(), Some("intern"));

        assert_eq!(parse_overrides(None).unwrap(), Overrides::default());
        assert!(matches!(
            parse_overrides(Some("{top: 5")),
            Err(AppError::Request(_))
        ));
    }

    #[test]
    fn test_build_approach_rejects_unknown_backend() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.workspace = temp_dir.path().to_path_buf();
        config.provider = "ollama".to_string();
        config.search.backend = "elastic".to_string();

        let result = build_approach(&config, ApproachKind::RetrieveThenRead);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_approach_over_memory_corpus() {
        let temp_dir = tempfile::tempdir().unwrap();
        let documents = temp_dir.path().join("docs.jsonl");
        std::fs::write(
            &documents,
            "{\"sourcepage\": \"info1.txt\", \"content\": \"Zahnarzt kostet $50\"}\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.workspace = temp_dir.path().to_path_buf();
        config.provider = "ollama".to_string();
        config.search.backend = "memory".to_string();
        config.search.documents = Some(documents);

        let approach = build_approach(&config, ApproachKind::ReadDecomposeAsk).unwrap();
        assert_eq!(approach.kind(), ApproachKind::ReadDecomposeAsk);
    }
}

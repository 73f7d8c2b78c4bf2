//! Search backend factory.

use crate::azure::AzureSearchClient;
use crate::client::SearchClient;
use crate::memory::InMemorySearchClient;
use docent_core::config::SearchConfig;
use docent_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a search backend from configuration.
///
/// # Errors
/// Returns `AppError::Config` for an unknown backend or missing settings,
/// and `AppError::Search` if the memory backend's documents cannot be loaded.
pub fn create_search_client(
    config: &SearchConfig,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn SearchClient>> {
    match config.backend.as_str() {
        "azure" => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                AppError::Config("Azure search backend requires search.endpoint".to_string())
            })?;
            let index = config.index.as_deref().ok_or_else(|| {
                AppError::Config("Azure search backend requires search.index".to_string())
            })?;
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Azure search backend requires an API key".to_string())
            })?;

            let mut client = AzureSearchClient::new(endpoint, index, api_key);
            if let Some(ref version) = config.api_version {
                client = client.with_api_version(version.as_str());
            }
            Ok(Arc::new(client))
        }
        "memory" => {
            let path = config.documents.as_deref().ok_or_else(|| {
                AppError::Config("Memory search backend requires search.documents".to_string())
            })?;
            let client = InMemorySearchClient::from_jsonl(path)?
                .with_content_field(config.content_field.as_str());
            Ok(Arc::new(client))
        }
        other => Err(AppError::Config(format!("Unknown search backend: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_create_memory_backend() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"sourcepage": "a.txt", "content": "eins"}}"#).unwrap();

        let config = SearchConfig {
            backend: "memory".to_string(),
            documents: Some(file.path().to_path_buf()),
            ..SearchConfig::default()
        };
        let client = create_search_client(&config, None).unwrap();
        assert_eq!(client.backend_name(), "memory");
    }

    #[test]
    fn test_azure_backend_requires_key() {
        let config = SearchConfig {
            endpoint: Some("https://example.search.windows.net".to_string()),
            index: Some("gptkbindex".to_string()),
            ..SearchConfig::default()
        };
        assert!(create_search_client(&config, None).is_err());

        let client = create_search_client(&config, Some("key")).unwrap();
        assert_eq!(client.backend_name(), "azure");
    }

    #[test]
    fn test_unknown_backend() {
        let config = SearchConfig {
            backend: "elastic".to_string(),
            ..SearchConfig::default()
        };
        match create_search_client(&config, None) {
            Err(AppError::Config(msg)) => assert!(msg.contains("Unknown search backend")),
            _ => panic!("Expected config error"),
        }
    }
}

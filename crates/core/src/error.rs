//! Error types for Docent.
//!
//! This module defines a unified error enum that covers all error categories
//! in the answering layer: configuration, I/O, completion backend, search
//! backend, prompt templates and malformed requests.

use thiserror::Error;

/// Unified error type for Docent.
///
/// All fallible functions return `Result<T, AppError>`.
/// Backend failures are propagated to the caller unchanged, never retried here.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion backend errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Search backend errors
    #[error("Search error: {0}")]
    Search(String),

    /// Prompt template errors (unknown placeholders, invalid templates)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Malformed caller input (e.g. empty conversation history)
    #[error("Invalid request: {0}")]
    Request(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_prefixes() {
        let err = AppError::Prompt("unknown placeholder `foo`".to_string());
        assert_eq!(err.to_string(), "Prompt error: unknown placeholder `foo`");

        let err = AppError::Search("index not found".to_string());
        assert_eq!(err.to_string(), "Search error: index not found");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}

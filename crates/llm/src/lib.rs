//! Completion backend integration for Docent.
//!
//! This crate provides a provider-agnostic abstraction over text-completion
//! backends. Strategies only see the `LlmClient` trait.
//!
//! # Providers
//! - **Azure OpenAI**: deployment-scoped completions API
//! - **Ollama**: local runtime, raw prompt mode
//!
//! # Example
//! ```no_run
//! use docent_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hallo", "llama3.2").with_stop(["\n"]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{AzureOpenAiClient, OllamaClient};
pub use types::ProviderType;

//! Search backend integration for Docent.
//!
//! Provides the `SearchClient` trait consumed by the retriever, plus:
//! - **Azure Cognitive Search** REST backend (keyword and semantic queries)
//! - **In-memory** keyword backend over a JSONL corpus

pub mod azure;
pub mod client;
pub mod factory;
pub mod memory;

// Re-export main types
pub use azure::AzureSearchClient;
pub use client::{
    AnswerMode, Caption, CaptionMode, QueryMode, SearchAnswer, SearchClient, SearchHit,
    SearchRequest, SearchResults, SemanticQuery,
};
pub use factory::create_search_client;
pub use memory::InMemorySearchClient;

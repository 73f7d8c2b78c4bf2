//! Search backend abstraction.
//!
//! Defines the request/response model shared by every backend and the
//! `SearchClient` trait the retriever talks to.

use docent_core::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub query: String,

    /// Backend filter expression (OData syntax, e.g. `category ne 'x'`)
    pub filter: Option<String>,

    /// Maximum number of hits
    pub top: usize,

    /// Plain keyword or semantically-ranked query
    pub mode: QueryMode,

    /// Ask the backend for the total match count
    pub include_total_count: bool,
}

impl SearchRequest {
    /// Plain keyword search for `query` returning at most `top` hits.
    pub fn simple(query: impl Into<String>, top: usize) -> Self {
        Self {
            query: query.into(),
            filter: None,
            top,
            mode: QueryMode::Simple,
            include_total_count: false,
        }
    }

    /// Semantically-ranked search.
    pub fn semantic(query: impl Into<String>, top: usize, semantic: SemanticQuery) -> Self {
        Self {
            mode: QueryMode::Semantic(semantic),
            ..Self::simple(query, top)
        }
    }

    /// Set the filter expression.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Request the total match count.
    pub fn with_total_count(mut self) -> Self {
        self.include_total_count = true;
        self
    }

    /// Semantic options, if this is a semantic query.
    pub fn semantic_options(&self) -> Option<&SemanticQuery> {
        match &self.mode {
            QueryMode::Semantic(semantic) => Some(semantic),
            QueryMode::Simple => None,
        }
    }
}

/// Query mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryMode {
    Simple,
    Semantic(SemanticQuery),
}

/// Semantic ranking options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticQuery {
    /// Query language (e.g. "de-de")
    pub query_language: String,

    /// Speller (e.g. "lexicon")
    pub speller: String,

    /// Name of the semantic configuration on the index
    pub configuration: String,

    /// Extractive captions, if requested
    pub captions: Option<CaptionMode>,

    /// Extractive answers, if requested
    pub answers: Option<AnswerMode>,
}

impl SemanticQuery {
    pub fn new(
        query_language: impl Into<String>,
        speller: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        Self {
            query_language: query_language.into(),
            speller: speller.into(),
            configuration: configuration.into(),
            captions: None,
            answers: None,
        }
    }

    pub fn with_captions(mut self, captions: CaptionMode) -> Self {
        self.captions = Some(captions);
        self
    }

    pub fn with_answers(mut self, answers: AnswerMode) -> Self {
        self.answers = Some(answers);
        self
    }
}

/// Caption request mode. Renders as `extractive|highlight-false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionMode {
    Extractive { highlight: bool },
}

impl fmt::Display for CaptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionMode::Extractive { highlight } => {
                write!(f, "extractive|highlight-{}", highlight)
            }
        }
    }
}

/// Answer request mode. Renders as `extractive|count-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerMode {
    Extractive { count: u32 },
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerMode::Extractive { count } => write!(f, "extractive|count-{}", count),
        }
    }
}

/// An extractive caption attached to a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(default)]
    pub highlights: Option<String>,
}

/// A single ranked document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    /// Stored document fields
    pub document: Map<String, Value>,

    /// Relevance score
    pub score: f64,

    /// Semantic reranker score, for semantic queries
    pub reranker_score: Option<f64>,

    /// Extractive captions, when requested
    pub captions: Vec<Caption>,
}

impl SearchHit {
    /// Create a hit from stored fields.
    pub fn new(document: Map<String, Value>) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// String value of a stored field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.document.get(name).and_then(Value::as_str)
    }
}

/// A direct extractive answer produced by semantic ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAnswer {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Search results in backend relevance order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,

    /// Extractive answers, when requested
    pub answers: Vec<SearchAnswer>,

    /// Total number of matching documents, when requested
    pub count: Option<u64>,
}

/// Trait for search backends.
///
/// Implementations return hits ordered by descending relevance; callers never
/// re-rank.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Backend name (e.g., "azure", "memory").
    fn backend_name(&self) -> &str;

    /// Run a search. Failures are reported as `AppError::Search`.
    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResults>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_rendering() {
        assert_eq!(
            CaptionMode::Extractive { highlight: false }.to_string(),
            "extractive|highlight-false"
        );
        assert_eq!(AnswerMode::Extractive { count: 1 }.to_string(), "extractive|count-1");
    }

    #[test]
    fn test_semantic_request_builder() {
        let request = SearchRequest::semantic(
            "Zahnarzt",
            1,
            SemanticQuery::new("de-de", "lexicon", "default")
                .with_answers(AnswerMode::Extractive { count: 1 }),
        )
        .with_total_count();

        assert_eq!(request.top, 1);
        assert!(request.include_total_count);
        assert!(request.filter.is_none());
        let semantic = request.semantic_options().unwrap();
        assert_eq!(semantic.query_language, "de-de");
        assert!(semantic.captions.is_none());
    }

    #[test]
    fn test_hit_field_access() {
        let mut document = Map::new();
        document.insert("sourcepage".to_string(), Value::from("info1.txt"));
        document.insert("pages".to_string(), Value::from(3));
        let hit = SearchHit::new(document);

        assert_eq!(hit.field("sourcepage"), Some("info1.txt"));
        assert_eq!(hit.field("pages"), None);
        assert_eq!(hit.field("missing"), None);
    }
}

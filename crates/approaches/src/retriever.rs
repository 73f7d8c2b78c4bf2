//! Retrieval: search requests built from overrides, hits turned into passages.

use crate::filter::category_filter;
use crate::overrides::Overrides;
use crate::passage::Passage;
use docent_core::config::SearchConfig;
use docent_core::{AppError, AppResult};
use docent_search::{
    AnswerMode, CaptionMode, SearchClient, SearchHit, SearchRequest, SemanticQuery,
};
use std::sync::Arc;

/// Issues searches and formats hits as citation-tagged passages.
#[derive(Clone)]
pub struct Retriever {
    search: Arc<dyn SearchClient>,
    sourcepage_field: String,
    content_field: String,
    query_language: String,
    query_speller: String,
    semantic_configuration: String,
    content_cap: Option<usize>,
}

impl Retriever {
    pub fn new(search: Arc<dyn SearchClient>, config: &SearchConfig) -> Self {
        Self {
            search,
            sourcepage_field: config.sourcepage_field.clone(),
            content_field: config.content_field.clone(),
            query_language: config.query_language.clone(),
            query_speller: config.query_speller.clone(),
            semantic_configuration: config.semantic_configuration.clone(),
            content_cap: None,
        }
    }

    /// Truncate full content to `chars` characters before formatting.
    pub fn with_content_cap(mut self, chars: usize) -> Self {
        self.content_cap = Some(chars);
        self
    }

    fn semantic_query(&self) -> SemanticQuery {
        SemanticQuery::new(
            self.query_language.as_str(),
            self.query_speller.as_str(),
            self.semantic_configuration.as_str(),
        )
    }

    /// Search request for `query` under the given overrides.
    pub fn request(&self, query: &str, overrides: &Overrides) -> SearchRequest {
        let request = if overrides.semantic_ranker {
            let mut semantic = self.semantic_query();
            if overrides.semantic_captions {
                semantic = semantic.with_captions(CaptionMode::Extractive { highlight: false });
            }
            SearchRequest::semantic(query, overrides.top(), semantic)
        } else {
            SearchRequest::simple(query, overrides.top())
        };

        request.with_filter(category_filter(overrides.exclude_category()))
    }

    /// Retrieve passages for `query`, in backend order.
    ///
    /// When captions were requested (semantic ranking with
    /// `semantic_captions`) a passage's text is the hit's captions joined by
    /// `" . "`; otherwise the hit's content.
    pub async fn retrieve(&self, query: &str, overrides: &Overrides) -> AppResult<Vec<Passage>> {
        let request = self.request(query, overrides);
        let use_captions = request
            .semantic_options()
            .map(|semantic| semantic.captions.is_some())
            .unwrap_or(false);
        tracing::debug!(
            backend = self.search.backend_name(),
            query = %query,
            top = request.top,
            "Retrieving passages"
        );

        let results = self.search.search(&request).await?;

        results
            .hits
            .iter()
            .map(|hit| self.to_passage(hit, use_captions))
            .collect()
    }

    fn to_passage(&self, hit: &SearchHit, use_captions: bool) -> AppResult<Passage> {
        let source_id = self.required_field(hit, &self.sourcepage_field)?;

        let text = if use_captions {
            hit.captions
                .iter()
                .map(|caption| caption.text.as_str())
                .collect::<Vec<_>>()
                .join(" . ")
        } else {
            let content = self.required_field(hit, &self.content_field)?;
            match self.content_cap {
                Some(cap) => content.chars().take(cap).collect(),
                None => content.to_string(),
            }
        };

        Ok(Passage::new(source_id, &text))
    }

    fn required_field<'a>(&self, hit: &'a SearchHit, field: &str) -> AppResult<&'a str> {
        hit.field(field).ok_or_else(|| {
            AppError::Search(format!("Search hit has no string field '{}'", field))
        })
    }

    /// Single best answer for `query`.
    ///
    /// Returns the backend's first extractive answer if any, else the content
    /// of the matching documents joined by newlines, else `None`. No category
    /// filter applies.
    pub async fn lookup(&self, query: &str) -> AppResult<Option<String>> {
        let semantic = self
            .semantic_query()
            .with_answers(AnswerMode::Extractive { count: 1 })
            .with_captions(CaptionMode::Extractive { highlight: false });
        let request = SearchRequest::semantic(query, 1, semantic).with_total_count();

        tracing::debug!(query = %query, "Looking up");

        let results = self.search.search(&request).await?;

        if let Some(answer) = results.answers.first() {
            return Ok(Some(answer.text.clone()));
        }

        let matched = results.count.unwrap_or(results.hits.len() as u64);
        if matched == 0 || results.hits.is_empty() {
            return Ok(None);
        }

        let content = results
            .hits
            .iter()
            .filter_map(|hit| hit.field(&self.content_field))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_search::{Caption, QueryMode, SearchAnswer, SearchResults};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Returns canned results and records every request.
    struct RecordingSearch {
        results: SearchResults,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl RecordingSearch {
        fn new(results: SearchResults) -> Arc<Self> {
            Arc::new(Self {
                results,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> SearchRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl SearchClient for RecordingSearch {
        fn backend_name(&self) -> &str {
            "recording"
        }

        async fn search(&self, request: &SearchRequest) -> AppResult<SearchResults> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.results.clone())
        }
    }

    fn hit(document: Value) -> SearchHit {
        SearchHit::new(document.as_object().cloned().unwrap())
    }

    fn retriever(search: Arc<RecordingSearch>) -> Retriever {
        Retriever::new(search, &SearchConfig::default())
    }

    #[tokio::test]
    async fn test_plain_retrieval() {
        let search = RecordingSearch::new(SearchResults {
            hits: vec![
                hit(json!({"sourcepage": "info1.txt", "content": "Zahnarzt\nkostet $50"})),
                hit(json!({"sourcepage": "info2.pdf", "content": "Brille"})),
            ],
            ..SearchResults::default()
        });
        let overrides = Overrides {
            exclude_category: Some("intern".to_string()),
            ..Overrides::default()
        };

        let passages = retriever(search.clone())
            .retrieve("Zahnarzt", &overrides)
            .await
            .unwrap();

        assert_eq!(passages[0].to_string(), "info1.txt: Zahnarzt kostet $50");
        assert_eq!(passages[1].source_id, "info2.pdf");

        let request = search.last_request();
        assert_eq!(request.mode, QueryMode::Simple);
        assert_eq!(request.top, 3);
        assert_eq!(request.filter.as_deref(), Some("category ne 'intern'"));
    }

    #[tokio::test]
    async fn test_semantic_captions() {
        let mut first = hit(json!({"sourcepage": "info1.txt", "content": "voller Inhalt"}));
        first.captions = vec![
            Caption { text: "Satz eins".to_string(), highlights: None },
            Caption { text: "Satz\nzwei".to_string(), highlights: None },
        ];
        let search = RecordingSearch::new(SearchResults {
            hits: vec![first],
            ..SearchResults::default()
        });
        let overrides = Overrides {
            semantic_ranker: true,
            semantic_captions: true,
            top: Some(1),
            ..Overrides::default()
        };

        let passages = retriever(search.clone())
            .retrieve("Zahnarzt", &overrides)
            .await
            .unwrap();
        assert_eq!(passages[0].to_string(), "info1.txt: Satz eins . Satz zwei");

        let request = search.last_request();
        let semantic = request.semantic_options().unwrap();
        assert_eq!(semantic.query_language, "de-de");
        assert_eq!(semantic.speller, "lexicon");
        assert_eq!(semantic.configuration, "default");
        assert_eq!(semantic.captions, Some(CaptionMode::Extractive { highlight: false }));
        assert!(request.filter.is_none());
    }

    #[tokio::test]
    async fn test_captions_ignored_without_semantic_ranker() {
        let search = RecordingSearch::new(SearchResults {
            hits: vec![hit(json!({"sourcepage": "info1.txt", "content": "Zahnarzt kostet $50"}))],
            ..SearchResults::default()
        });
        let overrides = Overrides {
            semantic_captions: true,
            ..Overrides::default()
        };

        let passages = retriever(search.clone())
            .retrieve("Zahnarzt", &overrides)
            .await
            .unwrap();

        assert_eq!(search.last_request().mode, QueryMode::Simple);
        assert_eq!(passages[0].to_string(), "info1.txt: Zahnarzt kostet $50");
    }

    #[tokio::test]
    async fn test_content_cap() {
        let long = "x".repeat(800);
        let search = RecordingSearch::new(SearchResults {
            hits: vec![hit(json!({"sourcepage": "lang.txt", "content": long}))],
            ..SearchResults::default()
        });

        let passages = retriever(search)
            .with_content_cap(500)
            .retrieve("x", &Overrides::default())
            .await
            .unwrap();
        assert_eq!(passages[0].text.chars().count(), 500);
    }

    #[tokio::test]
    async fn test_missing_source_field_is_error() {
        let search = RecordingSearch::new(SearchResults {
            hits: vec![hit(json!({"content": "ohne Quelle"}))],
            ..SearchResults::default()
        });

        let err = retriever(search)
            .retrieve("x", &Overrides::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("sourcepage"));
    }

    #[tokio::test]
    async fn test_lookup_prefers_extractive_answer() {
        let search = RecordingSearch::new(SearchResults {
            hits: vec![hit(json!({"sourcepage": "info1.txt", "content": "Volltext"}))],
            answers: vec![SearchAnswer {
                key: "1".to_string(),
                text: "$50".to_string(),
                score: Some(0.9),
            }],
            count: Some(1),
        });

        let answer = retriever(search.clone()).lookup("Zahnarzt").await.unwrap();
        assert_eq!(answer.as_deref(), Some("$50"));

        let request = search.last_request();
        assert_eq!(request.top, 1);
        assert!(request.include_total_count);
        assert!(request.filter.is_none());
        let semantic = request.semantic_options().unwrap();
        assert_eq!(semantic.answers, Some(AnswerMode::Extractive { count: 1 }));
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_content() {
        let search = RecordingSearch::new(SearchResults {
            hits: vec![hit(json!({"sourcepage": "info1.txt", "content": "Volltext"}))],
            answers: Vec::new(),
            count: Some(4),
        });

        let answer = retriever(search).lookup("Zahnarzt").await.unwrap();
        assert_eq!(answer.as_deref(), Some("Volltext"));
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let search = RecordingSearch::new(SearchResults {
            count: Some(0),
            ..SearchResults::default()
        });

        assert_eq!(retriever(search).lookup("nichts").await.unwrap(), None);
    }
}

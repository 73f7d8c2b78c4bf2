//! Azure Cognitive Search backend.
//!
//! Azure Search REST API: `POST {endpoint}/indexes/{index}/docs/search?api-version=...`

use crate::client::{
    Caption, QueryMode, SearchAnswer, SearchClient, SearchHit, SearchRequest, SearchResults,
};
use docent_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API version with semantic configurations, captions and answers.
pub const DEFAULT_API_VERSION: &str = "2023-07-01-Preview";

/// Search request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AzureSearchBody<'a> {
    search: &'a str,
    top: usize,
    count: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speller: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_configuration: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<String>,
}

/// Search response body.
#[derive(Debug, Deserialize)]
struct AzureSearchResponse {
    #[serde(rename = "@odata.count", default)]
    count: Option<u64>,
    #[serde(rename = "@search.answers", default)]
    answers: Option<Vec<SearchAnswer>>,
    #[serde(default)]
    value: Vec<Map<String, Value>>,
}

/// Azure Cognitive Search client.
pub struct AzureSearchClient {
    endpoint: String,
    index: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureSearchClient {
    /// Create a client for `https://<service>.search.windows.net`.
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            index: index.into(),
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

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    fn to_body<'a>(request: &'a SearchRequest) -> AzureSearchBody<'a> {
        let mut body = AzureSearchBody {
            search: &request.query,
            top: request.top,
            count: request.include_total_count,
            filter: request.filter.as_deref(),
            query_type: None,
            query_language: None,
            speller: None,
            semantic_configuration: None,
            captions: None,
            answers: None,
        };

        if let QueryMode::Semantic(semantic) = &request.mode {
            body.query_type = Some("semantic");
            body.query_language = Some(semantic.query_language.as_str());
            body.speller = Some(semantic.speller.as_str());
            body.semantic_configuration = Some(semantic.configuration.as_str());
            body.captions = semantic.captions.map(|c| c.to_string());
            body.answers = semantic.answers.map(|a| a.to_string());
        }

        body
    }

    /// Split `@search.*` annotations from stored fields.
    fn convert_hit(mut document: Map<String, Value>) -> AppResult<SearchHit> {
        let score = document
            .remove("@search.score")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let reranker_score = document
            .remove("@search.rerankerScore")
            .and_then(|v| v.as_f64());
        let captions = match document.remove("@search.captions") {
            Some(Value::Null) | None => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<Caption>>(value)
                .map_err(|e| AppError::Search(format!("Malformed captions: {}", e)))?,
        };
        document.retain(|key, _| !key.starts_with("@search."));

        Ok(SearchHit {
            document,
            score,
            reranker_score,
            captions,
        })
    }
}

#[async_trait::async_trait]
impl SearchClient for AzureSearchClient {
    fn backend_name(&self) -> &str {
        "azure"
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResults> {
        tracing::debug!(index = %self.index, query = %request.query, "Searching Azure index");

        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .json(&Self::to_body(request))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send search request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Azure Search API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: AzureSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        let hits = parsed
            .value
            .into_iter()
            .map(Self::convert_hit)
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!("Azure search returned {} hits", hits.len());

        Ok(SearchResults {
            hits,
            answers: parsed.answers.unwrap_or_default(),
            count: parsed.count,
        })
    }
}

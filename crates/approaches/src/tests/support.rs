//! Stub backends for strategy scenarios.

use docent_core::{AppError, AppResult};
use docent_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docent_search::{InMemorySearchClient, SearchClient, SearchRequest, SearchResults};
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Completion backend replying from a script, then with a fallback reply.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always replies with `reply`.
    pub fn repeating(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| AppError::Llm("Script exhausted".to_string()))?;

        Ok(LlmResponse {
            content: reply,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
            finish_reason: Some("stop".to_string()),
        })
    }
}

/// In-memory search that records every request.
pub struct RecordingSearch {
    inner: InMemorySearchClient,
    requests: Mutex<Vec<SearchRequest>>,
}

impl RecordingSearch {
    pub fn new(documents: Vec<Value>) -> Arc<Self> {
        let documents = documents
            .into_iter()
            .map(|doc| doc.as_object().cloned().unwrap())
            .collect::<Vec<Map<String, Value>>>();

        Arc::new(Self {
            inner: InMemorySearchClient::new(documents),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchClient for RecordingSearch {
    fn backend_name(&self) -> &str {
        "recording"
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResults> {
        self.requests.lock().unwrap().push(request.clone());
        self.inner.search(request).await
    }
}

/// Search backend that is always down.
pub struct FailingSearch;

#[async_trait::async_trait]
impl SearchClient for FailingSearch {
    fn backend_name(&self) -> &str {
        "failing"
    }

    async fn search(&self, _request: &SearchRequest) -> AppResult<SearchResults> {
        Err(AppError::Search("Azure Search API error (503): unavailable".to_string()))
    }
}

/// Small benefits corpus.
pub fn corpus() -> Vec<Value> {
    vec![
        json!({"sourcepage": "info1.txt", "category": "benefits", "content": "Zahnarzt kostet $50"}),
        json!({"sourcepage": "info2.pdf", "category": "benefits", "content": "Brillen werden nicht erstattet."}),
        json!({"sourcepage": "intern.pdf", "category": "intern", "content": "Interne Zahnarzt Liste"}),
    ]
}

/// Only the dentist passage.
pub fn dentist_corpus() -> Vec<Value> {
    vec![json!({"sourcepage": "info1.txt", "content": "Zahnarzt kostet $50"})]
}

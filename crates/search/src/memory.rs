//! In-memory keyword search backend.
//!
//! Scores documents by query-term frequency over their string fields. Used
//! for tests and offline runs against a small JSONL corpus. Supports the
//! `field eq|ne 'value'` filter clauses (joined by `and`) that the retriever
//! emits, and extractive captions for semantic requests. It never produces
//! extractive answers.

use crate::client::{Caption, SearchClient, SearchHit, SearchRequest, SearchResults};
use docent_core::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Eq,
    Ne,
}

/// One `field op 'literal'` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterClause {
    field: String,
    op: FilterOp,
    value: String,
}

impl FilterClause {
    fn matches(&self, document: &Map<String, Value>) -> bool {
        let actual = document.get(&self.field).and_then(Value::as_str);
        match self.op {
            FilterOp::Eq => actual == Some(self.value.as_str()),
            FilterOp::Ne => actual != Some(self.value.as_str()),
        }
    }
}

/// Keyword search over documents held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySearchClient {
    documents: Vec<Map<String, Value>>,
    content_field: String,
}

impl InMemorySearchClient {
    /// Create a backend over the given documents.
    pub fn new(documents: Vec<Map<String, Value>>) -> Self {
        Self {
            documents,
            content_field: "content".to_string(),
        }
    }

    /// Field used to extract captions.
    pub fn with_content_field(mut self, content_field: impl Into<String>) -> Self {
        self.content_field = content_field.into();
        self
    }

    /// Load documents from a JSONL file, one JSON object per line.
    pub fn from_jsonl(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::Search(format!("Failed to open documents file {:?}: {}", path, e))
        })?;

        let reader = BufReader::new(file);
        let mut documents = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AppError::Search(format!("Failed to read line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let document: Map<String, Value> = serde_json::from_str(&line).map_err(|e| {
                AppError::Search(format!(
                    "Failed to parse line {} of {:?}: {}",
                    line_num + 1,
                    path,
                    e
                ))
            })?;
            documents.push(document);
        }

        tracing::debug!("Loaded {} documents from {:?}", documents.len(), path);
        Ok(Self::new(documents))
    }

    fn score(document: &Map<String, Value>, terms: &[String]) -> f64 {
        if terms.is_empty() {
            return 1.0;
        }

        let haystack = document
            .values()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        terms
            .iter()
            .map(|term| haystack.matches(term.as_str()).count() as f64)
            .sum()
    }

    /// Sentence of the content field with the most query-term hits.
    fn best_caption(&self, document: &Map<String, Value>, terms: &[String]) -> Option<Caption> {
        let content = document.get(&self.content_field).and_then(Value::as_str)?;

        content
            .split_inclusive(['.', '\n'])
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(|sentence| {
                let lower = sentence.to_lowercase();
                let hits = terms
                    .iter()
                    .filter(|term| lower.contains(term.as_str()))
                    .count();
                (hits, sentence)
            })
            // max_by_key keeps the last maximum; prefer the earliest sentence.
            .fold(None, |best: Option<(usize, &str)>, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            })
            .map(|(_, sentence)| Caption {
                text: sentence.to_string(),
                highlights: None,
            })
    }
}

#[async_trait::async_trait]
impl SearchClient for InMemorySearchClient {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResults> {
        let clauses = match request.filter.as_deref() {
            Some(expr) => parse_filter(expr)?,
            None => Vec::new(),
        };
        let terms = query_terms(&request.query);

        let mut scored: Vec<(f64, &Map<String, Value>)> = self
            .documents
            .iter()
            .filter(|doc| clauses.iter().all(|clause| clause.matches(doc)))
            .map(|doc| (Self::score(doc, &terms), doc))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        let total = scored.len() as u64;

        let want_captions = request
            .semantic_options()
            .map(|semantic| semantic.captions.is_some())
            .unwrap_or(false);

        let hits = scored
            .into_iter()
            .take(request.top)
            .map(|(score, doc)| SearchHit {
                document: doc.clone(),
                score,
                reranker_score: None,
                captions: if want_captions {
                    self.best_caption(doc, &terms).into_iter().collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        Ok(SearchResults {
            hits,
            answers: Vec::new(),
            count: request.include_total_count.then_some(total),
        })
    }
}

/// Lowercased alphanumeric query terms of at least two characters.
fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Parse `field eq|ne 'literal' [and ...]`; `''` inside a literal is a quote.
fn parse_filter(expr: &str) -> AppResult<Vec<FilterClause>> {
    let unsupported = || AppError::Search(format!("Unsupported filter expression: {}", expr));
    let mut clauses = Vec::new();
    let mut rest = expr.trim_start();

    loop {
        let field_end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .ok_or_else(unsupported)?;
        if field_end == 0 {
            return Err(unsupported());
        }
        let field = &rest[..field_end];
        rest = rest[field_end..].trim_start();

        let op = if let Some(after) = rest.strip_prefix("eq ") {
            rest = after;
            FilterOp::Eq
        } else if let Some(after) = rest.strip_prefix("ne ") {
            rest = after;
            FilterOp::Ne
        } else {
            return Err(unsupported());
        };

        rest = rest.trim_start().strip_prefix('\'').ok_or_else(unsupported)?;
        let mut value = String::new();
        let mut chars = rest.char_indices();
        let literal_end = loop {
            match chars.next() {
                Some((i, '\'')) => {
                    if rest[i + 1..].starts_with('\'') {
                        value.push('\'');
                        chars.next();
                    } else {
                        break i + 1;
                    }
                }
                Some((_, c)) => value.push(c),
                None => return Err(unsupported()),
            }
        };
        rest = rest[literal_end..].trim_start();

        clauses.push(FilterClause {
            field: field.to_string(),
            op,
            value,
        });

        if rest.is_empty() {
            return Ok(clauses);
        }
        rest = rest.strip_prefix("and ").ok_or_else(unsupported)?.trim_start();
    }
}

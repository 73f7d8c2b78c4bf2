//! Answer result returned by every strategy.

use serde::{Deserialize, Serialize};

/// Answer, supporting passages and a human-readable trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text with `[source]` citations
    pub answer: String,

    /// Rendered passages the answer was grounded on
    pub data_points: Vec<String>,

    /// HTML trace of how the answer was produced
    pub thoughts: String,
}

impl AnswerResult {
    pub fn new(answer: String, data_points: Vec<String>, thoughts: String) -> Self {
        Self {
            answer,
            data_points,
            thoughts,
        }
    }
}

/// Newlines to `<br>`, for prompts shown in `thoughts`.
pub fn html_lines(text: &str) -> String {
    text.replace('\n', "<br>")
}

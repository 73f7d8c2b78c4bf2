//! Citation-tagged passages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A retrieved passage. Its text never contains a line break, so every
/// passage renders as exactly one `source: text` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub source_id: String,
    pub text: String,
}

impl Passage {
    pub fn new(source_id: impl Into<String>, text: &str) -> Self {
        Self {
            source_id: source_id.into(),
            text: nonewlines(text),
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_id, self.text)
    }
}

/// Replace `\n` and `\r` with spaces.
pub fn nonewlines(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Render passages one per line.
pub fn join_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(Passage::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rendered passages, as reported in `data_points`.
pub fn data_points(passages: &[Passage]) -> Vec<String> {
    passages.iter().map(Passage::to_string).collect()
}

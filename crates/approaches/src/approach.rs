//! The strategy abstraction shared by all answering approaches.

use crate::history::ChatTurn;
use crate::overrides::Overrides;
use crate::result::AnswerResult;
use docent_core::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported answering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproachKind {
    /// Single retrieval, single completion
    #[serde(rename = "rtr")]
    RetrieveThenRead,
    /// Query rewrite, retrieval, history-aware completion
    #[serde(rename = "rrr")]
    ChatReadRetrieveRead,
    /// Iterative Search/Lookup reasoning loop
    #[serde(rename = "rda")]
    ReadDecomposeAsk,
}

impl ApproachKind {
    /// Parse from the configuration key ("rtr", "rrr", "rda").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rtr" | "retrieve-then-read" => Some(Self::RetrieveThenRead),
            "rrr" | "chat-read-retrieve-read" => Some(Self::ChatReadRetrieveRead),
            "rda" | "read-decompose-ask" => Some(Self::ReadDecomposeAsk),
            _ => None,
        }
    }

    /// Configuration key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RetrieveThenRead => "rtr",
            Self::ChatReadRetrieveRead => "rrr",
            Self::ReadDecomposeAsk => "rda",
        }
    }
}

impl fmt::Display for ApproachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An answering strategy.
///
/// Implementations hold only shared backends and immutable settings; all
/// per-request state lives inside `answer`, so one instance may serve
/// concurrent requests.
#[async_trait::async_trait]
pub trait Approach: Send + Sync {
    fn kind(&self) -> ApproachKind;

    /// Answer the last turn of `history`. History is oldest first and is
    /// never modified.
    async fn answer(&self, history: &[ChatTurn], overrides: &Overrides) -> AppResult<AnswerResult>;
}

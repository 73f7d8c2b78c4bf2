//! Retrieval-augmented answering strategies.
//!
//! Three interchangeable strategies answer a question over a private corpus
//! with citations back to the retrieved passages:
//! - **Retrieve-then-read**: one search, one completion
//! - **Chat-read-retrieve-read**: query rewrite from the conversation, search, answer
//! - **Read-decompose-ask**: a bounded Search/Lookup reasoning loop
//!
//! All of them implement [`Approach`], so callers select one by
//! [`ApproachKind`] and never depend on which is running.

pub mod approach;
pub mod chat_read_retrieve_read;
pub mod completion;
pub mod factory;
pub mod filter;
pub mod history;
pub mod overrides;
pub mod passage;
pub mod prompts;
pub mod react;
pub mod result;
pub mod retrieve_then_read;
pub mod retriever;

#[cfg(test)]
mod tests;

// Re-export main types
pub use approach::{Approach, ApproachKind};
pub use chat_read_retrieve_read::ChatReadRetrieveRead;
pub use completion::{CompletionInvoker, Sampling};
pub use factory::create_approach;
pub use filter::category_filter;
pub use history::{linearize, ChatTurn, TokenBudget};
pub use overrides::Overrides;
pub use passage::Passage;
pub use react::ReadDecomposeAsk;
pub use result::AnswerResult;
pub use retrieve_then_read::RetrieveThenRead;
pub use retriever::Retriever;

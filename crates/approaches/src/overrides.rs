//! Per-request override options.

use docent_prompt::PromptSource;
use serde::{Deserialize, Deserializer, Serialize};

/// Hits retrieved when `top` is absent.
pub const DEFAULT_TOP: usize = 3;

/// Per-request options accepted by every strategy.
///
/// Unknown keys are ignored. `top = 0` and an empty `exclude_category` are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Use semantic ranking instead of plain keyword search
    pub semantic_ranker: bool,

    /// Use extractive captions instead of full document content
    pub semantic_captions: bool,

    /// Maximum number of hits to retrieve
    #[serde(deserialize_with = "nonzero")]
    pub top: Option<usize>,

    /// Category excluded from retrieval
    #[serde(deserialize_with = "nonempty")]
    pub exclude_category: Option<String>,

    /// Replacement template, or extra instructions when prefixed with `>>>`
    pub prompt_template: Option<String>,

    /// Sampling temperature; each strategy has its own default
    pub temperature: Option<f32>,

    /// Ask the chat strategy for follow-up question suggestions
    pub suggest_followup_questions: bool,
}

impl Overrides {
    /// Parse overrides from a JSON object.
    pub fn from_json(value: serde_json::Value) -> docent_core::AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| docent_core::AppError::Request(format!("Invalid overrides: {}", e)))
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn exclude_category(&self) -> Option<&str> {
        self.exclude_category.as_deref()
    }

    /// Requested temperature, or the strategy's default.
    pub fn temperature_or(&self, default: f32) -> f32 {
        self.temperature.unwrap_or(default)
    }

    /// How `prompt_template` applies to the strategy's default template.
    pub fn prompt_source(&self) -> PromptSource {
        PromptSource::from_override(self.prompt_template.as_deref())
    }
}

fn nonzero<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<usize>::deserialize(deserializer)?;
    Ok(value.filter(|top| *top > 0))
}

fn nonempty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

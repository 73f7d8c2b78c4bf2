//! Prompt types.
//!
//! This module defines the domain entities for prompt templates and their
//! per-request override protocol.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix marking a `prompt_template` override as extra instructions for the
/// default template instead of a replacement.
pub const INJECTION_SENTINEL: &str = ">>>";

/// A prompt definition: a default template plus identity, optionally loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars placeholders (`{{sources}}`)
    pub template: String,
}

impl PromptDefinition {
    /// Create a built-in definition.
    pub fn builtin(id: impl Into<String>, title: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            api_version: "1.0".to_string(),
            created_by: "builtin".to_string(),
            template: template.into(),
        }
    }
}

/// How a request's `prompt_template` override applies to a default template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// No override: the default template verbatim.
    Default,
    /// Extra instructions placed in the default template's injection slot.
    Augment(String),
    /// A complete replacement template.
    Replace(String),
}

impl PromptSource {
    /// Classify a raw override value.
    ///
    /// Absent or empty → `Default`; `>>>` prefix → `Augment` with the prefix
    /// stripped; anything else → `Replace`.
    pub fn from_override(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Default,
            Some(raw) if raw.is_empty() => Self::Default,
            Some(raw) => match raw.strip_prefix(INJECTION_SENTINEL) {
                Some(extra) => Self::Augment(extra.to_string()),
                None => Self::Replace(raw.to_string()),
            },
        }
    }

    /// Provenance tag for this source.
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Default => TemplateKind::Default,
            Self::Augment(_) => TemplateKind::Augmented,
            Self::Replace(_) => TemplateKind::Replaced,
        }
    }
}

/// Which template produced a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    Default,
    Augmented,
    Replaced,
}

/// A fully built prompt ready for completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Prompt definition the default template came from
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Whether the default template was used, augmented or replaced
    #[serde(rename = "templateKind")]
    pub template_kind: TemplateKind,

    /// Template variables that were available for substitution
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        text: String,
        source_prompt_id: String,
        template_kind: TemplateKind,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            text,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                template_kind,
                resolved_variables,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: retrieve-then-read
title: Retrieve then read
apiVersion: "1.0"
createdBy: test
template: "Frage: {{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "retrieve-then-read");
        assert_eq!(def.template, "Frage: {{question}}");
    }

    #[test]
    fn test_prompt_source_classification() {
        assert_eq!(PromptSource::from_override(None), PromptSource::Default);
        assert_eq!(PromptSource::from_override(Some("")), PromptSource::Default);
        assert_eq!(
            PromptSource::from_override(Some(">>>Antworte kurz.")),
            PromptSource::Augment("Antworte kurz.".to_string())
        );
        assert_eq!(
            PromptSource::from_override(Some("Quellen: {{sources}}")),
            PromptSource::Replace("Quellen: {{sources}}".to_string())
        );
    }

    #[test]
    fn test_sentinel_only_is_empty_augment() {
        assert_eq!(
            PromptSource::from_override(Some(">>>")),
            PromptSource::Augment(String::new())
        );
        assert_eq!(PromptSource::Augment(String::new()).kind(), TemplateKind::Augmented);
    }
}

//! Prompt system for Docent.
//!
//! This crate provides:
//! - Per-request override resolution (`PromptSource`)
//! - Strict Handlebars template rendering
//! - YAML prompt definitions that replace built-in templates

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{
    build_prompt, referenced_placeholders, render_template, INJECTED_PROMPT, KNOWN_PLACEHOLDERS,
};
pub use loader::{list_prompts, load_prompt, resolve_prompt, PROMPTS_DIR};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptSource, TemplateKind,
    INJECTION_SENTINEL,
};

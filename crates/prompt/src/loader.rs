//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use docent_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Directory, relative to the workspace, holding `<id>.yml` definitions.
pub const PROMPTS_DIR: &str = ".docent/prompts";

fn prompt_file(workspace_path: &Path, prompt_id: &str) -> PathBuf {
    workspace_path
        .join(PROMPTS_DIR)
        .join(format!("{}.yml", prompt_id))
}

/// Load a prompt definition by ID from the workspace.
///
/// Looks for `<id>.yml` in `.docent/prompts/`.
///
/// # Example
/// ```no_run
/// use docent_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "retrieve-then-read")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompt_file(workspace_path, prompt_id);

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        tracing::warn!(
            "Prompt file {:?} declares id '{}'",
            prompt_file,
            definition.id
        );
    }

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// The workspace's definition for `default.id` if one exists, else `default`.
///
/// A file that exists but fails to parse or validate is an error.
pub fn resolve_prompt(
    workspace_path: &Path,
    default: PromptDefinition,
) -> AppResult<PromptDefinition> {
    if prompt_file(workspace_path, &default.id).exists() {
        load_prompt(workspace_path, &default.id)
    } else {
        Ok(default)
    }
}

/// List all prompt IDs defined in the workspace, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace_path.join(PROMPTS_DIR);

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: '{}'. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, content: &str) -> PathBuf {
        let prompts_dir = dir.join(PROMPTS_DIR);
        fs::create_dir_all(&prompts_dir).unwrap();

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn valid_prompt(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Eigene Vorlage"
apiVersion: "1.0"
createdBy: test
template: |
  Quellen:
  {{{{sources}}}}
"#,
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "retrieve-then-read", &valid_prompt("retrieve-then-read"));

        let prompt = load_prompt(temp_dir.path(), "retrieve-then-read").unwrap();
        assert_eq!(prompt.id, "retrieve-then-read");
        assert_eq!(prompt.title, "Eigene Vorlage");
        assert_eq!(prompt.template, "Quellen:\n{{sources}}\n");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_load_rejects_bad_api_version() {
        let temp_dir = TempDir::new().unwrap();
        let content = valid_prompt("x").replace("\"1.0\"", "\"1\"");
        write_prompt(temp_dir.path(), "x", &content);

        let err = load_prompt(temp_dir.path(), "x").unwrap_err();
        assert!(err.to_string().contains("apiVersion"));
    }

    #[test]
    fn test_resolve_prompt_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let default = PromptDefinition::builtin("chat-query-rewrite", "Builtin", "{{question}}");

        let resolved = resolve_prompt(temp_dir.path(), default.clone()).unwrap();
        assert_eq!(resolved, default);
    }

    #[test]
    fn test_resolve_prompt_prefers_workspace_file() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "chat-query-rewrite", &valid_prompt("chat-query-rewrite"));
        let default = PromptDefinition::builtin("chat-query-rewrite", "Builtin", "{{question}}");

        let resolved = resolve_prompt(temp_dir.path(), default).unwrap();
        assert_eq!(resolved.title, "Eigene Vorlage");
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "read-decompose-ask", &valid_prompt("read-decompose-ask"));
        write_prompt(temp_dir.path(), "chat-query-rewrite", &valid_prompt("chat-query-rewrite"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts, vec!["chat-query-rewrite", "read-decompose-ask"]);
    }
}

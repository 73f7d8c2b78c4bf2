//! Prompt builder: override resolution and strict template rendering.

use crate::types::{BuiltPrompt, PromptDefinition, PromptSource};
use docent_core::{AppError, AppResult};
use handlebars::Handlebars;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder that receives `Augment` instructions.
pub const INJECTED_PROMPT: &str = "injected_prompt";

/// Placeholders the built-in strategies substitute. These are also accepted
/// in single-brace form (`{sources}`).
pub const KNOWN_PLACEHOLDERS: [&str; 5] = [
    "sources",
    "chat_history",
    "question",
    "follow_up_questions_prompt",
    INJECTED_PROMPT,
];

static SINGLE_BRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("single-brace placeholder pattern")
});

/// Build a prompt from a default definition, the request's override and the
/// substitution values.
///
/// The override decides the template:
/// - `Default`: the definition's template with an empty `injected_prompt`
/// - `Augment(extra)`: the definition's template with `injected_prompt = extra + "\n"`
/// - `Replace(template)`: the caller's template; `injected_prompt` is not offered
///
/// Every placeholder the chosen template references must have a value.
///
/// # Example
/// ```
/// use docent_prompt::{build_prompt, PromptDefinition, PromptSource};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = PromptDefinition::builtin("demo", "Demo", "{{injected_prompt}}Frage: {{question}}");
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "Was kostet ein Zahnarztbesuch?".to_string());
///
/// let built = build_prompt(&def, &PromptSource::from_override(Some(">>>Kurz.")), vars)?;
/// assert_eq!(built.text, "Kurz.\nFrage: Was kostet ein Zahnarztbesuch?");
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    source: &PromptSource,
    mut variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {} ({:?})", definition.id, source.kind());

    let template = match source {
        PromptSource::Default => {
            variables.insert(INJECTED_PROMPT.to_string(), String::new());
            definition.template.as_str()
        }
        PromptSource::Augment(extra) => {
            variables.insert(INJECTED_PROMPT.to_string(), format!("{}\n", extra));
            definition.template.as_str()
        }
        PromptSource::Replace(template) => {
            variables.remove(INJECTED_PROMPT);
            template.as_str()
        }
    };

    let text = render_template(template, &variables)?;

    Ok(BuiltPrompt::new(
        text,
        definition.id.clone(),
        source.kind(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
///
/// `{name}` references to a known placeholder are read as `{{name}}`.
/// Fails with `AppError::Prompt` naming the first placeholder that has no value.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let template = expand_single_braces(template);
    let template = template.as_ref();

    if let Some(missing) = referenced_placeholders(template)
        .into_iter()
        .find(|name| !variables.contains_key(name))
    {
        return Err(AppError::Prompt(format!(
            "Template placeholder '{}' has no value",
            missing
        )));
    }

    let mut handlebars = Handlebars::new();

    // Plain text prompts, and anything unresolved is an error.
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// Rewrite single-brace references to known placeholders as Handlebars
/// expressions. Anything already inside `{{ }}` is left alone.
fn expand_single_braces(template: &str) -> Cow<'_, str> {
    let bytes = template.as_bytes();
    let mut expanded = String::with_capacity(template.len());
    let mut copied = 0;

    for caps in SINGLE_BRACE.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let doubled = (whole.start() > 0 && bytes[whole.start() - 1] == b'{')
            || bytes.get(whole.end()) == Some(&b'}');
        if doubled || !KNOWN_PLACEHOLDERS.contains(&name.as_str()) {
            continue;
        }

        expanded.push_str(&template[copied..whole.start()]);
        expanded.push_str("{{");
        expanded.push_str(name.as_str());
        expanded.push_str("}}");
        copied = whole.end();
    }

    if copied == 0 {
        return Cow::Borrowed(template);
    }
    expanded.push_str(&template[copied..]);
    Cow::Owned(expanded)
}

/// Names of the simple `{{name}}` references in a template, in order of first use.
///
/// Block helpers, comments, partials, paths and helper calls are skipped;
/// strict rendering still rejects anything unresolved among those.
pub fn referenced_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let escaped = rest[..start].ends_with('\\');
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let inner = &after[..end];
        rest = &after[end + 2..];

        if escaped {
            continue;
        }
        if let Some(name) = simple_reference(inner) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }

    names
}

fn simple_reference(inner: &str) -> Option<&str> {
    let inner = inner.trim_start_matches('{').trim_matches('~').trim();
    if inner.starts_with(['#', '/', '!', '>', '^']) {
        return None;
    }
    let inner = inner.strip_prefix('&').unwrap_or(inner).trim();

    let mut tokens = inner.split_whitespace();
    let name = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    if name == "else" || name == "this" || name.starts_with('@') {
        return None;
    }
    if name.contains(['.', '/', '[', '(']) {
        return None;
    }

    Some(name)
}

//! Parsing the reasoning completion into a thought and an action.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static ACTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:Aktion|Action)(?:\s+\d+)?\s*:\s*(.*?)\s*$").expect("action line pattern")
});
static THOUGHT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:Gedanke|Thought)(?:\s+\d+)?\s*:\s*").expect("thought label pattern")
});
static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\[\]\s][^\[\]]*?)\s*\[(.*)\]\s*$").expect("tool call pattern")
});

/// A tool the reasoning loop can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Search,
    Lookup,
    Finish,
}

impl Tool {
    /// Accepts the prompt's German names and their English equivalents.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "suche" | "search" => Some(Self::Search),
            "nachschlagen" | "lookup" => Some(Self::Lookup),
            "fertig" | "finish" => Some(Self::Finish),
            _ => None,
        }
    }

    /// Name used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "Suche",
            Self::Lookup => "Nachschlagen",
            Self::Finish => "Fertig",
        }
    }
}

/// The action named by one reasoning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Call { tool: Tool, input: String },
    Unknown { tool: String, input: String },
    Malformed(String),
}

impl Action {
    /// Parse `Tool[input]`, with or without an `Aktion n:` label.
    pub fn parse(text: &str) -> Self {
        let text = match ACTION_LINE.captures(text) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
            None => text.trim(),
        };

        let Some(caps) = CALL.captures(text) else {
            return Self::Malformed(text.to_string());
        };
        let name = caps.get(1).map_or("", |m| m.as_str());
        let input = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();

        match Tool::parse(name) {
            Some(tool) => Self::Call { tool, input },
            None => Self::Unknown {
                tool: name.to_string(),
                input,
            },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call { tool, input } => write!(f, "{}[{}]", tool.label(), input),
            Self::Unknown { tool, input } => write!(f, "{}[{}]", tool, input),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

/// A reasoning completion split at its last action line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub thought: String,
    /// Text after the action label, if the completion named an action
    pub action: Option<String>,
}

impl Emitted {
    pub fn parse(output: &str) -> Self {
        let lines: Vec<&str> = output.lines().collect();
        let action_at = lines.iter().rposition(|line| ACTION_LINE.is_match(line));

        let (thought_lines, action) = match action_at {
            Some(index) => {
                let action = ACTION_LINE
                    .captures(lines[index])
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string());
                (&lines[..index], action)
            }
            None => (&lines[..], None),
        };

        let thought = thought_lines.join("\n");
        let thought = THOUGHT_LABEL.replace(thought.trim(), "").trim().to_string();

        Self { thought, action }
    }
}

/// First non-empty line of a completion.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

//! Steps taken so far in one reasoning loop.

use super::action::Action;
use super::prompt::{ACTION_LABEL, OBSERVATION_LABEL, THOUGHT_LABEL};

/// One completed thought, action, observation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub thought: String,
    pub action: Action,
    pub observation: String,
}

/// Ordered steps of a single `answer` call.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    steps: Vec<Step>,
}

impl Scratchpad {
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Steps in the labelled form of the worked examples, one line each.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let n = index + 1;
                format!(
                    "{} {}: {}\n{} {}: {}\n{} {}: {}\n",
                    THOUGHT_LABEL,
                    n,
                    step.thought,
                    ACTION_LABEL,
                    n,
                    step.action,
                    OBSERVATION_LABEL,
                    n,
                    step.observation
                )
            })
            .collect()
    }

    /// Most recent non-empty thought.
    pub fn last_thought(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .map(|step| step.thought.as_str())
            .find(|thought| !thought.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(thought: &str, action: &str, observation: &str) -> Step {
        Step {
            thought: thought.to_string(),
            action: Action::parse(action),
            observation: observation.to_string(),
        }
    }

    #[test]
    fn test_render_numbers_steps() {
        let mut pad = Scratchpad::default();
        assert_eq!(pad.render(), "");

        pad.push(step("Ich suche.", "Suche[Zahnarzt]", "info1.txt: Zahnarzt kostet $50"));
        pad.push(step("Nachschlagen.", "Lookup[Preis]", "$50"));

        assert_eq!(
            pad.render(),
            "Gedanke 1: Ich suche.\nAktion 1: Suche[Zahnarzt]\nBeobachtung 1: info1.txt: Zahnarzt kostet $50\n\
             Gedanke 2: Nachschlagen.\nAktion 2: Nachschlagen[Preis]\nBeobachtung 2: $50\n"
        );
    }

    #[test]
    fn test_last_thought_skips_empty() {
        let mut pad = Scratchpad::default();
        assert_eq!(pad.last_thought(), None);

        pad.push(step("Zuerst suchen.", "Suche[a]", "x"));
        pad.push(step("  ", "Suche[b]", "y"));
        assert_eq!(pad.last_thought(), Some("Zuerst suchen."));
    }
}

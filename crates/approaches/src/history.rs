//! Conversation history and its bounded transcript rendering.

use docent_core::config::HistoryConfig;
use docent_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One exchange of a conversation. The turn being answered has no `bot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<String>,
}

impl ChatTurn {
    /// A turn still waiting for its answer.
    pub fn question(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: None,
        }
    }

    /// A completed exchange.
    pub fn answered(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: Some(bot.into()),
        }
    }

    fn answer(&self) -> Option<&str> {
        self.bot.as_deref().filter(|bot| !bot.is_empty())
    }
}

/// The question being answered: the last turn's `user` text.
pub fn current_question(history: &[ChatTurn]) -> AppResult<&str> {
    history
        .last()
        .map(|turn| turn.user.as_str())
        .ok_or_else(|| AppError::Request("Conversation history is empty".to_string()))
}

/// Approximate token budget for a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    pub max_tokens: usize,
    pub chars_per_token: usize,
}

impl TokenBudget {
    /// Budget in characters.
    pub fn max_chars(&self) -> usize {
        self.max_tokens.saturating_mul(self.chars_per_token)
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        HistoryConfig::default().into()
    }
}

impl From<HistoryConfig> for TokenBudget {
    fn from(config: HistoryConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            chars_per_token: config.chars_per_token,
        }
    }
}

/// Render history as a chat-markup transcript, oldest turn first.
///
/// Turns are added newest first until the transcript exceeds `max_chars`;
/// the turn that crosses the limit is kept and older turns are dropped.
/// Only the newest turn, and only when `include_last_turn` is set, renders
/// an open assistant block for a missing answer.
pub fn linearize(history: &[ChatTurn], include_last_turn: bool, max_chars: usize) -> String {
    let turns = if include_last_turn {
        history
    } else {
        &history[..history.len().saturating_sub(1)]
    };
    let newest = turns.len().checked_sub(1);

    let mut rendered: Vec<String> = Vec::new();
    let mut length = 0;

    for (index, turn) in turns.iter().enumerate().rev() {
        let open_block = include_last_turn && Some(index) == newest;
        let text = render_turn(turn, open_block);
        length += text.chars().count();
        rendered.push(text);

        if length > max_chars {
            break;
        }
    }

    rendered.reverse();
    rendered.concat()
}

fn render_turn(turn: &ChatTurn, open_block: bool) -> String {
    let user = format!("<|im_start|>user\n{}\n<|im_end|>\n", turn.user);
    match turn.answer() {
        Some(bot) => format!("{}<|im_start|>assistant\n{}<|im_end|>\n", user, bot),
        None if open_block => format!("{}<|im_start|>assistant\n\n", user),
        None => user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<ChatTurn> {
        vec![
            ChatTurn::answered("Was ist abgedeckt?", "Zahnarzt [info1.txt]"),
            ChatTurn::answered("Und Brillen?", "Nein [info2.pdf]"),
            ChatTurn::question("Was kostet ein Zahnarztbesuch?"),
        ]
    }

    #[test]
    fn test_full_transcript_is_chronological() {
        let text = linearize(&history(), true, 4000);

        assert_eq!(
            text,
            "<|im_start|>user\nWas ist abgedeckt?\n<|im_end|>\n<|im_start|>assistant\nZahnarzt [info1.txt]<|im_end|>\n\
             <|im_start|>user\nUnd Brillen?\n<|im_end|>\n<|im_start|>assistant\nNein [info2.pdf]<|im_end|>\n\
             <|im_start|>user\nWas kostet ein Zahnarztbesuch?\n<|im_end|>\n<|im_start|>assistant\n\n"
        );
    }

    #[test]
    fn test_exclude_last_turn() {
        let text = linearize(&history(), false, 4000);

        assert!(text.starts_with("<|im_start|>user\nWas ist abgedeckt?"));
        assert!(text.ends_with("Nein [info2.pdf]<|im_end|>\n"));
        assert!(!text.contains("Zahnarztbesuch"));
    }

    #[test]
    fn test_budget_keeps_crossing_turn_and_drops_older() {
        let turns = history();
        let newest = render_turn(&turns[2], true);
        let budget = newest.chars().count() + 5;

        let text = linearize(&turns, true, budget);
        let middle = render_turn(&turns[1], false);

        assert_eq!(text, format!("{}{}", middle, newest));
        assert!(text.chars().count() <= budget + middle.chars().count());
    }

    #[test]
    fn test_open_block_only_for_newest_turn() {
        let turns = vec![
            ChatTurn::question("Erste Frage ohne Antwort"),
            ChatTurn::question("Zweite Frage"),
        ];
        let text = linearize(&turns, true, 4000);

        assert_eq!(text.matches("<|im_start|>assistant").count(), 1);
        assert!(text.ends_with("Zweite Frage\n<|im_end|>\n<|im_start|>assistant\n\n"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(linearize(&[], true, 4000), "");
        assert_eq!(linearize(&[], false, 4000), "");
        assert!(matches!(current_question(&[]), Err(AppError::Request(_))));
    }

    #[test]
    fn test_token_budget_from_config() {
        let budget = TokenBudget::default();
        assert_eq!(budget.max_chars(), 4000);

        let budget = TokenBudget::from(HistoryConfig {
            max_tokens: 10,
            chars_per_token: 3,
        });
        assert_eq!(budget.max_chars(), 30);
    }

    #[test]
    fn test_turn_deserialization() {
        let turns: Vec<ChatTurn> =
            serde_json::from_str(r#"[{"user": "Hallo", "bot": "Hi"}, {"user": "Frage"}]"#).unwrap();
        assert_eq!(turns[0].bot.as_deref(), Some("Hi"));
        assert_eq!(turns[1], ChatTurn::question("Frage"));
    }
}

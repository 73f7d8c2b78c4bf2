//! Chat-read-retrieve-read scenarios.

use super::support::{corpus, RecordingSearch, ScriptedLlm};
use crate::approach::Approach;
use crate::chat_read_retrieve_read::ChatReadRetrieveRead;
use crate::completion::CompletionInvoker;
use crate::history::{ChatTurn, TokenBudget};
use crate::overrides::Overrides;
use crate::retriever::Retriever;
use docent_core::config::SearchConfig;
use std::sync::Arc;

fn approach(llm: Arc<ScriptedLlm>, search: Arc<RecordingSearch>) -> ChatReadRetrieveRead {
    ChatReadRetrieveRead::new(
        Retriever::new(search, &SearchConfig::default()),
        CompletionInvoker::new(llm.clone(), "davinci"),
        CompletionInvoker::new(llm, "chat"),
        TokenBudget::default(),
    )
}

fn history() -> Vec<ChatTurn> {
    vec![
        ChatTurn::answered("Welche Leistungen sind abgedeckt?", "Zahnarzt und Vorsorge [info3.pdf]"),
        ChatTurn::question("Was kostet ein Zahnarztbesuch?"),
    ]
}

#[tokio::test]
async fn test_rewrite_then_answer() {
    let llm = ScriptedLlm::new(["  Zahnarzt Kosten \n", "Ein Besuch kostet $50 [info1.txt]."]);
    let search = RecordingSearch::new(corpus());

    let result = approach(llm.clone(), search.clone())
        .answer(&history(), &Overrides::default())
        .await
        .unwrap();

    assert_eq!(result.answer, "Ein Besuch kostet $50 [info1.txt].");
    assert_eq!(result.data_points[0], "info1.txt: Zahnarzt kostet $50");
    assert!(result
        .thoughts
        .starts_with("Searched for:<br>Zahnarzt Kosten<br><br>Prompt:<br>"));
    assert_eq!(search.requests()[0].query, "Zahnarzt Kosten");

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);

    let rewrite = &requests[0];
    assert_eq!(rewrite.model, "davinci");
    assert_eq!(rewrite.temperature, Some(0.0));
    assert_eq!(rewrite.max_tokens, Some(32));
    assert_eq!(rewrite.stop, vec!["\n"]);
    assert!(rewrite.prompt.contains(
        "Chatverlauf:\n<|im_start|>user\nWelche Leistungen sind abgedeckt?\n<|im_end|>\n<|im_start|>assistant\nZahnarzt und Vorsorge [info3.pdf]<|im_end|>\n"
    ));
    assert!(!rewrite
        .prompt
        .contains("<|im_start|>user\nWas kostet ein Zahnarztbesuch?"));
    assert!(rewrite
        .prompt
        .ends_with("Frage:\nWas kostet ein Zahnarztbesuch?\n\nSuchanfrage:\n"));

    let answer = &requests[1];
    assert_eq!(answer.model, "chat");
    assert_eq!(answer.temperature, Some(0.7));
    assert_eq!(answer.max_tokens, Some(1024));
    assert_eq!(answer.stop, vec!["<|im_end|>", "<|im_start|>"]);
    assert!(answer.prompt.starts_with("<|im_start|>system\n"));
    assert!(answer.prompt.contains("Quellen:\ninfo1.txt: Zahnarzt kostet $50"));
    assert!(answer.prompt.contains("<|im_start|>user\nWelche Leistungen sind abgedeckt?"));
    assert!(answer.prompt.ends_with(
        "<|im_start|>user\nWas kostet ein Zahnarztbesuch?\n<|im_end|>\n<|im_start|>assistant\n\n\n"
    ));
}

#[tokio::test]
async fn test_first_turn_rewrites_with_empty_transcript() {
    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    let search = RecordingSearch::new(corpus());

    approach(llm.clone(), search)
        .answer(&[ChatTurn::question("Zahnarzt?")], &Overrides::default())
        .await
        .unwrap();

    assert!(llm.requests()[0].prompt.contains("Chatverlauf:\n\n\nFrage:\nZahnarzt?"));
}

#[tokio::test]
async fn test_follow_up_questions_block() {
    let search = RecordingSearch::new(corpus());

    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    let overrides = Overrides {
        suggest_followup_questions: true,
        ..Overrides::default()
    };
    approach(llm.clone(), search.clone())
        .answer(&history(), &overrides)
        .await
        .unwrap();
    assert!(llm.requests()[1].prompt.contains("<<Gibt es Ausschlüsse für Rezepte?>>"));

    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    approach(llm.clone(), search)
        .answer(&history(), &Overrides::default())
        .await
        .unwrap();
    assert!(!llm.requests()[1].prompt.contains("Folgefragen"));
}

#[tokio::test]
async fn test_replacement_without_history_placeholder() {
    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    let search = RecordingSearch::new(corpus());
    let overrides = Overrides {
        prompt_template: Some("Nur Quellen:\n{{sources}}".to_string()),
        top: Some(1),
        ..Overrides::default()
    };

    let result = approach(llm.clone(), search)
        .answer(&history(), &overrides)
        .await
        .unwrap();

    let prompt = &llm.requests()[1].prompt;
    assert!(prompt.starts_with("Nur Quellen:\n"));
    assert!(!prompt.contains("<|im_start|>"));
    assert_eq!(result.data_points.len(), 1);
}

#[tokio::test]
async fn test_excluded_category_is_filtered() {
    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    let search = RecordingSearch::new(corpus());
    let overrides = Overrides {
        exclude_category: Some("intern".to_string()),
        ..Overrides::default()
    };

    let result = approach(llm, search.clone())
        .answer(&history(), &overrides)
        .await
        .unwrap();

    assert_eq!(
        search.requests()[0].filter.as_deref(),
        Some("category ne 'intern'")
    );
    assert!(result.data_points.iter().all(|dp| !dp.starts_with("intern.pdf")));
}

#[tokio::test]
async fn test_history_is_not_modified() {
    let llm = ScriptedLlm::new(["Zahnarzt", "-"]);
    let search = RecordingSearch::new(corpus());
    let turns = history();
    let before = turns.clone();

    approach(llm, search)
        .answer(&turns, &Overrides::default())
        .await
        .unwrap();

    assert_eq!(turns, before);
}

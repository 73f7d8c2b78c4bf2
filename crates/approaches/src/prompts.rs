//! Built-in prompt templates.
//!
//! Each can be replaced per installation by `.docent/prompts/<id>.yml`.

use docent_prompt::PromptDefinition;

pub const RETRIEVE_THEN_READ_ID: &str = "retrieve-then-read";
pub const CHAT_ANSWER_ID: &str = "chat-read-retrieve-read";
pub const CHAT_QUERY_REWRITE_ID: &str = "chat-query-rewrite";
pub const READ_DECOMPOSE_ASK_ID: &str = "read-decompose-ask";

const RETRIEVE_THEN_READ: &str = r#"Sie sind ein intelligenter Assistent, der den Mitarbeitern von Contoso Inc bei ihren Fragen zum Gesundheitsplan und zum Mitarbeiterhandbuch hilft. Verwenden Sie 'Sie' um sich auf die Person zu beziehen, die die Fragen stellt, auch wenn diese mit 'Ich' fragt. Beantworten Sie die folgende Frage ausschließlich mit den Daten aus den untenstehenden Quellen. Geben Sie tabellarische Informationen als HTML-Tabelle zurück. Verwenden Sie kein Markdown-Format. Jede Quelle hat einen Namen, gefolgt von einem Doppelpunkt und den eigentlichen Informationen, führen Sie immer den Quellennamen für jede Tatsache, die Sie in der Antwort verwenden, auf. Wenn Sie die Frage nicht mit den untenstehenden Quellen beantworten können, sagen Sie, dass Sie es nicht wissen.
{{injected_prompt}}
###
Frage: 'Was ist die Selbstbeteiligung für den Mitarbeiterplan für einen Besuch in Overlake in Bellevue?'

Quellen:
info1.txt: Die Selbstbeteiligung hängt davon ab, ob Sie sich innerhalb oder außerhalb des Netzwerks befinden. Die Selbstbeteiligung innerhalb des Netzwerks beträgt $500 für Mitarbeiter und $1000 für Familien. Die Selbstbeteiligung außerhalb des Netzwerks beträgt $1000 für Mitarbeiter und $2000 für Familien.
info2.pdf: Overlake gehört zum Netzwerk des Mitarbeiterplans.
info3.pdf: Overlake ist der Name des Gebiets, das einen Park-and-Ride-Platz in der Nähe von Bellevue umfasst.
info4.pdf: Zu den Institutionen innerhalb des Netzwerks gehören Overlake, Swedish und andere in der Region

Antwort:
Die Selbstbeteiligung innerhalb des Netzwerks beträgt $500 für Mitarbeiter und $1000 für Familien [info1.txt] und Overlake gehört zum Netzwerk des Mitarbeiterplans [info2.pdf][info4.pdf].

###
Frage: '{{question}}'?

Quellen:
{{sources}}

Antwort:
"#;

const CHAT_ANSWER: &str = r#"<|im_start|>system
Der Assistent hilft den Mitarbeitern des Unternehmens bei Fragen zu ihrem Gesundheitsplan und Fragen zum Mitarbeiterhandbuch. Seien Sie in Ihren Antworten kurz.
Antworten Sie NUR mit den Fakten, die in der Liste der untenstehenden Quellen aufgeführt sind. Wenn nicht genügend Informationen vorhanden sind, sagen Sie, dass Sie es nicht wissen. Erzeugen Sie keine Antworten, die nicht die untenstehenden Quellen verwenden. Wenn eine klärende Frage an den Benutzer hilfreich wäre, stellen Sie die Frage.
Geben Sie tabellarische Informationen als HTML-Tabelle zurück. Geben Sie kein Markdown-Format zurück.
Jede Quelle hat einen Namen, gefolgt von einem Doppelpunkt und den tatsächlichen Informationen, geben Sie immer den Quellennamen für jede Tatsache, die Sie in der Antwort verwenden, an. Verwenden Sie eckige Klammern, um die Quelle zu referenzieren, z.B. [info1.txt]. Kombinieren Sie keine Quellen, listen Sie jede Quelle separat auf, z.B. [info1.txt][info2.pdf].
{{follow_up_questions_prompt}}
{{injected_prompt}}
Quellen:
{{sources}}
<|im_end|>
{{chat_history}}
"#;

/// Instruction block substituted for `follow_up_questions_prompt` on request.
pub const FOLLOW_UP_QUESTIONS: &str = r#"Erzeugen Sie drei sehr kurze Folgefragen, die der Benutzer wahrscheinlich als nächstes zu seinem Gesundheitsplan und Mitarbeiterhandbuch stellen würde.
Verwenden Sie doppelte spitze Klammern, um auf die Fragen zu verweisen, z.B. <<Gibt es Ausschlüsse für Rezepte?>>.
Versuchen Sie, Fragen, die bereits gestellt wurden, nicht zu wiederholen.
Generieren Sie nur Fragen und keinen Text vor oder nach den Fragen, wie z.B. 'Nächste Fragen'"#;

const CHAT_QUERY_REWRITE: &str = r#"Im Folgenden finden Sie eine Geschichte des bisherigen Gesprächs und eine neue Frage des Benutzers, die durch die Suche in einer Wissensdatenbank über Gesundheitspläne für Mitarbeiter und das Mitarbeiterhandbuch beantwortet werden muss.
Erzeugen Sie eine Suchanfrage basierend auf dem Gespräch und der neuen Frage.
Fügen Sie keine zitierten Quellendateinamen und Dokumentennamen, wie z.B. info.txt oder doc.pdf, in die Suchanfragenterme ein.
Fügen Sie keinen Text in [] oder <<>> in die Suchanfragenterme ein.
Wenn die Frage nicht auf Englisch ist, übersetzen Sie die Frage ins Englische, bevor Sie die Suchanfrage generieren.

Chatverlauf:
{{chat_history}}

Frage:
{{question}}

Suchanfrage:
"#;

/// Instructions preceding the worked examples of the reasoning loop.
const READ_DECOMPOSE_ASK: &str = "Beantworten Sie Fragen wie in den folgenden Beispielen gezeigt, indem Sie die Frage in einzelne Such- oder Nachschlageaktionen aufteilen, um Fakten zu finden, bis Sie die Frage beantworten können. Beobachtungen werden durch ihren Quellennamen in eckigen Klammern gekennzeichnet, Quellennamen MÜSSEN in den Antworten bei den Aktionen enthalten sein. Beantworten Sie die Fragen nur mit Informationen aus Beobachtungen, spekulieren Sie nicht.";

pub fn retrieve_then_read() -> PromptDefinition {
    PromptDefinition::builtin(RETRIEVE_THEN_READ_ID, "Retrieve then read", RETRIEVE_THEN_READ)
}

pub fn chat_answer() -> PromptDefinition {
    PromptDefinition::builtin(CHAT_ANSWER_ID, "Chat answer", CHAT_ANSWER)
}

pub fn chat_query_rewrite() -> PromptDefinition {
    PromptDefinition::builtin(CHAT_QUERY_REWRITE_ID, "Chat search query", CHAT_QUERY_REWRITE)
}

/// Instruction prefix of the reasoning loop. Used as plain text, not rendered.
pub fn read_decompose_ask() -> PromptDefinition {
    PromptDefinition::builtin(READ_DECOMPOSE_ASK_ID, "Decompose and ask", READ_DECOMPOSE_ASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_prompt::referenced_placeholders;

    #[test]
    fn test_placeholders() {
        assert_eq!(
            referenced_placeholders(&retrieve_then_read().template),
            vec!["injected_prompt", "question", "sources"]
        );
        assert_eq!(
            referenced_placeholders(&chat_answer().template),
            vec!["follow_up_questions_prompt", "injected_prompt", "sources", "chat_history"]
        );
        assert_eq!(
            referenced_placeholders(&chat_query_rewrite().template),
            vec!["chat_history", "question"]
        );
        assert!(referenced_placeholders(&read_decompose_ask().template).is_empty());
    }
}

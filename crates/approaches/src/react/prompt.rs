//! Prompt layout of the reasoning loop: instructions, worked examples, question.

use docent_prompt::PromptSource;

pub const THOUGHT_LABEL: &str = "Gedanke";
pub const ACTION_LABEL: &str = "Aktion";
pub const OBSERVATION_LABEL: &str = "Beobachtung";

/// Separator between instructions, examples and the question block.
const SECTION_SEPARATOR: &str = "\n\n";

/// Worked examples showing the labels, tools and citation style.
pub const EXAMPLES: [&str; 6] = [
    r#"Frage: Wie hoch ist der Höhenbereich für das Gebiet, in das der östliche Sektor der
Colorado Orogenese hineinreicht?
Gedanke 1: Ich muss die Colorado Orogenese suchen, das Gebiet finden, in das der östliche Sektor
der Colorado Orogenese hineinreicht, dann den Höhenbereich des
Gebiets finden.
Aktion 1: Suche[Colorado Orogenese]
Beobachtung 1: [info1.pdf] Die Colorado Orogenese war eine Episode der Gebirgsbildung (eine Orogenese) in
Colorado und den umliegenden Gebieten.
Gedanke 2: Es wird nicht der östliche Sektor erwähnt. Also muss ich den östlichen Sektor suchen.
Aktion 2: Suche[östlicher Sektor]
Beobachtung 2: [info2.txt] (Ergebnis 1 / 1) Der östliche Sektor erstreckt sich in die High Plains und wird
als Central Plains Orogenese bezeichnet.
Gedanke 3: Der östliche Sektor der Colorado Orogenese erstreckt sich in die High Plains. Also muss ich
die High Plains suchen und deren Höhenbereich finden.
Aktion 3: Suche[High Plains]
Beobachtung 3: [some_file.pdf] High Plains bezieht sich auf eine von zwei unterschiedlichen Landregionen
Gedanke 4: Ich muss stattdessen High Plains (Vereinigte Staaten) suchen.
Aktion 4: Suche[High Plains (Vereinigte Staaten)]
Beobachtung 4: [filea.pdf] Die High Plains sind eine Teilregion der Great Plains. [another-ref.docx] Von Ost nach West, die
High Plains steigen in der Höhe von etwa 1.800 bis 7.000 ft (550 bis 2.130
m).
Gedanke 5: Die High Plains steigen in der Höhe von etwa 1.800 bis 7.000 ft, also ist die Antwort
1.800 bis 7.000 ft.
Aktion 5: Fertig[1.800 bis 7.000 ft (filea.pdf) ]"#,
    r#"Frage: Die Musikerin und Satirikerin Allie Goertz hat ein Lied über die "Die Simpsons"
Charakter Milhouse geschrieben, den Matt Groening nach wem benannt hat?
Gedanke 1: Die Frage vereinfacht sich zu "Der Simpsons" Charakter Milhouse ist benannt nach
wem. Ich muss nur Milhouse suchen und finden, nach wem es benannt ist.
Aktion 1: Suche[Milhouse]
Beobachtung 1: [info7.pdf] Milhouse Mussolini Van Houten ist eine wiederkehrende Figur in der animierten
Fernsehserie The Simpsons, gesprochen von Pamela Hayden und kreiert von Matt
Groening.
Gedanke 2: Der Absatz sagt nicht, nach wem Milhouse benannt ist, vielleicht kann ich
"benannt nach" suchen.
Aktion 2: Suche[benannt nach]
Beobachtung 2: [historyref2.txt] (Ergebnis 1 / 1) Milhouse wurde nach US-Präsident Richard Nixon benannt, dessen
zweiter Vorname Milhous war.
Gedanke 3: Milhouse wurde nach US-Präsident Richard Nixon benannt, also ist die Antwort
Richard Nixon.
Aktion 3: Fertig[Richard Nixon (historyref2.txt) ]"#,
    r#"Frage: Welche Dokumentation handelt von finnischen Rockgruppen, Adam Clayton Powell oder The
Saimaa Gesture?
Gedanke 1: Ich muss Adam Clayton Powell und The Saimaa Gesture suchen und herausfinden, welche
Dokumentation über finnische Rockgruppen handelt.
Aktion 1: Suche[Adam Clayton Powell]
Beobachtung 1: [info9.pdf] Konnte [Adam Clayton Powell] nicht finden. Ähnlich: ['Adam Clayton Powell
III', 'Seventh Avenue (Manhattan)', 'Adam Clayton Powell Jr. State Office
Building', 'Isabel Washington Powell', 'Adam Powell', 'Adam Clayton Powell
(film)', 'Giancarlo Esposito'].
Gedanke 2: Um die Dokumentation zu finden, kann ich Adam Clayton Powell (film) suchen.
Aktion 2: Suche[Adam Clayton Powell (film)]
Beobachtung 2: [data123.txt] Adam Clayton Powell ist ein amerikanischer Dokumentarfilm von 1989, Regie von
Richard Kilberg. Der Film handelt vom Aufstieg und Fall des einflussreichen
afroamerikanischen Politikers Adam Clayton Powell Jr.[3][4] Er wurde später als Teil der PBS-Serie The American Experience ausgestrahlt.
Gedanke 3: Adam Clayton Powell (film) ist eine Dokumentation über einen afroamerikanischen
Politiker, nicht über finnische Rockgruppen. So muss die Dokumentation über finnische Rockgruppen
stattdessen The Saimaa Gesture sein.
Aktion 3: Fertig[The Saimaa Gesture (data123.txt) ]"#,
    r#"Frage: Welchen Beruf haben Nicholas Ray und Elia Kazan gemeinsam?
Gedanke 1: Ich muss Nicholas Ray und Elia Kazan suchen, ihre Berufe finden und dann
den Beruf finden, den sie gemeinsam haben.
Aktion 1: Suche[Nicholas Ray]
Beobachtung 1: [files-987.png] Nicholas Ray (geboren als Raymond Nicholas Kienzle Jr., 7. August 1911 - 16.
Juni 1979) war ein amerikanischer Filmregisseur, Drehbuchautor und Schauspieler, am besten bekannt für
den Film Rebel Without a Cause aus dem Jahr 1955.
Gedanke 2: Berufe von Nicholas Ray sind Regisseur, Drehbuchautor und Schauspieler. Ich muss
als nächstes Elia Kazan suchen und seine Berufe finden.
Aktion 2: Suche[Elia Kazan]
Beobachtung 2: [files-654.txt] Elia Kazan war ein amerikanischer Film- und Theaterregisseur, Produzent, Drehbuchautor
und Schauspieler.
Gedanke 3: Berufe von Elia Kazan sind Regisseur, Produzent, Drehbuchautor und Schauspieler.
So haben Nicholas Ray und Elia Kazan den Beruf Regisseur,
Drehbuchautor und Schauspieler gemeinsam.
Aktion 3: Fertig[Regisseur, Drehbuchautor, Schauspieler (files-987.png)(files-654.txt) ]"#,
    r#"Frage: Welches Magazin wurde zuerst gestartet, Arthur's Magazine oder First for Women?
Gedanke 1: Ich muss Arthur's Magazine und First for Women suchen und herausfinden, welches zuerst
gestartet wurde.
Aktion 1: Suche[Arthur's Magazine]
Beobachtung 1: [magazines-1850.pdf] Arthur's Magazine (1844-1846) war eine amerikanische literarische Zeitschrift, die
im 19. Jahrhundert in Philadelphia veröffentlicht wurde.
Gedanke 2: Arthur's Magazine wurde 1844 gestartet. Als nächstes muss ich First for Women
suchen.
Aktion 2: Suche[First for Women]
Beobachtung 2: [magazines-1900.pdf] First for Women ist eine Frauenzeitschrift, die von Bauer Media Group in den
USA veröffentlicht wird.[1] Das Magazin wurde 1989 gestartet.
Gedanke 3: First for Women wurde 1989 gestartet. 1844 (Arthur's Magazine) < 1989 (First
for Women), also wurde Arthur's Magazine zuerst gestartet.
Aktion 3: Fertig[Arthur's Magazine (magazines-1850.pdf)(magazines-1900.pdf) ]"#,
    r#"Frage: Waren Pavel Urysohn und Leonid Levin für die gleiche Art von Arbeit bekannt?
Gedanke 1: Ich muss Pavel Urysohn und Leonid Levin suchen, ihre Arten von Arbeit finden,
und herausfinden, ob sie die gleichen sind.
Aktion 1: Suche[Pavel Urysohn]
Beobachtung 1: [info4444.pdf] Pavel Samuilovich Urysohn (3. Februar 1898 - 17. August 1924) war ein sowjetischer
Mathematiker, der am besten für seine Beiträge zur Dimensionstheorie bekannt ist.
Gedanke 2: Pavel Urysohn ist ein Mathematiker. Als nächstes muss ich Leonid Levin suchen und
seine Art von Arbeit finden.
Aktion 2: Suche[Leonid Levin]
Beobachtung 2: [datapoints_aaa.txt] Leonid Anatolievich Levin ist ein sowjetisch-amerikanischer Mathematiker und Informatiker.
Gedanke 3: Leonid Levin ist ein Mathematiker und Informatiker. So sind Pavel Urysohn
und Leonid Levin für die gleiche Art von Arbeit bekannt.
Aktion 3: Fertig[Ja (info4444.pdf)(datapoints_aaa.txt) ]"#,
];

/// Instruction prefix after applying the request's override.
pub fn resolve_prefix(default_prefix: &str, source: &PromptSource) -> String {
    match source {
        PromptSource::Default => default_prefix.to_string(),
        PromptSource::Augment(extra) => format!("{}\n\n{}", extra, default_prefix),
        PromptSource::Replace(prefix) => prefix.clone(),
    }
}

/// Instructions, worked examples and the question, ready for the scratchpad.
pub fn base_prompt(prefix: &str, question: &str) -> String {
    let mut sections = vec![prefix];
    sections.extend(EXAMPLES);

    format!(
        "{}{}\nFrage: {}\n",
        sections.join(SECTION_SEPARATOR),
        SECTION_SEPARATOR,
        question
    )
}

/// Cue for step `n`'s thought.
pub fn thought_cue(n: usize) -> String {
    format!("{} {}:", THOUGHT_LABEL, n)
}

/// Cue asking for step `n`'s action.
pub fn action_cue(n: usize) -> String {
    format!("\n{} {}:", ACTION_LABEL, n)
}

/// Stop sequence ending step `n`'s completion before the observation.
pub fn observation_stop(n: usize) -> String {
    format!("\n{} {}:", OBSERVATION_LABEL, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefix() {
        assert_eq!(resolve_prefix("Basis", &PromptSource::Default), "Basis");
        assert_eq!(
            resolve_prefix("Basis", &PromptSource::Augment("Extra".to_string())),
            "Extra\n\nBasis"
        );
        assert_eq!(
            resolve_prefix("Basis", &PromptSource::Replace("Neu".to_string())),
            "Neu"
        );
    }

    #[test]
    fn test_base_prompt_layout() {
        let prompt = base_prompt("Anweisungen", "Was kostet ein Zahnarztbesuch?");

        assert!(prompt.starts_with("Anweisungen\n\nFrage: Wie hoch ist der Höhenbereich"));
        assert!(prompt.ends_with(
            "Aktion 3: Fertig[Ja (info4444.pdf)(datapoints_aaa.txt) ]\n\n\nFrage: Was kostet ein Zahnarztbesuch?\n"
        ));
        assert_eq!(prompt.matches("\nAktion 3: Fertig[").count(), 5);
    }

    #[test]
    fn test_cues() {
        assert_eq!(thought_cue(2), "Gedanke 2:");
        assert_eq!(action_cue(2), "\nAktion 2:");
        assert_eq!(observation_stop(2), "\nBeobachtung 2:");
    }
}

use crate::lexicon::Abbreviations;
use crate::parser::{split_boundaries, Piece};

fn is_single_terminal(run: &str) -> bool {
    matches!(run, "." | "!" | "?")
}

fn close_sentence(current: &mut String, sentences: &mut Vec<String>) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}

/// Splits `text` into trimmed, non-empty sentences that keep their closing
/// punctuation.
///
/// A boundary run closes the sentence unless it is a single `.`, `!` or `?`
/// directly after an abbreviation or a dotted initial, in which case the run
/// stays inside the sentence together with its trailing whitespace.
pub fn split_sentences(text: &str, abbreviations: &Abbreviations) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let pieces = split_boundaries(text);
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < pieces.len() {
        match pieces[i] {
            Piece::Boundary(run) => {
                current.push_str(run.trim());
                close_sentence(&mut current, &mut sentences);
            }
            Piece::Text(run) => {
                let part = run.trim();
                if part.is_empty() {
                    i += 1;
                    continue;
                }

                if let Some(Piece::Boundary(next)) = pieces.get(i + 1) {
                    let following = match pieces.get(i + 2) {
                        Some(Piece::Text(run)) => *run,
                        _ => "",
                    };
                    let preceding = format!("{current}{part}");
                    if is_single_terminal(next.trim())
                        && (abbreviations.ends_with_abbreviation(&preceding)
                            || Abbreviations::ends_with_initial(&preceding, following))
                    {
                        current.push_str(part);
                        current.push_str(next);
                        i += 2;
                        continue;
                    }
                }

                current.push_str(part);
            }
        }
        i += 1;
    }

    close_sentence(&mut current, &mut sentences);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        split_sentences(text, &Abbreviations::default())
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            split("Hello world! How are you today? I'm doing great."),
            ["Hello world!", "How are you today?", "I'm doing great."]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let sentences = split("Dr. Smith went to Washington D.C. on Jan. 5th. He met Ms. Johnson there!");
        assert_eq!(
            sentences,
            ["Dr. Smith went to Washington D.C. on Jan. 5th.", "He met Ms. Johnson there!"]
        );
    }

    #[test]
    fn test_single_letter_words_end_sentences() {
        assert_eq!(split("So did I. Then we left."), ["So did I.", "Then we left."]);
        assert_eq!(split("We chose plan B. It worked."), ["We chose plan B.", "It worked."]);
    }

    #[test]
    fn test_spaced_initials() {
        assert_eq!(
            split("J. R. R. Tolkien wrote it. Done."),
            ["J. R. R. Tolkien wrote it.", "Done."]
        );
    }

    #[test]
    fn test_abbreviation_at_end_of_text() {
        assert_eq!(split("I live on Main St."), ["I live on Main St."]);
        assert_eq!(split("Apples, pears, etc. are fruit."), ["Apples, pears, etc. are fruit."]);
    }

    #[test]
    fn test_dotted_abbreviation() {
        assert_eq!(split("Use a tool, e.g. a hammer. Then stop."), ["Use a tool, e.g. a hammer.", "Then stop."]);
    }

    #[test]
    fn test_punctuation_runs_are_one_boundary() {
        assert_eq!(split("Wait... What?! Really"), ["Wait...", "What?!", "Really"]);
    }

    #[test]
    fn test_closing_quotes_and_brackets() {
        assert_eq!(
            split("He said \"stop.\" (Nobody did.) Then"),
            ["He said \"stop.\"", "(Nobody did.)", "Then"]
        );
    }

    #[test]
    fn test_trailing_text_without_terminal() {
        assert_eq!(split("no punctuation here"), ["no punctuation here"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(split("").is_empty());
        assert!(split("   \n\t ").is_empty());
    }

    #[test]
    fn test_only_punctuation() {
        assert_eq!(split("?!"), ["?!"]);
    }

    #[test]
    fn test_multiline_text() {
        let text = "\n    Natural language understanding is a challenging problem. \n    Computers need to analyze text at multiple levels. \n";
        assert_eq!(
            split(text),
            [
                "Natural language understanding is a challenging problem.",
                "Computers need to analyze text at multiple levels."
            ]
        );
    }
}

//! Closed word lists used by the segmenter.

use std::collections::HashSet;

pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

pub const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "etc.", "vs.", "i.e.", "e.g.", "cf.", "Inc.",
    "Ltd.", "Ave.", "St.", "Rd.", "Blvd.",
    // Months
    "Jan.", "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.", "Sept.", "Oct.", "Nov.", "Dec.",
];

/// Abbreviations that do not end a sentence, stored without their final
/// period. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct Abbreviations {
    stems: HashSet<String>,
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self::new(ABBREVIATIONS)
    }
}

impl Abbreviations {
    pub fn new<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stems = abbreviations
            .into_iter()
            .map(|a| {
                let a = a.as_ref();
                a.strip_suffix('.').unwrap_or(a).to_string()
            })
            .filter(|stem| !stem.is_empty())
            .collect();
        Self { stems }
    }

    /// True when `preceding` ends with a known stem that starts at a word
    /// boundary.
    pub fn ends_with_abbreviation(&self, preceding: &str) -> bool {
        self.stems
            .iter()
            .any(|stem| preceding.strip_suffix(stem.as_str()).is_some_and(at_word_start))
    }

    /// True when `preceding` ends with a lone letter that belongs to a run of
    /// dotted initials (`D.C.`, `J. R. R.`): a dotted initial comes right
    /// before it, or `next`, the text after the period, is another lone letter.
    pub fn ends_with_initial(preceding: &str, next: &str) -> bool {
        let Some(head) = lone_letter_head(preceding) else {
            return false;
        };
        match head.trim_end().strip_suffix('.') {
            Some(before_dot) if lone_letter_head(before_dot).is_some() => true,
            _ => is_lone_letter(next.trim()),
        }
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

fn at_word_start(head: &str) -> bool {
    head.chars().next_back().map_or(true, |c| !c.is_alphanumeric())
}

/// Text before a final lone letter, if `text` ends with one.
fn lone_letter_head(text: &str) -> Option<&str> {
    let last = text.chars().next_back().filter(|c| c.is_alphabetic())?;
    let head = &text[..text.len() - last.len_utf8()];
    at_word_start(head).then_some(head)
}

fn is_lone_letter(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// Lower-case stopword set.
pub fn stopword_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().map(|w| w.as_ref().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_stems() {
        let abbr = Abbreviations::default();
        assert!(abbr.ends_with_abbreviation("Dr"));
        assert!(abbr.ends_with_abbreviation("He met Ms"));
        assert!(abbr.ends_with_abbreviation("apples, pears, etc"));
        assert!(abbr.ends_with_abbreviation("foo, i.e"));
        assert!(abbr.ends_with_abbreviation("on Jan"));
    }

    #[test]
    fn test_stem_must_start_a_word() {
        let abbr = Abbreviations::default();
        assert!(!abbr.ends_with_abbreviation("the devs"));
        assert!(!abbr.ends_with_abbreviation("HDr"));
        // Case-sensitive.
        assert!(!abbr.ends_with_abbreviation("dr"));
    }

    #[test]
    fn test_lone_letters_are_not_abbreviations() {
        let abbr = Abbreviations::default();
        assert!(!abbr.ends_with_abbreviation("So did I"));
        assert!(!abbr.ends_with_abbreviation("We chose plan B"));
    }

    #[test]
    fn test_initials() {
        assert!(Abbreviations::ends_with_initial("Washington D", "C"));
        assert!(Abbreviations::ends_with_initial("Washington D.C", "on Jan"));
        assert!(Abbreviations::ends_with_initial("J", "R"));
        assert!(Abbreviations::ends_with_initial("J. R. R", "Tolkien"));
        assert!(!Abbreviations::ends_with_initial("So did I", "Then we left"));
        assert!(!Abbreviations::ends_with_initial("We chose plan B", "It worked"));
        assert!(!Abbreviations::ends_with_initial("Mr. A", "Then"));
        assert!(!Abbreviations::ends_with_initial("5th", "C"));
        assert!(!Abbreviations::ends_with_initial("", "C"));
    }

    #[test]
    fn test_custom_list() {
        let abbr = Abbreviations::new(["approx.", "."]);
        assert_eq!(abbr.len(), 1);
        assert!(abbr.ends_with_abbreviation("approx"));
        assert!(!abbr.ends_with_abbreviation("Dr"));
    }

    #[test]
    fn test_stopword_set_lowercases() {
        let set = stopword_set(["The", "AND"]);
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert_eq!(stopword_set(STOPWORDS).len(), STOPWORDS.len());
    }
}

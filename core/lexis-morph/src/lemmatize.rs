/// Inflection rules, tried top to bottom. Longer suffixes sit above the
/// shorter ones they end with (`ies` above `es` above `s`).
pub const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ied", "y"),
    ("ying", "ie"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("ves", "f"),
    ("ing", ""),
    ("ed", ""),
    ("es", ""),
    ("s", ""),
];

/// Shortest lemma a rule may produce, in characters.
pub const MIN_LEMMA_LEN: usize = 2;

/// Applies the first rule whose suffix matches and whose output is long
/// enough; otherwise returns the word unchanged. Expects lower-case input.
pub fn apply_suffix_rules(word: &str) -> String {
    SUFFIX_RULES
        .iter()
        .find_map(|(suffix, replacement)| {
            let stem = word.strip_suffix(suffix)?;
            let lemma = format!("{stem}{replacement}");
            (lemma.chars().count() >= MIN_LEMMA_LEN).then_some(lemma)
        })
        .unwrap_or_else(|| word.to_string())
}

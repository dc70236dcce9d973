//! Built-in English tables, used when no store is configured or loading fails.

use lexis_protocol::MorphemeTables;

pub const TABLES_VERSION: u32 = 1;

pub const PREFIXES: &[(&str, &str)] = &[
    ("un", "not, opposite of"),
    ("re", "again, back"),
    ("pre", "before"),
    ("post", "after"),
    ("dis", "not, opposite"),
    ("mis", "wrongly"),
    ("anti", "against"),
    ("auto", "self"),
    ("co", "together"),
    ("de", "remove, reduce"),
    ("ex", "out of, former"),
    ("in", "not, in"),
    ("inter", "between"),
    ("non", "not"),
    ("over", "excessive"),
    ("sub", "under"),
    ("super", "above"),
    ("trans", "across"),
    ("under", "below"),
];

pub const SUFFIXES: &[(&str, &str)] = &[
    ("ed", "past tense"),
    ("ing", "present participle"),
    ("s", "plural/3rd person"),
    ("es", "plural"),
    ("er", "comparative/agent"),
    ("est", "superlative"),
    ("ly", "adverb"),
    ("ness", "state/quality"),
    ("tion", "action/process"),
    ("sion", "action/process"),
    ("ment", "action/result"),
    ("able", "capable of"),
    ("ible", "capable of"),
    ("ful", "full of"),
    ("less", "without"),
    ("ous", "possessing"),
    ("ive", "tending to"),
    ("al", "relating to"),
    ("ity", "state/quality"),
    ("ize", "make/become"),
    ("ise", "make/become"),
];

pub const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("was", "be"), ("were", "be"), ("been", "be"), ("being", "be"),
    ("had", "have"), ("has", "have"), ("having", "have"),
    ("did", "do"), ("does", "do"), ("done", "do"), ("doing", "do"),
    ("went", "go"), ("gone", "go"), ("going", "go"),
    ("saw", "see"), ("seen", "see"), ("seeing", "see"),
    ("took", "take"), ("taken", "take"), ("taking", "take"),
    ("came", "come"), ("coming", "come"),
    ("got", "get"), ("gotten", "get"), ("getting", "get"),
    ("made", "make"), ("making", "make"),
    ("said", "say"), ("saying", "say"),
    ("thought", "think"), ("thinking", "think"),
    ("found", "find"), ("finding", "find"),
    ("gave", "give"), ("given", "give"), ("giving", "give"),
    ("told", "tell"), ("telling", "tell"),
    ("felt", "feel"), ("feeling", "feel"),
    ("knew", "know"), ("known", "know"), ("knowing", "know"),
    ("left", "leave"), ("leaving", "leave"),
    ("kept", "keep"), ("keeping", "keep"),
    ("held", "hold"), ("holding", "hold"),
    ("wrote", "write"), ("written", "write"), ("writing", "write"),
    ("stood", "stand"), ("standing", "stand"),
    ("heard", "hear"), ("hearing", "hear"),
    ("brought", "bring"), ("bringing", "bring"),
    ("began", "begin"), ("begun", "begin"), ("beginning", "begin"),
    ("ran", "run"), ("running", "run"),
    ("sat", "sit"), ("sitting", "sit"),
    ("spoke", "speak"), ("spoken", "speak"), ("speaking", "speak"),
    ("ate", "eat"), ("eaten", "eat"), ("eating", "eat"),
];

pub const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("people", "person"),
];

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(surface, value)| (surface.to_string(), value.to_string()))
        .collect()
}

pub fn default_tables() -> MorphemeTables {
    MorphemeTables {
        version: TABLES_VERSION,
        prefixes: owned(PREFIXES),
        suffixes: owned(SUFFIXES),
        roots: Vec::new(),
        irregular_verbs: owned(IRREGULAR_VERBS),
        irregular_plurals: owned(IRREGULAR_PLURALS),
    }
}

use rkyv::{Archive, Deserialize, Serialize};
use crate::morphology::{MorphemeKind, PosSet};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Complete table set consumed by the morphological analyzer.
///
/// Every list keeps its source order: longest-match tie-breaking falls back to it.
/// Pairs are `(surface_form, gloss)` for the affix and root tables and
/// `(surface_form, base_form)` for the irregular tables.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct MorphemeTables {
    pub version: u32,
    pub prefixes: Vec<(String, String)>,
    pub suffixes: Vec<(String, String)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub roots: Vec<(String, String)>,
    pub irregular_verbs: Vec<(String, String)>,
    pub irregular_plurals: Vec<(String, String)>,
}

impl MorphemeTables {
    pub fn table(&self, kind: MorphemeKind) -> &[(String, String)] {
        match kind {
            MorphemeKind::Prefix => &self.prefixes,
            MorphemeKind::Root => &self.roots,
            MorphemeKind::Suffix => &self.suffixes,
        }
    }
}

/// One classified unit of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    pub text: String,
    pub position: usize,
    /// Byte offsets into the sentence.
    pub start_char: usize,
    pub end_char: usize,
    pub is_punctuation: bool,
    pub is_stopword: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Sentence {
    pub text: String,
    pub position: usize,
    /// Lower-cased word runs, punctuation excluded.
    pub words: Vec<String>,
    pub word_count: usize,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct SegmentationResult {
    pub original_text: String,
    pub sentence_count: usize,
    pub sentences: Vec<Sentence>,
    pub total_words: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Statistics {
    pub total_sentences: usize,
    pub total_words: usize,
    pub total_tokens: usize,
    pub total_stopwords: usize,
    pub avg_words_per_sentence: f64,
    pub unique_words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Morpheme {
    pub kind: MorphemeKind,
    pub surface_form: String,
    pub gloss: String,
}

impl Morpheme {
    pub fn new(kind: MorphemeKind, surface_form: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            kind,
            surface_form: surface_form.into(),
            gloss: gloss.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct WordAnalysis {
    pub original: String,
    pub lemma: String,
    pub prefix: Option<String>,
    pub root: Option<String>,
    pub suffix: Option<String>,
    pub morphemes: Vec<Morpheme>,
    pub possible_pos: PosSet,
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    // no_std: f64::round lives in std, so go through an integer cast.
    let scaled = value * 100.0;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5) as i64
    } else {
        (scaled - 0.5) as i64
    };
    rounded as f64 / 100.0
}

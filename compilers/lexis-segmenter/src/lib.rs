//! Sentence and token segmentation.
//!
//! [`Segmenter`] splits text into sentences (suppressing splits after known
//! abbreviations), tokenizes each sentence into word and punctuation tokens
//! with byte spans, and can persist the result through a [`Storage`]
//! collaborator.

pub mod lexicon;
pub mod parser;
pub mod sentence;
pub mod stats;
pub mod token;

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, error, info, warn};

use lexis_protocol::storage::{
    FieldMap, Persistence, Processed, Storage, StorageError, SENTENCES_TABLE, TEXT_SEGMENTS_TABLE, TOKENS_TABLE,
};
use lexis_protocol::{fields, RecordId, SegmentationResult, Sentence, Statistics, Token};

use crate::parser::{parse_with_spans, word_runs};

pub use lexicon::{Abbreviations, STOPWORDS};

pub struct Segmenter {
    abbreviations: Abbreviations,
    stopwords: HashSet<String>,
    include_punctuation: bool,
    store: Option<Arc<dyn Storage>>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            abbreviations: Abbreviations::default(),
            stopwords: lexicon::stopword_set(STOPWORDS),
            include_punctuation: true,
            store: None,
        }
    }

    pub fn with_storage(mut self, store: Arc<dyn Storage>) -> Self {
        self.store = Some(store);
        self
    }

    /// Whether `tokenize` emits punctuation tokens.
    pub fn with_punctuation(mut self, include: bool) -> Self {
        self.include_punctuation = include;
        self
    }

    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = lexicon::stopword_set(words);
        self
    }

    pub fn with_abbreviations(mut self, abbreviations: Abbreviations) -> Self {
        self.abbreviations = abbreviations;
        self
    }

    pub fn include_punctuation(&self) -> bool {
        self.include_punctuation
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn segment_sentences(&self, text: &str) -> Vec<String> {
        sentence::split_sentences(text, &self.abbreviations)
    }

    /// Lower-cased word runs, punctuation dropped.
    pub fn segment_words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        word_runs(&lowered).into_iter().map(str::to_string).collect()
    }

    /// Tokens with contiguous positions and byte spans into `sentence`.
    pub fn tokenize(&self, sentence: &str) -> Vec<Token> {
        parse_with_spans(sentence, self.include_punctuation)
            .into_iter()
            .enumerate()
            .map(|(position, (span, raw))| {
                let text = &sentence[span.start..span.end];
                let is_punctuation = raw.is_punctuation();
                Token {
                    text: text.to_string(),
                    position,
                    start_char: span.start,
                    end_char: span.end,
                    is_punctuation,
                    is_stopword: !is_punctuation && self.is_stopword(text),
                }
            })
            .collect()
    }

    /// Sentence split, then per-sentence word split and tokenization.
    pub fn segment(&self, text: &str) -> SegmentationResult {
        let sentences: Vec<Sentence> = self
            .segment_sentences(text)
            .into_iter()
            .enumerate()
            .map(|(position, text)| {
                let words = self.segment_words(&text);
                let tokens = self.tokenize(&text);
                Sentence {
                    word_count: words.len(),
                    text,
                    position,
                    words,
                    tokens,
                }
            })
            .collect();

        let total_words = sentences.iter().map(|s| s.word_count).sum();
        debug!("Segmented {} sentences, {} words", sentences.len(), total_words);

        SegmentationResult {
            original_text: text.to_string(),
            sentence_count: sentences.len(),
            sentences,
            total_words,
        }
    }

    /// Segments `text` and, when `persist` is set and a store is configured,
    /// writes the text, its sentences and their tokens. A storage failure is
    /// reported in the returned [`Persistence`] and leaves the result intact.
    pub fn process_text(&self, text: &str, persist: bool) -> Processed<SegmentationResult> {
        let result = self.segment(text);

        let persistence = match (&self.store, persist) {
            (Some(store), true) => match store_segmentation(store.as_ref(), &result) {
                Ok(id) => {
                    info!("Stored text segment {id} with {} sentences", result.sentence_count);
                    Persistence::Stored(Some(id))
                }
                Err(e) => {
                    error!("Failed to store segmentation: {e}");
                    Persistence::Failed(e)
                }
            },
            (None, true) => {
                warn!("No storage available, skipping storage of segmentation");
                Persistence::Skipped
            }
            _ => Persistence::Skipped,
        };

        Processed::new(result, persistence)
    }

    pub fn get_statistics(&self, result: &SegmentationResult) -> Statistics {
        stats::statistics(result)
    }
}

fn store_segmentation(store: &dyn Storage, result: &SegmentationResult) -> Result<RecordId, StorageError> {
    let text_id = store
        .insert_record(
            TEXT_SEGMENTS_TABLE,
            fields! {
                "original_text" => result.original_text.as_str(),
                "sentence_count" => result.sentence_count,
                "word_count" => result.total_words,
            },
        )?
        .ok_or_else(|| StorageError::MissingId {
            table: TEXT_SEGMENTS_TABLE.to_string(),
        })?;

    for sentence in &result.sentences {
        let sentence_id = store
            .insert_record(
                SENTENCES_TABLE,
                fields! {
                    "text_segment_id" => text_id,
                    "sentence_text" => sentence.text.as_str(),
                    "sentence_position" => sentence.position,
                    "word_count" => sentence.word_count,
                },
            )?
            .ok_or_else(|| StorageError::MissingId {
                table: SENTENCES_TABLE.to_string(),
            })?;

        if sentence.tokens.is_empty() {
            continue;
        }

        let rows: Vec<FieldMap> = sentence
            .tokens
            .iter()
            .map(|t| {
                fields! {
                    "sentence_id" => sentence_id,
                    "token" => t.text.as_str(),
                    "token_position" => t.position,
                    "is_punctuation" => t.is_punctuation,
                    "is_stopword" => t.is_stopword,
                }
            })
            .collect();
        store.insert_many(TOKENS_TABLE, rows)?;
    }

    Ok(text_id)
}

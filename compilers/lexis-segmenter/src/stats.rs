use std::collections::HashSet;

use lexis_protocol::{round2, SegmentationResult, Statistics};

/// Aggregate counts over a segmentation result. Unique words are counted
/// case-folded across all sentences.
pub fn statistics(result: &SegmentationResult) -> Statistics {
    let total_sentences = result.sentences.len();
    let total_words = result.total_words;

    let mut total_tokens = 0;
    let mut total_stopwords = 0;
    let mut unique = HashSet::new();

    for sentence in &result.sentences {
        total_tokens += sentence.tokens.len();
        total_stopwords += sentence.tokens.iter().filter(|t| t.is_stopword).count();
        unique.extend(sentence.words.iter().map(|w| w.to_lowercase()));
    }

    let avg_words_per_sentence = if total_sentences == 0 {
        0.0
    } else {
        round2(total_words as f64 / total_sentences as f64)
    };

    Statistics {
        total_sentences,
        total_words,
        total_tokens,
        total_stopwords,
        avg_words_per_sentence,
        unique_words: unique.len(),
    }
}

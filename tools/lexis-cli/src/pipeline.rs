//! End-to-end text processing: segmentation, morphology and the combined
//! statistics, sharing one store between both stages.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Serialize;

use lexis_morph::{MorphologyAnalyzer, TableSource};
use lexis_protocol::storage::{
    columns, FieldMap, Persistence, Processed, Query, Storage, MORPHEMES_TABLE, WORD_ANALYSIS_TABLE,
};
use lexis_protocol::{
    fields, round2, MorphemeKind, MorphemeTables, RecordId, SegmentationResult, Statistics, Token, WordAnalysis,
};
use lexis_segmenter::Segmenter;

use crate::config::Config;

/// Storage outcome in a serializable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Skipped,
    Stored { id: Option<u64> },
    Failed { reason: String },
}

impl From<&Persistence> for Outcome {
    fn from(persistence: &Persistence) -> Self {
        match persistence {
            Persistence::Skipped => Outcome::Skipped,
            Persistence::Stored(id) => Outcome::Stored { id: id.map(u64::from) },
            Persistence::Failed(e) => Outcome::Failed { reason: e.to_string() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceReport {
    pub segmentation: Outcome,
    pub morphology: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphologyStatistics {
    pub analyzed_words: usize,
    pub total_morphemes: usize,
    pub avg_morphemes_per_word: f64,
    pub words_with_prefix: usize,
    pub words_with_suffix: usize,
    pub prefix_percentage: f64,
    pub suffix_percentage: f64,
}

impl MorphologyStatistics {
    /// `None` when nothing was analyzed.
    pub fn from_analyses(analyses: &[WordAnalysis]) -> Option<Self> {
        if analyses.is_empty() {
            return None;
        }

        let analyzed = analyses.len() as f64;
        let total_morphemes: usize = analyses.iter().map(|a| a.morphemes.len()).sum();
        let words_with_prefix = analyses.iter().filter(|a| a.prefix.is_some()).count();
        let words_with_suffix = analyses.iter().filter(|a| a.suffix.is_some()).count();

        Some(Self {
            analyzed_words: analyses.len(),
            total_morphemes,
            avg_morphemes_per_word: round2(total_morphemes as f64 / analyzed),
            words_with_prefix,
            words_with_suffix,
            prefix_percentage: round2(words_with_prefix as f64 / analyzed * 100.0),
            suffix_percentage: round2(words_with_suffix as f64 / analyzed * 100.0),
        })
    }
}

/// Segmentation statistics, extended with morphology figures when any word
/// was analyzed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisStatistics {
    #[serde(flatten)]
    pub text: Statistics,
    #[serde(flatten)]
    pub morphology: Option<MorphologyStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub text: String,
    pub segmentation: SegmentationResult,
    pub morphology: Vec<WordAnalysis>,
    pub statistics: AnalysisStatistics,
    pub persistence: PersistenceReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceAnalysis {
    pub sentence: String,
    pub tokens: Vec<Token>,
    pub word_count: usize,
    pub morphology: Vec<WordAnalysis>,
}

pub struct Pipeline {
    segmenter: Segmenter,
    analyzer: MorphologyAnalyzer,
    store: Option<Arc<dyn Storage>>,
    store_segmentation: bool,
    store_morphology: bool,
}

impl Pipeline {
    /// Builds both stages from `config`. Explicit `tables` win over the
    /// tables held by the store.
    pub fn new(config: &Config, store: Option<Arc<dyn Storage>>, tables: Option<MorphemeTables>) -> Self {
        let segmenter = Segmenter::new().with_punctuation(config.segmentation.include_punctuation);
        let (segmenter, analyzer) = match &store {
            Some(store) => (
                segmenter.with_storage(store.clone()),
                MorphologyAnalyzer::with_storage(store.clone()),
            ),
            None => (segmenter, MorphologyAnalyzer::new()),
        };
        if let Some(tables) = &tables {
            analyzer.replace_tables(tables);
        }

        Self {
            segmenter,
            analyzer,
            store,
            store_segmentation: config.segmentation.store_results,
            store_morphology: config.morphology.store_results,
        }
    }

    pub fn analyzer(&self) -> &MorphologyAnalyzer {
        &self.analyzer
    }

    /// Segments `text`, then analyzes each distinct word once (in the order
    /// it first appears).
    pub fn process_text(&self, text: &str, analyze_morphology: bool, store: bool) -> PipelineReport {
        info!("Processing text of {} bytes", text.len());

        let segmentation = self.segmenter.process_text(text, store && self.store_segmentation);

        let morphology = if analyze_morphology {
            let words = unique_words(&segmentation.result);
            self.analyzer.analyze_batch(&words, store && self.store_morphology)
        } else {
            Processed::skipped(Vec::new())
        };

        let statistics = AnalysisStatistics {
            text: self.segmenter.get_statistics(&segmentation.result),
            morphology: MorphologyStatistics::from_analyses(&morphology.result),
        };
        let persistence = PersistenceReport {
            segmentation: Outcome::from(&segmentation.persistence),
            morphology: Outcome::from(&morphology.persistence),
        };

        debug!("Text processing completed");
        PipelineReport {
            text: text.to_string(),
            segmentation: segmentation.result,
            morphology: morphology.result,
            statistics,
            persistence,
        }
    }

    /// Tokens and word analyses for one sentence. Nothing is stored.
    pub fn analyze_sentence(&self, sentence: &str) -> SentenceAnalysis {
        let tokens = self.segmenter.tokenize(sentence);
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| !t.is_punctuation)
            .map(|t| t.text.as_str())
            .collect();
        let morphology = self.analyzer.analyze_batch(&words, false).into_result();

        SentenceAnalysis {
            sentence: sentence.to_string(),
            word_count: words.len(),
            tokens,
            morphology,
        }
    }

    pub fn lemmatize_text(&self, text: &str) -> String {
        let lexicon = self.analyzer.lexicon();
        self.segmenter
            .segment_words(text)
            .iter()
            .map(|w| lexicon.lemmatize(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Statistics of a full run that stores nothing.
    pub fn text_statistics(&self, text: &str) -> AnalysisStatistics {
        self.process_text(text, true, false).statistics
    }

    /// Stores a new morpheme and reloads the analyzer tables from the store.
    pub fn add_morpheme(&self, surface_form: &str, kind: MorphemeKind, gloss: &str) -> Result<Option<RecordId>> {
        let store = self.require_store()?;
        let id = store
            .insert_record(
                MORPHEMES_TABLE,
                fields! {
                    columns::SURFACE_FORM => surface_form,
                    columns::KIND => kind.as_str(),
                    columns::GLOSS => gloss,
                },
            )
            .with_context(|| format!("Failed to add morpheme '{surface_form}'"))?;
        info!("Added morpheme: {surface_form} ({kind})");

        if self.analyzer.reload_tables() == TableSource::Defaults {
            debug!("Morpheme tables fell back to defaults after reload");
        }
        Ok(id)
    }

    /// Stored analyses of `word`, oldest first.
    pub fn search_word_analyses(&self, word: &str) -> Result<Vec<FieldMap>> {
        let store = self.require_store()?;
        let query = Query::table(WORD_ANALYSIS_TABLE).filter("word", word);
        store.fetch_all(&query).with_context(|| format!("Failed to query {query}"))
    }

    /// Last `limit` rows matching `query`, newest first.
    pub fn recent_rows(&self, query: &Query, limit: usize) -> Result<Vec<FieldMap>> {
        let store = self.require_store()?;
        let rows = store.fetch_all(query).with_context(|| format!("Failed to query {query}"))?;
        Ok(rows.into_iter().rev().take(limit).collect())
    }

    fn require_store(&self) -> Result<&dyn Storage> {
        match &self.store {
            Some(store) => Ok(store.as_ref()),
            None => bail!("No store configured; pass --store or set [storage] path"),
        }
    }
}

fn unique_words(result: &SegmentationResult) -> Vec<String> {
    let mut seen = HashSet::new();
    result
        .sentences
        .iter()
        .flat_map(|s| s.words.iter())
        .filter(|w| seen.insert(w.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_protocol::storage::{FieldValue, StorageError, SENTENCES_TABLE, TEXT_SEGMENTS_TABLE, TOKENS_TABLE};
    use lexis_store::MemoryStore;

    fn pipeline_with_store() -> (Pipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.seed_morphemes(&MorphologyAnalyzer::default_tables()).unwrap();
        let pipeline = Pipeline::new(&Config::default(), Some(store.clone()), None);
        (pipeline, store)
    }

    struct DownStore;

    impl Storage for DownStore {
        fn insert_record(&self, _table: &str, _fields: FieldMap) -> std::result::Result<Option<RecordId>, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn insert_many(&self, _table: &str, _rows: Vec<FieldMap>) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn fetch_all(&self, _query: &Query) -> std::result::Result<Vec<FieldMap>, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
    }

    #[test]
    fn test_process_text_without_store() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        let report = pipeline.process_text("The runners were unhappy. They ran quickly!", true, true);

        assert_eq!(report.segmentation.sentence_count, 2);
        assert_eq!(report.persistence.segmentation, Outcome::Skipped);
        assert_eq!(report.persistence.morphology, Outcome::Skipped);

        let words: Vec<&str> = report.morphology.iter().map(|a| a.original.as_str()).collect();
        assert_eq!(words, ["the", "runners", "were", "unhappy", "they", "ran", "quickly"]);

        let morph = report.statistics.morphology.as_ref().unwrap();
        assert_eq!(morph.analyzed_words, 7);
        assert_eq!(report.statistics.text.total_words, 7);
    }

    #[test]
    fn test_words_are_deduplicated_in_order() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        let report = pipeline.process_text("Cats chase cats. Dogs chase cats.", true, false);
        let words: Vec<&str> = report.morphology.iter().map(|a| a.original.as_str()).collect();
        assert_eq!(words, ["cats", "chase", "dogs"]);
    }

    #[test]
    fn test_without_morphology() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        let report = pipeline.process_text("Just segment this.", false, false);
        assert!(report.morphology.is_empty());
        assert!(report.statistics.morphology.is_none());

        let json = serde_json::to_value(&report.statistics).unwrap();
        assert_eq!(json["total_sentences"], 1);
        assert!(json.get("analyzed_words").is_none());
    }

    #[test]
    fn test_morphology_statistics() {
        let analyzer = MorphologyAnalyzer::new();
        let analyses: Vec<WordAnalysis> = ["unhappy", "quickly", "cat"]
            .iter()
            .map(|w| analyzer.analyze_word(w))
            .collect();
        let stats = MorphologyStatistics::from_analyses(&analyses).unwrap();

        assert_eq!(stats.analyzed_words, 3);
        assert_eq!(stats.words_with_prefix, 1);
        assert_eq!(stats.words_with_suffix, 1);
        assert_eq!(stats.total_morphemes, 5);
        assert_eq!(stats.avg_morphemes_per_word, 1.67);
        assert_eq!(stats.prefix_percentage, 33.33);
        assert!(MorphologyStatistics::from_analyses(&[]).is_none());
    }

    #[test]
    fn test_process_text_persists() {
        let (pipeline, store) = pipeline_with_store();
        let report = pipeline.process_text("Hello world.", true, true);

        assert_eq!(report.persistence.segmentation, Outcome::Stored { id: Some(1) });
        assert_eq!(report.persistence.morphology, Outcome::Stored { id: None });
        assert_eq!(store.rows(WORD_ANALYSIS_TABLE).len(), 2);

        let found = pipeline.search_word_analyses("hello").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("lemma"), Some(&FieldValue::from("hello")));
    }

    #[test]
    fn test_store_flags_from_config() {
        let store = Arc::new(MemoryStore::new());
        let mut config = Config::default();
        config.morphology.store_results = false;
        let pipeline = Pipeline::new(&config, Some(store.clone()), None);

        let report = pipeline.process_text("Hello world.", true, true);
        assert!(matches!(report.persistence.segmentation, Outcome::Stored { .. }));
        assert_eq!(report.persistence.morphology, Outcome::Skipped);
        assert!(store.rows(WORD_ANALYSIS_TABLE).is_empty());
    }

    #[test]
    fn test_storage_failure_is_reported() {
        let pipeline = Pipeline::new(&Config::default(), Some(Arc::new(DownStore)), None);
        let report = pipeline.process_text("Still fine.", true, true);

        assert!(matches!(report.persistence.segmentation, Outcome::Failed { .. }));
        assert!(matches!(report.persistence.morphology, Outcome::Failed { .. }));
        assert_eq!(report.segmentation.sentence_count, 1);
        assert_eq!(report.morphology.len(), 2);
    }

    #[test]
    fn test_analyze_sentence() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        let analysis = pipeline.analyze_sentence("Birds were flying.");
        assert_eq!(analysis.word_count, 3);
        assert_eq!(analysis.tokens.len(), 4);
        assert_eq!(analysis.morphology[1].lemma, "be");
    }

    #[test]
    fn test_lemmatize_text() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        assert_eq!(pipeline.lemmatize_text("The babies ate the boxes."), "the baby eat the box");
    }

    #[test]
    fn test_add_morpheme_reloads() {
        let (pipeline, store) = pipeline_with_store();
        assert_eq!(pipeline.analyzer().analyze_word("megastore").prefix, None);

        let id = pipeline.add_morpheme("mega", MorphemeKind::Prefix, "very large").unwrap();
        assert!(id.is_some());
        assert_eq!(store.rows(MORPHEMES_TABLE).len(), 41);

        let analysis = pipeline.analyzer().analyze_word("megastore");
        assert_eq!(analysis.prefix.as_deref(), Some("mega"));
        assert_eq!(analysis.root.as_deref(), Some("store"));
    }

    #[test]
    fn test_store_required() {
        let pipeline = Pipeline::new(&Config::default(), None, None);
        assert!(pipeline.add_morpheme("mega", MorphemeKind::Prefix, "large").is_err());
        assert!(pipeline.search_word_analyses("cat").is_err());
        assert!(pipeline.recent_rows(&Query::table(TEXT_SEGMENTS_TABLE), 5).is_err());
    }

    #[test]
    fn test_recent_texts() {
        let (pipeline, _store) = pipeline_with_store();
        for text in ["First.", "Second.", "Third."] {
            pipeline.process_text(text, false, true);
        }
        let recent = pipeline.recent_rows(&Query::table(TEXT_SEGMENTS_TABLE), 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].get("original_text"), Some(&FieldValue::from("Third.")));
    }

    #[test]
    fn test_recent_tokens_of_one_sentence() {
        let (pipeline, _store) = pipeline_with_store();
        pipeline.process_text("One two. Three four five.", true, true);

        let query = Query::table(TOKENS_TABLE).filter("sentence_id", RecordId(2));
        let tokens = pipeline.recent_rows(&query, 10).unwrap();
        let texts: Vec<String> = tokens.iter().map(|t| t["token"].to_string()).collect();
        assert_eq!(texts, [".", "five", "four", "Three"]);

        let sentences = pipeline.recent_rows(&Query::table(SENTENCES_TABLE), 1).unwrap();
        assert_eq!(sentences[0].get("sentence_text"), Some(&FieldValue::from("Three four five.")));

        let analyses = pipeline.recent_rows(&Query::table(WORD_ANALYSIS_TABLE), 2).unwrap();
        assert_eq!(analyses[0].get("word"), Some(&FieldValue::from("five")));
    }

    #[test]
    fn test_explicit_tables_override_store() {
        let store = Arc::new(MemoryStore::new());
        let mut tables = MorphologyAnalyzer::default_tables();
        tables.prefixes.push(("mega".to_string(), "very large".to_string()));
        let pipeline = Pipeline::new(&Config::default(), Some(store), Some(tables));
        assert_eq!(pipeline.analyzer().analyze_word("megastore").prefix.as_deref(), Some("mega"));
    }
}

//! Rule-based morphological analysis.
//!
//! [`MorphologyAnalyzer`] splits a word into prefix, root and suffix with
//! longest-match affix tables, resolves irregular forms, guesses candidate
//! parts of speech from the suffix and produces a lemma. Tables come from the
//! built-in defaults, a compiled archive, or a [`Storage`] collaborator.

pub mod archive;
pub mod error;
pub mod lemmatize;
pub mod lexicon;
pub mod pos;
pub mod tables;

use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::RwLock;

use lexis_protocol::storage::{
    columns, FieldMap, Persistence, Processed, Query, Storage, MORPHEMES_TABLE, WORD_ANALYSIS_TABLE,
};
use lexis_protocol::{fields, MorphemeKind, MorphemeTables, WordAnalysis};

pub use error::{MorphError, Result};
pub use lexicon::{Lexicon, LookupTable};

/// Where the tables currently in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Storage,
    Defaults,
}

pub struct MorphologyAnalyzer {
    lexicon: RwLock<Arc<Lexicon>>,
    store: Option<Arc<dyn Storage>>,
}

impl Default for MorphologyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphologyAnalyzer {
    /// Analyzer over the built-in tables, without storage.
    pub fn new() -> Self {
        Self::with_tables(&tables::default_tables())
    }

    pub fn with_tables(tables: &MorphemeTables) -> Self {
        Self {
            lexicon: RwLock::new(Arc::new(Lexicon::from_tables(tables))),
            store: None,
        }
    }

    /// Analyzer that persists to `store` and loads its affix tables from it.
    pub fn with_storage(store: Arc<dyn Storage>) -> Self {
        let analyzer = Self {
            lexicon: RwLock::new(Arc::new(Lexicon::from_tables(&tables::default_tables()))),
            store: Some(store),
        };
        analyzer.reload_tables();
        analyzer
    }

    pub fn default_tables() -> MorphemeTables {
        tables::default_tables()
    }

    /// Snapshot of the tables in use.
    pub fn lexicon(&self) -> Arc<Lexicon> {
        self.lexicon.read().clone()
    }

    pub fn tables(&self) -> MorphemeTables {
        self.lexicon().to_tables()
    }

    /// Installs a complete table set.
    pub fn replace_tables(&self, tables: &MorphemeTables) {
        let lexicon = Arc::new(Lexicon::from_tables(tables));
        info!(
            "Installed tables v{}: {} prefixes, {} suffixes, {} roots",
            tables.version,
            lexicon.prefixes.len(),
            lexicon.suffixes.len(),
            lexicon.roots.len()
        );
        *self.lexicon.write() = lexicon;
    }

    /// Re-reads the affix tables from the configured store. Without a store
    /// the built-in tables are reinstalled.
    pub fn reload_tables(&self) -> TableSource {
        match &self.store {
            Some(store) => self.reload_from(store.as_ref()),
            None => {
                debug!("No storage configured, using default morpheme tables");
                self.install_defaults();
                TableSource::Defaults
            }
        }
    }

    /// Replaces the prefix, suffix and root tables with rows from `store`.
    /// A failed fetch, a malformed row or an unseeded store installs the full
    /// default table set instead.
    pub fn reload_from(&self, store: &dyn Storage) -> TableSource {
        let current = self.lexicon();
        match fetch_affixes(store, &current) {
            Ok(lexicon) if lexicon.prefixes.is_empty() && lexicon.suffixes.is_empty() && lexicon.roots.is_empty() => {
                warn!("Storage holds no morpheme rows, using default morpheme tables");
                self.install_defaults();
                TableSource::Defaults
            }
            Ok(lexicon) => {
                info!(
                    "Loaded {} prefixes, {} suffixes, {} roots",
                    lexicon.prefixes.len(),
                    lexicon.suffixes.len(),
                    lexicon.roots.len()
                );
                *self.lexicon.write() = Arc::new(lexicon);
                TableSource::Storage
            }
            Err(e) => {
                error!("Failed to load morphemes from storage: {e}");
                self.install_defaults();
                TableSource::Defaults
            }
        }
    }

    fn install_defaults(&self) {
        *self.lexicon.write() = Arc::new(Lexicon::from_tables(&tables::default_tables()));
    }

    pub fn analyze_word(&self, word: &str) -> WordAnalysis {
        self.lexicon().analyze(word)
    }

    pub fn lemmatize(&self, word: &str) -> String {
        self.lexicon().lemmatize(word)
    }

    /// Surface forms of the morphemes of `word`, in order.
    pub fn segment_morphemes(&self, word: &str) -> Vec<String> {
        self.analyze_word(word)
            .morphemes
            .into_iter()
            .map(|m| m.surface_form)
            .collect()
    }

    /// Analyzes every word against one table snapshot, then optionally
    /// persists the whole batch.
    pub fn analyze_batch<S: AsRef<str>>(&self, words: &[S], persist: bool) -> Processed<Vec<WordAnalysis>> {
        let lexicon = self.lexicon();
        let analyses: Vec<WordAnalysis> = words.iter().map(|w| lexicon.analyze(w.as_ref())).collect();
        debug!("Analyzed {} words", analyses.len());

        let persistence = match (&self.store, persist) {
            (Some(store), true) => store_analyses(store.as_ref(), &analyses),
            (None, true) => {
                warn!("No storage available, skipping storage of analyses");
                Persistence::Skipped
            }
            _ => Persistence::Skipped,
        };

        Processed::new(analyses, persistence)
    }
}

fn fetch_affixes(store: &dyn Storage, current: &Lexicon) -> Result<Lexicon> {
    let prefixes = fetch_table(store, MorphemeKind::Prefix)?;
    let suffixes = fetch_table(store, MorphemeKind::Suffix)?;
    let roots = fetch_table(store, MorphemeKind::Root)?;
    Ok(current.with_affixes(prefixes, suffixes, roots))
}

fn fetch_table(store: &dyn Storage, kind: MorphemeKind) -> Result<LookupTable> {
    let query = Query::table(MORPHEMES_TABLE).filter(columns::KIND, kind.as_str());
    let rows = store.fetch_all(&query)?;

    let mut pairs = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(row_kind) = row.get(columns::KIND) {
            let row_kind = row_kind.to_string();
            let parsed: MorphemeKind = row_kind.parse().map_err(|_| MorphError::UnknownKind(row_kind))?;
            if parsed != kind {
                continue;
            }
        }
        pairs.push(morpheme_row(row)?);
    }
    Ok(LookupTable::from_pairs(pairs))
}

fn morpheme_row(row: &FieldMap) -> Result<(String, String)> {
    let surface = row
        .get(columns::SURFACE_FORM)
        .and_then(|v| v.as_str())
        .ok_or(MorphError::MissingColumn {
            column: columns::SURFACE_FORM,
        })?;
    let gloss = row.get(columns::GLOSS).and_then(|v| v.as_str()).unwrap_or_default();
    Ok((surface.to_string(), gloss.to_string()))
}

fn store_analyses(store: &dyn Storage, analyses: &[WordAnalysis]) -> Persistence {
    if analyses.is_empty() {
        return Persistence::Skipped;
    }

    let records: Vec<FieldMap> = analyses
        .iter()
        .map(|a| {
            let pos_tag = (!a.possible_pos.is_empty())
                .then(|| a.possible_pos.parts().map(|p| p.as_str()).collect::<Vec<_>>().join(","));
            fields! {
                "word" => a.original.as_str(),
                "root" => a.root.clone(),
                "prefix" => a.prefix.clone(),
                "suffix" => a.suffix.clone(),
                "lemma" => a.lemma.as_str(),
                "pos_tag" => pos_tag,
            }
        })
        .collect();

    let count = records.len();
    match store.insert_many(WORD_ANALYSIS_TABLE, records) {
        Ok(()) => {
            info!("Stored {count} morphological analyses");
            Persistence::Stored(None)
        }
        Err(e) => {
            error!("Failed to store morphological analyses: {e}");
            Persistence::Failed(e)
        }
    }
}

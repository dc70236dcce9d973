use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use lexis_morph::archive::{from_archive_bytes, to_archive_bytes};
use lexis_morph::MorphologyAnalyzer;
use lexis_protocol::storage::{
    Query, Storage, MORPHEMES_TABLE, SENTENCES_TABLE, TEXT_SEGMENTS_TABLE, TOKENS_TABLE, WORD_ANALYSIS_TABLE,
};
use lexis_protocol::{MorphemeKind, MorphemeTables, RecordId};
use lexis_segmenter::Segmenter;
use lexis_store::MemoryStore;

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::Cli;

#[derive(Subcommand)]
pub enum Command {
    /// Split text into sentences and tokens
    Segment {
        /// Text to process, or - for stdin
        text: String,
    },
    /// Tokenize text without splitting sentences
    Tokenize {
        text: String,
        /// Drop punctuation tokens
        #[arg(long)]
        no_punct: bool,
    },
    /// Morphological analysis of individual words
    Analyze {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Analyze the tokens of a single sentence
    Sentence { text: String },
    /// Replace every word with its lemma
    Lemmatize { text: String },
    /// Full pipeline: segmentation, morphology and statistics
    Process {
        text: String,
        #[arg(long)]
        no_morphology: bool,
    },
    /// Text statistics, nothing stored
    Stats { text: String },
    /// Write the built-in tables as JSON
    DumpTables {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Compile JSON tables into a binary archive
    CompileTables {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Validate a binary archive and summarize it
    InspectTables {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Seed the store with the morpheme tables
    InitStore,
    /// Store a new morpheme
    AddMorpheme {
        surface: String,
        #[arg(value_parser = parse_kind)]
        kind: MorphemeKind,
        gloss: String,
    },
    /// Stored analyses of a word
    Search { word: String },
    /// Most recently stored rows of an analysis table
    Recent {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        #[arg(short, long, value_enum, default_value_t = StoredTable::TextSegments)]
        table: StoredTable,
        /// Only tokens of this sentence id
        #[arg(long, value_name = "ID")]
        sentence: Option<u64>,
    },
    /// Row counts per table
    Counts,
    /// Delete stored analysis results, keeping morphemes
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoredTable {
    TextSegments,
    Sentences,
    Tokens,
    WordAnalysis,
}

impl StoredTable {
    pub fn name(self) -> &'static str {
        match self {
            StoredTable::TextSegments => TEXT_SEGMENTS_TABLE,
            StoredTable::Sentences => SENTENCES_TABLE,
            StoredTable::Tokens => TOKENS_TABLE,
            StoredTable::WordAnalysis => WORD_ANALYSIS_TABLE,
        }
    }
}

/// Rows of `table`, narrowed to one sentence's tokens when `sentence` is set.
pub fn recent_query(table: StoredTable, sentence: Option<u64>) -> Result<Query> {
    let query = Query::table(table.name());
    match (table, sentence) {
        (_, None) => Ok(query),
        (StoredTable::Tokens, Some(id)) => Ok(query.filter("sentence_id", RecordId(id))),
        (_, Some(_)) => bail!("--sentence only applies to --table tokens"),
    }
}

fn parse_kind(s: &str) -> std::result::Result<MorphemeKind, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Reads stdin when `arg` is `-`.
fn read_text(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
    Ok(text)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn load_tables(path: &Path) -> Result<MorphemeTables> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read table archive {}", path.display()))?;
    from_archive_bytes(&bytes).with_context(|| format!("Invalid table archive {}", path.display()))
}

pub fn compile_tables(input: &Path, output: &Path) -> Result<MorphemeTables> {
    let json = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let tables: MorphemeTables = serde_json::from_str(&json).context("Failed to parse table JSON")?;

    info!(
        "Compiling tables version {} with {} prefixes and {} suffixes",
        tables.version,
        tables.prefixes.len(),
        tables.suffixes.len()
    );
    let bytes = to_archive_bytes(&tables)?;
    fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(tables)
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ArchiveSummary {
    pub version: u32,
    pub prefixes: usize,
    pub suffixes: usize,
    pub roots: usize,
    pub irregular_verbs: usize,
    pub irregular_plurals: usize,
}

/// Validates the archive in place without deserializing it.
pub fn inspect_tables(path: &Path) -> Result<ArchiveSummary> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);

    let archived = rkyv::check_archived_root::<MorphemeTables>(&aligned)
        .map_err(|e| anyhow!("Invalid table archive {}: {e}", path.display()))?;

    Ok(ArchiveSummary {
        version: archived.version.into(),
        prefixes: archived.prefixes.len(),
        suffixes: archived.suffixes.len(),
        roots: archived.roots.len(),
        irregular_verbs: archived.irregular_verbs.len(),
        irregular_plurals: archived.irregular_plurals.len(),
    })
}

fn require_store(store: &Option<Arc<MemoryStore>>) -> Result<&MemoryStore> {
    store
        .as_deref()
        .ok_or_else(|| anyhow!("No store configured; pass --store or set [storage] path"))
}

pub fn execute(cli: Cli, config: Config) -> Result<()> {
    let store_path = cli.store.or_else(|| config.storage.path.clone());
    let store = match &store_path {
        Some(path) => Some(Arc::new(
            MemoryStore::load(path).with_context(|| format!("Failed to open store {}", path.display()))?,
        )),
        None => None,
    };
    let tables = match cli.tables.as_ref().or(config.morphology.tables.as_ref()) {
        Some(path) => Some(load_tables(path)?),
        None => None,
    };
    let persist = !cli.no_store;

    let pipeline = Pipeline::new(
        &config,
        store.clone().map(|s| s as Arc<dyn Storage>),
        tables,
    );

    let dirty = match cli.command {
        Command::Segment { text } => {
            let report = pipeline.process_text(&read_text(text)?, false, persist);
            print_json(&report.segmentation)?;
            persist
        }
        Command::Tokenize { text, no_punct } => {
            let text = read_text(text)?;
            let segmenter = Segmenter::new().with_punctuation(config.segmentation.include_punctuation && !no_punct);
            print_json(&segmenter.tokenize(&text))?;
            false
        }
        Command::Analyze { words } => {
            let processed = pipeline
                .analyzer()
                .analyze_batch(&words, persist && config.morphology.store_results);
            print_json(&processed.result)?;
            persist
        }
        Command::Sentence { text } => {
            print_json(&pipeline.analyze_sentence(&read_text(text)?))?;
            false
        }
        Command::Lemmatize { text } => {
            println!("{}", pipeline.lemmatize_text(&read_text(text)?));
            false
        }
        Command::Process { text, no_morphology } => {
            print_json(&pipeline.process_text(&read_text(text)?, !no_morphology, persist))?;
            persist
        }
        Command::Stats { text } => {
            print_json(&pipeline.text_statistics(&read_text(text)?))?;
            false
        }
        Command::DumpTables { output } => {
            let json = serde_json::to_string_pretty(&MorphologyAnalyzer::default_tables())?;
            fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Default tables written to {}", output.display());
            false
        }
        Command::CompileTables { input, output } => {
            let tables = compile_tables(&input, &output)?;
            println!("Compiled tables version {} to {}", tables.version, output.display());
            false
        }
        Command::InspectTables { input } => {
            print_json(&inspect_tables(&input)?)?;
            false
        }
        Command::InitStore => {
            let store = require_store(&store)?;
            if store.counts().get(MORPHEMES_TABLE).copied().unwrap_or(0) > 0 {
                bail!("Store already holds morphemes; run 'clear' or use a new store file");
            }
            let seeded = store.seed_morphemes(&MorphologyAnalyzer::default_tables())?;
            println!("Seeded {seeded} morphemes");
            true
        }
        Command::AddMorpheme { surface, kind, gloss } => {
            let id = pipeline.add_morpheme(&surface, kind, &gloss)?;
            match id {
                Some(id) => println!("Added morpheme {surface} ({kind}) as {id}"),
                None => println!("Added morpheme {surface} ({kind})"),
            }
            true
        }
        Command::Search { word } => {
            print_json(&pipeline.search_word_analyses(&word.to_lowercase())?)?;
            false
        }
        Command::Recent { limit, table, sentence } => {
            print_json(&pipeline.recent_rows(&recent_query(table, sentence)?, limit)?)?;
            false
        }
        Command::Counts => {
            print_json(&require_store(&store)?.counts())?;
            false
        }
        Command::Clear => {
            print_json(&require_store(&store)?.clear_analysis_data())?;
            true
        }
    };

    if let (true, Some(path), Some(store)) = (dirty, &store_path, &store) {
        store
            .save(path)
            .with_context(|| format!("Failed to save store {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_passthrough() {
        assert_eq!(read_text("hello".to_string()).unwrap(), "hello");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("suffix").unwrap(), MorphemeKind::Suffix);
        assert!(parse_kind("infix").is_err());
    }

    #[test]
    fn test_compile_then_load_and_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("tables.json");
        let bin_path = dir.path().join("tables.bin");

        let mut tables = MorphologyAnalyzer::default_tables();
        tables.version = 7;
        tables.roots.push(("happy".to_string(), "glad".to_string()));
        fs::write(&json_path, serde_json::to_string(&tables).unwrap()).unwrap();

        let compiled = compile_tables(&json_path, &bin_path).unwrap();
        assert_eq!(compiled, tables);
        assert_eq!(load_tables(&bin_path).unwrap(), tables);

        let summary = inspect_tables(&bin_path).unwrap();
        assert_eq!(summary.version, 7);
        assert_eq!(summary.prefixes, 19);
        assert_eq!(summary.suffixes, 21);
        assert_eq!(summary.roots, 1);
        assert_eq!(summary.irregular_plurals, 8);
    }

    #[test]
    fn test_json_without_roots_compiles() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("tables.json");
        fs::write(
            &json_path,
            r#"{"version":2,"prefixes":[["re","again"]],"suffixes":[],"irregular_verbs":[],"irregular_plurals":[]}"#,
        )
        .unwrap();

        let tables = compile_tables(&json_path, &dir.path().join("out.bin")).unwrap();
        assert!(tables.roots.is_empty());
        assert_eq!(tables.prefixes.len(), 1);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        fs::write(&path, b"not an archive").unwrap();
        assert!(inspect_tables(&path).is_err());
        assert!(load_tables(&path).is_err());
    }

    #[test]
    fn test_recent_query() {
        let query = recent_query(StoredTable::Tokens, Some(3)).unwrap();
        assert_eq!(query, Query::table(TOKENS_TABLE).filter("sentence_id", RecordId(3)));
        assert_eq!(recent_query(StoredTable::WordAnalysis, None).unwrap().table, WORD_ANALYSIS_TABLE);
        assert!(recent_query(StoredTable::Sentences, Some(1)).is_err());
    }

    #[test]
    fn test_require_store() {
        assert!(require_store(&None).is_err());
        let store = Some(Arc::new(MemoryStore::new()));
        assert!(require_store(&store).is_ok());
    }
}

//! In-memory implementation of the storage collaborator.
//!
//! Rows live in per-table vectors behind a mutex. Every inserted row gets an
//! auto-increment `id` column. The whole store can be written to and read
//! back from a JSON snapshot, which is how the CLI keeps results between runs.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lexis_protocol::storage::{
    columns, FieldMap, FieldValue, Query, Storage, StorageError, MORPHEMES_TABLE, SENTENCES_TABLE,
    TEXT_SEGMENTS_TABLE, TOKENS_TABLE, WORD_ANALYSIS_TABLE,
};
use lexis_protocol::{MorphemeKind, MorphemeTables, RecordId};

pub const ID_COLUMN: &str = "id";

/// Tables emptied by [`MemoryStore::clear_analysis_data`], children first.
pub const ANALYSIS_TABLES: [&str; 4] = [TOKENS_TABLE, WORD_ANALYSIS_TABLE, SENTENCES_TABLE, TEXT_SEGMENTS_TABLE];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Table {
    next_id: u64,
    rows: Vec<FieldMap>,
}

impl Table {
    fn push(&mut self, mut row: FieldMap) -> RecordId {
        self.next_id += 1;
        row.insert(ID_COLUMN.to_string(), FieldValue::Int(self.next_id as i64));
        self.rows.push(row);
        RecordId(self.next_id)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Snapshot {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a snapshot written by [`MemoryStore::save`]. A missing file
    /// gives an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let snapshot = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
                Snapshot::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            inner: Mutex::new(snapshot),
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&*self.inner.lock())?;
        fs::write(path.as_ref(), json)?;
        info!("Saved store snapshot to {}", path.as_ref().display());
        Ok(())
    }

    /// Writes the prefix, suffix and root tables as morpheme rows.
    pub fn seed_morphemes(&self, tables: &MorphemeTables) -> Result<usize, StorageError> {
        let rows: Vec<FieldMap> = [MorphemeKind::Prefix, MorphemeKind::Suffix, MorphemeKind::Root]
            .into_iter()
            .flat_map(|kind| {
                tables.table(kind).iter().map(move |(surface, gloss)| {
                    lexis_protocol::fields! {
                        columns::SURFACE_FORM => surface.as_str(),
                        columns::KIND => kind.as_str(),
                        columns::GLOSS => gloss.as_str(),
                    }
                })
            })
            .collect();

        if rows.is_empty() {
            return Ok(0);
        }
        let count = rows.len();
        self.insert_many(MORPHEMES_TABLE, rows)?;
        Ok(count)
    }

    pub fn rows(&self, table: &str) -> Vec<FieldMap> {
        self.inner
            .lock()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.inner
            .lock()
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.rows.len()))
            .collect()
    }

    /// Empties the analysis tables and resets their ids. Morphemes are kept.
    pub fn clear_analysis_data(&self) -> BTreeMap<String, usize> {
        let mut inner = self.inner.lock();
        let mut deleted = BTreeMap::new();
        for name in ANALYSIS_TABLES {
            let count = inner.tables.remove(name).map_or(0, |t| t.rows.len());
            deleted.insert(name.to_string(), count);
        }
        info!("Cleared analysis data: {deleted:?}");
        deleted
    }
}

fn check_table(table: &str) -> Result<(), StorageError> {
    if table.is_empty() {
        return Err(StorageError::Rejected {
            table: table.to_string(),
            reason: "empty table name".to_string(),
        });
    }
    Ok(())
}

impl Storage for MemoryStore {
    fn insert_record(&self, table: &str, fields: FieldMap) -> Result<Option<RecordId>, StorageError> {
        check_table(table)?;
        let id = self.inner.lock().tables.entry(table.to_string()).or_default().push(fields);
        Ok(Some(id))
    }

    fn insert_many(&self, table: &str, rows: Vec<FieldMap>) -> Result<(), StorageError> {
        check_table(table)?;
        if rows.is_empty() {
            return Err(StorageError::Rejected {
                table: table.to_string(),
                reason: "empty batch".to_string(),
            });
        }

        let mut inner = self.inner.lock();
        let target = inner.tables.entry(table.to_string()).or_default();
        for row in rows {
            target.push(row);
        }
        Ok(())
    }

    fn fetch_all(&self, query: &Query) -> Result<Vec<FieldMap>, StorageError> {
        let inner = self.inner.lock();
        let rows = inner
            .tables
            .get(&query.table)
            .map(|t| t.rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();
        Ok(rows)
    }
}

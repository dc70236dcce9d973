//! Contract for the persistence collaborator.
//!
//! The analysis core never talks to a database directly. It writes rows
//! through [`Storage`] and reads morpheme tables back through
//! [`Storage::fetch_all`]. Failures come back as [`StorageError`] values and
//! are turned into a [`Persistence`] outcome next to the in-memory result,
//! so a broken store never invalidates an analysis.

use std::collections::BTreeMap;
use std::fmt;
use std::string::{String, ToString};
use std::vec::Vec;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::ids::RecordId;

pub const MORPHEMES_TABLE: &str = "morphemes";
pub const TEXT_SEGMENTS_TABLE: &str = "text_segments";
pub const SENTENCES_TABLE: &str = "sentences";
pub const TOKENS_TABLE: &str = "tokens";
pub const WORD_ANALYSIS_TABLE: &str = "word_analysis";

/// Column names of the morpheme table.
pub mod columns {
    pub const SURFACE_FORM: &str = "surface_form";
    pub const KIND: &str = "kind";
    pub const GLOSS: &str = "gloss";
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("NULL"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<RecordId> for FieldValue {
    fn from(value: RecordId) -> Self {
        FieldValue::Int(value.0 as i64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A row: column name to value.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Builds a [`FieldMap`] from `column => value` pairs.
#[macro_export]
macro_rules! fields {
    ($($column:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::storage::FieldMap::new();
        $(map.insert(::std::string::String::from($column), $crate::storage::FieldValue::from($value));)*
        map
    }};
}

/// Table scan with equality filters, all of which must hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<(String, FieldValue)>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn matches(&self, row: &FieldMap) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)?;
        for (i, (column, value)) in self.filters.iter().enumerate() {
            let joiner = if i == 0 { " where " } else { " and " };
            write!(f, "{joiner}{column} = {value}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write; nothing from the batch was kept.
    #[error("write to '{table}' rejected: {reason}")]
    Rejected { table: String, reason: String },

    #[error("insert into '{table}' returned no id")]
    MissingId { table: String },

    #[error("invalid row: {0}")]
    InvalidRow(String),
}

/// The persistence collaborator.
pub trait Storage: Send + Sync {
    fn insert_record(&self, table: &str, fields: FieldMap) -> Result<Option<RecordId>, StorageError>;

    /// Writes all rows or none of them.
    fn insert_many(&self, table: &str, rows: Vec<FieldMap>) -> Result<(), StorageError>;

    fn fetch_all(&self, query: &Query) -> Result<Vec<FieldMap>, StorageError>;
}

/// What happened to the optional write that follows an analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Persistence {
    /// Not requested, or no store configured.
    Skipped,
    Stored(Option<RecordId>),
    Failed(StorageError),
}

impl Persistence {
    pub fn is_failed(&self) -> bool {
        matches!(self, Persistence::Failed(_))
    }
}

/// An in-memory result plus the outcome of persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed<T> {
    pub result: T,
    pub persistence: Persistence,
}

impl<T> Processed<T> {
    pub fn new(result: T, persistence: Persistence) -> Self {
        Self { result, persistence }
    }

    pub fn skipped(result: T) -> Self {
        Self::new(result, Persistence::Skipped)
    }

    pub fn into_result(self) -> T {
        self.result
    }
}

use lexis_protocol::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorphError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("morpheme row is missing column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("unknown morpheme kind '{0}'")]
    UnknownKind(String),

    #[error("table archive error: {0}")]
    Archive(String),
}

pub type Result<T> = std::result::Result<T, MorphError>;

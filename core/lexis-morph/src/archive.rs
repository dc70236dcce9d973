//! Binary table archives.
//!
//! Tables compiled by the CLI are plain rkyv archives of
//! [`MorphemeTables`]. Loading always validates the bytes first.

use lexis_protocol::MorphemeTables;
use rkyv::AlignedVec;

use crate::error::{MorphError, Result};

pub fn to_archive_bytes(tables: &MorphemeTables) -> Result<Vec<u8>> {
    let bytes = rkyv::to_bytes::<_, 4096>(tables).map_err(|e| MorphError::Archive(e.to_string()))?;
    Ok(bytes.as_slice().to_vec())
}

pub fn from_archive_bytes(bytes: &[u8]) -> Result<MorphemeTables> {
    // Archives read from disk carry no alignment guarantee.
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    rkyv::from_bytes::<MorphemeTables>(&aligned).map_err(|e| MorphError::Archive(e.to_string()))
}

//! Catalog persistence.
//!
//! A snapshot is a built [`CatalogIndex`] (stars, neighbour lists and the
//! configuration they were linked with) encoded with bincode and compressed
//! with zstd. Name and id lookups are not stored; they are rebuilt on load,
//! so loading a snapshot skips the quadratic link pass entirely.

pub mod export;
pub mod hyg;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::catalog::CatalogIndex;

/// zstd level for snapshots. They are written once by `build_dataset`.
const SNAPSHOT_ZSTD_LEVEL: i32 = 19;

pub fn serialize_catalog(index: &CatalogIndex) -> Result<Vec<u8>> {
    let encoded = bincode::serialize(index)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, SNAPSHOT_ZSTD_LEVEL).map_err(Error::Compression)
}

/// Decode a snapshot and rebuild its lookup tables.
pub fn deserialize_catalog(bytes: &[u8]) -> Result<CatalogIndex> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(Error::Compression)?;
    let mut index: CatalogIndex = bincode::deserialize(&decoded)?;
    index.rebuild_indices();
    Ok(index)
}

pub fn write_catalog_to_file<P: AsRef<Path>>(index: &CatalogIndex, path: P) -> Result<()> {
    let bytes = serialize_catalog(index)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<CatalogIndex> {
    let bytes = fs::read(path)?;
    deserialize_catalog(&bytes)
}

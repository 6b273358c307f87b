use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::graph::catalog::CatalogIndex;

/// File name for a catalog exported with the given cutoff, e.g.
/// `stars-within-4-parsecs.json`.
pub fn default_export_name(cutoff_pc: f64) -> String {
    format!("stars-within-{}-parsecs.json", cutoff_pc)
}

/// Pretty-printed JSON array of every retained star, nearest first.
pub fn catalog_to_json(index: &CatalogIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(index.stars())?)
}

pub fn write_catalog_json<P: AsRef<Path>>(index: &CatalogIndex, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, index.stars())?;
    writer.flush()?;
    Ok(())
}

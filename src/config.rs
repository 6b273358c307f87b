use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_JUMP_RANGE_PC: f64 = 2.0;
pub const DEFAULT_CATALOG_CUTOFF_PC: f64 = 4.0;
pub const DEFAULT_REFERENCE_NAME: &str = "Sol";

pub const ENV_JUMP_RANGE: &str = "STARPATHS_JUMP_RANGE";
pub const ENV_CATALOG_CUTOFF: &str = "STARPATHS_CATALOG_CUTOFF";
pub const ENV_REFERENCE: &str = "STARPATHS_REFERENCE";

/// Bounds on exhaustive path enumeration.
///
/// The default is uncapped. On a densely linked catalog the number of
/// simple paths grows combinatorially, so callers working with large
/// cutoffs should set at least one cap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationLimits {
    /// Longest path, in stars, before a branch is recorded and cut.
    pub max_depth: Option<usize>,
    /// Stop the traversal once this many paths have been recorded.
    pub max_paths: Option<usize>,
    /// Also record branches that end because every neighbour is already on
    /// the active path, not only branches that reach an empty neighbour list.
    pub record_exhausted: bool,
}

impl EnumerationLimits {
    pub fn uncapped() -> Self {
        Self::default()
    }

    /// These limits with any of the given fields replaced.
    pub fn overridden(
        &self,
        max_depth: Option<usize>,
        max_paths: Option<usize>,
        record_exhausted: Option<bool>,
    ) -> Self {
        EnumerationLimits {
            max_depth: max_depth.or(self.max_depth),
            max_paths: max_paths.or(self.max_paths),
            record_exhausted: record_exhausted.unwrap_or(self.record_exhausted),
        }
    }

    /// Ten stars deep, two paths.
    pub fn capped() -> Self {
        EnumerationLimits {
            max_depth: Some(10),
            max_paths: Some(2),
            record_exhausted: false,
        }
    }
}

/// Parameters a catalog index is built with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum separation, in parsecs, between directly linked stars.
    pub jump_range_pc: f64,
    /// Stars further than this from the reference origin are dropped.
    pub catalog_cutoff_pc: f64,
    /// Display name of the zero-point star whose `dist` column is exact.
    pub reference_name: String,
    pub enumeration: EnumerationLimits,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            jump_range_pc: DEFAULT_JUMP_RANGE_PC,
            catalog_cutoff_pc: DEFAULT_CATALOG_CUTOFF_PC,
            reference_name: DEFAULT_REFERENCE_NAME.to_string(),
            enumeration: EnumerationLimits::default(),
        }
    }
}

impl CatalogConfig {
    pub fn new(jump_range_pc: f64, catalog_cutoff_pc: f64) -> Result<Self> {
        let config = CatalogConfig {
            jump_range_pc,
            catalog_cutoff_pc,
            ..CatalogConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_enumeration(mut self, limits: EnumerationLimits) -> Self {
        self.enumeration = limits;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Override fields from `STARPATHS_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_JUMP_RANGE) {
            self.jump_range_pc = parse_env_number(ENV_JUMP_RANGE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CATALOG_CUTOFF) {
            self.catalog_cutoff_pc = parse_env_number(ENV_CATALOG_CUTOFF, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REFERENCE) {
            self.reference_name = raw;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.jump_range_pc.is_finite() && self.jump_range_pc > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "jump range must be a positive number of parsecs, got {}",
                self.jump_range_pc
            )));
        }
        if !(self.catalog_cutoff_pc.is_finite() && self.catalog_cutoff_pc >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "catalog cutoff must be a non-negative number of parsecs, got {}",
                self.catalog_cutoff_pc
            )));
        }
        if self.reference_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "reference origin name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env_number(key: &str, raw: &str) -> Result<f64> {
    raw.trim().parse().map_err(|_| Error::InvalidNumber {
        field: key.to_string(),
        value: raw.to_string(),
    })
}

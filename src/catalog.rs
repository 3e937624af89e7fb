//! Where region names and region values come from.
//!
//! The renderer only ever sees a [`ValueMap`]; these traits let the binaries swap the
//! seeded demo data for a real CSV without touching the map code.

use crate::generator::{DEFAULT_SEED, generate_values};
use crate::models::ValueMap;
use crate::storage;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The 21 Local Government Areas of Anambra State, in canonical order.
pub const ANAMBRA_LGAS: [&str; 21] = [
    "Aguata",
    "Anambra East",
    "Anambra West",
    "Anaocha",
    "Awka North",
    "Awka South",
    "Ayamelum",
    "Dunukofia",
    "Ekwusigo",
    "Idemili North",
    "Idemili South",
    "Ihiala",
    "Njikoka",
    "Nnewi North",
    "Nnewi South",
    "Ogbaru",
    "Onitsha North",
    "Onitsha South",
    "Orumba North",
    "Orumba South",
    "Oyi",
];

/// Ordered list of region names.
pub trait RegionCatalog {
    fn names(&self) -> Result<Vec<String>>;
}

/// Names held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCatalog(Vec<String>);

impl StaticCatalog {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn anambra() -> Self {
        Self::new(ANAMBRA_LGAS)
    }
}

impl RegionCatalog for StaticCatalog {
    fn names(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// One name per line; blank lines and `#` comments are skipped.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    pub path: PathBuf,
}

impl RegionCatalog for FileCatalog {
    fn names(&self) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read region list {}", self.path.display()))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

/// Names from `regions_file` when set, otherwise the built-in Anambra list.
pub fn region_names(regions_file: Option<&Path>) -> Result<Vec<String>> {
    match regions_file {
        Some(path) => FileCatalog {
            path: path.to_path_buf(),
        }
        .names(),
        None => StaticCatalog::anambra().names(),
    }
}

/// Produces a value per region name.
pub trait ValueSource {
    fn values(&self, names: &[String]) -> Result<ValueMap>;
}

/// Seeded demo values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoValues {
    pub seed: String,
}

impl Default for DemoValues {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
        }
    }
}

impl ValueSource for DemoValues {
    fn values(&self, names: &[String]) -> Result<ValueMap> {
        Ok(generate_values(&self.seed, names))
    }
}

/// Values from a `name,value` CSV. Names not in the catalog are kept; they simply have
/// no boundary to colour.
#[derive(Debug, Clone)]
pub struct CsvValues {
    pub path: PathBuf,
}

impl ValueSource for CsvValues {
    fn values(&self, names: &[String]) -> Result<ValueMap> {
        let values = storage::load_csv(&self.path)?;
        let missing = names.iter().filter(|n| values.get(n).is_none()).count();
        if missing > 0 {
            log::info!(
                "{missing} of {} regions have no value in {} and render as 0",
                names.len(),
                self.path.display()
            );
        }
        Ok(values)
    }
}

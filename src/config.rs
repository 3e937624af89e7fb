use crate::generator::DEFAULT_SEED;
use crate::models::Bounds;
use crate::viewport::DEFAULT_PADDING;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default boundary file, relative to the working directory.
pub const DEFAULT_BOUNDARIES: &str = "assets/anambra_lgas.geojson";

/// Settings read from `lgamap.toml`; every field has a default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Path or `http(s)` URL of the boundary GeoJSON.
    pub boundaries: String,
    pub name_property: String,
    pub padding: f64,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub legend_title: String,
    pub fallback_bounds: Bounds,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            boundaries: DEFAULT_BOUNDARIES.to_string(),
            name_property: "name".to_string(),
            padding: DEFAULT_PADDING,
            width: 1000,
            height: 800,
            title: "Anambra State LGAs".to_string(),
            legend_title: "Value".to_string(),
            fallback_bounds: Bounds::ANAMBRA,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub seed: String,
    /// One region name per line; the built-in Anambra list when unset.
    pub regions_file: Option<PathBuf>,
    /// `name,value` CSV used instead of the demo generator.
    pub values_csv: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            regions_file: None,
            values_csv: None,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        Ok(config)
    }

    /// Reject settings the map cannot be drawn with.
    pub fn validate(&self) -> Result<()> {
        let b = &self.map.fallback_bounds;
        if !b.is_finite() {
            anyhow::bail!("map.fallback_bounds must be finite numbers");
        }
        if b.south >= b.north || b.west >= b.east {
            anyhow::bail!(
                "map.fallback_bounds needs south < north and west < east, got {:?}",
                b
            );
        }
        if !self.map.padding.is_finite() || self.map.padding < 0.0 {
            anyhow::bail!("map.padding must be a non-negative number");
        }
        Ok(())
    }

    /// `path` if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

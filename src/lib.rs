//! lgamap_rs
//!
//! Choropleth maps of Local Government Areas (LGAs) with deterministic demo data.
//! Pairs with the `lgamap` CLI and the `lgamap-gui` desktop viewer.
//!
//! ### Features
//! - Seeded, reproducible demo values in `0..=100` for a list of region names
//! - A fixed five-band colour scale with a static legend
//! - Boundary loading from a GeoJSON file or URL, with a fallback viewport on failure
//! - Hover highlighting and `"<name>: <value>"` tooltips
//! - Rendering to SVG/PNG (plotters) or a retained scene exported as styled GeoJSON
//!
//! ### Example
//! ```no_run
//! use lgamap_rs::boundaries::{BoundarySource, load_or_fallback};
//! use lgamap_rs::catalog::{DemoValues, RegionCatalog, StaticCatalog, ValueSource};
//! use lgamap_rs::models::Bounds;
//! use lgamap_rs::viz::{RenderOptions, render_map};
//!
//! let names = StaticCatalog::anambra().names()?;
//! let values = DemoValues::default().values(&names)?;
//! let src = BoundarySource::parse("assets/anambra_lgas.geojson");
//! let load = load_or_fallback(&src, "name", Bounds::ANAMBRA);
//! render_map("anambra.svg", &load, &values, &RenderOptions::default())?;
//! lgamap_rs::storage::save_csv(&values, "anambra_values.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod boundaries;
pub mod catalog;
pub mod choropleth;
pub mod config;
pub mod error;
pub mod generator;
pub mod interaction;
pub mod models;
pub mod scale;
pub mod storage;
pub mod style;
pub mod viewport;
pub mod viz;
pub mod widget;

pub use choropleth::{ChoroplethMap, MapStatus, MountOptions};
pub use generator::{DEFAULT_SEED, generate_values};
pub use models::{Bounds, ValueMap};
pub use scale::{ColorBand, color_for_value};

//! Load LGA boundaries from a GeoJSON `FeatureCollection`.
//!
//! The source is either a local path or an `http(s)` URL. Each feature needs a name
//! property (default `"name"`) and a `Polygon` or `MultiPolygon` geometry; features
//! without either are skipped.
//!
//! Loading never takes the map down: [`load_or_fallback`] turns every failure into
//! [`BoundaryLoad::Fallback`] carrying a fixed bounding box, so the page still shows
//! a base layer and legend.
//!
//! ```no_run
//! use lgamap_rs::boundaries::{BoundarySource, load_or_fallback};
//! use lgamap_rs::models::Bounds;
//!
//! let src = BoundarySource::parse("assets/anambra_lgas.geojson");
//! let load = load_or_fallback(&src, "name", Bounds::ANAMBRA);
//! println!("{} regions", load.boundaries().map(|b| b.regions.len()).unwrap_or(0));
//! ```

use crate::error::{BoundaryError, Result};
use crate::models::{BoundarySet, Bounds, Region};
use geo::{Centroid, MultiPolygon};
use geojson::GeoJson;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Where boundary GeoJSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundarySource {
    File(PathBuf),
    Url(String),
}

impl BoundarySource {
    /// `http://` / `https://` prefixes select a URL, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if t.starts_with("http://") || t.starts_with("https://") {
            BoundarySource::Url(t.to_string())
        } else {
            BoundarySource::File(PathBuf::from(t))
        }
    }
}

impl fmt::Display for BoundarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundarySource::File(p) => write!(f, "{}", p.display()),
            BoundarySource::Url(u) => f.write_str(u),
        }
    }
}

/// Outcome of a boundary load.
#[derive(Debug, Clone)]
pub enum BoundaryLoad {
    Loaded(BoundarySet),
    /// Loading failed; render with this viewport and no region layers.
    Fallback { bounds: Bounds, reason: String },
}

impl BoundaryLoad {
    pub fn boundaries(&self) -> Option<&BoundarySet> {
        match self {
            BoundaryLoad::Loaded(set) => Some(set),
            BoundaryLoad::Fallback { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BoundaryLoad::Fallback { .. })
    }
}

/// Parse a GeoJSON document into regions keyed by `name_property`.
pub fn parse_boundaries(text: &str, name_property: &str) -> Result<BoundarySet> {
    let geojson: GeoJson = text.parse()?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(BoundaryError::NotFeatureCollection),
    };

    let mut regions = Vec::new();
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let name = match feature
            .properties
            .as_ref()
            .and_then(|props| props.get(name_property))
        {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                log::debug!("feature #{idx} has no '{name_property}' property, skipped");
                continue;
            }
        };

        let Some(geometry) = feature.geometry else {
            log::debug!("feature '{name}' has no geometry, skipped");
            continue;
        };
        let boundary: MultiPolygon<f64> = match geo::Geometry::<f64>::try_from(geometry.value) {
            Ok(geo::Geometry::MultiPolygon(mp)) => mp,
            Ok(geo::Geometry::Polygon(p)) => MultiPolygon::new(vec![p]),
            Ok(_) => {
                log::debug!("feature '{name}' is not a polygon, skipped");
                continue;
            }
            Err(e) => {
                log::debug!("feature '{name}' has invalid geometry ({e}), skipped");
                continue;
            }
        };

        let centroid = boundary.centroid().map(|c| (c.y(), c.x()));
        regions.push(Region {
            name,
            centroid,
            boundary,
        });
    }

    Ok(BoundarySet::new(regions))
}

fn http_client() -> std::result::Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(Duration::from_secs(30)) // total request timeout
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("lgamap_rs/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn fetch_text(url: &str) -> Result<String> {
    let http_err = |e: reqwest::Error| BoundaryError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };
    let http = http_client().map_err(http_err)?;

    // Small retry for transient failures (5xx / network errors)
    let mut last_err = None;
    for backoff_ms in [100u64, 300, 700] {
        match http.get(url).send() {
            Ok(r) if r.status().is_success() => return r.text().map_err(http_err),
            Ok(r) if r.status().is_server_error() => {
                last_err = Some(BoundaryError::Status {
                    url: url.to_string(),
                    status: r.status().as_u16(),
                });
            }
            Ok(r) => {
                return Err(BoundaryError::Status {
                    url: url.to_string(),
                    status: r.status().as_u16(),
                });
            }
            Err(e) => last_err = Some(http_err(e)),
        }
        thread::sleep(Duration::from_millis(backoff_ms));
    }
    Err(last_err.unwrap_or_else(|| BoundaryError::Http {
        url: url.to_string(),
        message: "no response".into(),
    }))
}

/// Read and parse boundaries from `source`.
pub fn load_boundaries(source: &BoundarySource, name_property: &str) -> Result<BoundarySet> {
    let text = match source {
        BoundarySource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
                path: path.display().to_string(),
                source,
            })?
        }
        BoundarySource::Url(url) => fetch_text(url)?,
    };
    let set = parse_boundaries(&text, name_property)?;
    log::info!("loaded {} boundaries from {}", set.regions.len(), source);
    Ok(set)
}

/// Like [`load_boundaries`], but failures become [`BoundaryLoad::Fallback`].
pub fn load_or_fallback(
    source: &BoundarySource,
    name_property: &str,
    fallback: Bounds,
) -> BoundaryLoad {
    match load_boundaries(source, name_property) {
        Ok(set) => BoundaryLoad::Loaded(set),
        Err(e) => {
            log::warn!("boundary load from {source} failed, using fallback viewport: {e}");
            BoundaryLoad::Fallback {
                bounds: fallback,
                reason: e.to_string(),
            }
        }
    }
}

/// A finished background load, tagged with the ticket it was started for.
#[derive(Debug)]
pub struct LoadResult {
    pub ticket: u64,
    pub load: BoundaryLoad,
}

/// Run [`load_or_fallback`] on a background thread.
///
/// The receiver yields exactly one [`LoadResult`]. There is no cancellation: a caller
/// that no longer wants the result compares `ticket` against its current mount and
/// drops it.
pub fn spawn_load(
    source: BoundarySource,
    name_property: String,
    fallback: Bounds,
    ticket: u64,
) -> mpsc::Receiver<LoadResult> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let load = load_or_fallback(&source, &name_property, fallback);
        // Receiver may be gone if the view was closed; nothing to do then.
        let _ = sender.send(LoadResult { ticket, load });
    });
    receiver
}

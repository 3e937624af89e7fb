use thiserror::Error;

/// Why a boundary file could not be turned into a [`crate::models::BoundarySet`].
///
/// None of these are fatal for the map: the loader turns every variant into a
/// fallback viewport (see [`crate::boundaries::load_or_fallback`]).
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("GeoJSON must be a FeatureCollection")]
    NotFeatureCollection,
}

pub type Result<T> = std::result::Result<T, BoundaryError>;

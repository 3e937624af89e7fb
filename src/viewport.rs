//! Map viewport: what part of the world is shown and how far panning may go.

use crate::models::Bounds;

/// Default fraction of the extent added around the regions.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Visible area of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Area fitted into the view on mount.
    pub fit: Bounds,
    /// Panning limit; the view centre never leaves this box.
    pub max_bounds: Bounds,
}

impl Viewport {
    /// Fit `extent` with `padding` on every side and limit panning to the same box.
    ///
    /// Inverted edges are swapped.
    pub fn fit_to(extent: Bounds, padding: f64) -> Self {
        let padded = extent.normalized().pad(padding.max(0.0));
        Self {
            fit: padded,
            max_bounds: padded,
        }
    }

    /// `(lat, lon)` of the fitted view centre.
    pub fn center(&self) -> (f64, f64) {
        self.fit.center()
    }

    /// Clamp a proposed view centre into `max_bounds`. Never panics, even on NaN edges.
    pub fn clamp_center(&self, lat: f64, lon: f64) -> (f64, f64) {
        let b = &self.max_bounds;
        (lat.max(b.south).min(b.north), lon.max(b.west).min(b.east))
    }

    /// Linear lon/lat → pixel projection for a `width`×`height` canvas.
    pub fn projection(&self, width: f64, height: f64) -> Projection {
        Projection::new(self.fit, width, height)
    }
}

/// Equirectangular projection with latitude correction, centred in the canvas.
///
/// At the scale of a single state the distortion of this projection is negligible, and it
/// keeps the maths invertible for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: Bounds,
    scale: f64,
    x_cos: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Projection {
    pub fn new(bounds: Bounds, width: f64, height: f64) -> Self {
        let (lat, _) = bounds.center();
        let x_cos = lat.to_radians().cos().max(1e-6);
        let geo_w = (bounds.width() * x_cos).max(1e-9);
        let geo_h = bounds.height().max(1e-9);
        let scale = (width / geo_w).min(height / geo_h);
        Self {
            bounds,
            scale,
            x_cos,
            offset_x: (width - geo_w * scale) / 2.0,
            offset_y: (height - geo_h * scale) / 2.0,
        }
    }

    /// Pixel position of `(lon, lat)`; y grows downwards.
    pub fn to_screen(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            self.offset_x + (lon - self.bounds.west) * self.x_cos * self.scale,
            self.offset_y + (self.bounds.north - lat) * self.scale,
        )
    }

    /// Inverse of [`Projection::to_screen`], returns `(lon, lat)`.
    pub fn to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.bounds.west + (x - self.offset_x) / (self.x_cos * self.scale),
            self.bounds.north - (y - self.offset_y) / self.scale,
        )
    }
}

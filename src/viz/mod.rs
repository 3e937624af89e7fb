//! Map output adapters.
//!
//! - [`image::ImageWidget`] renders the choropleth with plotters to **SVG** or **PNG**
//! - [`scene::SceneWidget`] keeps a retained scene for the desktop viewer and GeoJSON export
//!
//! [`render_map`] is the one-call path used by the CLI: mount, paint, write the file.

pub mod fonts;
pub mod image;
pub mod legend;
pub mod scene;

use crate::boundaries::BoundaryLoad;
use crate::choropleth::{ChoroplethMap, MapStatus, MountOptions};
use crate::models::ValueMap;
use anyhow::Result;
use self::image::ImageWidget;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Settings for [`render_map`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Drawn above the map; empty for none.
    pub title: String,
    /// Write each region's tooltip text at its centroid.
    pub labels: bool,
    pub mount: MountOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: String::new(),
            labels: false,
            mount: MountOptions::default(),
        }
    }
}

/// Render a choropleth to `out_path`; `.svg` selects SVG, anything else PNG.
///
/// A fallback `load` still produces a file with the background and legend.
pub fn render_map<P: AsRef<Path>>(
    out_path: P,
    load: &BoundaryLoad,
    values: &ValueMap,
    options: &RenderOptions,
) -> Result<MapStatus> {
    let out_path = out_path.as_ref();
    let size = (options.width, options.height);

    let status = if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        draw_map(root, true, load, values, options)?
    } else {
        let text = fonts::ensure_fonts_registered();
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        draw_map(root, text, load, values, options)?
    };
    log::info!("wrote {}", out_path.display());
    Ok(status)
}

fn draw_map<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    text: bool,
    load: &BoundaryLoad,
    values: &ValueMap,
    options: &RenderOptions,
) -> Result<MapStatus> {
    let widget = ImageWidget::new(root, &options.title, text, options.labels);
    let map = ChoroplethMap::mount(widget, load, values, &options.mount)?;
    map.widget().present()?;
    Ok(map.status().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::parse_boundaries;
    use crate::generator::generate_values;

    const TWO_LGAS: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "properties": {"name": "Oyi"},
         "geometry": {"type": "Polygon", "coordinates": [[[6.8,6.1],[6.9,6.1],[6.9,6.2],[6.8,6.2],[6.8,6.1]]]}},
        {"type": "Feature", "properties": {"name": "Ayamelum"},
         "geometry": {"type": "Polygon", "coordinates": [[[6.9,6.1],[7.0,6.1],[7.0,6.2],[6.9,6.2],[6.9,6.1]]]}}
      ]
    }"#;

    #[test]
    fn svg_contains_regions_and_legend() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("map.svg");
        let load = BoundaryLoad::Loaded(parse_boundaries(TWO_LGAS, "name").unwrap());
        let values = generate_values("x", &["Oyi", "Ayamelum"]);
        let options = RenderOptions {
            width: 640,
            height: 480,
            title: "Anambra".into(),
            labels: true,
            ..RenderOptions::default()
        };
        let status = render_map(&out, &load, &values, &options).unwrap();
        assert_eq!(status, MapStatus::Ready { regions: 2 });

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Anambra"));
        assert!(svg.contains("Oyi: 95"));
        assert!(svg.contains("Ayamelum: 1"));
        assert!(svg.contains("80–100%"));
        // top band swatch
        assert!(svg.to_lowercase().contains("#800026"));
    }

    #[test]
    fn fallback_still_writes_a_map() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fallback.svg");
        let load = BoundaryLoad::Fallback {
            bounds: crate::models::Bounds::ANAMBRA,
            reason: "offline".into(),
        };
        let status = render_map(&out, &load, &ValueMap::new(), &RenderOptions::default()).unwrap();
        assert!(matches!(status, MapStatus::Fallback(_)));
        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("0–20%"));
    }
}

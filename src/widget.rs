//! Capability set the choropleth renderer needs from a map widget.
//!
//! The renderer in [`crate::choropleth`] is written once against [`MapWidget`]; each
//! output gets its own adapter:
//!
//! - [`crate::viz::image::ImageWidget`] draws with plotters into an SVG or PNG file,
//! - [`crate::viz::scene::SceneWidget`] keeps a retained scene that the desktop viewer
//!   paints every frame and that can be exported as styled GeoJSON.
//!
//! Pointer events do not flow through this trait: the embedding UI forwards pointer
//! positions to [`crate::choropleth::ChoroplethMap::pointer_moved`], which decides
//! which regions to restyle.

use crate::scale::Legend;
use crate::style::{PolygonStyle, Rgba};
use crate::viewport::Viewport;
use anyhow::Result;
use geo::MultiPolygon;

/// Handle of one region layer inside a widget.
pub type LayerId = usize;

/// Background drawn beneath the regions.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub background: Rgba,
    pub attribution: Option<String>,
}

impl Default for BaseLayer {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0xF2, 0xEF, 0xE9),
            attribution: None,
        }
    }
}

/// A styled region polygon with its tooltip text.
#[derive(Debug, Clone)]
pub struct RegionLayer {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub style: PolygonStyle,
    pub tooltip: String,
}

pub trait MapWidget {
    /// Position the view; called before any layer is added.
    fn set_view(&mut self, viewport: &Viewport) -> Result<()>;

    fn add_base_layer(&mut self, base: &BaseLayer) -> Result<()>;

    fn add_region(&mut self, layer: RegionLayer) -> Result<LayerId>;

    /// Apply a new style; `bring_to_front` raises the layer above its neighbours.
    fn restyle_region(&mut self, id: LayerId, style: &PolygonStyle, bring_to_front: bool)
    -> Result<()>;

    fn remove_region(&mut self, id: LayerId) -> Result<()>;

    fn add_legend(&mut self, legend: &Legend) -> Result<()>;
}

//! Retained-mode map widget.
//!
//! `SceneWidget` keeps every layer in draw order instead of painting it. The desktop
//! viewer repaints from it each frame, and [`SceneWidget::to_geojson`] exports it as a
//! styled `FeatureCollection` (simplestyle property names) for any web map.

use crate::scale::Legend;
use crate::style::PolygonStyle;
use crate::viewport::Viewport;
use crate::widget::{BaseLayer, LayerId, MapWidget, RegionLayer};
use anyhow::{Context, Result, bail};
use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;
use std::path::Path;

/// One region as currently drawn.
#[derive(Debug, Clone)]
pub struct SceneRegion {
    pub id: LayerId,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub style: PolygonStyle,
    pub tooltip: String,
}

#[derive(Debug, Default)]
pub struct SceneWidget {
    viewport: Option<Viewport>,
    base: Option<BaseLayer>,
    // Bottom to top.
    regions: Vec<SceneRegion>,
    legend: Option<Legend>,
    next_id: LayerId,
}

impl SceneWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn base(&self) -> Option<&BaseLayer> {
        self.base.as_ref()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Regions bottom to top.
    pub fn regions(&self) -> &[SceneRegion] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&SceneRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    fn position(&self, id: LayerId) -> Result<usize> {
        match self.regions.iter().position(|r| r.id == id) {
            Some(pos) => Ok(pos),
            None => bail!("unknown layer id {id}"),
        }
    }

    /// Styled `FeatureCollection`: one feature per region in draw order, with
    /// `name`, `title` (tooltip), `fill`, `fill-opacity`, `stroke` and `stroke-width`
    /// properties. The legend travels as a foreign member.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .regions
            .iter()
            .map(|r| {
                let mut props = JsonObject::new();
                props.insert("name".into(), json!(r.name));
                props.insert("title".into(), json!(r.tooltip));
                props.insert("fill".into(), json!(r.style.fill.to_hex()));
                props.insert("fill-opacity".into(), json!(r.style.fill_opacity));
                props.insert("stroke".into(), json!(r.style.stroke.to_hex()));
                props.insert("stroke-width".into(), json!(r.style.weight));
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&r.geometry))),
                    id: None,
                    properties: Some(props),
                    foreign_members: None,
                }
            })
            .collect();

        let foreign_members = self.legend.as_ref().map(|legend| {
            let entries: Vec<_> = legend
                .entries
                .iter()
                .map(|e| json!({ "label": e.label, "color": e.color.to_hex() }))
                .collect();
            let mut members = JsonObject::new();
            members.insert(
                "legend".into(),
                json!({ "title": legend.title, "entries": entries }),
            );
            members
        });

        FeatureCollection {
            bbox: self
                .viewport
                .map(|vp| vec![vp.fit.west, vp.fit.south, vp.fit.east, vp.fit.north]),
            features,
            foreign_members,
        }
    }

    /// Write [`SceneWidget::to_geojson`] to `path`.
    pub fn save_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(&self.to_geojson())?;
        std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

impl MapWidget for SceneWidget {
    fn set_view(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport = Some(*viewport);
        Ok(())
    }

    fn add_base_layer(&mut self, base: &BaseLayer) -> Result<()> {
        self.base = Some(base.clone());
        Ok(())
    }

    fn add_region(&mut self, layer: RegionLayer) -> Result<LayerId> {
        let id = self.next_id;
        self.next_id += 1;
        self.regions.push(SceneRegion {
            id,
            name: layer.name,
            geometry: layer.geometry,
            style: layer.style,
            tooltip: layer.tooltip,
        });
        Ok(id)
    }

    fn restyle_region(
        &mut self,
        id: LayerId,
        style: &PolygonStyle,
        bring_to_front: bool,
    ) -> Result<()> {
        let pos = self.position(id)?;
        self.regions[pos].style = *style;
        if bring_to_front {
            let region = self.regions.remove(pos);
            self.regions.push(region);
        }
        Ok(())
    }

    fn remove_region(&mut self, id: LayerId) -> Result<()> {
        let pos = self.position(id)?;
        self.regions.remove(pos);
        Ok(())
    }

    fn add_legend(&mut self, legend: &Legend) -> Result<()> {
        self.legend = Some(legend.clone());
        Ok(())
    }
}

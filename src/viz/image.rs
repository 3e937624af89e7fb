//! Plotters map adapter: draws the choropleth into any `DrawingBackend`.
//!
//! `ImageWidget` records layers as the renderer adds and restyles them, and paints the
//! whole map on [`ImageWidget::present`]. Regions are drawn bottom to top, so a region
//! brought to the front is painted last.

use super::legend::{draw_legend_panel, legend_panel_width};
use crate::scale::Legend;
use crate::style::{PolygonStyle, Rgba};
use crate::viewport::{Projection, Viewport};
use crate::widget::{BaseLayer, LayerId, MapWidget, RegionLayer};
use anyhow::{Result, anyhow, bail};
use geo::{Centroid, MultiPolygon};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const TITLE_BAND_PX: u32 = 36;
const LABEL_FONT_PX: u32 = 11;

fn rgb(c: Rgba) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

struct ImageLayer {
    id: LayerId,
    layer: RegionLayer,
}

pub struct ImageWidget<DB: DrawingBackend> {
    root: DrawingArea<DB, Shift>,
    title: String,
    // Draw text at all; bitmap output without a registered font cannot.
    text: bool,
    // Draw each region's tooltip at its centroid.
    labels: bool,
    viewport: Option<Viewport>,
    base: BaseLayer,
    layers: Vec<ImageLayer>,
    legend: Option<Legend>,
    next_id: LayerId,
}

impl<DB: DrawingBackend> ImageWidget<DB> {
    pub fn new(root: DrawingArea<DB, Shift>, title: &str, text: bool, labels: bool) -> Self {
        Self {
            root,
            title: title.to_string(),
            text,
            labels,
            viewport: None,
            base: BaseLayer::default(),
            layers: Vec::new(),
            legend: None,
            next_id: 0,
        }
    }

    /// Number of region layers currently held.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn position(&self, id: LayerId) -> Result<usize> {
        match self.layers.iter().position(|l| l.id == id) {
            Some(pos) => Ok(pos),
            None => bail!("unknown layer id {id}"),
        }
    }

    fn draw_region(
        &self,
        area: &DrawingArea<DB, Shift>,
        projection: &Projection,
        geometry: &MultiPolygon<f64>,
        style: &PolygonStyle,
    ) -> Result<()> {
        let fill = rgb(style.fill).mix(style.fill_opacity).filled();
        let stroke = rgb(style.stroke).stroke_width(style.weight);
        // Interior rings are not cut out; LGA boundaries have no holes.
        for polygon in geometry {
            let ring: Vec<(i32, i32)> = polygon
                .exterior()
                .coords()
                .map(|c| {
                    let (x, y) = projection.to_screen(c.x, c.y);
                    (x.round() as i32, y.round() as i32)
                })
                .collect();
            if ring.len() < 3 {
                continue;
            }
            area.draw(&Polygon::new(ring.clone(), fill))
                .map_err(|e| anyhow!("{:?}", e))?;
            area.draw(&PathElement::new(ring, stroke))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Ok(())
    }

    /// Paint the title, base layer, regions, labels and legend, then flush the backend.
    pub fn present(&self) -> Result<()> {
        let Some(viewport) = self.viewport else {
            bail!("map view was never set");
        };

        self.root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

        let has_title = self.text && !self.title.trim().is_empty();
        let body = if has_title {
            let (title_area, body) = self.root.split_vertically(TITLE_BAND_PX as i32);
            let (w, _) = title_area.dim_in_pixel();
            let style = TextStyle::from((FontFamily::SansSerif, 20u32))
                .pos(Pos::new(HPos::Center, VPos::Center));
            title_area
                .draw(&Text::new(
                    self.title.as_str(),
                    ((w / 2) as i32, (TITLE_BAND_PX / 2) as i32),
                    style,
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
            body
        } else {
            self.root.clone()
        };

        let (body_w, _) = body.dim_in_pixel();
        let legend_w = self.legend.as_ref().map(legend_panel_width).unwrap_or(0);
        let (map_area, legend_area) =
            body.split_horizontally(body_w.saturating_sub(legend_w) as i32);

        map_area
            .fill(&rgb(self.base.background))
            .map_err(|e| anyhow!("{:?}", e))?;
        let (w, h) = map_area.dim_in_pixel();
        let projection = viewport.projection(f64::from(w), f64::from(h));

        for l in &self.layers {
            self.draw_region(&map_area, &projection, &l.layer.geometry, &l.layer.style)?;
        }

        if self.text {
            if self.labels {
                let style = TextStyle::from((FontFamily::SansSerif, LABEL_FONT_PX))
                    .pos(Pos::new(HPos::Center, VPos::Center));
                for l in &self.layers {
                    let Some(c) = l.layer.geometry.centroid() else {
                        continue;
                    };
                    let (x, y) = projection.to_screen(c.x(), c.y());
                    map_area
                        .draw(&Text::new(
                            l.layer.tooltip.as_str(),
                            (x.round() as i32, y.round() as i32),
                            style.clone(),
                        ))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            if let Some(attribution) = &self.base.attribution {
                let style = TextStyle::from((FontFamily::SansSerif, 10u32))
                    .pos(Pos::new(HPos::Right, VPos::Bottom));
                map_area
                    .draw(&Text::new(
                        attribution.as_str(),
                        (w as i32 - 4, h as i32 - 4),
                        style,
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }

        if let Some(legend) = &self.legend {
            draw_legend_panel(&legend_area, legend, self.text)?;
        }

        self.root.present().map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

impl<DB: DrawingBackend> MapWidget for ImageWidget<DB> {
    fn set_view(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport = Some(*viewport);
        Ok(())
    }

    fn add_base_layer(&mut self, base: &BaseLayer) -> Result<()> {
        self.base = base.clone();
        Ok(())
    }

    fn add_region(&mut self, layer: RegionLayer) -> Result<LayerId> {
        let id = self.next_id;
        self.next_id += 1;
        self.layers.push(ImageLayer { id, layer });
        Ok(id)
    }

    fn restyle_region(
        &mut self,
        id: LayerId,
        style: &PolygonStyle,
        bring_to_front: bool,
    ) -> Result<()> {
        let pos = self.position(id)?;
        self.layers[pos].layer.style = *style;
        if bring_to_front {
            let l = self.layers.remove(pos);
            self.layers.push(l);
        }
        Ok(())
    }

    fn remove_region(&mut self, id: LayerId) -> Result<()> {
        let pos = self.position(id)?;
        self.layers.remove(pos);
        Ok(())
    }

    fn add_legend(&mut self, legend: &Legend) -> Result<()> {
        self.legend = Some(legend.clone());
        Ok(())
    }
}

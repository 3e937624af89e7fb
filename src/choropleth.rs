//! Choropleth renderer: styles region polygons by value band and drives hover.
//!
//! [`ChoroplethMap::mount`] takes ownership of a [`MapWidget`], sets the viewport, adds
//! the base layer, one styled polygon per boundary feature and the static legend.
//! Region layers and hover state are released when the map is dropped or explicitly
//! [unmounted](ChoroplethMap::unmount), on every path including a failed mount.
//!
//! ```
//! use lgamap_rs::boundaries::BoundaryLoad;
//! use lgamap_rs::choropleth::{ChoroplethMap, MapStatus, MountOptions};
//! use lgamap_rs::models::{Bounds, ValueMap};
//! use lgamap_rs::viz::scene::SceneWidget;
//!
//! let load = BoundaryLoad::Fallback { bounds: Bounds::ANAMBRA, reason: "offline".into() };
//! let options = MountOptions::default();
//! let map = ChoroplethMap::mount(SceneWidget::new(), &load, &ValueMap::new(), &options)?;
//! assert!(matches!(map.status(), MapStatus::Fallback(_)));
//! assert_eq!(map.viewport().fit, Bounds::ANAMBRA);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::boundaries::BoundaryLoad;
use crate::interaction::{HoverMachine, HoverState, Transition};
use crate::models::{Bounds, ValueMap};
use crate::scale::{Legend, color_for_value};
use crate::style::{PolygonStyle, Rgba};
use crate::viewport::{DEFAULT_PADDING, Viewport};
use crate::widget::{BaseLayer, LayerId, MapWidget, RegionLayer};
use anyhow::Result;
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// Settings for one mount.
#[derive(Debug, Clone)]
pub struct MountOptions {
    /// Fraction of the region extent added around it.
    pub padding: f64,
    pub legend_title: String,
    pub base: BaseLayer,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            legend_title: "Value".to_string(),
            base: BaseLayer::default(),
        }
    }
}

/// What the map could show after mounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    Ready { regions: usize },
    /// Boundaries were unavailable; only the base layer and legend are shown.
    Fallback(String),
}

// Envelope entry for hit testing; `index` points into `ChoroplethMap::regions`.
struct RegionEnvelope {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

struct MountedRegion {
    name: String,
    layer: LayerId,
    fill: Rgba,
    tooltip: String,
    geometry: MultiPolygon<f64>,
    // Raised by the last bring-to-front, used to pick the topmost hit.
    z: u64,
}

pub struct ChoroplethMap<W: MapWidget> {
    widget: Option<W>,
    regions: Vec<MountedRegion>,
    by_name: HashMap<String, usize>,
    index: RTree<RegionEnvelope>,
    hover: HoverMachine,
    viewport: Viewport,
    legend: Legend,
    status: MapStatus,
    next_z: u64,
}

impl<W: MapWidget> ChoroplethMap<W> {
    /// Mount a choropleth onto `widget`.
    ///
    /// Boundary features whose name is missing from `values` render with value 0.
    /// Values without a boundary feature are not drawn.
    pub fn mount(
        widget: W,
        load: &BoundaryLoad,
        values: &ValueMap,
        options: &MountOptions,
    ) -> Result<Self> {
        let (viewport, status) = match load {
            BoundaryLoad::Loaded(set) => {
                let extent = set.extent().unwrap_or(Bounds::ANAMBRA);
                (
                    Viewport::fit_to(extent, options.padding),
                    // counted again once duplicates are skipped
                    MapStatus::Ready { regions: 0 },
                )
            }
            BoundaryLoad::Fallback { bounds, reason } => (
                Viewport::fit_to(*bounds, 0.0),
                MapStatus::Fallback(reason.clone()),
            ),
        };

        // Built before the first widget call so that an early return drops it and
        // releases whatever was already added.
        let mut map = ChoroplethMap {
            widget: Some(widget),
            regions: Vec::new(),
            by_name: HashMap::new(),
            index: RTree::new(),
            hover: HoverMachine::new(),
            viewport,
            legend: Legend::new(&options.legend_title),
            status,
            next_z: 0,
        };

        let w = map.widget_mut();
        w.set_view(&viewport)?;
        w.add_base_layer(&options.base)?;

        if let Some(set) = load.boundaries() {
            for region in &set.regions {
                if map.by_name.contains_key(&region.name) {
                    log::debug!("duplicate boundary feature '{}' ignored", region.name);
                    continue;
                }
                let value = values.get(&region.name);
                let fill = color_for_value(value.map(f64::from));
                let tooltip = format!("{}: {}", region.name, value.unwrap_or(0));
                let layer = map.widget_mut().add_region(RegionLayer {
                    name: region.name.clone(),
                    geometry: region.boundary.clone(),
                    style: PolygonStyle::normal(fill),
                    tooltip: tooltip.clone(),
                })?;
                map.hover.register(&region.name);
                map.by_name.insert(region.name.clone(), map.regions.len());
                map.regions.push(MountedRegion {
                    name: region.name.clone(),
                    layer,
                    fill,
                    tooltip,
                    geometry: region.boundary.clone(),
                    z: 0,
                });
            }
        }

        if let MapStatus::Ready { regions } = &mut map.status {
            *regions = map.regions.len();
        }

        map.index = RTree::bulk_load(
            map.regions
                .iter()
                .enumerate()
                .filter_map(|(index, r)| {
                    r.geometry.bounding_rect().map(|rect| RegionEnvelope {
                        index,
                        aabb: AABB::from_corners(
                            [rect.min().x, rect.min().y],
                            [rect.max().x, rect.max().y],
                        ),
                    })
                })
                .collect(),
        );

        let legend = map.legend.clone();
        map.widget_mut().add_legend(&legend)?;

        match &map.status {
            MapStatus::Ready { regions } => log::info!("choropleth mounted with {regions} regions"),
            MapStatus::Fallback(reason) => {
                log::warn!("choropleth mounted without boundaries: {reason}")
            }
        }
        Ok(map)
    }

    fn widget_mut(&mut self) -> &mut W {
        self.widget
            .as_mut()
            .expect("widget is present until unmount consumes the map")
    }

    pub fn widget(&self) -> &W {
        self.widget
            .as_ref()
            .expect("widget is present until unmount consumes the map")
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Names of the mounted regions, in boundary file order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn tooltip(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.regions[i].tooltip.as_str())
    }

    pub fn hover_state(&self, name: &str) -> Option<HoverState> {
        self.hover.state(name)
    }

    /// Style currently applied to a region.
    pub fn style_of(&self, name: &str) -> Option<PolygonStyle> {
        let region = &self.regions[*self.by_name.get(name)?];
        Some(match self.hover.state(name)? {
            HoverState::Normal => PolygonStyle::normal(region.fill),
            HoverState::Highlighted => PolygonStyle::highlighted(region.fill),
        })
    }

    /// Topmost region containing `(lon, lat)`.
    pub fn region_at(&self, lon: f64, lat: f64) -> Option<&str> {
        let point = Point::new(lon, lat);
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point([lon, lat]))
            .map(|e| &self.regions[e.index])
            .filter(|r| r.geometry.contains(&point))
            .max_by_key(|r| r.z)
            .map(|r| r.name.as_str())
    }

    /// Pointer entered a region: Normal → Highlighted, raised to the front.
    pub fn pointer_enter(&mut self, name: &str) -> Result<bool> {
        if self.hover.enter(name) != Transition::Changed(HoverState::Highlighted) {
            return Ok(false);
        }
        let i = self.by_name[name];
        self.next_z += 1;
        self.regions[i].z = self.next_z;
        let (layer, style) = (
            self.regions[i].layer,
            PolygonStyle::highlighted(self.regions[i].fill),
        );
        self.widget_mut().restyle_region(layer, &style, true)?;
        Ok(true)
    }

    /// Pointer left a region: Highlighted → Normal.
    pub fn pointer_leave(&mut self, name: &str) -> Result<bool> {
        if self.hover.leave(name) != Transition::Changed(HoverState::Normal) {
            return Ok(false);
        }
        let i = self.by_name[name];
        let (layer, style) = (
            self.regions[i].layer,
            PolygonStyle::normal(self.regions[i].fill),
        );
        self.widget_mut().restyle_region(layer, &style, false)?;
        Ok(true)
    }

    /// Route a pointer position: leave every other highlighted region, enter the one
    /// under the pointer. Returns the hovered region's name.
    pub fn pointer_moved(&mut self, lon: f64, lat: f64) -> Result<Option<String>> {
        let hit = self.region_at(lon, lat).map(str::to_string);
        let stale: Vec<String> = self
            .hover
            .highlighted()
            .into_iter()
            .filter(|n| Some(*n) != hit.as_deref())
            .map(str::to_string)
            .collect();
        for name in stale {
            self.pointer_leave(&name)?;
        }
        if let Some(name) = &hit {
            self.pointer_enter(name)?;
        }
        Ok(hit)
    }

    /// Pointer left the map entirely.
    pub fn pointer_exited(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .hover
            .highlighted()
            .into_iter()
            .map(str::to_string)
            .collect();
        for name in names {
            self.pointer_leave(&name)?;
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(widget) = self.widget.as_mut() {
            for region in self.regions.drain(..) {
                if let Err(e) = widget.remove_region(region.layer) {
                    log::debug!("removing layer for '{}' failed: {e:#}", region.name);
                }
            }
        }
        self.by_name.clear();
        self.index = RTree::new();
        self.hover.clear();
    }

    /// Release every region layer and hand the widget back.
    pub fn unmount(mut self) -> W {
        self.release();
        self.widget
            .take()
            .expect("widget is present until unmount consumes the map")
    }
}

impl<W: MapWidget> Drop for ChoroplethMap<W> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Tracks which mount a background boundary load belongs to.
///
/// A load started for ticket `n` is applied only while mount `n` is still current; a
/// late result for an unmounted or replaced map is dropped.
#[derive(Debug, Default)]
pub struct MountTracker {
    current: u64,
    mounted: bool,
}

impl MountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new mount and return its ticket.
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.mounted = true;
        self.current
    }

    pub fn end(&mut self) {
        self.mounted = false;
    }

    pub fn accepts(&self, ticket: u64) -> bool {
        self.mounted && ticket == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundarySet, Region};
    use geo::polygon;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Log {
        calls: Vec<String>,
        live: usize,
    }

    /// Widget that records every call, shared through an `Rc` so tests can inspect it
    /// after the map is dropped.
    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Log>>);

    impl MapWidget for Recorder {
        fn set_view(&mut self, _: &Viewport) -> Result<()> {
            self.0.borrow_mut().calls.push("view".into());
            Ok(())
        }
        fn add_base_layer(&mut self, _: &BaseLayer) -> Result<()> {
            self.0.borrow_mut().calls.push("base".into());
            Ok(())
        }
        fn add_region(&mut self, layer: RegionLayer) -> Result<LayerId> {
            let mut log = self.0.borrow_mut();
            log.calls.push(format!("add {}", layer.name));
            log.live += 1;
            Ok(log.calls.len())
        }
        fn restyle_region(&mut self, id: LayerId, s: &PolygonStyle, front: bool) -> Result<()> {
            self.0
                .borrow_mut()
                .calls
                .push(format!("restyle {id} w{} front={front}", s.weight));
            Ok(())
        }
        fn remove_region(&mut self, _: LayerId) -> Result<()> {
            self.0.borrow_mut().live -= 1;
            Ok(())
        }
        fn add_legend(&mut self, legend: &Legend) -> Result<()> {
            self.0
                .borrow_mut()
                .calls
                .push(format!("legend {}", legend.entries.len()));
            Ok(())
        }
    }

    fn square(name: &str, x: f64, y: f64) -> Region {
        let p = polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ];
        Region {
            name: name.to_string(),
            centroid: Some((y + 0.5, x + 0.5)),
            boundary: MultiPolygon::new(vec![p]),
        }
    }

    fn two_regions() -> BoundaryLoad {
        BoundaryLoad::Loaded(BoundarySet::new(vec![
            square("West", 0.0, 0.0),
            square("East", 1.0, 0.0),
        ]))
    }

    #[test]
    fn mount_adds_layers_in_order() {
        let rec = Recorder::default();
        let values: ValueMap = [("West".to_string(), 85)].into_iter().collect();
        let map =
            ChoroplethMap::mount(rec.clone(), &two_regions(), &values, &MountOptions::default())
                .unwrap();
        assert_eq!(
            rec.0.borrow().calls,
            ["view", "base", "add West", "add East", "legend 5"]
        );
        assert_eq!(map.status(), &MapStatus::Ready { regions: 2 });
        assert_eq!(map.tooltip("West"), Some("West: 85"));
        assert_eq!(map.tooltip("East"), Some("East: 0"));
        assert_eq!(
            map.style_of("East").unwrap().fill,
            color_for_value(Some(0.0))
        );
    }

    #[test]
    fn drop_releases_layers() {
        let rec = Recorder::default();
        {
            let _map = ChoroplethMap::mount(
                rec.clone(),
                &two_regions(),
                &ValueMap::new(),
                &MountOptions::default(),
            )
            .unwrap();
            assert_eq!(rec.0.borrow().live, 2);
        }
        assert_eq!(rec.0.borrow().live, 0);
    }

    #[test]
    fn unmount_returns_cleared_widget() {
        let map = ChoroplethMap::mount(
            Recorder::default(),
            &two_regions(),
            &ValueMap::new(),
            &MountOptions::default(),
        )
        .unwrap();
        let rec = map.unmount();
        assert_eq!(rec.0.borrow().live, 0);
    }

    #[test]
    fn pointer_moves_between_regions() {
        let rec = Recorder::default();
        let mut map = ChoroplethMap::mount(
            rec.clone(),
            &two_regions(),
            &ValueMap::new(),
            &MountOptions::default(),
        )
        .unwrap();

        assert_eq!(map.pointer_moved(0.5, 0.5).unwrap().as_deref(), Some("West"));
        assert_eq!(map.hover_state("West"), Some(HoverState::Highlighted));

        assert_eq!(map.pointer_moved(1.5, 0.5).unwrap().as_deref(), Some("East"));
        assert_eq!(map.hover_state("West"), Some(HoverState::Normal));
        assert_eq!(map.hover_state("East"), Some(HoverState::Highlighted));

        assert_eq!(map.pointer_moved(5.0, 5.0).unwrap(), None);
        assert_eq!(map.hover_state("East"), Some(HoverState::Normal));

        let calls = rec.0.borrow().calls.clone();
        assert!(calls.contains(&"restyle 3 w3 front=true".to_string()));
        assert!(calls.contains(&"restyle 3 w1 front=false".to_string()));
    }

    #[test]
    fn hover_cycles_restore_normal_style() {
        let mut map = ChoroplethMap::mount(
            Recorder::default(),
            &two_regions(),
            &ValueMap::new(),
            &MountOptions::default(),
        )
        .unwrap();
        let before = map.style_of("West").unwrap();
        for _ in 0..5 {
            assert!(map.pointer_enter("West").unwrap());
            assert_eq!(map.style_of("West").unwrap().weight, 3);
            assert!(map.pointer_leave("West").unwrap());
        }
        let after = map.style_of("West").unwrap();
        assert_eq!(before, after);
        assert_eq!((after.weight, after.fill_opacity), (1, 0.7));
        assert!(!map.pointer_leave("West").unwrap());
        assert!(!map.pointer_enter("Nowhere").unwrap());
    }

    #[test]
    fn fallback_mounts_legend_only() {
        let rec = Recorder::default();
        let load = BoundaryLoad::Fallback {
            bounds: Bounds::ANAMBRA,
            reason: "HTTP 404".into(),
        };
        let map =
            ChoroplethMap::mount(rec.clone(), &load, &ValueMap::new(), &MountOptions::default())
                .unwrap();
        assert_eq!(map.status(), &MapStatus::Fallback("HTTP 404".into()));
        assert_eq!(map.viewport().fit, Bounds::ANAMBRA);
        assert_eq!(rec.0.borrow().calls, ["view", "base", "legend 5"]);
        assert_eq!(map.region_names().count(), 0);
    }

    #[test]
    fn duplicate_names_keep_first_feature() {
        let load = BoundaryLoad::Loaded(BoundarySet::new(vec![
            square("Dup", 0.0, 0.0),
            square("Dup", 5.0, 5.0),
            square("Other", 1.0, 0.0),
        ]));
        let rec = Recorder::default();
        let map =
            ChoroplethMap::mount(rec.clone(), &load, &ValueMap::new(), &MountOptions::default())
                .unwrap();
        assert_eq!(map.status(), &MapStatus::Ready { regions: 2 });
        assert_eq!(map.region_names().collect::<Vec<_>>(), ["Dup", "Other"]);
        assert_eq!(rec.0.borrow().live, 2);
        assert_eq!(map.region_at(0.5, 0.5), Some("Dup"));
        assert_eq!(map.region_at(5.5, 5.5), None);
    }

    #[test]
    fn overlapping_regions_pick_last_raised() {
        let load = BoundaryLoad::Loaded(BoundarySet::new(vec![
            square("Under", 0.0, 0.0),
            square("Over", 0.5, 0.0),
        ]));
        let mut map = ChoroplethMap::mount(
            Recorder::default(),
            &load,
            &ValueMap::new(),
            &MountOptions::default(),
        )
        .unwrap();
        assert!(map.pointer_enter("Under").unwrap());
        assert_eq!(map.region_at(0.75, 0.5), Some("Under"));
        assert!(map.pointer_enter("Over").unwrap());
        assert_eq!(map.region_at(0.75, 0.5), Some("Over"));
        // raised again after leaving
        map.pointer_leave("Under").unwrap();
        assert!(map.pointer_enter("Under").unwrap());
        assert_eq!(map.region_at(0.75, 0.5), Some("Under"));
        // outside the overlap only one region matches
        assert_eq!(map.region_at(0.25, 0.5), Some("Under"));
        assert_eq!(map.region_at(1.25, 0.5), Some("Over"));
    }

    #[test]
    fn tracker_discards_late_results() {
        let mut t = MountTracker::new();
        let first = t.begin();
        assert!(t.accepts(first));
        let second = t.begin();
        assert!(!t.accepts(first));
        assert!(t.accepts(second));
        t.end();
        assert!(!t.accepts(second));
    }
}

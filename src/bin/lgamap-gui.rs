/*!
 * Desktop viewer for lgamap-rs - interactive LGA choropleth
 *
 * A cross-platform desktop application providing:
 * - Boundary loading from a GeoJSON file or URL in the background
 * - Hover highlighting with "<name>: <value>" tooltips
 * - Export of the current map as SVG or styled GeoJSON
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use eframe::egui;
use geo::TriangulateEarcut;
use lgamap_rs::boundaries::{BoundaryLoad, BoundarySource, LoadResult, spawn_load};
use lgamap_rs::catalog::{CsvValues, DemoValues, ValueSource, region_names};
use lgamap_rs::choropleth::{ChoroplethMap, MapStatus, MountOptions, MountTracker};
use lgamap_rs::config::AppConfig;
use lgamap_rs::models::{Bounds, ValueMap};
use lgamap_rs::style::Rgba;
use lgamap_rs::viewport::{Projection, Viewport};
use lgamap_rs::viz::scene::SceneWidget;
use lgamap_rs::viz::{RenderOptions, render_map};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

const CONFIG_FILE: &str = "lgamap.toml";

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let config = if Path::new(CONFIG_FILE).exists() {
        AppConfig::load_from_file(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
            log::warn!("{e:#}; using defaults");
            AppConfig::default()
        })
    } else {
        AppConfig::default()
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("LGA Map - lgamap-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "LGA Map",
        options,
        Box::new(|_cc| Ok(Box::new(LgaMapApp::new(config)))),
    )
}

fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Main application state
struct LgaMapApp {
    config: AppConfig,

    // Input fields
    boundaries: String,
    seed: String,
    output_path: String,

    // Mounted map and what it was built from
    map: Option<ChoroplethMap<SceneWidget>>,
    load: Option<BoundaryLoad>,
    values: ValueMap,
    hovered: Option<String>,
    // Panned view centre (lat, lon); `None` shows the fitted view.
    center: Option<(f64, f64)>,

    // Background boundary load
    tracker: MountTracker,
    load_receiver: Option<mpsc::Receiver<LoadResult>>,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,
}

impl LgaMapApp {
    fn new(config: AppConfig) -> Self {
        // Default to user's home directory for output
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let mut app = Self {
            boundaries: config.map.boundaries.clone(),
            seed: config.data.seed.clone(),
            output_path: home_dir,
            config,

            map: None,
            load: None,
            values: ValueMap::new(),
            hovered: None,
            center: None,

            tracker: MountTracker::new(),
            load_receiver: None,

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
        };
        app.start_load();
        app
    }

    fn start_load(&mut self) {
        self.unmount();
        let ticket = self.tracker.begin();
        let source = BoundarySource::parse(&self.boundaries);
        self.status_message = format!("Loading boundaries from {source}...");
        self.error_message.clear();
        self.is_loading = true;
        self.load_receiver = Some(spawn_load(
            source,
            self.config.map.name_property.clone(),
            self.config.map.fallback_bounds,
            ticket,
        ));
    }

    fn unmount(&mut self) {
        // Dropping the map releases its layers and hover state.
        self.map = None;
        self.load = None;
        self.hovered = None;
        self.center = None;
        self.tracker.end();
        self.is_loading = false;
    }

    fn values_for_catalog(&self) -> Result<ValueMap> {
        let names = region_names(self.config.data.regions_file.as_deref())?;
        match &self.config.data.values_csv {
            Some(path) => CsvValues { path: path.clone() }.values(&names),
            None => DemoValues {
                seed: self.seed.clone(),
            }
            .values(&names),
        }
    }

    fn mount_options(&self) -> MountOptions {
        MountOptions {
            padding: self.config.map.padding,
            legend_title: self.config.map.legend_title.clone(),
            ..MountOptions::default()
        }
    }

    fn check_load_result(&mut self) {
        let Some(receiver) = &self.load_receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.load_receiver = None;
        self.is_loading = false;

        if !self.tracker.accepts(result.ticket) {
            log::debug!("discarding boundary load for stale mount {}", result.ticket);
            return;
        }

        let mounted = self.values_for_catalog().and_then(|values| {
            let map = ChoroplethMap::mount(
                SceneWidget::new(),
                &result.load,
                &values,
                &self.mount_options(),
            )?;
            Ok((map, values))
        });
        match mounted {
            Ok((map, values)) => {
                self.status_message = match map.status() {
                    MapStatus::Ready { regions } => format!("{regions} regions"),
                    MapStatus::Fallback(reason) => format!("Boundaries unavailable: {reason}"),
                };
                self.map = Some(map);
                self.values = values;
                self.load = Some(result.load);
            }
            Err(e) => {
                self.error_message = format!("{e:#}");
                self.status_message.clear();
            }
        }
    }

    fn export(&mut self, geojson: bool) {
        let (Some(map), Some(load)) = (&self.map, &self.load) else {
            return;
        };
        let dir = PathBuf::from(&self.output_path);
        let result = if geojson {
            let path = dir.join("lga_map.geojson");
            map.widget().save_geojson(&path).map(|_| path)
        } else {
            let path = dir.join("lga_map.svg");
            let options = RenderOptions {
                width: self.config.map.width,
                height: self.config.map.height,
                title: self.config.map.title.clone(),
                labels: false,
                mount: self.mount_options(),
            };
            render_map(&path, load, &self.values, &options).map(|_| path)
        };
        match result {
            Ok(path) => {
                self.status_message = format!("Exported {}", path.display());
                self.error_message.clear();
            }
            Err(e) => self.error_message = format!("Export failed: {e:#}"),
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Boundaries:");
            ui.text_edit_singleline(&mut self.boundaries)
                .on_hover_text("GeoJSON file path or http(s) URL");
            if ui.button("Browse").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("GeoJSON", &["geojson", "json"])
                    .pick_file()
            {
                self.boundaries = path.to_string_lossy().to_string();
            }
            ui.label("Seed:");
            ui.text_edit_singleline(&mut self.seed);
            if ui
                .add_enabled(!self.is_loading, egui::Button::new("Load"))
                .clicked()
            {
                self.start_load();
            }
            if ui
                .add_enabled(self.map.is_some(), egui::Button::new("Close map"))
                .clicked()
            {
                self.unmount();
                self.status_message = "Map closed".to_string();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Export to:");
            ui.text_edit_singleline(&mut self.output_path);
            if ui.button("Browse").clicked()
                && let Some(path) = rfd::FileDialog::new().pick_folder()
            {
                self.output_path = path.to_string_lossy().to_string();
            }
            let ready = self.map.is_some();
            if ui.add_enabled(ready, egui::Button::new("SVG")).clicked() {
                self.export(false);
            }
            if ui.add_enabled(ready, egui::Button::new("GeoJSON")).clicked() {
                self.export(true);
            }
        });
    }

    fn show_map(&mut self, ui: &mut egui::Ui) {
        let Some(map) = self.map.as_mut() else {
            ui.centered_and_justified(|ui| {
                if self.is_loading {
                    ui.spinner();
                } else {
                    ui.label("No map loaded");
                }
            });
            return;
        };

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let viewport = *map.viewport();
        let projection = Projection::new(
            view_bounds(&viewport, self.center),
            f64::from(rect.width()),
            f64::from(rect.height()),
        );

        if response.dragged() {
            let d = response.drag_delta();
            let (lon, lat) = projection.to_geo(
                f64::from(rect.width() / 2.0 - d.x),
                f64::from(rect.height() / 2.0 - d.y),
            );
            self.center = Some(viewport.clamp_center(lat, lon));
        }
        if response.double_clicked() {
            self.center = None;
        }

        let hit = match response.hover_pos() {
            Some(pos) => {
                let (lon, lat) = projection.to_geo(
                    f64::from(pos.x - rect.min.x),
                    f64::from(pos.y - rect.min.y),
                );
                map.pointer_moved(lon, lat)
            }
            None => map.pointer_exited().map(|_| None),
        };
        match hit {
            Ok(name) => self.hovered = name,
            Err(e) => log::warn!("hover update failed: {e:#}"),
        }

        paint_scene(&painter, rect, &projection, map.widget());

        if let Some(tip) = self.hovered.as_deref().and_then(|n| map.tooltip(n)) {
            response.on_hover_text_at_pointer(tip);
        }
    }
}

/// Fitted bounds shifted to a panned centre.
fn view_bounds(viewport: &Viewport, center: Option<(f64, f64)>) -> Bounds {
    let fit = viewport.fit;
    let Some((lat, lon)) = center else {
        return fit;
    };
    let (c_lat, c_lon) = fit.center();
    let (d_lat, d_lon) = (lat - c_lat, lon - c_lon);
    Bounds::new(
        fit.south + d_lat,
        fit.west + d_lon,
        fit.north + d_lat,
        fit.east + d_lon,
    )
}

fn paint_scene(
    painter: &egui::Painter,
    rect: egui::Rect,
    projection: &Projection,
    scene: &SceneWidget,
) {
    let to_pos = |x: f64, y: f64| {
        let (sx, sy) = projection.to_screen(x, y);
        egui::pos2(rect.min.x + sx as f32, rect.min.y + sy as f32)
    };

    if let Some(base) = scene.base() {
        painter.rect_filled(rect, 0.0, color32(base.background));
    }

    for region in scene.regions() {
        let fill = color32(region.style.fill_rgba());
        let stroke = egui::Stroke::new(region.style.weight as f32, color32(region.style.stroke));
        for polygon in &region.geometry {
            let mut mesh = egui::Mesh::default();
            for triangle in polygon.earcut_triangles_iter() {
                let base = mesh.vertices.len() as u32;
                for c in triangle.to_array() {
                    mesh.colored_vertex(to_pos(c.x, c.y), fill);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
            painter.add(egui::Shape::mesh(mesh));

            let outline: Vec<egui::Pos2> = polygon
                .exterior()
                .coords()
                .map(|c| to_pos(c.x, c.y))
                .collect();
            painter.add(egui::Shape::closed_line(outline, stroke));
        }
    }

    if let Some(attribution) = scene.base().and_then(|b| b.attribution.as_deref()) {
        painter.text(
            rect.right_bottom() - egui::vec2(4.0, 4.0),
            egui::Align2::RIGHT_BOTTOM,
            attribution,
            egui::FontId::proportional(10.0),
            egui::Color32::DARK_GRAY,
        );
    }
}

fn show_legend(ui: &mut egui::Ui, scene: &SceneWidget) {
    let Some(legend) = scene.legend() else {
        return;
    };
    ui.heading(&legend.title);
    ui.add_space(5.0);
    for entry in &legend.entries {
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(18.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(swatch, 0.0, color32(entry.color));
            ui.label(&entry.label);
        });
    }
}

impl eframe::App for LgaMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background loads
        self.check_load_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(5.0);
            self.show_controls(ui);
            ui.add_space(5.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            } else {
                ui.label(&self.status_message);
            }
        });

        if let Some(map) = &self.map {
            egui::SidePanel::right("legend")
                .resizable(false)
                .show(ctx, |ui| show_legend(ui, map.widget()));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_map(ui));
    }
}

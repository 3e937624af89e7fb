use lgamap_rs::boundaries::{BoundaryLoad, BoundarySource, load_or_fallback, parse_boundaries};
use lgamap_rs::catalog::ANAMBRA_LGAS;
use lgamap_rs::choropleth::{ChoroplethMap, MapStatus, MountOptions};
use lgamap_rs::interaction::HoverState;
use lgamap_rs::models::Bounds;
use lgamap_rs::scale::ColorBand;
use lgamap_rs::viz::scene::SceneWidget;
use lgamap_rs::viz::{RenderOptions, render_map};
use lgamap_rs::{DEFAULT_SEED, ValueMap, generate_values};
use std::path::PathBuf;

const SAMPLE: &str = include_str!("fixtures/anambra_sample.geojson");

fn sample_load() -> BoundaryLoad {
    BoundaryLoad::Loaded(parse_boundaries(SAMPLE, "name").unwrap())
}

fn demo_values() -> ValueMap {
    generate_values(DEFAULT_SEED, &ANAMBRA_LGAS)
}

fn mount() -> ChoroplethMap<SceneWidget> {
    ChoroplethMap::mount(
        SceneWidget::new(),
        &sample_load(),
        &demo_values(),
        &MountOptions::default(),
    )
    .unwrap()
}

#[test]
fn regions_are_coloured_by_band() {
    let map = mount();
    assert_eq!(map.status(), &MapStatus::Ready { regions: 4 });
    let scene = map.widget();

    // Aguata 24, Ihiala 87, Oyi 15, Ekwulobia has no value
    let fill = |name: &str| scene.region(name).unwrap().style.fill;
    assert_eq!(fill("Aguata"), ColorBand::Low.color());
    assert_eq!(fill("Ihiala"), ColorBand::VeryHigh.color());
    assert_eq!(fill("Oyi"), ColorBand::VeryLow.color());
    assert_eq!(fill("Ekwulobia"), ColorBand::VeryLow.color());

    assert_eq!(map.tooltip("Ihiala"), Some("Ihiala: 87"));
    assert_eq!(map.tooltip("Ekwulobia"), Some("Ekwulobia: 0"));
    // values without a boundary are not drawn
    assert!(scene.region("Awka South").is_none());
}

#[test]
fn viewport_fits_padded_extent() {
    let map = mount();
    let fit = map.viewport().fit;
    let extent = Bounds::new(5.80, 6.80, 6.30, 7.20);
    assert!(fit.south < extent.south && fit.north > extent.north);
    assert!(fit.west < extent.west && fit.east > extent.east);
    assert!(((fit.north - fit.south) - 0.5 * 1.2).abs() < 1e-9);
    assert_eq!(map.viewport().max_bounds, fit);
}

#[test]
fn hover_highlights_and_restores() {
    let mut map = mount();
    let normal = map.style_of("Aguata").unwrap();

    assert_eq!(
        map.pointer_moved(7.05, 5.95).unwrap().as_deref(),
        Some("Aguata")
    );
    assert_eq!(map.hover_state("Aguata"), Some(HoverState::Highlighted));
    let scene = map.widget();
    assert_eq!(scene.regions().last().unwrap().name, "Aguata");
    let hl = scene.region("Aguata").unwrap().style;
    assert_eq!((hl.weight, hl.fill_opacity, hl.stroke.to_hex()), (3, 0.9, "#666666".into()));

    // straight onto the neighbour sharing an edge
    assert_eq!(
        map.pointer_moved(7.15, 5.95).unwrap().as_deref(),
        Some("Ekwulobia")
    );
    assert_eq!(map.hover_state("Aguata"), Some(HoverState::Normal));
    assert_eq!(map.widget().region("Aguata").unwrap().style, normal);

    map.pointer_exited().unwrap();
    assert_eq!(map.hover_state("Ekwulobia"), Some(HoverState::Normal));
}

#[test]
fn unreachable_boundaries_fall_back() {
    let src = BoundarySource::File(PathBuf::from("tests/fixtures/missing.geojson"));
    let load = load_or_fallback(&src, "name", Bounds::ANAMBRA);
    assert!(load.is_fallback());

    let map = ChoroplethMap::mount(
        SceneWidget::new(),
        &load,
        &demo_values(),
        &MountOptions::default(),
    )
    .unwrap();
    assert!(matches!(map.status(), MapStatus::Fallback(_)));
    assert_eq!(map.viewport().fit, Bounds::ANAMBRA);
    assert!(map.widget().regions().is_empty());
    assert_eq!(map.widget().legend().unwrap().entries.len(), 5);
}

#[test]
fn geojson_export_round_trips_through_parser() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("styled.geojson");
    let map = mount();
    map.widget().save_geojson(&out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let reparsed = parse_boundaries(&text, "name").unwrap();
    assert_eq!(reparsed.names(), ["Aguata", "Ihiala", "Oyi", "Ekwulobia"]);

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &json["features"][0]["properties"];
    assert_eq!(first["title"], "Aguata: 24");
    assert_eq!(first["fill"], "#FEB24C");
    assert_eq!(first["fill-opacity"], 0.7);
    assert_eq!(json["legend"]["entries"][4]["label"], "80–100%");
}

#[test]
fn unmount_clears_scene() {
    let scene = mount().unmount();
    assert!(scene.regions().is_empty());
}

#[test]
fn svg_and_png_render() {
    let dir = tempfile::tempdir().unwrap();
    let options = RenderOptions {
        width: 800,
        height: 600,
        title: "Anambra State LGAs".into(),
        ..RenderOptions::default()
    };

    let svg = dir.path().join("map.svg");
    render_map(&svg, &sample_load(), &demo_values(), &options).unwrap();
    let text = std::fs::read_to_string(&svg).unwrap();
    assert!(text.contains("Anambra State LGAs"));
    assert!(text.to_lowercase().contains("#feb24c"));

    let png = dir.path().join("map.png");
    render_map(&png, &sample_load(), &demo_values(), &options).unwrap();
    let bytes = std::fs::read(&png).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

//! Scene and SVG rendering tests for hotmap
//!
//! Checks the scene structure (legend, one group per cell) and the SVG the
//! viewer mounts: palette classes, filters, markers and escaping.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{cell_of, drawn, drawn_with};
use fixtures::{seven_records, SheetBuilder};
use hotmap::render::{
    hot_class, hot_fill, DrawCommand, Filter, RenderBackend, SvgRenderer, HOT_FILLS,
};
use hotmap::{HotmapConfig, Hotness, RecordField};
use test_case::test_case;

fn no_markers() -> HotmapConfig {
    HotmapConfig {
        mark_ready_on_draw: false,
        ..HotmapConfig::default()
    }
}

#[test_case(1, "#EB6045", "very-hot")]
#[test_case(2, "#FDC171", "some-hot")]
#[test_case(3, "#D2EC9B", "so-so")]
#[test_case(4, "#69C3A4", "no-hot")]
#[test_case(5, "#4AA3B1", "never-hot")]
fn test_palette(level: u8, fill: &str, class: &str) {
    assert_eq!(hot_fill(Hotness::new(level)), fill);
    assert_eq!(hot_class(Hotness::new(level)), class);
}

#[test]
fn test_scene_has_legend_then_cells() {
    let ctrl = drawn_with(&seven_records().build_rows(), 500.0, no_markers());
    let scene = ctrl.scene();
    let size = ctrl.layout().unwrap().size;
    assert_eq!((scene.width, scene.height), (size.width, size.height));

    assert!(matches!(&scene.commands[0], DrawCommand::BeginGroup { id } if id == "legend"));
    let legend = scene.group("legend").unwrap();
    let swatches: Vec<&str> = legend
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Rect { fill, .. } => Some(fill.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(swatches, HOT_FILLS.to_vec());

    for index in 0..7 {
        let group = scene.group(&format!("cell-{index}")).unwrap();
        assert!(matches!(group[0], DrawCommand::Rect { filter: Some(Filter::Lighten), .. }));
    }
    assert!(scene.group("cell-7").is_none());
}

#[test]
fn test_cell_group_matches_render_state() {
    let ctrl = drawn_with(&seven_records().build_rows(), 500.0, no_markers());
    let scene = ctrl.scene();
    let rust = cell_of(&ctrl, "Rust");
    let group = scene.group("cell-1").unwrap();
    match &group[0] {
        DrawCommand::Rect {
            x,
            y,
            width,
            fill,
            class,
            ..
        } => {
            assert_eq!((*x, *y, *width), (rust.x, rust.y, rust.width));
            assert_eq!(fill, "#EB6045");
            assert_eq!(*class, Some("very-hot"));
        }
        other => panic!("expected a rect, got {other:?}"),
    }
    let texts: Vec<&str> = group
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Rust", "Language"]);
}

#[test]
fn test_highlight_switches_filter() {
    let mut ctrl = drawn_with(&seven_records().build_rows(), 500.0, no_markers());
    let before = ctrl.svg_markup().unwrap();
    // The legend swatches always use the inset shadow.
    assert_eq!(before.matches("url(#inset-shadow)").count(), 5);

    ctrl.highlight(RecordField::Saleability, &["N"]);
    let after = ctrl.svg_markup().unwrap();
    assert_eq!(after.matches("url(#inset-shadow)").count(), 7);
    assert_eq!(after.matches("url(#lighten)").count(), 5);
    assert_eq!(after.matches("stroke-width=\"2\"").count(), 2);
}

#[test]
fn test_svg_document() {
    let ctrl = drawn(&seven_records().build_rows(), 500.0);
    let svg = ctrl.svg_markup().unwrap();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains("id=\"hot-map-svg\""));
    assert!(svg.contains("<filter id=\"lighten\">"));
    assert!(svg.contains("<g id=\"legend\">"));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("class=\"very-hot\"").count(), 2);
    assert_eq!(svg.matches("<g id=\"cell-").count(), 7);
    assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    // Readiness markers as data URIs.
    assert_eq!(svg.matches("class=\"marked-ready\"").count(), 4);
    assert!(svg.contains("xlink:href=\"data:image/svg+xml;base64,"));
}

#[test]
fn test_marker_position() {
    let ctrl = drawn(&seven_records().build_rows(), 500.0);
    let scene = ctrl.scene();
    let rust = cell_of(&ctrl, "Rust");
    let image = scene
        .group("cell-1")
        .unwrap()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
            _ => None,
        })
        .unwrap();
    assert_eq!(image, (rust.x + 117.0 / 2.0 - 30.0, rust.y - 15.0, 60.0, 40.0));
}

#[test]
fn test_text_is_escaped() {
    let rows = SheetBuilder::new().tech(1, "R<&>D", "Misc").build_rows();
    let ctrl = drawn(&rows, 500.0);
    let svg = ctrl.svg_markup().unwrap();
    assert!(svg.contains("R&lt;&amp;&gt;D"));
    assert!(!svg.contains("R<&>D"));
}

#[test]
fn test_render_to_backend() {
    let ctrl = drawn(&seven_records().build_rows(), 500.0);
    let mut backend = SvgRenderer::new();
    ctrl.render_to(&mut backend).unwrap();
    assert_eq!(backend.markup(), ctrl.svg_markup().unwrap());
    backend.clear();
    assert!(backend.markup().is_empty());
}

#[test]
fn test_empty_state_renders_empty_scene() {
    let ctrl = hotmap::HeatMapController::new(HotmapConfig::default());
    assert!(ctrl.scene().commands.is_empty());
}

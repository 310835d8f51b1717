//! Turns the render-state table into draw commands.

use crate::types::Hotness;

use super::backend::{DrawCommand, Filter, Scene, TextAnchor};
use super::colors::{emphasis_stroke, hot_class, hot_fill, text_color_on, INK};
use super::state::{CellVisual, Emphasis, RenderState};

/// Size of the marker image.
const MARKER_WIDTH: f64 = 60.0;
const MARKER_HEIGHT: f64 = 40.0;
/// How far a marker sticks out above its cell.
const MARKER_RAISE: f64 = 15.0;

const LEGEND_SWATCH_WIDTH: f64 = 50.0;
const LEGEND_SWATCH_HEIGHT: f64 = 70.0;
const LEGEND_SWATCH_PITCH: f64 = 75.0;
const LEGEND_CAPTION_SIZE: f64 = 22.0;
const LEGEND_LEVEL_SIZE: f64 = 30.0;

/// Build the full scene: legend first, then one group per cell in placement order.
pub fn build_scene(state: &RenderState) -> Scene {
    let Some(size) = state.size() else {
        return Scene::default();
    };
    let mut scene = Scene::new(size.width, size.height);
    push_legend(&mut scene, size.legend_x, size.height);
    for (index, cell) in state.cells().iter().enumerate() {
        push_cell(&mut scene, index, cell);
    }
    scene
}

fn push_cell(scene: &mut Scene, index: usize, cell: &CellVisual) {
    let fill = hot_fill(cell.hot);
    let ink = text_color_on(fill);
    let (filter, stroke) = match cell.emphasis {
        Emphasis::Normal => (Filter::Lighten, None),
        Emphasis::Emphasized => (Filter::InsetShadow, Some(emphasis_stroke(fill))),
    };

    scene.push(DrawCommand::BeginGroup {
        id: format!("cell-{index}"),
    });
    scene.push(DrawCommand::Rect {
        x: cell.x,
        y: cell.y,
        width: cell.width,
        height: cell.height,
        fill: fill.to_string(),
        class: Some(hot_class(cell.hot)),
        filter: Some(filter),
        stroke,
    });
    for line in cell.text.title.iter().chain(&cell.text.description) {
        scene.push(DrawCommand::Text {
            x: line.x,
            y: line.y,
            text: line.text.clone(),
            font_size: line.font_size,
            anchor: TextAnchor::Middle,
            fill: ink.to_string(),
        });
    }
    for marker in &cell.markers {
        scene.push(DrawCommand::Image {
            x: cell.x + cell.width / 2.0 - MARKER_WIDTH / 2.0,
            y: cell.y - MARKER_RAISE,
            width: MARKER_WIDTH,
            height: MARKER_HEIGHT,
            href: marker.href.clone(),
            class: marker.class.clone(),
        });
    }
    scene.push(DrawCommand::EndGroup);
}

/// Vertical "Hot" to "Cold" scale to the right of the grid.
fn push_legend(scene: &mut Scene, x: f64, height: f64) {
    let top = height / 2.0 - 200.0;
    scene.push(DrawCommand::BeginGroup {
        id: "legend".to_string(),
    });
    scene.push(caption(x, top, "Hot"));
    for level in 1..=5u8 {
        let step = f64::from(level);
        scene.push(DrawCommand::Rect {
            x: x - LEGEND_SWATCH_WIDTH / 2.0,
            y: top + LEGEND_SWATCH_PITCH * (step - 1.0) + 20.0,
            width: LEGEND_SWATCH_WIDTH,
            height: LEGEND_SWATCH_HEIGHT,
            fill: hot_fill(Hotness::new(level)).to_string(),
            class: None,
            filter: Some(Filter::InsetShadow),
            stroke: None,
        });
        scene.push(DrawCommand::Text {
            x: x + 40.0,
            y: top + LEGEND_SWATCH_PITCH * step - 10.0,
            text: level.to_string(),
            font_size: LEGEND_LEVEL_SIZE,
            anchor: TextAnchor::Start,
            fill: INK.to_string(),
        });
    }
    scene.push(caption(x, top + 425.0, "Cold"));
    scene.push(DrawCommand::EndGroup);
}

fn caption(x: f64, y: f64, text: &str) -> DrawCommand {
    DrawCommand::Text {
        x,
        y,
        text: text.to_string(),
        font_size: LEGEND_CAPTION_SIZE,
        anchor: TextAnchor::Middle,
        fill: INK.to_string(),
    }
}

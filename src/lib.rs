//! hotmap - technology heat map for the web
//!
//! Lays out spreadsheet rows as a grid of cells coloured by a 1 to 5
//! "hotness" score, in the browser via WebAssembly and on the host as SVG:
//! - Column-major grid with double-width cells and occupancy tracking
//! - Title and category line breaking sized to the cell
//! - Category filter, saleability highlight and readiness markers
//! - Debounced relayout on window resize
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { HotMapView } from 'hotmap';
//! await init();
//! const view = new HotMapView(container, { dataSource: url }, loadingEl);
//! await view.load();
//! view.select_category('Language');
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! let csv = "Technologies,Technology Type,\"TC Community ready? (1 = VERY, 5 = Not possible)\"\n\
//!            Rust,Language,1\nGo,Language,2\n";
//! let map = hotmap::build_map(csv.as_bytes(), 800.0, hotmap::HotmapConfig::default()).unwrap();
//! assert_eq!(map.render_state().len(), 2);
//! ```

pub mod config;
pub mod controller;
pub mod csv;
pub mod error;
pub mod layout;
pub mod render;
pub mod source;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::HotMapView;

pub use config::{HotmapConfig, OverflowPolicy};
pub use controller::{HeatMapController, PipelineStage, PipelineStatus, UiEvent};
pub use error::{HotmapError, Result};
pub use types::*;

/// Load CSV bytes and draw every category at `container_width`.
///
/// Unlike the controller's event entry points, failures are returned.
///
/// # Errors
/// Returns an error if the CSV is malformed, has no rows or lacks the title
/// column, or if the layout overflows under [`OverflowPolicy::Reject`].
pub fn build_map(
    data: &[u8],
    container_width: f64,
    config: HotmapConfig,
) -> Result<HeatMapController> {
    let rows = csv::parse_rows(data, csv::Delimiter::Comma)?;
    let mut controller = HeatMapController::new(config);
    controller.load_rows(&rows)?;
    controller.set_container_width(container_width);
    controller.try_redraw(controller::ALL_CATEGORIES)?;
    Ok(controller)
}

/// Lay out a CSV export and return the SVG markup.
///
/// # Arguments
/// * `data` - CSV text with a header row
/// * `container_width` - Width of the host container in CSS pixels
///
/// # Errors
/// Returns an error if the CSV cannot be laid out.
#[wasm_bindgen]
pub fn render_csv(data: &str, container_width: f64) -> std::result::Result<String, JsValue> {
    let map = build_map(data.as_bytes(), container_width, HotmapConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    map.svg_markup()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Lay out a CSV export and return the grid as a `JsValue`.
///
/// # Errors
/// Returns an error if the CSV cannot be laid out.
#[wasm_bindgen]
pub fn layout_csv_to_js(data: &str, container_width: f64) -> std::result::Result<JsValue, JsValue> {
    let map = build_map(data.as_bytes(), container_width, HotmapConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&map.layout())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! Heat map configuration.
//!
//! Everything the page used to keep in a global settings object lives here
//! and is handed to the controller at construction. All fields have defaults,
//! so a host may pass a partial JSON/JS object.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::CellSpan;

/// Spreadsheet header text for each column the core reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnKeys {
    pub hotness: String,
    pub title: String,
    pub category: String,
    pub saleability: String,
    pub readiness: String,
}

impl Default for ColumnKeys {
    fn default() -> Self {
        Self {
            hotness: "TC Community ready? (1 = VERY, 5 = Not possible)".to_string(),
            title: "Technologies".to_string(),
            category: "Technology Type".to_string(),
            saleability: "Should we sell? (Yes/No/With Care)".to_string(),
            readiness: "Widely Used on TC".to_string(),
        }
    }
}

/// Names under which the host page raises UI events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventNames {
    pub reset: String,
    pub saleability: String,
    pub community_ready: String,
    pub category_selected: String,
    pub export: String,
}

impl Default for EventNames {
    fn default() -> Self {
        Self {
            reset: "reset".to_string(),
            saleability: "saleAbilityChanged".to_string(),
            community_ready: "communityReadiness".to_string(),
            category_selected: "technologyTypeSelected".to_string(),
            export: "export".to_string(),
        }
    }
}

/// Grid geometry, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMetrics {
    /// Edge length of a single cell.
    pub cell_edge: f64,
    /// Gap between neighbouring cells.
    pub cell_margin: f64,
    /// Share of the container width the grid may use.
    pub width_factor: f64,
    /// Width held back for the legend.
    pub legend_reserve: f64,
    /// Distance from the right edge of the grid to the legend centre line.
    pub legend_gap: f64,
    /// Offset of the first slot from the top-left corner.
    pub origin_offset: f64,
    /// Added below the last row.
    pub height_padding: f64,
    pub min_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            cell_edge: 117.0,
            cell_margin: 12.0,
            width_factor: 0.94,
            legend_reserve: 70.0,
            legend_gap: 45.0,
            origin_offset: 10.0,
            height_padding: 20.0,
            min_height: 500.0,
        }
    }
}

impl LayoutMetrics {
    /// Distance between the origins of two neighbouring slots.
    pub fn pitch(&self) -> f64 {
        self.cell_edge + self.cell_margin
    }

    /// Drawn width of a cell with the given span.
    pub fn cell_width(&self, span: CellSpan) -> f64 {
        match span {
            CellSpan::Single => self.cell_edge,
            CellSpan::Double => self.cell_edge * 2.0 + self.cell_margin,
        }
    }
}

/// Font sizes and offsets for the text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextMetrics {
    pub title_base_size: f64,
    /// Subtracted per title line beyond the first.
    pub title_size_step: f64,
    /// Subtracted from lines longer than `long_line_chars`.
    pub long_line_penalty: f64,
    pub long_line_chars: usize,
    /// Baseline of a one-line title, relative to the cell top.
    pub title_baseline: f64,
    /// Upward shift of the title block per extra line.
    pub title_center_shift: f64,
    pub title_line_pitch: f64,
    pub desc_size: f64,
    pub desc_baseline: f64,
    pub desc_line_pitch: f64,
    /// Titles longer than this (trimmed, in chars) are broken into lines.
    pub wrap_trigger_chars: usize,
    /// Budget for re-merging short fragments.
    pub merge_budget_chars: usize,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            title_base_size: 26.0,
            title_size_step: 3.0,
            long_line_penalty: 5.0,
            long_line_chars: 10,
            title_baseline: 45.0,
            title_center_shift: 8.0,
            title_line_pitch: 20.0,
            desc_size: 15.0,
            desc_baseline: 90.0,
            desc_line_pitch: 15.0,
            wrap_trigger_chars: 10,
            merge_budget_chars: 10,
        }
    }
}

/// What to do with a double-span record whose second slot is off the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// Place it as a single-span cell and log a warning.
    #[default]
    Demote,
    /// Fail the layout pass with `LayoutOverflow`.
    Reject,
}

/// Default readiness marker artwork.
const DEFAULT_INDICATOR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="40" viewBox="0 0 60 40"><path d="M8 4h44a4 4 0 0 1 4 4v18a4 4 0 0 1-4 4H36l-6 8-6-8H8a4 4 0 0 1-4-4V8a4 4 0 0 1 4-4z" fill="#333E48"/><path d="M21 17l6 6 12-12" stroke="#FFFFFF" stroke-width="4" fill="none"/></svg>"##;

/// Top-level configuration passed to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotmapConfig {
    /// URL of the published sheet (CSV export).
    pub data_source: String,
    pub columns: ColumnKeys,
    pub events: EventNames,
    pub layout: LayoutMetrics,
    pub text: TextMetrics,
    /// Titles containing this substring take two slots.
    pub span_keyword: String,
    pub overflow_policy: OverflowPolicy,
    /// Quiet window before a resize burst triggers a relayout.
    pub resize_debounce_ms: u32,
    /// Marker class for readiness annotations.
    pub ready_marker: String,
    /// Readiness value that earns the marker.
    pub ready_value: String,
    /// Start with readiness markers shown, re-applied after each draw until
    /// toggled off. Reset restores this setting.
    pub mark_ready_on_draw: bool,
    pub export_basename: String,
    /// SVG markup of the readiness marker.
    pub indicator_svg: String,
}

impl Default for HotmapConfig {
    fn default() -> Self {
        Self {
            data_source: String::new(),
            columns: ColumnKeys::default(),
            events: EventNames::default(),
            layout: LayoutMetrics::default(),
            text: TextMetrics::default(),
            span_keyword: "and".to_string(),
            overflow_policy: OverflowPolicy::Demote,
            resize_debounce_ms: 100,
            ready_marker: "marked-ready".to_string(),
            ready_value: "Y".to_string(),
            mark_ready_on_draw: true,
            export_basename: "topcoder-heat-map".to_string(),
            indicator_svg: DEFAULT_INDICATOR_SVG.to_string(),
        }
    }
}

impl HotmapConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The readiness marker as a `data:` URI usable as an image href.
    pub fn indicator_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.indicator_svg.as_bytes());
        format!("data:image/svg+xml;base64,{encoded}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = HotmapConfig::from_json(r#"{"spanKeyword": "&", "layout": {"cellEdge": 100.0}}"#)
            .unwrap();
        assert_eq!(cfg.span_keyword, "&");
        assert_eq!(cfg.layout.cell_edge, 100.0);
        assert_eq!(cfg.layout.cell_margin, 12.0);
        assert_eq!(cfg.columns.title, "Technologies");
        assert_eq!(cfg.resize_debounce_ms, 100);
    }

    #[test]
    fn test_overflow_policy_names() {
        let cfg = HotmapConfig::from_json(r#"{"overflowPolicy": "reject"}"#).unwrap();
        assert_eq!(cfg.overflow_policy, OverflowPolicy::Reject);
    }

    #[test]
    fn test_indicator_data_uri() {
        let cfg = HotmapConfig {
            indicator_svg: "<svg/>".to_string(),
            ..HotmapConfig::default()
        };
        assert_eq!(cfg.indicator_data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }
}

//! Layout engine for the heat map grid.
//!
//! This module handles:
//! - Sizing the grid (columns, rows, surface height) for a container width
//! - Generating slot positions column-major
//! - Occupancy-tracked placement of single and double-span cells
//! - Line breaking and positioning of cell titles and categories
//!
//! Nothing here does I/O or keeps state between layout passes.

mod grid;
mod text;

pub use grid::{place, position_cells, size_map, CellSlot, GridLayout, MapSize, Placement};
pub use text::{
    arrange_description, arrange_title, layout_cell_text, split_text, title_font_size, wrap_text,
    CellText, TextLine,
};

//! Render-state table: one entry per placed record.
//!
//! Records point into this table through a [`CellHandle`]; the table itself
//! is owned by the controller and rebuilt on every layout pass.

use serde::Serialize;

use crate::layout::{CellText, MapSize};
use crate::types::{CellHandle, CellSpan, Hotness};

/// Visual treatment of a cell background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Emphasis {
    #[default]
    Normal,
    Emphasized,
}

/// Image overlay attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub class: String,
    pub href: String,
}

/// Everything drawn for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellVisual {
    /// Index of the record in the working set.
    pub record: usize,
    /// Index of the (left) slot it occupies.
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub span: CellSpan,
    pub hot: Hotness,
    pub text: CellText,
    pub emphasis: Emphasis,
    pub markers: Vec<Marker>,
}

impl CellVisual {
    pub fn has_marker(&self, class: &str) -> bool {
        self.markers.iter().any(|m| m.class == class)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderState {
    size: Option<MapSize>,
    cells: Vec<CellVisual>,
}

impl RenderState {
    pub fn new(size: MapSize) -> Self {
        Self {
            size: Some(size),
            cells: Vec::new(),
        }
    }

    pub fn size(&self) -> Option<MapSize> {
        self.size
    }

    pub fn push(&mut self, cell: CellVisual) -> CellHandle {
        self.cells.push(cell);
        CellHandle(self.cells.len() - 1)
    }

    pub fn get(&self, handle: CellHandle) -> Option<&CellVisual> {
        self.cells.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: CellHandle) -> Option<&mut CellVisual> {
        self.cells.get_mut(handle.0)
    }

    pub fn cells(&self) -> &[CellVisual] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Put every cell back to the normal look.
    pub fn reset_emphasis(&mut self) {
        for cell in &mut self.cells {
            cell.emphasis = Emphasis::Normal;
        }
    }

    pub fn set_emphasis(&mut self, handle: CellHandle, emphasis: Emphasis) {
        if let Some(cell) = self.get_mut(handle) {
            cell.emphasis = emphasis;
        }
    }

    /// Attach a marker unless the cell already carries one of that class.
    /// Returns true if a marker was added.
    pub fn add_marker(&mut self, handle: CellHandle, marker: Marker) -> bool {
        match self.get_mut(handle) {
            Some(cell) if !cell.has_marker(&marker.class) => {
                cell.markers.push(marker);
                true
            }
            _ => false,
        }
    }

    /// Remove markers of one class from every cell.
    pub fn remove_markers(&mut self, class: &str) {
        for cell in &mut self.cells {
            cell.markers.retain(|m| m.class != class);
        }
    }

    pub fn clear_markers(&mut self) {
        for cell in &mut self.cells {
            cell.markers.clear();
        }
    }

    pub fn emphasized_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.emphasis == Emphasis::Emphasized)
            .count()
    }
}

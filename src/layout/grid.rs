//! Grid sizing, slot generation and occupancy-tracked placement.
//!
//! Slots are generated column-major: slot `i` sits in column `i / rows`,
//! row `i % rows`. The slot one column to the right of `i` is therefore
//! `i + rows`, which is where a double-span cell spills into.

use serde::Serialize;

use crate::config::{LayoutMetrics, OverflowPolicy};
use crate::error::{HotmapError, Result};
use crate::types::CellSpan;

/// Outcome of sizing the map for a container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSize {
    pub columns: usize,
    pub rows: usize,
    /// Height of the drawing surface.
    pub height: f64,
    /// Width of the drawing surface, legend included.
    pub width: f64,
    /// Centre line of the legend column.
    pub legend_x: f64,
}

/// One grid position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSlot {
    pub column: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub occupied: bool,
}

/// Where a record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Index of the record's (left) slot.
    pub slot: usize,
    /// Span actually used; `Single` when a double-span record was demoted.
    pub span: CellSpan,
    pub demoted: bool,
}

/// Compute column/row counts and surface size.
///
/// Pure: identical inputs always produce identical output.
pub fn size_map(container_width: f64, total_cells: usize, metrics: &LayoutMetrics) -> MapSize {
    let usable = container_width * metrics.width_factor - metrics.legend_reserve;
    let fit = (usable / metrics.pitch()).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fit = if fit.is_finite() && fit >= 1.0 {
        fit as usize
    } else {
        1
    };
    let columns = fit.min(total_cells).max(1);
    let rows = total_cells.div_ceil(columns);

    let height = (rows as f64 * metrics.pitch() + metrics.height_padding).max(metrics.min_height);
    let legend_x = metrics.pitch() * columns as f64 + metrics.legend_gap;
    MapSize {
        columns,
        rows,
        height,
        width: legend_x + metrics.legend_reserve,
        legend_x,
    }
}

/// Generate every slot of a `columns` x `rows` grid, column-major, all free.
pub fn position_cells(columns: usize, rows: usize, metrics: &LayoutMetrics) -> Vec<CellSlot> {
    let pitch = metrics.pitch();
    let mut slots = Vec::with_capacity(columns * rows);
    for column in 0..columns {
        for row in 0..rows {
            slots.push(CellSlot {
                column,
                row,
                x: column as f64 * pitch + metrics.origin_offset,
                y: row as f64 * pitch + metrics.origin_offset,
                occupied: false,
            });
        }
    }
    slots
}

/// Place one record starting the search at `cursor`.
///
/// Skips occupied slots, claims the first free one and, for a double-span
/// record, also claims the slot `rows` further on. Returns the placement and
/// the advanced cursor. `record` is only used for error reporting.
pub fn place(
    slots: &mut [CellSlot],
    cursor: usize,
    rows: usize,
    span: CellSpan,
    policy: OverflowPolicy,
    record: usize,
) -> Result<(Placement, usize)> {
    let total = slots.len();
    let mut cursor = cursor;
    while slots.get(cursor).is_some_and(|slot| slot.occupied) {
        cursor += 1;
    }
    let Some(slot) = slots.get_mut(cursor) else {
        return Err(HotmapError::LayoutOverflow {
            record,
            cursor,
            slots: total,
        });
    };
    slot.occupied = true;

    let mut effective = span;
    if span.is_double() {
        match slots.get_mut(cursor + rows) {
            Some(partner) if !partner.occupied => partner.occupied = true,
            _ => match policy {
                OverflowPolicy::Demote => {
                    tracing::warn!(record, cursor, "double-span cell has no room to its right, demoting");
                    effective = CellSpan::Single;
                }
                OverflowPolicy::Reject => {
                    if let Some(slot) = slots.get_mut(cursor) {
                        slot.occupied = false;
                    }
                    return Err(HotmapError::LayoutOverflow {
                        record,
                        cursor,
                        slots: total,
                    });
                }
            },
        }
    }

    Ok((
        Placement {
            slot: cursor,
            span: effective,
            demoted: effective != span,
        },
        cursor + 1,
    ))
}

/// One layout pass: sized grid, its slots and the running cursor.
///
/// Built fresh for every redraw and never patched afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub size: MapSize,
    pub slots: Vec<CellSlot>,
    pub total_cells: usize,
    cursor: usize,
    #[serde(skip)]
    policy: OverflowPolicy,
}

impl GridLayout {
    pub fn new(
        container_width: f64,
        total_cells: usize,
        metrics: &LayoutMetrics,
        policy: OverflowPolicy,
    ) -> Self {
        let size = size_map(container_width, total_cells, metrics);
        let slots = position_cells(size.columns, size.rows, metrics);
        Self {
            size,
            slots,
            total_cells,
            cursor: 0,
            policy,
        }
    }

    /// Place the next record in sequence.
    pub fn place(&mut self, record: usize, span: CellSpan) -> Result<Placement> {
        let (placement, cursor) = place(
            &mut self.slots,
            self.cursor,
            self.size.rows,
            span,
            self.policy,
            record,
        )?;
        self.cursor = cursor;
        Ok(placement)
    }

    /// Index the next placement starts searching from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slot(&self, index: usize) -> Option<&CellSlot> {
        self.slots.get(index)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupied).count()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn metrics() -> LayoutMetrics {
        LayoutMetrics::default()
    }

    #[test]
    fn test_size_map_three_columns() {
        // 500 * 0.94 - 70 = 400 -> floor(400 / 129) = 3
        let size = size_map(500.0, 7, &metrics());
        assert_eq!(size.columns, 3);
        assert_eq!(size.rows, 3);
        assert_eq!(size.height, 500.0);
        assert_eq!(size.legend_x, 129.0 * 3.0 + 45.0);
        assert_eq!(size.width, size.legend_x + 70.0);
    }

    #[test]
    fn test_size_map_bounds() {
        // Too narrow for a single column still yields one.
        assert_eq!(size_map(10.0, 4, &metrics()).columns, 1);
        // Never more columns than cells.
        assert_eq!(size_map(5000.0, 2, &metrics()).columns, 2);
        let empty = size_map(800.0, 0, &metrics());
        assert_eq!((empty.columns, empty.rows), (1, 0));
    }

    #[test]
    fn test_size_map_tall_grid() {
        let size = size_map(500.0, 30, &metrics());
        assert_eq!(size.rows, 10);
        assert_eq!(size.height, 10.0 * 129.0 + 20.0);
    }

    #[test]
    fn test_position_cells_column_major() {
        let slots = position_cells(2, 3, &metrics());
        assert_eq!(slots.len(), 6);
        assert_eq!((slots[1].column, slots[1].row), (0, 1));
        assert_eq!((slots[3].column, slots[3].row), (1, 0));
        assert_eq!((slots[3].x, slots[3].y), (139.0, 10.0));
        assert_eq!((slots[5].x, slots[5].y), (139.0, 268.0));
        assert!(slots.iter().all(|s| !s.occupied));
    }

    #[test]
    fn test_double_span_marks_right_neighbour() {
        let mut slots = position_cells(3, 2, &metrics());
        let (placement, cursor) =
            place(&mut slots, 0, 2, CellSpan::Double, OverflowPolicy::Demote, 0).unwrap();
        assert_eq!(placement.slot, 0);
        assert_eq!(placement.span, CellSpan::Double);
        assert_eq!(cursor, 1);
        assert!(slots[2].occupied);

        // Slot 1 is free, slot 2 is taken by the spill, so the third record lands in 3.
        let (second, cursor) =
            place(&mut slots, cursor, 2, CellSpan::Single, OverflowPolicy::Demote, 1).unwrap();
        assert_eq!(second.slot, 1);
        let (third, _) =
            place(&mut slots, cursor, 2, CellSpan::Single, OverflowPolicy::Demote, 2).unwrap();
        assert_eq!(third.slot, 3);
    }

    #[test]
    fn test_last_column_double_is_demoted() {
        let mut slots = position_cells(1, 2, &metrics());
        let (placement, _) =
            place(&mut slots, 0, 2, CellSpan::Double, OverflowPolicy::Demote, 0).unwrap();
        assert_eq!(placement.span, CellSpan::Single);
        assert!(placement.demoted);
        assert_eq!(slots.iter().filter(|s| s.occupied).count(), 1);
    }

    #[test]
    fn test_last_column_double_is_rejected() {
        let mut slots = position_cells(1, 2, &metrics());
        let err = place(&mut slots, 0, 2, CellSpan::Double, OverflowPolicy::Reject, 4).unwrap_err();
        match err {
            HotmapError::LayoutOverflow { record, cursor, slots: total } => {
                assert_eq!((record, cursor, total), (4, 0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(slots.iter().all(|s| !s.occupied));
    }

    #[test]
    fn test_full_grid_overflows() {
        let mut layout = GridLayout::new(500.0, 1, &metrics(), OverflowPolicy::Demote);
        layout.place(0, CellSpan::Single).unwrap();
        assert!(matches!(
            layout.place(1, CellSpan::Single),
            Err(HotmapError::LayoutOverflow { record: 1, .. })
        ));
    }
}

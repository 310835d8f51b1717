//! Shared helpers for integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use hotmap::render::CellVisual;
use hotmap::{HeatMapController, HotmapConfig, HotmapError, PipelineStatus, RawRow};

/// A controller with `rows` loaded, not yet drawn.
pub fn loaded(rows: &[RawRow], config: HotmapConfig) -> HeatMapController {
    let mut ctrl = HeatMapController::new(config);
    let ticket = ctrl.begin_load();
    assert_eq!(
        ctrl.complete_load(ticket, Ok(rows.to_vec())),
        PipelineStatus::Loaded
    );
    ctrl
}

/// A controller with `rows` loaded and every category drawn at `width`.
pub fn drawn(rows: &[RawRow], width: f64) -> HeatMapController {
    drawn_with(rows, width, HotmapConfig::default())
}

pub fn drawn_with(rows: &[RawRow], width: f64, config: HotmapConfig) -> HeatMapController {
    let mut ctrl = loaded(rows, config);
    ctrl.set_container_width(width);
    assert_eq!(ctrl.redraw("*"), PipelineStatus::Rendered);
    ctrl
}

/// Collect every error the controller reports.
pub fn capture_errors(ctrl: &mut HeatMapController) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ctrl.on_error(move |err: &HotmapError| sink.borrow_mut().push(err.to_string()));
    seen
}

/// Titles of the working set, in order.
pub fn titles(ctrl: &HeatMapController) -> Vec<String> {
    ctrl.records().iter().map(|r| r.title.clone()).collect()
}

/// The drawn cell of the record titled `title`.
pub fn cell_of<'a>(ctrl: &'a HeatMapController, title: &str) -> &'a CellVisual {
    let record = ctrl
        .records()
        .iter()
        .find(|r| r.title == title)
        .unwrap_or_else(|| panic!("no record titled {title}"));
    let handle = record.cell.expect("record was not placed");
    ctrl.render_state().get(handle).expect("dangling cell handle")
}

/// Every slot index a cell covers must be claimed by exactly one record.
pub fn assert_no_slot_collisions(ctrl: &HeatMapController) {
    let layout = ctrl.layout().expect("no layout");
    let rows = layout.size.rows;
    let mut claimed = HashSet::new();
    for cell in ctrl.render_state().cells() {
        assert!(claimed.insert(cell.slot), "slot {} claimed twice", cell.slot);
        if cell.span.is_double() {
            let partner = cell.slot + rows;
            assert!(claimed.insert(partner), "slot {partner} claimed twice");
            assert!(layout.slots[partner].occupied);
        }
    }
    assert_eq!(claimed.len(), layout.occupied_count());
}

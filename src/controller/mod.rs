//! Heat map controller: record lifecycle and the redraw pipeline.
//!
//! One redraw runs `Filtered -> Sorted -> Spanned -> Rendered` over the
//! working set. The only asynchronous step is the data fetch, which is
//! split into [`HeatMapController::begin_load`] and
//! [`HeatMapController::complete_load`] so a caller never holds the
//! controller across an await point.

pub mod debounce;
pub mod events;
pub mod pipeline;
pub mod report;

pub use debounce::Debouncer;
pub use events::{saleability_for_level, ExportFormat, ExportRequest, UiEvent};
pub use pipeline::{
    assign_spans, filter_records, heat_order, sort_records, unique_categories, KeywordSpan,
    LoadTicket, PipelineStage, PipelineStatus, SpanStrategy, ALL_CATEGORIES,
};
pub use report::ErrorQueue;

use std::fmt;

use crate::config::HotmapConfig;
use crate::error::{HotmapError, Result};
use crate::layout::{layout_cell_text, GridLayout};
use crate::render::{
    build_scene, CellVisual, Emphasis, Marker, RenderBackend, RenderState, Scene, SvgRenderer,
};
use crate::source::RecordSource;
use crate::types::{RawRow, Record, RecordField};

type ErrorHandler = Box<dyn FnMut(&HotmapError)>;

/// Owns the records and the rendered cell set of one heat map.
pub struct HeatMapController {
    config: HotmapConfig,
    stage: PipelineStage,
    /// Snapshot as loaded; never reordered.
    full: Vec<Record>,
    /// Filtered, sorted and spanned copy the layout is built from.
    working: Vec<Record>,
    total_cells: usize,
    category: String,
    container_width: f64,
    layout: Option<GridLayout>,
    render: RenderState,
    generation: u64,
    /// Last redraw requested while a load was in flight.
    pending: Option<String>,
    error_handler: Option<ErrorHandler>,
    /// Readiness markers are re-applied after each draw while set.
    readiness_marked: bool,
    span_strategy: Box<dyn SpanStrategy>,
}

impl fmt::Debug for HeatMapController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatMapController")
            .field("stage", &self.stage)
            .field("records", &self.full.len())
            .field("working", &self.working.len())
            .field("total_cells", &self.total_cells)
            .field("category", &self.category)
            .field("container_width", &self.container_width)
            .field("cells", &self.render.len())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl HeatMapController {
    pub fn new(config: HotmapConfig) -> Self {
        let span_strategy = Box::new(KeywordSpan::new(config.span_keyword.clone()));
        let readiness_marked = config.mark_ready_on_draw;
        Self {
            config,
            stage: PipelineStage::Idle,
            full: Vec::new(),
            working: Vec::new(),
            total_cells: 0,
            category: ALL_CATEGORIES.to_string(),
            container_width: 0.0,
            layout: None,
            render: RenderState::default(),
            generation: 0,
            pending: None,
            error_handler: None,
            readiness_marked,
            span_strategy,
        }
    }

    pub fn config(&self) -> &HotmapConfig {
        &self.config
    }

    /// Register the single error handler. Without one, errors are logged.
    ///
    /// The handler runs while the controller is borrowed; see [`ErrorQueue`]
    /// for delivering errors after the borrow ends.
    pub fn on_error(&mut self, handler: impl FnMut(&HotmapError) + 'static) {
        self.error_handler = Some(Box::new(handler));
    }

    /// Replace the strategy used by [`redraw`](Self::redraw).
    pub fn set_span_strategy(&mut self, strategy: impl SpanStrategy + 'static) {
        self.span_strategy = Box::new(strategy);
    }

    // ---- loading ----

    /// Start a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.advance(PipelineStage::Loading);
        LoadTicket(self.generation)
    }

    /// Finish the load identified by `ticket` with the fetch outcome.
    ///
    /// A stale ticket is discarded. On success the full snapshot and the
    /// working set are replaced, and a redraw requested during the load
    /// runs now.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Vec<RawRow>>,
    ) -> PipelineStatus {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale load"
            );
            return PipelineStatus::Superseded;
        }
        match fetched.and_then(|rows| self.records_from_rows(&rows)) {
            Ok(records) => {
                self.accept_records(records);
                match self.pending.take() {
                    Some(category) => self.redraw(&category),
                    None => PipelineStatus::Loaded,
                }
            }
            Err(err) => {
                self.settle_failed_load();
                self.report(&err);
                PipelineStatus::Failed
            }
        }
    }

    /// Fetch from `source` and complete the load in one call.
    pub async fn load<S: RecordSource>(&mut self, source: &S) -> PipelineStatus {
        let ticket = self.begin_load();
        let fetched = source.fetch().await;
        self.complete_load(ticket, fetched)
    }

    /// Load already-fetched rows, returning the error instead of reporting it.
    ///
    /// Any load in flight is superseded.
    pub fn load_rows(&mut self, rows: &[RawRow]) -> Result<()> {
        self.generation += 1;
        self.pending = None;
        match self.records_from_rows(rows) {
            Ok(records) => {
                self.accept_records(records);
                Ok(())
            }
            Err(err) => {
                self.settle_failed_load();
                Err(err)
            }
        }
    }

    /// Drop any pending redraw and fall back to the previous snapshot, if any.
    fn settle_failed_load(&mut self) {
        self.pending = None;
        if self.stage == PipelineStage::Loading {
            let fallback = if self.full.is_empty() {
                PipelineStage::Idle
            } else {
                PipelineStage::Loaded
            };
            self.advance(fallback);
        }
    }

    fn accept_records(&mut self, records: Vec<Record>) {
        tracing::debug!(records = records.len(), "data loaded");
        self.working = records.clone();
        self.full = records;
        self.total_cells = 0;
        self.advance(PipelineStage::Loaded);
    }

    fn records_from_rows(&self, rows: &[RawRow]) -> Result<Vec<Record>> {
        if rows.is_empty() {
            return Err(HotmapError::data_source("no rows returned"));
        }
        let keys = &self.config.columns;
        if !rows.iter().any(|row| row.contains_key(&keys.title)) {
            return Err(HotmapError::data_source(format!(
                "title column '{}' is missing",
                keys.title
            )));
        }
        Ok(rows.iter().map(|row| Record::from_row(row, keys)).collect())
    }

    // ---- pipeline stages ----

    /// Restore the working set from the snapshot and keep `category`
    /// (or everything for `"*"`).
    pub fn filter_by_category(&mut self, category: &str) -> Result<usize> {
        if matches!(self.stage, PipelineStage::Idle | PipelineStage::Loading) {
            return Err(self.order_error(PipelineStage::Loaded));
        }
        self.working = filter_records(&self.full, category);
        self.category = category.to_string();
        self.total_cells = 0;
        self.advance(PipelineStage::Filtered);
        Ok(self.working.len())
    }

    /// Stable sort of the working set by (hotness, title).
    pub fn sort(&mut self) -> Result<()> {
        self.expect_stage(PipelineStage::Filtered)?;
        sort_records(&mut self.working);
        self.advance(PipelineStage::Sorted);
        Ok(())
    }

    /// Sort, then give every record its span. Returns the total slot count.
    pub fn sort_and_span(&mut self, strategy: &dyn SpanStrategy) -> Result<usize> {
        self.sort()?;
        self.span_stage(Some(strategy))
    }

    fn span_stage(&mut self, custom: Option<&dyn SpanStrategy>) -> Result<usize> {
        self.expect_stage(PipelineStage::Sorted)?;
        let strategy = custom.unwrap_or(self.span_strategy.as_ref());
        self.total_cells = assign_spans(&mut self.working, strategy);
        self.advance(PipelineStage::Spanned);
        Ok(self.total_cells)
    }

    /// Lay out the working set for `container_width` and rebuild the
    /// render state from scratch.
    ///
    /// Nothing is committed unless every record is placed.
    pub fn layout_and_render(&mut self, container_width: f64) -> Result<()> {
        self.expect_stage(PipelineStage::Spanned)?;
        self.container_width = container_width;

        let metrics = &self.config.layout;
        let mut layout = GridLayout::new(
            container_width,
            self.total_cells,
            metrics,
            self.config.overflow_policy,
        );
        let mut render = RenderState::new(layout.size);
        let mut assigned = Vec::with_capacity(self.working.len());

        for (index, record) in self.working.iter().enumerate() {
            let placement = layout.place(index, record.cell_span)?;
            let Some(slot) = layout.slot(placement.slot).copied() else {
                return Err(HotmapError::LayoutOverflow {
                    record: index,
                    cursor: placement.slot,
                    slots: layout.slots.len(),
                });
            };
            let width = metrics.cell_width(placement.span);
            let text = layout_cell_text(
                &record.title,
                &record.category,
                placement.span,
                (slot.x, slot.y),
                width,
                &self.config.text,
            );
            let handle = render.push(CellVisual {
                record: index,
                slot: placement.slot,
                x: slot.x,
                y: slot.y,
                width,
                height: metrics.cell_edge,
                span: placement.span,
                hot: record.hot,
                text,
                emphasis: Emphasis::Normal,
                markers: Vec::new(),
            });
            assigned.push((handle, placement.span));
        }

        for (record, (handle, span)) in self.working.iter_mut().zip(assigned) {
            record.cell = Some(handle);
            record.cell_span = span;
        }
        tracing::debug!(
            columns = layout.size.columns,
            rows = layout.size.rows,
            cells = render.len(),
            cursor = layout.cursor(),
            "layout complete"
        );
        self.layout = Some(layout);
        self.render = render;
        self.advance(PipelineStage::Rendered);
        Ok(())
    }

    /// Replay the pipeline for `category` at the current container width.
    ///
    /// While a load is in flight the request is held (replacing any earlier
    /// one) and runs when the load completes. Errors go to the handler.
    pub fn redraw(&mut self, category: &str) -> PipelineStatus {
        match self.stage {
            PipelineStage::Loading => {
                tracing::debug!(category, "deferring redraw until load completes");
                self.pending = Some(category.to_string());
                PipelineStatus::Deferred
            }
            _ => match self.try_redraw(category) {
                Ok(()) => PipelineStatus::Rendered,
                Err(err) => {
                    self.report(&err);
                    PipelineStatus::Failed
                }
            },
        }
    }

    /// Run the whole pipeline for `category` now, returning the error
    /// instead of reporting it.
    pub fn try_redraw(&mut self, category: &str) -> Result<()> {
        self.filter_by_category(category)?;
        self.sort()?;
        self.span_stage(None)?;
        self.layout_and_render(self.container_width)?;
        if self.readiness_marked {
            self.mark_ready();
        }
        Ok(())
    }

    /// Store a new container width and relayout the current category.
    ///
    /// Returns `None` when there is nothing loaded to lay out yet.
    pub fn resize(&mut self, container_width: f64) -> Option<PipelineStatus> {
        self.container_width = container_width;
        match self.stage {
            PipelineStage::Idle => None,
            _ => {
                let category = self.category.clone();
                Some(self.redraw(&category))
            }
        }
    }

    /// Set the width without redrawing (used before the first draw).
    pub fn set_container_width(&mut self, container_width: f64) {
        self.container_width = container_width;
    }

    // ---- highlight and annotation ----

    /// Put every cell back to the normal look.
    pub fn reset_light(&mut self) {
        self.render.reset_emphasis();
    }

    /// Emphasize the cells whose `field` value is in `matches`; all other
    /// cells are reset. Returns the number of emphasized cells.
    pub fn highlight<S: AsRef<str>>(&mut self, field: RecordField, matches: &[S]) -> usize {
        self.reset_light();
        let mut count = 0;
        for record in &self.working {
            let Some(handle) = record.cell else { continue };
            let value = record.field_value(field);
            if matches.iter().any(|m| m.as_ref() == value) {
                self.render.set_emphasis(handle, Emphasis::Emphasized);
                count += 1;
            }
        }
        count
    }

    /// Attach `marker` to every cell whose `field` equals `value`.
    /// Returns how many markers were newly added.
    pub fn annotate(&mut self, field: RecordField, value: &str, marker: &Marker) -> usize {
        let mut added = 0;
        for record in &self.working {
            let Some(handle) = record.cell else { continue };
            if record.field_value(field) == value && self.render.add_marker(handle, marker.clone()) {
                added += 1;
            }
        }
        added
    }

    /// Remove every marker. Readiness marking stays off until re-enabled.
    pub fn clear_annotations(&mut self) {
        self.render.clear_markers();
        self.readiness_marked = false;
    }

    /// Annotate the cells flagged as community ready.
    pub fn mark_ready(&mut self) -> usize {
        let marker = Marker {
            class: self.config.ready_marker.clone(),
            href: self.config.indicator_data_uri(),
        };
        let ready_value = self.config.ready_value.clone();
        self.readiness_marked = true;
        self.annotate(RecordField::CommunityReady, &ready_value, &marker)
    }

    // ---- events ----

    /// Dispatch one UI event. Only an export produces output.
    pub fn handle(&mut self, event: UiEvent) -> Option<ExportRequest> {
        tracing::debug!(?event, "ui event");
        match event {
            UiEvent::CategorySelected(category) => {
                self.redraw(&category);
            }
            UiEvent::Reset => {
                self.reset_light();
                self.clear_annotations();
                self.readiness_marked = self.config.mark_ready_on_draw;
                self.redraw(ALL_CATEGORIES);
            }
            UiEvent::ReadinessToggle => {
                if self.readiness_marked {
                    let class = self.config.ready_marker.clone();
                    self.render.remove_markers(&class);
                    self.readiness_marked = false;
                } else {
                    self.mark_ready();
                }
            }
            UiEvent::SaleabilityFilter(tags) => {
                self.highlight(RecordField::Saleability, &tags);
            }
            UiEvent::Export(format) => match self.export(format) {
                Ok(request) => return Some(request),
                Err(err) => self.report(&err),
            },
        }
        None
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportRequest> {
        let svg = self.svg_markup()?;
        Ok(ExportRequest::new(&self.config.export_basename, format, svg))
    }

    // ---- output ----

    pub fn scene(&self) -> Scene {
        build_scene(&self.render)
    }

    pub fn render_to(&self, backend: &mut dyn RenderBackend) -> Result<()> {
        backend.render(&self.scene())
    }

    pub fn svg_markup(&self) -> Result<String> {
        SvgRenderer::to_markup(&self.scene())
    }

    // ---- accessors ----

    /// Distinct categories of the full snapshot for the dropdown, in the
    /// order they first appear once the snapshot is sorted by heat.
    pub fn categories(&self) -> Vec<String> {
        let mut sorted: Vec<&Record> = self.full.iter().collect();
        sorted.sort_by(|a, b| heat_order(a, b));
        unique_categories(sorted)
    }

    /// The working set in its current order.
    pub fn records(&self) -> &[Record] {
        &self.working
    }

    pub fn all_records(&self) -> &[Record] {
        &self.full
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn layout(&self) -> Option<&GridLayout> {
        self.layout.as_ref()
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    pub fn is_readiness_marked(&self) -> bool {
        self.readiness_marked
    }

    // ---- internals ----

    fn advance(&mut self, next: PipelineStage) {
        tracing::debug!(from = self.stage.name(), to = next.name(), "pipeline stage");
        self.stage = next;
    }

    fn expect_stage(&self, expected: PipelineStage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(self.order_error(expected))
        }
    }

    fn order_error(&self, expected: PipelineStage) -> HotmapError {
        HotmapError::PipelineOrder {
            expected: expected.name(),
            found: self.stage.name(),
        }
    }

    fn report(&mut self, err: &HotmapError) {
        match self.error_handler.as_mut() {
            Some(handler) => handler(err),
            None => tracing::error!(error = %err, "heat map pipeline failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn row(hot: &str, title: &str, category: &str) -> RawRow {
        let keys = crate::config::ColumnKeys::default();
        let mut row = RawRow::new();
        row.insert(keys.hotness, hot.to_string());
        row.insert(keys.title, title.to_string());
        row.insert(keys.category, category.to_string());
        row
    }

    fn loaded() -> HeatMapController {
        let mut ctrl = HeatMapController::new(HotmapConfig::default());
        let ticket = ctrl.begin_load();
        let rows = vec![row("2", "Rust", "Lang"), row("1", "Go", "Lang"), row("3", "Docker", "Ops")];
        assert_eq!(ctrl.complete_load(ticket, Ok(rows)), PipelineStatus::Loaded);
        ctrl
    }

    #[test]
    fn test_stage_walk() {
        let mut ctrl = loaded();
        assert_eq!(ctrl.stage(), PipelineStage::Loaded);
        assert_eq!(ctrl.filter_by_category("*").unwrap(), 3);
        assert_eq!(ctrl.sort_and_span(&KeywordSpan::new("and")).unwrap(), 3);
        ctrl.layout_and_render(800.0).unwrap();
        assert_eq!(ctrl.stage(), PipelineStage::Rendered);
        assert_eq!(ctrl.records()[0].title, "Go");
        assert!(ctrl.records().iter().all(|r| r.cell.is_some()));
    }

    #[test]
    fn test_out_of_order_stage() {
        let mut ctrl = loaded();
        let err = ctrl.layout_and_render(800.0).unwrap_err();
        assert!(matches!(
            err,
            HotmapError::PipelineOrder { expected: "Spanned", found: "Loaded" }
        ));
    }

    #[test]
    fn test_filter_before_load() {
        let mut ctrl = HeatMapController::new(HotmapConfig::default());
        assert!(matches!(
            ctrl.filter_by_category("*"),
            Err(HotmapError::PipelineOrder { expected: "Loaded", found: "Idle" })
        ));
    }
}

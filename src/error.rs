//! Structured error types for hotmap.
//!
//! Every fallible stage of the pipeline returns [`Result`]; the controller
//! reports failures to its registered handler instead of propagating them
//! to the host page.

/// All errors that can occur while loading, laying out and rendering a heat map.
#[derive(Debug, thiserror::Error)]
pub enum HotmapError {
    /// The data fetch failed or produced no usable rows.
    #[error("Data source: {0}")]
    DataSource(String),

    /// A record could not be given a slot (or its second slot) in the grid.
    #[error("Layout overflow: record {record} at slot {cursor} does not fit in {slots} slots")]
    LayoutOverflow {
        /// Index of the record in the working set.
        record: usize,
        /// Placement cursor when the overflow was detected.
        cursor: usize,
        /// Total number of slots in the grid.
        slots: usize,
    },

    /// A pipeline stage was invoked before its predecessor completed.
    #[error("Pipeline stage {found} cannot run before {expected}")]
    PipelineOrder {
        /// The stage the controller must be in.
        expected: &'static str,
        /// The stage the controller was actually in.
        found: &'static str,
    },

    /// Malformed CSV input.
    #[error("CSV: {0}")]
    Csv(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HotmapError>;

impl HotmapError {
    /// Shorthand for a [`HotmapError::DataSource`] built from anything displayable.
    pub fn data_source(msg: impl std::fmt::Display) -> Self {
        Self::DataSource(msg.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<HotmapError> for wasm_bindgen::JsValue {
    fn from(e: HotmapError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

//! Rendering with pluggable backends.
//!
//! This module provides:
//! - The render-state table records point into
//! - Backend-agnostic draw commands and the `RenderBackend` trait
//! - The scene builder (cells plus legend)
//! - An SVG backend
//! - The hotness palette

pub mod backend;
pub mod colors;
pub mod scene;
pub mod state;
pub mod svg;

pub use backend::{DrawCommand, Filter, RenderBackend, Scene, TextAnchor};
pub use colors::{hot_class, hot_fill, CssColor, Rgb, HOT_FILLS};
pub use scene::build_scene;
pub use state::{CellVisual, Emphasis, Marker, RenderState};
pub use svg::{SvgRenderer, SVG_ID};

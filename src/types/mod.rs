//! Data types for the heat map.

mod record;

pub use record::*;

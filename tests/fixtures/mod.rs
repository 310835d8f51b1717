//! Test fixtures for building heat map sheets in memory.
//!
//! `SheetBuilder` produces the same data either as CSV text (for the CSV
//! reader and sources) or as raw rows (for feeding the controller directly).
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::SheetBuilder;
//!
//! let csv = SheetBuilder::new()
//!     .tech(1, "Rust", "Language")
//!     .tech_full(3, "React/Redux", "Web", "WC", "Y")
//!     .build_csv();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use hotmap::config::ColumnKeys;
use hotmap::RawRow;

/// One row of the sheet, in column order.
#[derive(Debug, Clone)]
pub struct TechRow {
    pub hot: String,
    pub title: String,
    pub category: String,
    pub sell: String,
    pub ready: String,
}

/// Builder for a published technology sheet.
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    keys: ColumnKeys,
    rows: Vec<TechRow>,
}

impl Default for SheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self {
            keys: ColumnKeys::default(),
            rows: Vec::new(),
        }
    }

    /// Add a technology with empty saleability and readiness.
    pub fn tech(self, hot: u8, title: &str, category: &str) -> Self {
        self.tech_full(hot, title, category, "", "")
    }

    pub fn tech_full(mut self, hot: u8, title: &str, category: &str, sell: &str, ready: &str) -> Self {
        self.rows.push(TechRow {
            hot: hot.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            sell: sell.to_string(),
            ready: ready.to_string(),
        });
        self
    }

    /// Add a row with a verbatim hotness cell.
    pub fn raw_hot(mut self, hot: &str, title: &str, category: &str) -> Self {
        self.rows.push(TechRow {
            hot: hot.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            sell: String::new(),
            ready: String::new(),
        });
        self
    }

    fn header(&self) -> [&str; 5] {
        [
            &self.keys.hotness,
            &self.keys.title,
            &self.keys.category,
            &self.keys.saleability,
            &self.keys.readiness,
        ]
    }

    pub fn build_csv(&self) -> String {
        let mut out = self.header().map(quote).join(",");
        out.push('\n');
        for row in &self.rows {
            let fields = [&row.hot, &row.title, &row.category, &row.sell, &row.ready];
            out.push_str(&fields.map(|f| quote(f)).join(","));
            out.push('\n');
        }
        out
    }

    pub fn build_rows(&self) -> Vec<RawRow> {
        let header = self.header();
        self.rows
            .iter()
            .map(|row| {
                let fields = [&row.hot, &row.title, &row.category, &row.sell, &row.ready];
                header
                    .iter()
                    .zip(fields)
                    .map(|(key, value)| ((*key).to_string(), value.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Quote a CSV field when it needs it.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Seven single-span technologies with hotness [3, 1, 5, 2, 1, 4, 3].
pub fn seven_records() -> SheetBuilder {
    SheetBuilder::new()
        .tech_full(3, "Docker", "DevOps", "Y", "Y")
        .tech_full(1, "Rust", "Language", "Y", "Y")
        .tech_full(5, "Perl", "Language", "N", "")
        .tech_full(2, "Kotlin", "Language", "WC", "Y")
        .tech_full(1, "React", "Web", "Y", "Y")
        .tech_full(4, "Ember", "Web", "N", "")
        .tech_full(3, "Ansible", "DevOps", "WC", "")
}

/// A sheet mixing double-span titles into single-span ones.
pub fn mixed_spans() -> SheetBuilder {
    SheetBuilder::new()
        .tech(1, "Android and iOS", "Mobile")
        .tech(1, "Go", "Language")
        .tech(2, "Java/Node.js", "Language")
        .tech(2, "Sand", "Misc")
        .tech(3, "Elasticsearch", "Data")
        .tech(4, "Big Data Tools", "Data/Analytics")
        .tech(5, "Cobol", "Language")
}

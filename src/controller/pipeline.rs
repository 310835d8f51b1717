//! Pipeline stages and the pure steps they run.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{CellSpan, Record};

/// Where the controller is in a redraw cycle.
///
/// `Idle -> Loading -> Loaded -> Filtered -> Sorted -> Spanned -> Rendered -> Idle`.
/// Filter changes and resizes re-enter at `Filtered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    #[default]
    Idle,
    Loading,
    Loaded,
    Filtered,
    Sorted,
    Spanned,
    Rendered,
}

impl PipelineStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Loaded => "Loaded",
            Self::Filtered => "Filtered",
            Self::Sorted => "Sorted",
            Self::Spanned => "Spanned",
            Self::Rendered => "Rendered",
        }
    }
}

/// Identifies one load request; only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(pub(crate) u64);

/// What a pipeline entry point did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStatus {
    /// Rows were stored; nothing drawn yet.
    Loaded,
    /// A fresh layout was drawn.
    Rendered,
    /// Held until the in-flight load finishes.
    Deferred,
    /// A newer request replaced this one.
    Superseded,
    /// An error was reported to the error handler.
    Failed,
}

/// Category filter value meaning "everything".
pub const ALL_CATEGORIES: &str = "*";

/// Decides how many slots a record takes.
pub trait SpanStrategy {
    fn span(&self, record: &Record) -> CellSpan;
}

impl<F> SpanStrategy for F
where
    F: Fn(&Record) -> CellSpan,
{
    fn span(&self, record: &Record) -> CellSpan {
        self(record)
    }
}

/// Double span when the title contains a keyword (case-sensitive substring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpan {
    keyword: String,
}

impl KeywordSpan {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

impl SpanStrategy for KeywordSpan {
    fn span(&self, record: &Record) -> CellSpan {
        if !self.keyword.is_empty() && record.title.contains(&self.keyword) {
            CellSpan::Double
        } else {
            CellSpan::Single
        }
    }
}

/// Records of the snapshot in `category` (all of them for [`ALL_CATEGORIES`]).
pub fn filter_records(full: &[Record], category: &str) -> Vec<Record> {
    full.iter()
        .filter(|record| category == ALL_CATEGORIES || record.category == category)
        .cloned()
        .map(|mut record| {
            record.cell = None;
            record
        })
        .collect()
}

/// Stable sort by (hotness, title), hottest first.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(heat_order);
}

/// Hottest first, ties broken by title.
pub fn heat_order(a: &Record, b: &Record) -> Ordering {
    a.hot.cmp(&b.hot).then_with(|| a.title.cmp(&b.title))
}

/// Assign each record its span; returns the total number of slots needed.
pub fn assign_spans(records: &mut [Record], strategy: &dyn SpanStrategy) -> usize {
    records
        .iter_mut()
        .map(|record| {
            record.cell_span = strategy.span(record);
            record.cell_span.slots()
        })
        .sum()
}

/// Distinct categories in first-appearance order.
pub fn unique_categories<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.category.as_str()))
        .map(|record| record.category.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Hotness;

    fn rec(hot: u8, title: &str, category: &str) -> Record {
        Record::new(Hotness::new(hot), title, category)
    }

    #[test]
    fn test_keyword_span() {
        let strategy = KeywordSpan::new("and");
        assert_eq!(strategy.span(&rec(1, "Sand", "x")), CellSpan::Double);
        assert_eq!(strategy.span(&rec(1, "Android", "x")), CellSpan::Single);
        assert_eq!(KeywordSpan::new("").span(&rec(1, "and", "x")), CellSpan::Single);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut records = vec![rec(2, "B", "first"), rec(1, "Z", "x"), rec(2, "B", "second")];
        sort_records(&mut records);
        assert_eq!(records[0].title, "Z");
        assert_eq!(records[1].category, "first");
        assert_eq!(records[2].category, "second");
    }

    #[test]
    fn test_assign_spans_with_closure() {
        let mut records = vec![rec(1, "A", "x"), rec(1, "B", "x")];
        let total = assign_spans(&mut records, &|r: &Record| {
            if r.title == "B" {
                CellSpan::Double
            } else {
                CellSpan::Single
            }
        });
        assert_eq!(total, 3);
    }

    #[test]
    fn test_unique_categories_order() {
        let records = vec![rec(1, "a", "Web"), rec(1, "b", "Mobile"), rec(1, "c", "Web")];
        assert_eq!(unique_categories(&records), vec!["Web", "Mobile"]);
    }
}

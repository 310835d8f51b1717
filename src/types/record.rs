use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::ColumnKeys;

/// One spreadsheet row as delivered by a data source: header text -> cell text.
pub type RawRow = HashMap<String, String>;

/// Ordinal hotness, 1 (very hot) through 5 (never hot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hotness(u8);

impl Hotness {
    pub const HOTTEST: Hotness = Hotness(1);
    /// Lowest-priority bucket; malformed input lands here.
    pub const COLDEST: Hotness = Hotness(5);

    /// Build from a level, clamping into 1..=5.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::HOTTEST.0, Self::COLDEST.0))
    }

    /// Coerce a spreadsheet value into a bucket.
    ///
    /// A leading integer with an optional sign is honoured ("3", " 2 ",
    /// "+3", "4.5" -> 4) and clamped into 1..=5, so "0" and "-2" are hottest
    /// and "9" is coldest. Anything without a leading number falls into
    /// [`Hotness::COLDEST`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() {
            tracing::warn!(value = raw, "non-numeric hotness, using coldest bucket");
            return Self::COLDEST;
        }
        // Too many digits for a u8 is far above the range either way.
        let magnitude = digits.parse::<u8>().unwrap_or(u8::MAX);
        let hot = if negative {
            Self::HOTTEST
        } else {
            Self::new(magnitude)
        };
        if negative || hot.0 != magnitude {
            tracing::warn!(value = raw, level = hot.0, "hotness out of range, clamped");
        }
        hot
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Hotness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// "Should we sell?" tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Saleability {
    Yes,
    No,
    WithCare,
    /// Any value the sheet uses that is not one of the known tags.
    Other(String),
}

impl Saleability {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Y" => Self::Yes,
            "N" => Self::No,
            "WC" => Self::WithCare,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as written in the sheet.
    pub fn tag(&self) -> &str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
            Self::WithCare => "WC",
            Self::Other(s) => s,
        }
    }
}

/// Number of grid slots a record's cell takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellSpan {
    #[default]
    Single,
    Double,
}

impl CellSpan {
    pub fn slots(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }

    pub fn is_double(self) -> bool {
        self == Self::Double
    }
}

/// Index of a record's cell in the render-state table.
///
/// Only valid for the layout pass that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellHandle(pub usize);

/// Record attribute addressable by highlight and annotate predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    Hotness,
    Title,
    Category,
    Saleability,
    CommunityReady,
}

/// One technology row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub hot: Hotness,
    pub title: String,
    pub category: String,
    pub saleability: Saleability,
    /// Raw readiness flag, compared verbatim by annotate predicates.
    pub community_ready: String,
    /// Derived by the span strategy on every sort pass.
    #[serde(default)]
    pub cell_span: CellSpan,
    /// Assigned by the layout pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellHandle>,
}

impl Record {
    pub fn new(hot: Hotness, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            hot,
            title: title.into(),
            category: category.into(),
            saleability: Saleability::Other(String::new()),
            community_ready: String::new(),
            cell_span: CellSpan::Single,
            cell: None,
        }
    }

    /// Build a record from a raw row. Missing columns read as empty text.
    pub fn from_row(row: &RawRow, keys: &ColumnKeys) -> Self {
        let get = |key: &str| row.get(key).map(String::as_str).unwrap_or("");
        Self {
            hot: Hotness::parse(get(&keys.hotness)),
            title: get(&keys.title).trim().to_string(),
            category: get(&keys.category).trim().to_string(),
            saleability: Saleability::parse(get(&keys.saleability)),
            community_ready: get(&keys.readiness).trim().to_string(),
            cell_span: CellSpan::Single,
            cell: None,
        }
    }

    /// Text of a field, in the form predicates compare against.
    pub fn field_value(&self, field: RecordField) -> String {
        match field {
            RecordField::Hotness => self.hot.to_string(),
            RecordField::Title => self.title.clone(),
            RecordField::Category => self.category.clone(),
            RecordField::Saleability => self.saleability.tag().to_string(),
            RecordField::CommunityReady => self.community_ready.clone(),
        }
    }

    pub fn with_saleability(mut self, saleability: Saleability) -> Self {
        self.saleability = saleability;
        self
    }

    pub fn with_community_ready(mut self, flag: impl Into<String>) -> Self {
        self.community_ready = flag.into();
        self
    }
}

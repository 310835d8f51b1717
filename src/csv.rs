//! Minimal CSV/TSV reader for published spreadsheet exports.
//!
//! The first non-blank record is the header; every following record becomes
//! a [`RawRow`] keyed by header text.

use crate::error::{HotmapError, Result};
use crate::types::RawRow;

/// Delimiter for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Parse CSV/TSV bytes into rows keyed by the header record.
///
/// Blank records are skipped. Short records leave their trailing columns
/// absent; cells beyond the header width are dropped.
pub fn parse_rows(data: &[u8], delim: Delimiter) -> Result<Vec<RawRow>> {
    let text = String::from_utf8_lossy(data);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&*text);

    let mut records = split_records(text, delim.char())?
        .into_iter()
        .filter(|fields| fields.iter().any(|f| !f.trim().is_empty()));

    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

    let rows = records
        .map(|fields| {
            header
                .iter()
                .zip(fields)
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.clone(), value.trim().to_string()))
                .collect::<RawRow>()
        })
        .collect();
    Ok(rows)
}

/// Split text into records of fields, respecting quoted fields.
///
/// Quoted fields may contain the separator, doubled quotes and line breaks.
fn split_records(text: &str, sep: char) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else if ch == '\n' || ch == '\r' {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            fields.push(std::mem::take(&mut current));
            records.push(std::mem::take(&mut fields));
        } else {
            current.push(ch);
        }
    }
    if in_quotes {
        return Err(HotmapError::Csv("unterminated quoted field".to_string()));
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    Ok(records)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let data = b"Name,Age,City\nAlice,30,NYC\nBob,25,LA";
        let rows = parse_rows(data, Delimiter::Comma).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Alice");
        assert_eq!(rows[1]["City"], "LA");
    }

    #[test]
    fn test_parse_tsv() {
        let data = b"A\tB\r\n1\t2\r\n";
        let rows = parse_rows(data, Delimiter::Tab).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["B"], "2");
    }

    #[test]
    fn test_quoted_csv() {
        let data = b"Title,Note\n\"Hello, World\",42\n\"She said \"\"hi\"\"\",\"two\nlines\"";
        let rows = parse_rows(data, Delimiter::Comma).unwrap();
        assert_eq!(rows[0]["Title"], "Hello, World");
        assert_eq!(rows[1]["Title"], "She said \"hi\"");
        assert_eq!(rows[1]["Note"], "two\nlines");
    }

    #[test]
    fn test_blank_lines_and_short_rows() {
        let data = b"\n\nA,B,C\n\n1\n,,\n";
        let rows = parse_rows(data, Delimiter::Comma).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["A"], "1");
        assert!(!rows[0].contains_key("B"));
    }

    #[test]
    fn test_empty_csv() {
        assert!(parse_rows(b"", Delimiter::Comma).unwrap().is_empty());
        assert!(parse_rows(b"A,B\n", Delimiter::Comma).unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            parse_rows(b"A\n\"open", Delimiter::Comma),
            Err(HotmapError::Csv(_))
        ));
    }
}

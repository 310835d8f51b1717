//! Line breaking and text placement for cell labels.
//!
//! Titles are broken on spaces, then on slashes, and short fragments are
//! glued back together. Only single-span cells break at all; a double-span
//! cell has room for its title on one line.

use serde::Serialize;

use crate::config::TextMetrics;
use crate::types::CellSpan;

/// Split a label on `split` when it is too long for a single-span cell.
///
/// The text is trimmed first. It is only split when its length exceeds
/// `max_chars` and the cell is single-span; fragments are trimmed and empty
/// ones dropped. Otherwise the trimmed text comes back as the only line.
pub fn split_text(text: &str, max_chars: usize, split: char, span: CellSpan) -> Vec<String> {
    let trimmed = text.trim();
    if char_len(trimmed) > max_chars && span == CellSpan::Single {
        trimmed
            .split(split)
            .filter(|part| !part.is_empty())
            .map(|part| part.trim().to_string())
            .collect()
    } else {
        vec![trimmed.to_string()]
    }
}

/// Split a label on `split`, then merge short neighbours back together.
///
/// When splitting on `/`, every fragment but the last keeps its trailing
/// slash so the reader still sees the separator.
pub fn wrap_text(text: &str, max_chars: usize, split: char, span: CellSpan) -> Vec<String> {
    let mut fragments = split_text(text, max_chars, split, span);
    if split == '/' {
        reattach_separator(&mut fragments, '/');
    }
    merge_fragments(fragments, max_chars)
}

/// Full title pipeline: spaces first, then slashes inside each word, then merge.
pub fn arrange_title(title: &str, span: CellSpan, metrics: &TextMetrics) -> Vec<String> {
    let trigger = metrics.wrap_trigger_chars;
    let mut fragments = Vec::new();
    for word in split_text(title, trigger, ' ', span) {
        if word.contains('/') {
            let mut parts = split_text(&word, trigger, '/', span);
            reattach_separator(&mut parts, '/');
            fragments.extend(parts);
        } else {
            fragments.push(word);
        }
    }
    merge_fragments(fragments, metrics.merge_budget_chars)
}

/// Secondary line(s): the category, broken on slashes without merging.
pub fn arrange_description(category: &str, span: CellSpan, metrics: &TextMetrics) -> Vec<String> {
    split_text(category, metrics.wrap_trigger_chars, '/', span)
}

fn reattach_separator(fragments: &mut [String], separator: char) {
    let last = fragments.len().saturating_sub(1);
    for fragment in fragments.iter_mut().take(last) {
        fragment.push(separator);
    }
}

/// Glue consecutive fragments while their combined length stays within `budget`.
///
/// The budget check ignores the joining space.
fn merge_fragments(fragments: Vec<String>, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut iter = fragments.into_iter();
    let Some(mut current) = iter.next() else {
        return lines;
    };
    for next in iter {
        if char_len(&current) + char_len(&next) > budget {
            lines.push(std::mem::replace(&mut current, next));
        } else {
            current.push(' ');
            current.push_str(&next);
        }
    }
    lines.push(current);
    lines
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// A positioned line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    pub text: String,
    /// Horizontal centre.
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub font_size: f64,
}

/// Both text blocks of a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellText {
    pub title: Vec<TextLine>,
    pub description: Vec<TextLine>,
}

/// Font size of one title line in a block of `line_count` lines.
pub fn title_font_size(line: &str, line_count: usize, metrics: &TextMetrics) -> f64 {
    let extra_lines = line_count.saturating_sub(1) as f64;
    let penalty = if char_len(line) > metrics.long_line_chars {
        metrics.long_line_penalty
    } else {
        0.0
    };
    metrics.title_base_size - metrics.title_size_step * extra_lines - penalty
}

/// Break and position the title and category of a cell whose top-left
/// corner is at (`x`, `y`) and whose drawn width is `width`.
pub fn layout_cell_text(
    title: &str,
    category: &str,
    span: CellSpan,
    (x, y): (f64, f64),
    width: f64,
    metrics: &TextMetrics,
) -> CellText {
    let center = x + width / 2.0;

    let title_lines = arrange_title(title, span, metrics);
    let count = title_lines.len();
    let top =
        y + metrics.title_baseline - metrics.title_center_shift * count.saturating_sub(1) as f64;
    let title = title_lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextLine {
            font_size: title_font_size(&text, count, metrics),
            x: center,
            y: top + metrics.title_line_pitch * index as f64,
            text,
        })
        .collect();

    let description = arrange_description(category, span, metrics)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextLine {
            text,
            x: center,
            y: y + metrics.desc_baseline + metrics.desc_line_pitch * index as f64,
            font_size: metrics.desc_size,
        })
        .collect();

    CellText { title, description }
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
    fn test_wrap_slash_keeps_separator() {
        assert_eq!(
            wrap_text("Java/Node.js", 10, '/', CellSpan::Single),
            vec!["Java/", "Node.js"]
        );
    }

    #[test]
    fn test_wrap_short_is_untouched() {
        assert_eq!(wrap_text("Go", 10, ' ', CellSpan::Single), vec!["Go"]);
        assert_eq!(wrap_text("  Go  ", 10, ' ', CellSpan::Single), vec!["Go"]);
    }

    #[test]
    fn test_double_span_never_splits() {
        assert_eq!(
            wrap_text("Android and iOS Native", 10, ' ', CellSpan::Double),
            vec!["Android and iOS Native"]
        );
    }

    #[test]
    fn test_merge_budget_ignores_joining_space() {
        // "Big" + "Data" = 7 chars, then "Big Data" + "Tools" = 13 > 10.
        assert_eq!(
            merge_fragments(vec!["Big".into(), "Data".into(), "Tools".into()], 10),
            vec!["Big Data", "Tools"]
        );
        // 5 + 5 fits exactly.
        assert_eq!(
            merge_fragments(vec!["Hello".into(), "World".into()], 10),
            vec!["Hello World"]
        );
        assert!(merge_fragments(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_split_drops_empty_fragments() {
        assert_eq!(
            split_text("Cloud  Foundry  Stack", 10, ' ', CellSpan::Single),
            vec!["Cloud", "Foundry", "Stack"]
        );
    }

    #[test]
    fn test_font_size_formula() {
        let m = TextMetrics::default();
        assert_eq!(title_font_size("Go", 1, &m), 26.0);
        assert_eq!(title_font_size("Go", 3, &m), 20.0);
        assert_eq!(title_font_size("Elasticsearch", 1, &m), 21.0);
    }

    #[test]
    fn test_layout_cell_text_positions() {
        let m = TextMetrics::default();
        let text = layout_cell_text(
            "Big Data Tools",
            "Data/Analytics",
            CellSpan::Single,
            (10.0, 10.0),
            117.0,
            &m,
        );
        assert_eq!(text.title.len(), 2);
        assert_eq!(text.title[0].x, 68.5);
        assert_eq!(text.title[0].y, 10.0 + 45.0 - 8.0);
        assert_eq!(text.title[1].y, 10.0 + 45.0 - 8.0 + 20.0);
        assert_eq!(text.title[0].font_size, 23.0);
        let desc: Vec<&str> = text.description.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(desc, vec!["Data", "Analytics"]);
        assert_eq!(text.description[1].y, 10.0 + 90.0 + 15.0);
        assert_eq!(text.description[0].font_size, 15.0);
    }
}

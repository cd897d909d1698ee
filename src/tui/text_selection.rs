// Mouse selection over the page text shown in the content region

use ratatui::layout::Rect;
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

use crate::selection::Bounds;

/// A screen cell of the page text: `row` is the line index (scroll applied),
/// `col` the terminal column within that line. Wide glyphs cover two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

fn ordered(a: CellPos, b: CellPos) -> (CellPos, CellPos) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Cell under the pointer, clamped to the region so drags past the edge keep selecting
pub fn cell_at(region: Rect, scroll: usize, column: u16, row: u16) -> CellPos {
    let max_col = region.x + region.width.saturating_sub(1);
    let max_row = region.y + region.height.saturating_sub(1);
    let column = column.clamp(region.x, max_col.max(region.x));
    let row = row.clamp(region.y, max_row.max(region.y));
    CellPos {
        row: (row - region.y) as usize + scroll,
        col: (column - region.x) as usize,
    }
}

pub fn contains(region: Rect, column: u16, row: u16) -> bool {
    column >= region.x
        && column < region.x + region.width
        && row >= region.y
        && row < region.y + region.height
}

/// Stream selection from `start` to `end` inclusive. A press and release on the same
/// cell is a click, not a selection.
pub fn selected_text(lines: &[String], start: CellPos, end: CellPos) -> String {
    if start == end {
        return String::new();
    }
    let (start, end) = ordered(start, end);

    let mut parts = Vec::new();
    for row in start.row..=end.row {
        let Some(line) = lines.get(row) else {
            break;
        };
        let part = match selected_span(line, row, (start, end)) {
            Some(span) => line.chars().skip(span.start).take(span.len()).collect(),
            None => String::new(),
        };
        parts.push(part);
    }
    parts.join("\n")
}

/// Index of the char drawn at `col`, or the char count when `col` is past the end
fn char_at_column(line: &str, col: usize) -> usize {
    let mut start = 0;
    for (index, c) in line.chars().enumerate() {
        let width = c.width().unwrap_or(0);
        if width > 0 && col < start + width {
            return index;
        }
        start += width;
    }
    line.chars().count()
}

/// Chars of `line` (as char indices) covered by the selection on `row`.
///
/// A glyph is selected when any of its columns is, and combining marks follow
/// the glyph they sit on.
pub fn selected_span(line: &str, row: usize, range: (CellPos, CellPos)) -> Option<Range<usize>> {
    let (start, end) = ordered(range.0, range.1);
    if start == end || row < start.row || row > end.row {
        return None;
    }

    let len = line.chars().count();
    let from = if row == start.row {
        char_at_column(line, start.col)
    } else {
        0
    };
    let to = if row == end.row {
        let last = char_at_column(line, end.col);
        if last >= len {
            len
        } else {
            let marks = line
                .chars()
                .skip(last + 1)
                .take_while(|c| c.width() == Some(0))
                .count();
            last + 1 + marks
        }
    } else {
        len
    };

    (from < to).then_some(from..to)
}

/// Screen box covered by the selection, in cells. Multi-line selections span the
/// full region width.
pub fn selection_bounds(start: CellPos, end: CellPos, region: Bounds, scroll: usize) -> Bounds {
    let (start, end) = ordered(start, end);
    let top = region.top + start.row.saturating_sub(scroll) as f64;
    let height = (end.row - start.row + 1) as f64;

    if start.row == end.row {
        Bounds::new(
            region.left + start.col.min(end.col) as f64,
            top,
            (start.col.abs_diff(end.col) + 1) as f64,
            height,
        )
    } else {
        Bounds::new(region.left, top, region.width, height)
    }
}

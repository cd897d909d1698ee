//! Page text reconstruction.
//!
//! Groups the positioned fragments of one page into readable lines. Fragments are
//! consumed in extraction order (the order the content stream shows them), which is
//! not necessarily visual order. A fragment starts a new line when its baseline is
//! more than [`LINE_BASELINE_THRESHOLD`] units away from the previous fragment's
//! baseline; otherwise its text is glued to the current line with no separator.
//!
//! The threshold is absolute and unscaled. Dense text, superscripts and rotated pages
//! can be mis-grouped; that is a known limitation of the heuristic.

use serde::{Deserialize, Serialize};

/// Maximum baseline distance, in PDF user-space units, for two fragments to share a line
pub const LINE_BASELINE_THRESHOLD: f64 = 5.0;

/// A run of glyphs at a known vertical baseline on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    pub text: String,
    pub baseline_y: f64,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, baseline_y: f64) -> Self {
        Self {
            text: text.into(),
            baseline_y,
        }
    }
}

/// Line/word/character counts of a reconstructed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageStats {
    pub line_count: usize,
    pub word_count: usize,
    pub char_count: usize,
}

/// Readable text of one page. Immutable once built; a new page gets a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconstructedPage {
    lines: Vec<String>,
    full_text: String,
}

impl ReconstructedPage {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined by `\n`
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn stats(&self) -> PageStats {
        PageStats {
            line_count: self.lines.len(),
            word_count: self.full_text.split_whitespace().count(),
            char_count: self.full_text.chars().count(),
        }
    }

    /// Header line shown above the extracted-text panel
    pub fn summary(&self, page_number: usize) -> String {
        let stats = self.stats();
        format!(
            "Extracted {} lines, {} words, {} characters from page {}",
            stats.line_count, stats.word_count, stats.char_count, page_number
        )
    }
}

/// Rebuild the lines of one page from its fragments.
///
/// Blank fragments never produce a line of their own, but they still move the
/// reference baseline and can close the line before them.
pub fn reconstruct_page(fragments: &[PositionedFragment]) -> ReconstructedPage {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut last_y: Option<f64> = None;

    for fragment in fragments {
        let starts_line = match last_y {
            None => true,
            Some(y) => (fragment.baseline_y - y).abs() > LINE_BASELINE_THRESHOLD,
        };

        if starts_line {
            flush_line(&mut current, &mut lines);
        }
        current.push_str(&fragment.text);
        last_y = Some(fragment.baseline_y);
    }
    flush_line(&mut current, &mut lines);

    let full_text = lines.join("\n").trim().to_string();
    ReconstructedPage { lines, full_text }
}

fn flush_line(buffer: &mut String, lines: &mut Vec<String>) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
    buffer.clear();
}

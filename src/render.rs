//! Fixed-width display rows for page rendering
//!
//! Turns page bytes plus highlight flags into toolkit-independent rows:
//! hex layout (16 bytes per row, `XX ` cells then an ASCII gutter) or
//! text layout (64 printable characters per row). Highlight spans are
//! expressed in rendered-character coordinates, since one highlighted
//! byte covers two hex digits in the cell area and one character in the
//! gutter.

use serde::Serialize;

use crate::fpath;
use crate::page::Page;
use crate::settings::LineMode;

/// Bytes per row in hex layout
pub const HEX_BYTES_PER_ROW: usize = 16;
/// Bytes per row in text layout
pub const TEXT_BYTES_PER_ROW: usize = 64;

/// Width of one `XX ` hex cell in rendered characters
const HEX_CELL_WIDTH: usize = 3;

/// A highlighted range of a row, in rendered-character coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub len: usize,
}

/// One display row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Forensic path of the row's first byte, rendered per the
    /// numeric-base preference
    pub path: String,
    /// Fixed-width printable content; short last rows are blank-padded
    pub text: String,
    /// Highlighted character ranges within `text`
    pub spans: Vec<HighlightSpan>,
}

/// Lazy, finite, restartable sequence of display rows. Obtain a fresh
/// one from [`rows`] to restart.
#[derive(Clone)]
pub struct RowIter<'a> {
    page: &'a Page,
    flags: &'a [bool],
    mode: LineMode,
    hex_offsets: bool,
    start_offset: u64,
    pos: usize,
}

/// Format a page into display rows.
///
/// `flags` is the per-byte highlight vector aligned with the page's
/// visible bytes; `hex_offsets` selects the numeric base for row paths.
pub fn rows<'a>(
    page: &'a Page,
    flags: &'a [bool],
    mode: LineMode,
    hex_offsets: bool,
) -> RowIter<'a> {
    RowIter {
        page,
        flags,
        mode,
        hex_offsets,
        start_offset: page.start_offset(),
        pos: 0,
    }
}

impl Iterator for RowIter<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let bytes = &self.page.page_bytes;
        if self.pos >= bytes.len() {
            return None;
        }

        let width = match self.mode {
            LineMode::Hex => HEX_BYTES_PER_ROW,
            LineMode::Text => TEXT_BYTES_PER_ROW,
        };
        let end = (self.pos + width).min(bytes.len());
        let row_bytes = &bytes[self.pos..end];
        let row_flags: Vec<bool> = (self.pos..end)
            .map(|i| self.flags.get(i).copied().unwrap_or(false))
            .collect();

        let row_path = fpath::adjust(
            &self.page.forensic_path,
            self.start_offset + self.pos as u64,
        );
        let path = fpath::printable(&row_path, self.hex_offsets);

        let row = match self.mode {
            LineMode::Hex => hex_row(path, row_bytes, &row_flags),
            LineMode::Text => text_row(path, row_bytes, &row_flags),
        };
        self.pos = end;
        Some(row)
    }
}

/// Printable ASCII range for rendering; everything else becomes `.`
fn render_byte(b: u8) -> char {
    if (33..=126).contains(&b) {
        b as char
    } else {
        '.'
    }
}

/// Maximal runs of consecutive highlighted bytes, as (start, len) pairs
fn highlight_runs(flags: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;
    for (i, &flag) in flags.iter().enumerate() {
        match (flag, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                runs.push((start, i - start));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push((start, flags.len() - start));
    }
    runs
}

fn hex_row(path: String, bytes: &[u8], flags: &[bool]) -> Row {
    let mut text = String::with_capacity(HEX_BYTES_PER_ROW * HEX_CELL_WIDTH + HEX_BYTES_PER_ROW);

    for slot in 0..HEX_BYTES_PER_ROW {
        match bytes.get(slot) {
            Some(b) => text.push_str(&format!("{:02X} ", b)),
            None => text.push_str("   "),
        }
    }
    for slot in 0..HEX_BYTES_PER_ROW {
        match bytes.get(slot) {
            Some(&b) => text.push(render_byte(b)),
            None => text.push(' '),
        }
    }

    // Each run produces two spans: one over the hex cells (up to the
    // last hex digit, trailing cell space excluded) and one over the
    // ASCII gutter
    let gutter_start = HEX_BYTES_PER_ROW * HEX_CELL_WIDTH;
    let mut spans = Vec::new();
    for (start, len) in highlight_runs(flags) {
        spans.push(HighlightSpan {
            start: start * HEX_CELL_WIDTH,
            len: len * HEX_CELL_WIDTH - 1,
        });
        spans.push(HighlightSpan {
            start: gutter_start + start,
            len,
        });
    }

    Row { path, text, spans }
}

fn text_row(path: String, bytes: &[u8], flags: &[bool]) -> Row {
    let mut text: String = bytes.iter().map(|&b| render_byte(b)).collect();
    while text.len() < TEXT_BYTES_PER_ROW {
        text.push(' ');
    }

    let spans = highlight_runs(flags)
        .into_iter()
        .map(|(start, len)| HighlightSpan { start, len })
        .collect();

    Row { path, text, spans }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(bytes: &[u8], path: &str) -> Page {
        Page {
            forensic_path: path.to_string(),
            page_bytes: bytes.to_vec(),
            padded_bytes: bytes.to_vec(),
            padding_prefix: 0,
            image_size: bytes.len() as u64,
        }
    }

    #[test]
    fn test_hex_row_layout() {
        let page = page_of(b"Hello", "0");
        let flags = vec![false; 5];
        let all: Vec<Row> = rows(&page, &flags, LineMode::Hex, false).collect();

        assert_eq!(all.len(), 1);
        let row = &all[0];
        assert_eq!(row.path, "0");
        assert_eq!(row.text.len(), 16 * 3 + 16);
        assert!(row.text.starts_with("48 65 6C 6C 6F "));
        // ASCII gutter after the cell area, blank-padded
        assert_eq!(&row.text[48..53], "Hello");
        assert!(row.text[53..].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_hex_row_spans_cover_cells_and_gutter() {
        let page = page_of(b"Hello", "0");
        let flags = vec![false, true, true, false, false];
        let row = rows(&page, &flags, LineMode::Hex, false).next().unwrap();

        assert_eq!(
            row.spans,
            vec![
                // "65 6C" without the trailing cell space
                HighlightSpan { start: 3, len: 5 },
                // "el" in the gutter
                HighlightSpan { start: 49, len: 2 },
            ]
        );
    }

    #[test]
    fn test_text_row_layout() {
        let page = page_of(b"Hi there", "0");
        let flags = vec![false; 8];
        let row = rows(&page, &flags, LineMode::Text, false).next().unwrap();

        // Space is outside the printable range and renders as a dot
        assert!(row.text.starts_with("Hi.there"));
        assert_eq!(row.text.len(), 64);
    }

    #[test]
    fn test_text_row_spans_are_byte_coordinates() {
        let page = page_of(b"abcdef", "0");
        let flags = vec![false, false, true, true, true, false];
        let row = rows(&page, &flags, LineMode::Text, false).next().unwrap();
        assert_eq!(row.spans, vec![HighlightSpan { start: 2, len: 3 }]);
    }

    #[test]
    fn test_row_paths_advance_by_row_width() {
        let page = page_of(&[0u8; 40], "1024-ZIP-4096");
        let flags = vec![false; 40];
        let paths: Vec<String> = rows(&page, &flags, LineMode::Hex, false)
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["1024-ZIP-4096", "1024-ZIP-4112", "1024-ZIP-4128"]);
    }

    #[test]
    fn test_row_paths_honor_hex_preference() {
        let page = page_of(&[0u8; 20], "4096");
        let flags = vec![false; 20];
        let paths: Vec<String> = rows(&page, &flags, LineMode::Hex, true)
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["1000", "1010"]);
    }

    #[test]
    fn test_non_printable_bytes_render_as_dots() {
        let page = page_of(&[0x00, 0x1F, b'A', 0x7F, 0xFF], "0");
        let flags = vec![false; 5];
        let row = rows(&page, &flags, LineMode::Text, false).next().unwrap();
        assert!(row.text.starts_with("..A.."));
    }

    #[test]
    fn test_iterator_is_restartable() {
        let page = page_of(&[1u8; 48], "0");
        let flags = vec![false; 48];
        assert_eq!(rows(&page, &flags, LineMode::Hex, false).count(), 3);
        assert_eq!(rows(&page, &flags, LineMode::Hex, false).count(), 3);

        let iter = rows(&page, &flags, LineMode::Hex, false);
        assert_eq!(iter.clone().count(), iter.count());
    }

    #[test]
    fn test_empty_page_yields_no_rows() {
        let page = page_of(b"", "0");
        assert_eq!(rows(&page, &[], LineMode::Hex, false).count(), 0);
    }

    #[test]
    fn test_highlight_run_spanning_row_boundary_splits() {
        // A run crossing the 16-byte boundary yields spans in both rows
        let page = page_of(&[b'a'; 32], "0");
        let mut flags = vec![false; 32];
        for flag in flags.iter_mut().take(18).skip(14) {
            *flag = true;
        }
        let all: Vec<Row> = rows(&page, &flags, LineMode::Hex, false).collect();
        assert_eq!(all[0].spans[0], HighlightSpan { start: 42, len: 5 });
        assert_eq!(all[1].spans[0], HighlightSpan { start: 0, len: 5 });
    }
}

//! Feature-file line index
//!
//! A feature file is the external scanner's output: one pattern match
//! per line, tab-separated, with `#` comment lines interspersed. The
//! index maps a visible line number to the line's byte offset and
//! length in the file; it never stores the text itself. Record text is
//! re-read on demand through the same byte-range mechanism the image
//! viewer uses, keyed by `(offset, length)`.
//!
//! The index is rebuilt wholesale whenever the feature file or the
//! filter changes; stale tables are simply dropped, and in-flight
//! readers handed one discard their results with it.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ViewError, ViewResult};
use crate::highlight::matcher;
use crate::page::ByteRangeReader;

/// Location of one feature line within its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLineRecord {
    /// Byte offset of the line start
    pub offset: u64,
    /// Line length in bytes, newline excluded
    pub length: u32,
}

/// Sparse index over a feature file's visible lines, built by a single
/// forward scan and never mutated in place
#[derive(Debug, Default)]
pub struct FeatureLineIndex {
    records: Vec<FeatureLineRecord>,
    widest: u32,
}

impl FeatureLineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record in encounter order
    pub fn put(&mut self, offset: u64, length: u32) {
        self.widest = self.widest.max(length);
        self.records.push(FeatureLineRecord { offset, length });
    }

    /// The record for visible line `i`.
    ///
    /// # Panics
    ///
    /// Requesting a line outside `[0, size())` is a contract violation
    /// and panics immediately.
    pub fn get(&self, i: usize) -> FeatureLineRecord {
        match self.records.get(i) {
            Some(record) => *record,
            None => panic!(
                "feature line index out of range: {} (size {})",
                i,
                self.records.len()
            ),
        }
    }

    /// Number of indexed lines
    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Longest line length seen, for sizing fixed-width layout
    pub fn widest_line_length(&self) -> u32 {
        self.widest
    }
}

/// Optional substring filter applied while scanning a feature file
#[derive(Debug, Clone)]
pub struct FeatureFilter {
    /// Substring the line must contain
    pub text: Vec<u8>,
    /// Compare exactly instead of ASCII-case-folded
    pub match_case: bool,
}

impl FeatureFilter {
    fn accepts(&self, line: &[u8]) -> bool {
        self.text.is_empty()
            || !matcher::find_all(line, &self.text, !self.match_case).is_empty()
    }
}

/// Build an index over a feature file in one forward scan.
///
/// Comment (`#`) and blank lines are skipped. When a filter is given,
/// only lines containing the filter text are indexed. The file is
/// memory-mapped for the scan and unmapped on return.
pub fn scan_feature_file(
    path: &Path,
    filter: Option<&FeatureFilter>,
) -> ViewResult<FeatureLineIndex> {
    let file = File::open(path).map_err(|e| ViewError::SourceUnavailable {
        path: path.display().to_string(),
        source: e,
    })?;
    let len = file
        .metadata()
        .map_err(|e| ViewError::SourceUnavailable {
            path: path.display().to_string(),
            source: e,
        })?
        .len();

    let mut index = FeatureLineIndex::new();
    if len == 0 {
        debug!(path = %path.display(), "Feature file is empty");
        return Ok(index);
    }

    // Safety: the map is read-only and dropped before return
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| ViewError::SourceUnavailable {
            path: path.display().to_string(),
            source: e,
        })?
    };

    let mut line_start = 0usize;
    for (pos, _) in mmap.iter().enumerate().filter(|(_, &b)| b == b'\n') {
        record_line(&mut index, &mmap, line_start, pos, filter);
        line_start = pos + 1;
    }
    // Final line without a trailing newline
    if line_start < mmap.len() {
        record_line(&mut index, &mmap, line_start, mmap.len(), filter);
    }

    debug!(
        path = %path.display(),
        lines = index.size(),
        widest = index.widest_line_length(),
        "Feature file scan complete"
    );
    Ok(index)
}

fn record_line(
    index: &mut FeatureLineIndex,
    data: &[u8],
    start: usize,
    end: usize,
    filter: Option<&FeatureFilter>,
) {
    let mut line = &data[start..end];
    if let [head @ .., b'\r'] = line {
        line = head;
    }
    if line.is_empty() || line[0] == b'#' {
        return;
    }
    if let Some(filter) = filter {
        if !filter.accepts(line) {
            trace!(offset = start, "Line filtered out");
            return;
        }
    }
    index.put(start as u64, line.len() as u32);
}

/// The tab-separated first field of a feature line (the whole line when
/// it has no tab)
pub fn first_field(line: &[u8]) -> &[u8] {
    match line.iter().position(|&b| b == b'\t') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Re-read one record's text from the feature file
pub fn read_record_text(
    reader: &dyn ByteRangeReader,
    record: FeatureLineRecord,
) -> ViewResult<Vec<u8>> {
    let read = reader.read(&record.offset.to_string(), record.length as usize)?;
    Ok(read.bytes)
}

/// Render raw feature bytes for display: printable ASCII passes
/// through, everything else is escaped as `\xHH`
pub fn printable_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7F).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{:02X}", b));
        }
    }
    out
}

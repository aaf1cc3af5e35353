//! Forensic path parsing and arithmetic
//!
//! A forensic path is a hyphen-delimited address into a (possibly
//! recursively decoded) image, ending in a byte offset. Examples:
//!
//! - `70000`: byte 70000 of the image
//! - `1024-ZIP-512`: byte 512 inside the ZIP stream decoded at byte 1024
//!
//! Only the trailing numeric offset is ever adjusted; decoder-id prefix
//! segments pass through every operation byte-for-byte, preserving
//! compatibility with the external scanner's output.

use std::sync::OnceLock;

use regex::bytes::Regex;
use tracing::warn;

/// Marker separating an embedded filename from the forensic path in a
/// feature record's first field: the 4-byte UTF-8 encoding of U+10001C,
/// followed by an ASCII hyphen.
const FILENAME_MARKER: [u8; 4] = [0xF4, 0x80, 0x80, 0x9C];

// =============================================================================
// Offset arithmetic
// =============================================================================

/// Extract the trailing byte offset from a forensic path.
///
/// A blank path yields 0. A malformed trailing segment also yields 0,
/// with a warning; downstream code treats the path as addressing the
/// start of the image rather than failing the whole view.
pub fn offset_of(path: &str) -> u64 {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let last = trimmed.rsplit('-').next().unwrap_or(trimmed);
    match last.parse::<u64>() {
        Ok(offset) => offset,
        Err(_) => {
            warn!(path = %path, segment = %last, "Malformed trailing offset, using 0");
            0
        }
    }
}

/// Replace the trailing offset of a forensic path, preserving all prefix
/// segments. A blank path becomes the bare decimal offset.
pub fn adjust(path: &str, new_offset: u64) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return new_offset.to_string();
    }
    match trimmed.rfind('-') {
        Some(pos) => format!("{}-{}", &trimmed[..pos], new_offset),
        None => new_offset.to_string(),
    }
}

/// Align the trailing offset down to the largest multiple of `page_size`
/// that does not exceed it. Idempotent.
pub fn align_to_page(path: &str, page_size: u64) -> String {
    let offset = offset_of(path);
    adjust(path, (offset / page_size) * page_size)
}

// =============================================================================
// Display rendering
// =============================================================================

/// Render a forensic path for display.
///
/// When `use_hex` is true, every hyphen-delimited segment that parses as
/// a pure decimal integer is rendered in uppercase hexadecimal;
/// decoder-id segments pass through unchanged. When false, the whole
/// path passes through unchanged. Display-only: the stored path keeps
/// decimal offsets regardless of the preference.
pub fn printable(path: &str, use_hex: bool) -> String {
    if !use_hex {
        return path.to_string();
    }
    path.split('-')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                match segment.parse::<u64>() {
                    Ok(n) => format!("{:X}", n),
                    Err(_) => segment.to_string(),
                }
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Feature-record first field accessors
// =============================================================================

/// Locate the embedded-filename marker in a feature record's first field.
/// Returns the index of the marker's first byte, if present.
fn marker_position(first_field: &[u8]) -> Option<usize> {
    first_field
        .windows(FILENAME_MARKER.len() + 1)
        .position(|w| w[..4] == FILENAME_MARKER && w[4] == b'-')
}

/// True when the first field carries an embedded filename ahead of the
/// forensic path.
pub fn has_embedded_filename(first_field: &[u8]) -> bool {
    marker_position(first_field).is_some()
}

/// The embedded filename portion of the first field, if present.
pub fn filename_of(first_field: &[u8]) -> Option<&[u8]> {
    marker_position(first_field).map(|pos| &first_field[..pos])
}

/// The forensic path portion of the first field. When no filename marker
/// is present, the whole field is the path.
pub fn path_without_filename(first_field: &[u8]) -> &[u8] {
    match marker_position(first_field) {
        Some(pos) => &first_field[pos + FILENAME_MARKER.len() + 1..],
        None => first_field,
    }
}

/// Pre-compiled shape of a histogram record's first field: `n=<digits>` +
/// tab. Compiled once on first use via OnceLock.
fn histogram_regex() -> &'static Regex {
    static HISTOGRAM_REGEX: OnceLock<Regex> = OnceLock::new();
    HISTOGRAM_REGEX
        .get_or_init(|| Regex::new(r"^n=\d+\t").expect("Invalid histogram regex"))
}

/// True iff the field is a histogram record (`n=<count><TAB>...`) rather
/// than a forensic path.
pub fn is_histogram_record(first_field: &[u8]) -> bool {
    histogram_regex().is_match(first_field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        assert_eq!(offset_of("70000"), 70000);
        assert_eq!(offset_of("1024-ZIP-512"), 512);
        assert_eq!(offset_of(""), 0);
        assert_eq!(offset_of("   "), 0);
    }

    #[test]
    fn test_offset_of_malformed_falls_back_to_zero() {
        assert_eq!(offset_of("1024-ZIP"), 0);
        assert_eq!(offset_of("not-a-number"), 0);
    }

    #[test]
    fn test_adjust_replaces_only_trailing_offset() {
        assert_eq!(adjust("70000", 65536), "65536");
        assert_eq!(adjust("1024-ZIP-512", 0), "1024-ZIP-0");
        assert_eq!(adjust("", 42), "42");
    }

    #[test]
    fn test_adjust_offset_round_trip() {
        for path in ["70000", "1024-ZIP-512", "5-GZIP-10-BASE64-20"] {
            for offset in [0u64, 1, 65536, u64::MAX] {
                let adjusted = adjust(path, offset);
                assert_eq!(offset_of(&adjusted), offset);
                // Prefix segments are byte-identical
                let prefix = path.rfind('-').map(|p| &path[..p]).unwrap_or("");
                let new_prefix = adjusted.rfind('-').map(|p| &adjusted[..p]).unwrap_or("");
                assert_eq!(prefix, new_prefix);
            }
        }
    }

    #[test]
    fn test_align_to_page() {
        assert_eq!(align_to_page("70000", 65536), "65536");
        assert_eq!(align_to_page("65536", 65536), "65536");
        assert_eq!(align_to_page("1024-ZIP-512", 4096), "1024-ZIP-0");
    }

    #[test]
    fn test_align_to_page_idempotent() {
        for path in ["70000", "1024-ZIP-131073"] {
            for size in [1u64, 512, 4096, 65536] {
                let once = align_to_page(path, size);
                assert_eq!(align_to_page(&once, size), once);
            }
        }
    }

    #[test]
    fn test_printable_hex() {
        assert_eq!(printable("70000", true), "11170");
        assert_eq!(printable("1024-ZIP-512", true), "400-ZIP-200");
        assert_eq!(printable("1024-ZIP-512", false), "1024-ZIP-512");
    }

    #[test]
    fn test_offset_invariant_under_display_toggle() {
        // The stored path, never the printable form, feeds offset_of
        let stored = "1024-ZIP-512";
        let _ = printable(stored, true);
        assert_eq!(offset_of(stored), 512);
    }

    #[test]
    fn test_embedded_filename_split() {
        let mut field = b"evidence.raw".to_vec();
        field.extend_from_slice(&FILENAME_MARKER);
        field.push(b'-');
        field.extend_from_slice(b"1024-ZIP-512");

        assert!(has_embedded_filename(&field));
        assert_eq!(filename_of(&field).unwrap(), b"evidence.raw");
        assert_eq!(path_without_filename(&field), b"1024-ZIP-512");
    }

    #[test]
    fn test_no_marker_means_whole_field_is_path() {
        let field = b"1024-ZIP-512";
        assert!(!has_embedded_filename(field));
        assert!(filename_of(field).is_none());
        assert_eq!(path_without_filename(field), field);
    }

    #[test]
    fn test_is_histogram_record() {
        assert!(is_histogram_record(b"n=42\tjohn@example.com"));
        assert!(!is_histogram_record(b"n=\tjohn@example.com"));
        assert!(!is_histogram_record(b"70000\tjohn@example.com"));
    }
}

//! Byte-pattern matching for highlight overlays
//!
//! A deliberately naive windowed byte-equality scan. Haystacks are
//! bounded to a page plus two pages of padding, so auditability wins
//! over throughput here; no regex engine is involved.

// =============================================================================
// Core scan
// =============================================================================

/// Find every starting index where `needle` occurs in `haystack`,
/// overlapping occurrences included.
///
/// A zero-length needle matches nothing. Case folding is ASCII-only:
/// letters compare lower-cased, every other byte compares as-is.
pub fn find_all(haystack: &[u8], needle: &[u8], case_insensitive: bool) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for start in 0..=(haystack.len() - needle.len()) {
        let window = &haystack[start..start + needle.len()];
        let hit = if case_insensitive {
            window
                .iter()
                .zip(needle)
                .all(|(a, b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
        } else {
            window == needle
        };
        if hit {
            matches.push(start);
        }
    }
    matches
}

// =============================================================================
// Encoding transforms
// =============================================================================

/// A re-encoding of a pattern's bytes, tried in addition to the bytes as
/// given. Returns None when the transform does not apply to the pattern.
pub type EncodingTransform = fn(&[u8]) -> Option<Vec<u8>>;

/// 8-bit → 16-bit: interleave a NUL after every byte, so an ASCII
/// pattern also matches its UTF-16LE form in the dump
pub fn expand_utf16le(pattern: &[u8]) -> Option<Vec<u8>> {
    if pattern.is_empty() {
        return None;
    }
    let mut wide = Vec::with_capacity(pattern.len() * 2);
    for &b in pattern {
        wide.push(b);
        wide.push(0);
    }
    Some(wide)
}

/// 16-bit → 8-bit: drop the NUL high bytes of a UTF-16LE pattern.
/// Applies only when every odd byte is NUL.
pub fn collapse_utf16le(pattern: &[u8]) -> Option<Vec<u8>> {
    if pattern.len() < 2 || pattern.len() % 2 != 0 {
        return None;
    }
    if pattern.iter().skip(1).step_by(2).any(|&b| b != 0) {
        return None;
    }
    Some(pattern.iter().step_by(2).copied().collect())
}

/// Transforms applied to every highlight pattern by default
pub const DEFAULT_TRANSFORMS: &[EncodingTransform] = &[expand_utf16le, collapse_utf16le];

// =============================================================================
// Pattern un-escaping
// =============================================================================

/// Un-escape a user-typed pattern into literal bytes.
///
/// `\\` yields a backslash and `\xHH` a raw byte; any other backslash
/// passes through literally. Non-ASCII characters contribute their
/// UTF-8 bytes.
pub fn unescape_pattern(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                b'\\' => {
                    out.push(b'\\');
                    i += 2;
                    continue;
                }
                b'x' | b'X' if i + 3 < bytes.len() => {
                    let hex = [bytes[i + 2], bytes[i + 3]];
                    if let Some(value) = std::str::from_utf8(&hex)
                        .ok()
                        .and_then(|h| u8::from_str_radix(h, 16).ok())
                    {
                        out.push(value);
                        i += 4;
                        continue;
                    }
                }
                _ => {}
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_needle_matches_nothing() {
        assert!(find_all(b"anything", b"", false).is_empty());
        assert!(find_all(b"anything", b"", true).is_empty());
        assert!(find_all(b"", b"", false).is_empty());
    }

    #[test]
    fn test_overlapping_occurrences() {
        assert_eq!(find_all(b"aaa", b"aa", false), vec![0, 1]);
        assert_eq!(find_all(b"abababa", b"aba", false), vec![0, 2, 4]);
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        assert_eq!(find_all(b"xABCx", b"abc", true), vec![1]);
        assert!(find_all(b"xABCx", b"abc", false).is_empty());
        // Non-ASCII bytes compare as-is even when folding
        assert!(find_all(&[0xC4, 0x80], &[0xE4, 0x80], true).is_empty());
    }

    #[test]
    fn test_needle_longer_than_haystack() {
        assert!(find_all(b"ab", b"abc", false).is_empty());
    }

    #[test]
    fn test_expand_utf16le() {
        assert_eq!(expand_utf16le(b"ab").unwrap(), vec![b'a', 0, b'b', 0]);
        assert!(expand_utf16le(b"").is_none());
    }

    #[test]
    fn test_collapse_utf16le() {
        assert_eq!(collapse_utf16le(&[b'a', 0, b'b', 0]).unwrap(), b"ab");
        // Not UTF-16LE text: high bytes are non-NUL
        assert!(collapse_utf16le(b"abcd").is_none());
        assert!(collapse_utf16le(b"abc").is_none());
    }

    #[test]
    fn test_unescape_pattern() {
        assert_eq!(unescape_pattern(r"abc"), b"abc");
        assert_eq!(unescape_pattern(r"a\\b"), b"a\\b");
        assert_eq!(unescape_pattern(r"\x00\xFF"), vec![0x00, 0xFF]);
        // Malformed escapes pass through literally
        assert_eq!(unescape_pattern(r"\xZZ"), b"\\xZZ");
        assert_eq!(unescape_pattern(r"tail\"), b"tail\\");
    }
}

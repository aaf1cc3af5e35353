//! Highlight overlay: per-byte flags for a page
//!
//! Combines the byte patterns contributed by the active highlight
//! sources (the selected feature's own text, echoed back, and the
//! user's `|`-separated search terms) into one boolean vector aligned
//! 1:1 with a page's visible bytes. Flags are recomputed wholesale on
//! every page, pattern-set, or selection change, never patched.

use crate::highlight::matcher::{self, DEFAULT_TRANSFORMS};
use crate::page::Page;

/// One byte pattern to mark, with its resolved case sensitivity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpec {
    /// Literal bytes to search for
    pub pattern: Vec<u8>,
    /// Compare bytes exactly instead of ASCII-case-folded
    pub match_case: bool,
}

impl HighlightSpec {
    /// The currently-selected feature's text, echoed back as a highlight
    pub fn feature_echo(text: &[u8], match_case: bool) -> Self {
        Self {
            pattern: text.to_vec(),
            match_case,
        }
    }

    /// Specs for a user search string: terms separated by a literal `|`,
    /// each independently un-escaped. Empty terms contribute nothing.
    pub fn user_terms(text: &str, match_case: bool) -> Vec<Self> {
        text.split('|')
            .map(matcher::unescape_pattern)
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| Self {
                pattern,
                match_case,
            })
            .collect()
    }
}

/// Compute per-byte highlight flags for a page's visible bytes.
///
/// Every spec is searched over the full padded buffer (so matches
/// straddling the page boundary are still found), once as given and
/// once per applicable encoding transform, OR-merged across sources and
/// passes. The result is then cropped to the visible window: leading
/// context flags dropped, length forced to `page_bytes.len()`.
pub fn compute_flags(page: &Page, specs: &[HighlightSpec]) -> Vec<bool> {
    compute_flags_with_transforms(page, specs, DEFAULT_TRANSFORMS)
}

/// As [`compute_flags`], with an explicit encoding-transform list
pub fn compute_flags_with_transforms(
    page: &Page,
    specs: &[HighlightSpec],
    transforms: &[matcher::EncodingTransform],
) -> Vec<bool> {
    let padded = &page.padded_bytes;
    let mut padded_flags = vec![false; padded.len()];

    for spec in specs {
        mark_pattern(&mut padded_flags, padded, &spec.pattern, spec.match_case);
        for transform in transforms {
            if let Some(variant) = transform(&spec.pattern) {
                mark_pattern(&mut padded_flags, padded, &variant, spec.match_case);
            }
        }
    }

    // Crop to the visible window
    let usable = page.usable_prefix();
    let mut flags: Vec<bool> = padded_flags
        .into_iter()
        .skip(usable)
        .take(page.page_bytes.len())
        .collect();
    flags.resize(page.page_bytes.len(), false);
    flags
}

fn mark_pattern(flags: &mut [bool], haystack: &[u8], pattern: &[u8], match_case: bool) {
    for start in matcher::find_all(haystack, pattern, !match_case) {
        for flag in &mut flags[start..start + pattern.len()] {
            *flag = true;
        }
    }
}

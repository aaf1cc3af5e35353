//! Multi-pattern, multi-encoding byte highlighting
//!
//! [`matcher`] is the raw overlapping byte scan; [`overlay`] combines
//! the active highlight sources into per-byte flags for a page.

pub mod matcher;
pub mod overlay;

pub use matcher::{find_all, unescape_pattern, EncodingTransform, DEFAULT_TRANSFORMS};
pub use overlay::{compute_flags, compute_flags_with_transforms, HighlightSpec};

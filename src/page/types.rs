//! Page value type for chunked image viewing

use serde::{Deserialize, Serialize};

use crate::fpath;

/// A fixed-size, page-aligned window of image bytes plus surrounding
/// padding used for boundary-safe highlight search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page-aligned forensic path of the first visible byte
    pub forensic_path: String,
    /// Exactly the bytes belonging to the page (at most one page size)
    pub page_bytes: Vec<u8>,
    /// Page bytes plus up to a page of leading and trailing context,
    /// used only for highlight matching across page boundaries
    pub padded_bytes: Vec<u8>,
    /// Nominal count of leading context bytes in `padded_bytes`.
    /// Near the start of the image this can exceed what was actually
    /// returned; use [`Page::usable_prefix`] for slicing.
    pub padding_prefix: usize,
    /// Total addressable size at this path, as reported by the source
    pub image_size: u64,
}

impl Page {
    /// An empty page at the given path, used for the Idle/Loading/Error
    /// states so observers never see a half-updated page
    pub fn empty(forensic_path: &str) -> Self {
        Self {
            forensic_path: forensic_path.to_string(),
            page_bytes: Vec::new(),
            padded_bytes: Vec::new(),
            padding_prefix: 0,
            image_size: 0,
        }
    }

    /// Leading context bytes actually present in `padded_bytes`
    pub fn usable_prefix(&self) -> usize {
        self.padding_prefix.min(self.padded_bytes.len())
    }

    /// Byte offset of the first visible byte within its image
    pub fn start_offset(&self) -> u64 {
        fpath::offset_of(&self.forensic_path)
    }

    /// True when the page holds no visible bytes
    pub fn is_empty(&self) -> bool {
        self.page_bytes.is_empty()
    }
}

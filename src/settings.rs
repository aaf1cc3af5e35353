//! Display preferences for the paging engine
//!
//! The host owns these values and passes them explicitly into the pure
//! formatting functions; nothing in this crate reads preference state
//! from a global.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ViewError, ViewResult};

/// Default page size in bytes (64 KiB)
pub const DEFAULT_PAGE_SIZE: usize = 65536;

/// Line layout for rendered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// 16 bytes per row: hex cells plus an ASCII gutter
    Hex,
    /// 64 bytes per row: printable characters only
    Text,
}

/// Viewer preferences, persisted by the host between sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewPrefs {
    /// Render numeric path segments in hexadecimal instead of decimal
    pub hex_offsets: bool,
    /// Row layout for page rendering
    pub line_mode: LineMode,
    /// Case-sensitive highlight matching
    pub match_case: bool,
    /// Page size in bytes
    pub page_size: usize,
}

impl Default for ViewPrefs {
    fn default() -> Self {
        Self {
            hex_offsets: false,
            line_mode: LineMode::Hex,
            match_case: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewPrefs {
    /// Load preferences from a JSON file, falling back to defaults if the
    /// file does not exist
    pub fn load(path: &Path) -> ViewResult<Self> {
        if !path.exists() {
            debug!(?path, "No preferences file, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|e| ViewError::SourceUnavailable {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&data)
            .map_err(|e| ViewError::Malformed(format!("Preferences file: {}", e)))
    }

    /// Save preferences as JSON
    pub fn save(&self, path: &Path) -> ViewResult<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| ViewError::Malformed(format!("Preferences encode: {}", e)))?;
        fs::write(path, data).map_err(|e| ViewError::SourceUnavailable {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(?path, "Preferences saved");
        Ok(())
    }
}

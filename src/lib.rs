//! Forensic image paging and highlight-overlay engine
//!
//! The core of a forensic-artifact viewer: parse and manipulate
//! forensic-path byte addresses, fetch padded page windows from very
//! large images without blocking the interactive thread, index feature
//! files for random access, compute multi-pattern highlight overlays,
//! and format fixed-width display rows. No UI toolkit is involved; a
//! host drives [`page::PageModel`] and renders the rows however it
//! likes.

pub mod error;
pub mod features;
pub mod fpath;
pub mod highlight;
pub mod logging;
pub mod page;
pub mod render;
pub mod settings;

pub use error::{ViewError, ViewResult};
pub use features::{FeatureFilter, FeatureLineIndex, FeatureLineRecord};
pub use highlight::HighlightSpec;
pub use page::{
    ByteRangeReader, ImageFileReader, ModelState, Page, PageEvent, PageModel, RangeRead,
};
pub use render::{HighlightSpan, Row, RowIter};
pub use settings::{LineMode, ViewPrefs, DEFAULT_PAGE_SIZE};

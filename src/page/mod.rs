//! Paged access to large forensic images
//!
//! A page is a fixed-size, page-aligned window of image bytes plus up
//! to a page of leading and trailing context on each side, fetched on
//! demand so the interactive surface never blocks on a slow source.
//! [`PageModel`] drives the reads; [`ByteRangeReader`] is the boundary
//! to whatever holds the bytes.

mod model;
mod reader;
mod types;

pub use crate::settings::DEFAULT_PAGE_SIZE;
pub use model::{ModelState, PageEvent, PageModel};
pub use reader::{ByteRangeReader, ImageFileReader, RangeRead};
pub use types::Page;

//! Byte-range reading boundary
//!
//! [`ByteRangeReader`] is the seam between the paging engine and whatever
//! actually holds the bytes: a flat image file here, the external
//! scanner's decoded sub-objects in a fuller deployment. The provided
//! [`ImageFileReader`] opens its backing file per request and closes it
//! on return, so no handle state is carried between reads.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{ViewError, ViewResult};
use crate::fpath;

/// Result of one byte-range read
#[derive(Debug, Clone)]
pub struct RangeRead {
    /// Bytes actually read (may be shorter than requested, empty beyond EOF)
    pub bytes: Vec<u8>,
    /// Total addressable size at the requested path
    pub total_size: u64,
}

/// Performs the blocking read of N bytes at a forensic path from an
/// image or feature-file source
pub trait ByteRangeReader: Send + Sync {
    /// Read up to `num_bytes` starting at the path's trailing offset.
    ///
    /// An offset at or beyond EOF is not an error: the read succeeds
    /// with empty bytes, and the caller decides what an empty result
    /// means. Open and read failures map to
    /// [`ViewError::SourceUnavailable`].
    fn read(&self, forensic_path: &str, num_bytes: usize) -> ViewResult<RangeRead>;
}

/// Reader over a flat file on disk.
///
/// Decoder-nested paths are resolved by the external scanner before they
/// reach this layer; the flat reader serves the trailing offset only.
#[derive(Debug, Clone)]
pub struct ImageFileReader {
    path: PathBuf,
}

impl ImageFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file this reader serves
    pub fn backing_path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, forensic_path: &str, source: std::io::Error) -> ViewError {
        ViewError::SourceUnavailable {
            path: format!("{} at {}", self.path.display(), forensic_path),
            source,
        }
    }
}

impl ByteRangeReader for ImageFileReader {
    fn read(&self, forensic_path: &str, num_bytes: usize) -> ViewResult<RangeRead> {
        let offset = fpath::offset_of(forensic_path);
        trace!(path = %forensic_path, num_bytes, "Opening image for range read");

        let mut file =
            File::open(&self.path).map_err(|e| self.unavailable(forensic_path, e))?;

        let total_size = file
            .metadata()
            .map_err(|e| self.unavailable(forensic_path, e))?
            .len();

        // Clamp offset to file bounds; beyond EOF reads empty
        let actual_offset = offset.min(total_size);
        file.seek(SeekFrom::Start(actual_offset))
            .map_err(|e| self.unavailable(forensic_path, e))?;

        let remaining = total_size.saturating_sub(actual_offset) as usize;
        let to_read = num_bytes.min(remaining);

        let mut buffer = vec![0u8; to_read];
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| self.unavailable(forensic_path, e))?;
        buffer.truncate(bytes_read);

        debug!(path = %forensic_path, bytes_read, total_size, "Range read complete");
        Ok(RangeRead {
            bytes: buffer,
            total_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_range() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"0123456789").unwrap();

        let reader = ImageFileReader::new(temp.path());
        let read = reader.read("4", 3).unwrap();
        assert_eq!(read.bytes, b"456");
        assert_eq!(read.total_size, 10);
    }

    #[test]
    fn test_read_clamped_at_eof() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"0123456789").unwrap();

        let reader = ImageFileReader::new(temp.path());
        let read = reader.read("8", 100).unwrap();
        assert_eq!(read.bytes, b"89");
    }

    #[test]
    fn test_read_beyond_eof_is_empty_not_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"0123456789").unwrap();

        let reader = ImageFileReader::new(temp.path());
        let read = reader.read("500", 16).unwrap();
        assert!(read.bytes.is_empty());
        assert_eq!(read.total_size, 10);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let reader = ImageFileReader::new("/nonexistent/image.raw");
        let err = reader.read("0", 16).unwrap_err();
        assert!(matches!(err, ViewError::SourceUnavailable { .. }));
    }
}

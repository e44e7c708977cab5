//! # Classifier Module
//!
//! Content-based MIME sniffing for image files.
//!
//! Detection works on the magic bytes at the start of a file, never on the
//! file name or extension: a `.txt` file holding JPEG bytes is an image, a
//! `.jpg` full of prose is not.
//!
//! ## Recognized types
//! - `image/jpeg`, `image/png`, `image/gif`, `image/webp`, `image/bmp`,
//!   `image/tiff`, `image/heic`
//!
//! Which of these a scan actually accepts comes from the configured
//! accepted-type set.

use crate::error::ScanError;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected for MIME sniffing.
pub const SNIFF_LEN: usize = 512;

/// Sniff a MIME type from the leading bytes of a file.
///
/// Returns `None` when the prefix matches no known image signature.
/// Prefixes shorter than [`SNIFF_LEN`] are fine; each signature checks
/// only the bytes it needs.
pub fn sniff_mime(prefix: &[u8]) -> Option<&'static str> {
    // JPEG: FF D8 FF
    if prefix.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if prefix.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    // GIF: GIF87a or GIF89a
    if prefix.starts_with(b"GIF87a") || prefix.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if prefix.len() >= 12 && prefix.starts_with(b"RIFF") && &prefix[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // BMP: 42 4D
    if prefix.starts_with(&[0x42, 0x4D]) {
        return Some("image/bmp");
    }

    // TIFF: II*\0 (little endian) or MM\0* (big endian)
    if prefix.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || prefix.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // HEIC/HEIF: ftyp container with a heif brand
    if prefix.len() >= 12 && &prefix[4..8] == b"ftyp" {
        let brand = &prefix[8..12];
        if brand == b"heic" || brand == b"heix" || brand == b"mif1" || brand == b"hevc" {
            return Some("image/heic");
        }
    }

    None
}

/// Decides whether a file is one of the configured accepted image kinds.
#[derive(Debug, Clone)]
pub struct MimeClassifier {
    accepted: HashSet<String>,
}

impl MimeClassifier {
    /// Create a classifier accepting the given MIME-type strings.
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    /// Check a byte prefix against the accepted set.
    pub fn is_accepted(&self, prefix: &[u8]) -> bool {
        sniff_mime(prefix).is_some_and(|mime| self.accepted.contains(mime))
    }

    /// Open a file, read up to [`SNIFF_LEN`] bytes, and classify it.
    ///
    /// A file shorter than the sniff window is not an error. The handle is
    /// opened and closed here; hashing reopens the file later.
    pub fn classify_file(&self, path: &Path) -> Result<bool, ScanError> {
        let mut file = File::open(path).map_err(|e| ScanError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut prefix = [0u8; SNIFF_LEN];
        let mut filled = 0;
        // Loop until the window is full or the file ends; a single read
        // may legally return fewer bytes than requested.
        loop {
            let n = file
                .read(&mut prefix[filled..])
                .map_err(|e| ScanError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if n == 0 {
                break;
            }
            filled += n;
            if filled == SNIFF_LEN {
                break;
            }
        }

        Ok(self.is_accepted(&prefix[..filled]))
    }
}

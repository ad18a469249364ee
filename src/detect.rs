//! PDF header sniffing.
//!
//! Readers are required to accept a `%PDF-x.y` marker anywhere in the first
//! kilobyte of the file, so the scan does not insist on offset zero.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information found at the start of a PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version from the header (e.g. "1.4", "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Detect the PDF header of a file on disk.
///
/// # Example
/// ```no_run
/// use ecgpdf::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("recording.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the PDF header in a byte buffer.
///
/// Only the first kilobyte is inspected.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let header_offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = header_offset + PDF_MAGIC.len();
    let version_bytes = window
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(version_bytes) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat {
        version,
        header_offset,
    })
}

fn is_valid_version(version: &[u8]) -> bool {
    matches!(version, [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

/// Check if a file starts like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

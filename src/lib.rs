//! # ecgpdf
//!
//! Structural PDF access and ECG recovery for AliveCor report files.
//!
//! The library opens a PDF, exposes its pages as dictionaries, boxes and
//! content streams, extracts page text, and reads the single-lead ECG back
//! out of the vector drawing on an AliveCor report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ecgpdf::{Document, EcgOptions};
//!
//! fn main() -> ecgpdf::Result<()> {
//!     let doc = Document::open("report.pdf")?;
//!     let page = doc.page(0)?;
//!
//!     println!("{}", page.dictionary()?);
//!     println!("media box: {}", page.media_box()?);
//!     println!("{}", page.extract_text()?);
//!
//!     let ecg = ecgpdf::ecg::extract_ecg_from_document(&doc, &EcgOptions::default())?;
//!     println!("{} samples, {} beats", ecg.sample_count(), ecg.beat_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page structure**: dictionaries in file order, inherited media and crop boxes
//! - **Content streams**: decoded payloads and operator lists
//! - **Text extraction**: font-aware decoding with Unicode normalization
//! - **ECG recovery**: samples, beat markers and an export description
//! - **Parallel batches**: Uses Rayon to process many reports at once

pub mod detect;
pub mod ecg;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;

pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use ecg::{EcgOptions, EcgRecording, Recording};
pub use error::{Error, Result};
pub use model::{IndirectObject, Metadata, PdfValue, Rect};
pub use parser::{
    ContentStream, Document, ErrorMode, ExtractOptions, OpenOptions, Page, PageDictionary,
};
pub use render::{JsonFormat, PageSummary};
pub use report::ReportSummary;

use std::path::Path;

/// Open a PDF file.
///
/// # Example
///
/// ```no_run
/// let doc = ecgpdf::open("report.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    Document::open(path)
}

/// Extract the text of one page (0-based index).
///
/// # Example
///
/// ```no_run
/// let text = ecgpdf::extract_text("report.pdf", 0).unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P, page: usize) -> Result<String> {
    let doc = Document::open(path)?;
    let text = doc.page(page)?.extract_text()?;
    Ok(text)
}

/// Recover the ECG from a report and describe it under `repository`.
///
/// # Example
///
/// ```no_run
/// use ecgpdf::{to_recording, EcgOptions, JsonFormat};
///
/// let recording = to_recording("jane.pdf", "http://demo.biosignalml.org", &EcgOptions::default())?;
/// println!("{}", ecgpdf::render::to_json(&recording, JsonFormat::Pretty)?);
/// # Ok::<(), ecgpdf::Error>(())
/// ```
pub fn to_recording<P: AsRef<Path>>(
    path: P,
    repository: &str,
    options: &EcgOptions,
) -> Result<Recording> {
    let path = path.as_ref();
    let ecg = ecg::extract_ecg(path, options)?;
    Ok(Recording::from_ecg(&ecg, ecg::recording_uri(repository, path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let result = open("/nonexistent/report.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_detect_format_unknown_magic() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = Document::from_bytes(b"not a pdf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_from_bytes_rejects_truncated_pdf() {
        let result = Document::from_bytes(b"%PDF-1.4\n");
        assert!(result.is_err());
    }
}

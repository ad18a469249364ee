//! Error types for ecgpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for ecgpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading PDFs and recovering ECG data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A required PDF object is missing.
    #[error("Missing required object: {0}")]
    MissingObject(String),

    /// A PDF object exists but has the wrong shape.
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The page drawing does not match the ECG report layout.
    #[error("ECG extraction error at operator {index}: {message}")]
    Ecg { index: usize, message: String },

    /// Error while serializing output (JSON, CSV).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn ecg(index: usize, message: impl Into<String>) -> Self {
        Error::Ecg {
            index,
            message: message.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(format!("CSV error: {}", err))
    }
}

//! PDF document access: documents, pages, content streams and text.

pub mod backend;
mod content;
mod document;
mod options;
mod page;
mod text;

pub use backend::{decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PdfBackend, RawStream};
pub use content::ContentStream;
pub use document::Document;
pub use options::{ErrorMode, ExtractOptions, OpenOptions};
pub use page::{Page, PageDictionary};
pub use text::TextExtractor;

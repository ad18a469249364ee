//! Owned value types shared by the parser, the ECG scanner and the renderers.
//!
//! Nothing in here depends on the PDF engine; values are copied out of the
//! backend so callers never see `lopdf` types.

mod geometry;
mod metadata;
mod object;
mod text;

pub use geometry::Rect;
pub use metadata::{parse_pdf_date, Metadata};
pub use object::{IndirectObject, PdfValue};
pub use text::decode_text_simple;

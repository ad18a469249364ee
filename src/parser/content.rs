//! Page content streams.

use crate::error::Result;
use crate::model::IndirectObject;

use super::backend::{ContentOp, PdfBackend, RawStream};

/// The `/Contents` of a page: one stream, or several that are read as one.
pub struct ContentStream<'a> {
    backend: &'a dyn PdfBackend,
    parts: Vec<IndirectObject>,
}

impl std::fmt::Debug for ContentStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStream")
            .field("parts", &self.parts)
            .finish()
    }
}

impl<'a> ContentStream<'a> {
    pub(crate) fn new(backend: &'a dyn PdfBackend, parts: Vec<IndirectObject>) -> Self {
        Self { backend, parts }
    }

    /// References of the underlying stream objects.
    pub fn parts(&self) -> &[IndirectObject] {
        &self.parts
    }

    /// The streams exactly as stored in the file.
    pub fn raw(&self) -> Result<Vec<RawStream>> {
        self.parts
            .iter()
            .map(|id| self.backend.raw_stream(*id))
            .collect()
    }

    /// Distinct filter names across all parts, first seen first.
    pub fn filters(&self) -> Result<Vec<String>> {
        let mut filters: Vec<String> = Vec::new();
        for raw in self.raw()? {
            for filter in raw.filters {
                if !filters.contains(&filter) {
                    filters.push(filter);
                }
            }
        }
        Ok(filters)
    }

    /// Total encoded size in bytes.
    pub fn encoded_len(&self) -> Result<usize> {
        Ok(self.raw()?.iter().map(|r| r.content.len()).sum())
    }

    /// Decoded payload. Parts are joined with a single newline.
    pub fn data(&self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        for (i, id) in self.parts.iter().enumerate() {
            if i > 0 {
                data.push(b'\n');
            }
            data.extend_from_slice(&self.backend.decoded_stream(*id)?);
        }
        log::trace!(
            "Decoded {} content stream part(s) into {} bytes",
            self.parts.len(),
            data.len()
        );
        Ok(data)
    }

    /// Decoded payload split into operators and operands.
    pub fn operations(&self) -> Result<Vec<ContentOp>> {
        let data = self.data()?;
        self.backend.decode_content(&data)
    }
}

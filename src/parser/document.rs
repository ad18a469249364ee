//! Opened PDF documents.

use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
use crate::error::{Error, Result};
use crate::model::{parse_pdf_date, IndirectObject, Metadata, PdfValue};

use super::backend::{LopdfBackend, PdfBackend};
use super::options::{ErrorMode, OpenOptions};
use super::page::Page;

/// Longest reference chain followed before giving up.
const MAX_REFERENCE_DEPTH: usize = 32;

/// An opened PDF document.
///
/// Pages are addressed by zero-based position and borrow the document.
///
/// ```no_run
/// use ecgpdf::Document;
///
/// let doc = Document::open("recording.pdf")?;
/// let page = doc.page(0)?;
/// println!("{}", page.dictionary()?);
/// println!("{}", page.media_box()?);
/// # Ok::<(), ecgpdf::Error>(())
/// ```
pub struct Document {
    backend: Box<dyn PdfBackend>,
    page_ids: Vec<IndirectObject>,
    format: Option<PdfFormat>,
    options: OpenOptions,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("version", &self.backend.version())
            .field("pages", &self.page_ids.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Document {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, OpenOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: OpenOptions) -> Result<Self> {
        let path = path.as_ref();

        let format = if options.skip_header_check {
            None
        } else {
            Some(detect_format_from_path(path)?)
        };

        log::debug!("Loading {}", path.display());
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::from_parts(Box::new(backend), format, options))
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, OpenOptions::default())
    }

    /// Open a PDF held in memory with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: OpenOptions) -> Result<Self> {
        let format = if options.skip_header_check {
            None
        } else {
            Some(detect_format_from_bytes(data)?)
        };

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::from_parts(Box::new(backend), format, options))
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, OpenOptions::default())
    }

    /// Open a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: OpenOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Build a document over any backend.
    pub fn with_backend(backend: Box<dyn PdfBackend>, options: OpenOptions) -> Self {
        Self::from_parts(backend, None, options)
    }

    fn from_parts(
        backend: Box<dyn PdfBackend>,
        format: Option<PdfFormat>,
        options: OpenOptions,
    ) -> Self {
        let page_ids = backend.pages();
        log::debug!(
            "Opened PDF {} with {} pages",
            backend.version(),
            page_ids.len()
        );
        if backend.is_encrypted() {
            log::info!("Document is encrypted with an empty user password");
        }
        Self {
            backend,
            page_ids,
            format,
            options,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Get a page by zero-based index.
    pub fn page(&self, index: usize) -> Result<Page<'_>> {
        let id = self
            .page_ids
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.page_ids.len()))?;
        Ok(Page::new(self, index, id))
    }

    /// Iterate over all pages in order.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> + '_ {
        self.page_ids
            .iter()
            .enumerate()
            .map(move |(index, id)| Page::new(self, index, *id))
    }

    /// PDF version reported by the engine.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// Header information, when the header was checked on open.
    pub fn format(&self) -> Option<&PdfFormat> {
        self.format.as_ref()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    pub(crate) fn backend(&self) -> &dyn PdfBackend {
        self.backend.as_ref()
    }

    /// Fetch the object an indirect reference points to.
    pub fn resolve(&self, reference: IndirectObject) -> Result<PdfValue> {
        self.backend.object(reference)
    }

    /// Follow references until a direct value is reached.
    pub fn resolve_value(&self, value: &PdfValue) -> Result<PdfValue> {
        let mut current = value.clone();
        for _ in 0..MAX_REFERENCE_DEPTH {
            match current {
                PdfValue::Reference(r) => current = self.backend.object(r)?,
                direct => return Ok(direct),
            }
        }
        Err(Error::InvalidObject(format!(
            "reference chain longer than {} starting at {}",
            MAX_REFERENCE_DEPTH, value
        )))
    }

    /// Read the trailer's `/Info` dictionary.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.is_encrypted();

        let info = match self.backend.trailer().get("Info") {
            Some(value) => self.resolve_value(value).ok(),
            None => None,
        };
        let Some(info) = info else {
            return metadata;
        };

        let text = |key: &str| -> Option<String> {
            let value = self.resolve_value(info.get(key)?).ok()?;
            value
                .as_text()
                .or_else(|| value.as_name().map(str::to_string))
                .filter(|s| !s.is_empty())
        };

        metadata.title = text("Title");
        metadata.author = text("Author");
        metadata.subject = text("Subject");
        metadata.creator = text("Creator");
        metadata.producer = text("Producer");
        metadata.created = text("CreationDate").and_then(|d| parse_pdf_date(&d));
        metadata.modified = text("ModDate").and_then(|d| parse_pdf_date(&d));
        metadata
    }

    /// Extract the text of every page.
    ///
    /// In lenient mode a page that fails is logged and yields an empty string.
    pub fn extract_text_all(&self) -> Result<Vec<String>> {
        let mut texts = Vec::with_capacity(self.page_count());
        for page in self.pages() {
            match page.extract_text() {
                Ok(text) => texts.push(text),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract text from page {}: {}", page.number(), e);
                    texts.push(String::new());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(texts)
    }
}

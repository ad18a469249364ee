//! Pages and their dictionaries.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::model::{IndirectObject, PdfValue, Rect};

use super::backend::BackendFontInfo;
use super::content::ContentStream;
use super::document::Document;
use super::text::TextExtractor;

/// A page of an opened [`Document`].
#[derive(Clone, Copy)]
pub struct Page<'a> {
    doc: &'a Document,
    index: usize,
    id: IndirectObject,
}

impl fmt::Debug for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("index", &self.index)
            .field("id", &self.id)
            .finish()
    }
}

impl<'a> Page<'a> {
    pub(crate) fn new(doc: &'a Document, index: usize, id: IndirectObject) -> Self {
        Self { doc, index, id }
    }

    /// Zero-based position in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based page number.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// The page object's reference.
    pub fn id(&self) -> IndirectObject {
        self.id
    }

    /// The page dictionary as stored, references unresolved.
    pub fn dictionary(&self) -> Result<PageDictionary> {
        match self.doc.resolve(self.id)? {
            PdfValue::Dictionary(entries) => Ok(PageDictionary { entries }),
            other => Err(Error::InvalidObject(format!(
                "page {} is a {}, not a dictionary",
                self.id,
                other.kind()
            ))),
        }
    }

    /// Look up a key on the page, then up the `/Parent` chain.
    pub fn inherited(&self, key: &str) -> Result<Option<PdfValue>> {
        let mut visited = HashSet::new();
        let mut current = self.id;
        loop {
            if !visited.insert(current) {
                return Err(Error::InvalidObject(format!(
                    "cycle in page tree at {}",
                    current
                )));
            }
            let node = self.doc.resolve(current)?;
            if let Some(value) = node.get(key) {
                return self.doc.resolve_value(value).map(Some);
            }
            match node.get("Parent").and_then(PdfValue::as_reference) {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
    }

    /// The page's media box, possibly inherited from the page tree.
    pub fn media_box(&self) -> Result<Rect> {
        let value = self.inherited("MediaBox")?.ok_or_else(|| {
            Error::MissingObject(format!("MediaBox for page {}", self.number()))
        })?;
        self.rect(&value, "MediaBox")
    }

    /// The page's crop box; defaults to the media box.
    pub fn crop_box(&self) -> Result<Rect> {
        match self.inherited("CropBox")? {
            Some(value) => self.rect(&value, "CropBox"),
            None => self.media_box(),
        }
    }

    fn rect(&self, value: &PdfValue, key: &str) -> Result<Rect> {
        let items = value.as_array().ok_or_else(|| {
            Error::InvalidObject(format!("{} of page {} is not an array", key, self.number()))
        })?;
        let resolved = items
            .iter()
            .map(|v| self.doc.resolve_value(v))
            .collect::<Result<Vec<_>>>()?;
        Rect::from_values(&resolved)
    }

    /// The page's content stream, or `None` for a page without `/Contents`.
    pub fn contents(&self) -> Result<Option<ContentStream<'a>>> {
        let dict = self.dictionary()?;
        let Some(contents) = dict.get("Contents") else {
            return Ok(None);
        };

        let parts = match contents {
            PdfValue::Reference(r) => match self.doc.resolve(*r)? {
                PdfValue::Stream { .. } => vec![*r],
                PdfValue::Array(items) => stream_refs(&items)?,
                other => {
                    return Err(Error::InvalidObject(format!(
                        "/Contents of page {} is a {}",
                        self.number(),
                        other.kind()
                    )))
                }
            },
            PdfValue::Array(items) => stream_refs(items)?,
            other => {
                return Err(Error::InvalidObject(format!(
                    "/Contents of page {} is a {}",
                    self.number(),
                    other.kind()
                )))
            }
        };

        Ok(Some(ContentStream::new(self.doc.backend(), parts)))
    }

    /// Fonts available to the page.
    pub fn fonts(&self) -> Result<Vec<BackendFontInfo>> {
        self.doc.backend().page_fonts(self.id)
    }

    /// Extract plain text, one line per text line of the page.
    pub fn extract_text(&self) -> Result<String> {
        let Some(contents) = self.contents()? else {
            return Ok(String::new());
        };
        let ops = contents
            .operations()
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", self.number(), e)))?;
        let extractor = TextExtractor::new(self.doc.backend(), self.id, &self.doc.options().extract);
        Ok(extractor.extract(&ops))
    }
}

fn stream_refs(items: &[PdfValue]) -> Result<Vec<IndirectObject>> {
    items
        .iter()
        .map(|item| {
            item.as_reference().ok_or_else(|| {
                Error::InvalidObject(format!("/Contents array item {} is not a reference", item))
            })
        })
        .collect()
}

/// A page dictionary with keys in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDictionary {
    entries: Vec<(String, PdfValue)>,
}

impl PageDictionary {
    /// Look up a key; the leading slash is optional.
    pub fn get(&self, key: &str) -> Option<&PdfValue> {
        let key = key.strip_prefix('/').unwrap_or(key);
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys with their leading slash (`/Type`, `/MediaBox`, ...).
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| format!("/{}", k)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PageDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                PdfValue::Reference(r) => write!(f, "/{}: {}", key, r)?,
                other => write!(f, "/{}: {}", key, other)?,
            }
        }
        write!(f, "}}")
    }
}

impl Serialize for PageDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&format!("/{}", key), value)?;
        }
        map.end()
    }
}

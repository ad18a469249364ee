//! Serializable page overview used by `ecgpdf page --json`.

use serde::Serialize;

use crate::error::Result;
use crate::model::{IndirectObject, Rect};
use crate::parser::{Page, PageDictionary};

/// Structural facts about one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub index: usize,
    pub id: IndirectObject,
    pub dictionary: PageDictionary,
    pub media_box: Rect,
    pub crop_box: Rect,
    /// Content stream parts and their combined decoded length
    pub content_parts: usize,
    pub content_length: usize,
    pub filters: Vec<String>,
}

impl PageSummary {
    pub fn from_page(page: &Page<'_>) -> Result<Self> {
        let (content_parts, content_length, filters) = match page.contents()? {
            Some(contents) => (contents.parts().len(), contents.data()?.len(), contents.filters()?),
            None => (0, 0, Vec::new()),
        };

        Ok(Self {
            index: page.index(),
            id: page.id(),
            dictionary: page.dictionary()?,
            media_box: page.media_box()?,
            crop_box: page.crop_box()?,
            content_parts,
            content_length,
            filters,
        })
    }
}

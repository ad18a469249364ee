//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the document model, the text
//! extractor and the ECG scanner.

use crate::error::{Error, Result};
pub use crate::model::decode_text_simple;
use crate::model::{IndirectObject, PdfValue};

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operands in order; non-numbers are skipped.
    pub fn numbers(&self) -> Vec<f64> {
        self.operands
            .iter()
            .filter_map(|v| v.as_f32().map(f64::from))
            .collect()
    }
}

/// An encoded stream as stored in the file.
#[derive(Debug, Clone)]
pub struct RawStream {
    pub id: IndirectObject,
    /// Filter names in application order (e.g. `FlateDecode`).
    pub filters: Vec<String>,
    pub content: Vec<u8>,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, object lookup, stream
/// decoding, content stream tokenizing and font-aware text decoding
/// without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// PDF version from the file header.
    fn version(&self) -> String;

    /// Whether the file carries an `/Encrypt` dictionary.
    fn is_encrypted(&self) -> bool;

    /// Page objects in document order.
    fn pages(&self) -> Vec<IndirectObject>;

    /// The trailer dictionary.
    fn trailer(&self) -> PdfValue;

    /// Fetch an object by reference. References inside it stay unresolved.
    fn object(&self, id: IndirectObject) -> Result<PdfValue>;

    /// Fetch a stream object's encoded bytes.
    fn raw_stream(&self, id: IndirectObject) -> Result<RawStream>;

    /// Fetch a stream object and apply its filters.
    fn decoded_stream(&self, id: IndirectObject) -> Result<Vec<u8>>;

    /// Return font info for a given page.
    fn page_fonts(&self, page: IndirectObject) -> Result<Vec<BackendFontInfo>>;

    /// Parse decoded content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: IndirectObject, font_name: &[u8], bytes: &[u8]) -> String;
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::checked(LopdfDocument::load(path)?)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Self::checked(LopdfDocument::load_mem(data)?)
    }

    /// lopdf tries the empty password and, when that fails, hands back a
    /// document with no objects and no decryption state.
    fn checked(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() && doc.encryption_state.is_none() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        Self { doc }
    }

    fn stream(&self, id: IndirectObject) -> Result<&lopdf::Stream> {
        let object = self
            .doc
            .get_object(id.into())
            .map_err(|_| Error::MissingObject(id.to_string()))?;
        match object {
            Object::Stream(s) => Ok(s),
            other => Err(Error::InvalidObject(format!(
                "{} is not a stream (found {})",
                id,
                convert_object(other).kind()
            ))),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn pages(&self) -> Vec<IndirectObject> {
        self.doc
            .get_pages()
            .into_values()
            .map(IndirectObject::from)
            .collect()
    }

    fn trailer(&self) -> PdfValue {
        convert_dictionary(&self.doc.trailer)
    }

    fn object(&self, id: IndirectObject) -> Result<PdfValue> {
        self.doc
            .get_object(id.into())
            .map(convert_object)
            .map_err(|_| Error::MissingObject(id.to_string()))
    }

    fn raw_stream(&self, id: IndirectObject) -> Result<RawStream> {
        let stream = self.stream(id)?;
        let filters = match stream.dict.get(b"Filter") {
            Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).to_string()],
            Ok(Object::Array(arr)) => arr
                .iter()
                .filter_map(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .collect(),
            _ => Vec::new(),
        };
        Ok(RawStream {
            id,
            filters,
            content: stream.content.clone(),
        })
    }

    fn decoded_stream(&self, id: IndirectObject) -> Result<Vec<u8>> {
        let stream = self.stream(id)?;
        if stream.dict.get(b"Filter").is_ok() {
            let data = stream
                .decompressed_content()
                .map_err(|e| Error::PdfParse(format!("failed to decode stream {}: {}", id, e)))?;
            // lopdf's inflate returns an empty buffer on corrupt input
            if data.is_empty() && !stream.content.is_empty() {
                return Err(Error::PdfParse(format!(
                    "stream {} decoded to nothing from {} bytes",
                    id,
                    stream.content.len()
                )));
            }
            Ok(data)
        } else {
            Ok(stream.content.clone())
        }
    }

    fn page_fonts(&self, page: IndirectObject) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page.into())
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
            });
        }
        Ok(result)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: IndirectObject, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page.into()) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Boolean(b) => PdfValue::Boolean(*b),
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(String::from_utf8_lossy(n).to_string()),
        Object::String(b, _) => PdfValue::String(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        Object::Dictionary(d) => convert_dictionary(d),
        Object::Stream(s) => PdfValue::Stream {
            dict: dictionary_entries(&s.dict),
            length: s.content.len(),
        },
        Object::Reference(id) => PdfValue::Reference(IndirectObject::from(*id)),
        _ => PdfValue::Null,
    }
}

fn dictionary_entries(dict: &lopdf::Dictionary) -> Vec<(String, PdfValue)> {
    dict.iter()
        .map(|(k, v)| (String::from_utf8_lossy(k).to_string(), convert_object(v)))
        .collect()
}

fn convert_dictionary(dict: &lopdf::Dictionary) -> PdfValue {
    PdfValue::Dictionary(dictionary_entries(dict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Stream};

    fn single_stream_backend(content: &[u8]) -> (LopdfBackend, IndirectObject) {
        let mut doc = LopdfDocument::with_version("1.4");
        let id = doc.add_object(Stream::new(Dictionary::new(), content.to_vec()));
        (LopdfBackend::from_document(doc), IndirectObject::from(id))
    }

    #[test]
    fn test_convert_object_nested() {
        let obj = Object::Array(vec![
            Object::Integer(1),
            Object::Real(0.5),
            Object::Name(b"Perceptual".to_vec()),
            Object::Reference((7, 0)),
            Object::Null,
        ]);
        assert_eq!(
            convert_object(&obj),
            PdfValue::Array(vec![
                PdfValue::Integer(1),
                PdfValue::Real(0.5),
                PdfValue::Name("Perceptual".to_string()),
                PdfValue::Reference(IndirectObject::new(7, 0)),
                PdfValue::Null,
            ])
        );
    }

    #[test]
    fn test_unfiltered_stream_is_returned_as_is() {
        let (backend, id) = single_stream_backend(b"q Q");
        assert_eq!(backend.decoded_stream(id).unwrap(), b"q Q");

        let raw = backend.raw_stream(id).unwrap();
        assert!(raw.filters.is_empty());
        assert_eq!(raw.content, b"q Q");
    }

    #[test]
    fn test_corrupt_flate_stream_is_an_error() {
        let mut doc = LopdfDocument::with_version("1.4");
        let dict = lopdf::dictionary! { "Filter" => "FlateDecode" };
        let id = IndirectObject::from(doc.add_object(Stream::new(dict, b"garbage".to_vec())));
        let backend = LopdfBackend::from_document(doc);

        assert!(matches!(backend.decoded_stream(id), Err(Error::PdfParse(_))));
        assert_eq!(backend.raw_stream(id).unwrap().content, b"garbage");
    }

    #[test]
    fn test_missing_object() {
        let (backend, _) = single_stream_backend(b"");
        let result = backend.object(IndirectObject::new(99, 0));
        assert!(matches!(result, Err(Error::MissingObject(_))));
    }

    #[test]
    fn test_decode_content_operations() {
        let (backend, _) = single_stream_backend(b"");
        let ops = backend.decode_content(b"1 0 0 -1 10 20 cm 0.4 w").unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].operator, "cm");
        assert_eq!(ops[0].numbers(), vec![1.0, 0.0, 0.0, -1.0, 10.0, 20.0]);
        assert_eq!(ops[1].operator, "w");
        assert!((ops[1].numbers()[0] - 0.4).abs() < 1e-6);
    }
}

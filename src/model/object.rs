//! Owned PDF values as seen through the document model.

use std::fmt;

use serde::{Serialize, Serializer};

use super::decode_text_simple;

/// Reference to an object stored elsewhere in the file: `(object number, generation)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndirectObject {
    /// Object number
    pub id: u32,
    /// Generation number
    pub generation: u16,
}

impl IndirectObject {
    /// Create a reference.
    pub fn new(id: u32, generation: u16) -> Self {
        Self { id, generation }
    }
}

impl From<(u32, u16)> for IndirectObject {
    fn from((id, generation): (u32, u16)) -> Self {
        Self { id, generation }
    }
}

impl From<IndirectObject> for (u32, u16) {
    fn from(r: IndirectObject) -> Self {
        (r.id, r.generation)
    }
}

impl fmt::Display for IndirectObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndirectObject({}, {})", self.id, self.generation)
    }
}

/// A PDF value.
///
/// Names are stored without their leading slash; dictionaries keep the key
/// order found in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PdfValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f32),
    Name(String),
    #[serde(serialize_with = "serialize_pdf_string")]
    String(Vec<u8>),
    Array(Vec<PdfValue>),
    Dictionary(Vec<(String, PdfValue)>),
    /// A stream; only its dictionary and encoded length are carried here.
    Stream {
        dict: Vec<(String, PdfValue)>,
        length: usize,
    },
    Reference(IndirectObject),
}

fn serialize_pdf_string<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&decode_text_simple(bytes))
}

impl PdfValue {
    /// Numeric value of an integer or real.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PdfValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Name without the leading slash.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PdfValue::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Decoded text of a string value (UTF-16BE, UTF-8 or Latin-1).
    pub fn as_text(&self) -> Option<String> {
        match self {
            PdfValue::String(bytes) => Some(decode_text_simple(bytes)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PdfValue]> {
        match self {
            PdfValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<IndirectObject> {
        match self {
            PdfValue::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Look up a key in a dictionary or stream dictionary.
    pub fn get(&self, key: &str) -> Option<&PdfValue> {
        let key = key.strip_prefix('/').unwrap_or(key);
        match self {
            PdfValue::Dictionary(entries) | PdfValue::Stream { dict: entries, .. } => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Short type label used in listings.
    pub fn kind(&self) -> &'static str {
        match self {
            PdfValue::Null => "null",
            PdfValue::Boolean(_) => "boolean",
            PdfValue::Integer(_) => "integer",
            PdfValue::Real(_) => "real",
            PdfValue::Name(_) => "name",
            PdfValue::String(_) => "string",
            PdfValue::Array(_) => "array",
            PdfValue::Dictionary(_) => "dictionary",
            PdfValue::Stream { .. } => "stream",
            PdfValue::Reference(_) => "reference",
        }
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[(String, PdfValue)]) -> fmt::Result {
    write!(f, "<<")?;
    for (key, value) in entries {
        write!(f, " /{} {}", key, value)?;
    }
    write!(f, " >>")
}

fn write_literal(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "(")?;
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => write!(f, "\\{}", b as char)?,
            b'\n' => write!(f, "\\n")?,
            b'\r' => write!(f, "\\r")?,
            0x20..=0x7E => write!(f, "{}", b as char)?,
            _ => write!(f, "\\{:03o}", b)?,
        }
    }
    write!(f, ")")
}

impl fmt::Display for PdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfValue::Null => write!(f, "null"),
            PdfValue::Boolean(b) => write!(f, "{}", b),
            PdfValue::Integer(i) => write!(f, "{}", i),
            PdfValue::Real(r) => write!(f, "{}", r),
            PdfValue::Name(n) => write!(f, "/{}", n),
            PdfValue::String(bytes) => write_literal(f, bytes),
            PdfValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            PdfValue::Dictionary(entries) => write_entries(f, entries),
            PdfValue::Stream { dict, length } => {
                write_entries(f, dict)?;
                write!(f, " stream[{} bytes]", length)
            }
            PdfValue::Reference(r) => write!(f, "{} {} R", r.id, r.generation),
        }
    }
}

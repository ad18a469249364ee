//! Document information dictionary.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Document metadata taken from the trailer's `/Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.4")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: usize,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
///
/// Every field after the year is optional. A missing or `Z` offset means UTC.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, offset) = s.split_at(digits_end);
    if digits.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match digits.get(range) {
            Some(v) => v.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = field(4..6, 1)?;
    let day = field(6..8, 1)?;
    let hour = field(8..10, 0)?;
    let minute = field(10..12, 0)?;
    let second = field(12..14, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_offset(offset)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let mut chars = s.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let rest: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = rest.get(0..2)?.parse().ok()?;
    let minutes: i32 = rest.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

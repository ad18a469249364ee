//! Header fields printed on a report page.
//!
//! Report text is a handful of short lines (patient, recording time, heart
//! rate, device). Lines of the form `Label: value` are collected as fields;
//! the heart rate and strip duration are also recognised on their own.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fields read from a page's extracted text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Non-empty text lines in page order
    pub lines: Vec<String>,
    /// `Label: value` pairs in page order
    pub fields: Vec<(String, String)>,
    /// Heart rate in beats per minute
    pub heart_rate_bpm: Option<u32>,
    /// Strip duration in seconds
    pub duration_s: Option<f64>,
}

fn field_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z0-9 ./()#-]{0,40}?)\s*:\s*(\S.*?)\s*$")
            .expect("field pattern is valid")
    })
}

fn heart_rate_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{2,3})\s*bpm\b").expect("heart rate pattern is valid"))
}

fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bduration\s*:?\s*(\d+(?:\.\d+)?)\s*(?:s|sec|seconds)\b")
            .expect("duration pattern is valid")
    })
}

impl ReportSummary {
    /// Summarize extracted page text.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        let fields = lines
            .iter()
            .filter_map(|line| {
                let caps = field_pattern().captures(line)?;
                Some((caps[1].to_string(), caps[2].to_string()))
            })
            .collect();

        let heart_rate_bpm = heart_rate_pattern()
            .captures(text)
            .and_then(|caps| caps[1].parse().ok());

        let duration_s = duration_pattern()
            .captures(text)
            .and_then(|caps| caps[1].parse().ok());

        Self {
            lines,
            fields,
            heart_rate_bpm,
            duration_s,
        }
    }

    /// Value of the first field whose label matches, ignoring case.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v.as_str())
    }
}

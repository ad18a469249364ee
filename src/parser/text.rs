//! Plain text extraction from decoded content operations.
//!
//! Text is collected in drawing order. A line ends whenever the text
//! position moves to a new baseline (`Td`/`TD` with a vertical offset,
//! `T*`, `'`, `"`, a `Tm` that changes the baseline) or a text object
//! closes with `ET`.

use unicode_normalization::UnicodeNormalization;

use crate::model::{IndirectObject, PdfValue};

use super::backend::{ContentOp, PdfBackend};
use super::options::ExtractOptions;

/// Walks text operators and decodes shown strings through the page fonts.
pub struct TextExtractor<'a> {
    backend: &'a dyn PdfBackend,
    page: IndirectObject,
    options: &'a ExtractOptions,
}

#[derive(Default)]
struct TextState {
    in_text: bool,
    font: Vec<u8>,
    baseline: f32,
    lines: Vec<String>,
    current: String,
}

impl TextState {
    fn end_line(&mut self, trim: bool) {
        let line = std::mem::take(&mut self.current);
        let line = if trim { line.trim().to_string() } else { line };
        if !line.is_empty() {
            self.lines.push(line);
        }
    }
}

impl<'a> TextExtractor<'a> {
    pub fn new(
        backend: &'a dyn PdfBackend,
        page: IndirectObject,
        options: &'a ExtractOptions,
    ) -> Self {
        Self {
            backend,
            page,
            options,
        }
    }

    /// Produce the page text, lines separated by `\n`.
    pub fn extract(&self, ops: &[ContentOp]) -> String {
        let trim = self.options.trim_lines;
        let mut state = TextState::default();

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.baseline = 0.0;
                }
                "ET" => {
                    state.in_text = false;
                    state.end_line(trim);
                }
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.font = name.as_bytes().to_vec();
                    }
                }
                "Td" | "TD" => {
                    let ty = op.operands.get(1).and_then(PdfValue::as_f32).unwrap_or(0.0);
                    if ty != 0.0 {
                        state.baseline += ty;
                        state.end_line(trim);
                    }
                }
                "Tm" => {
                    let f = op.operands.get(5).and_then(PdfValue::as_f32).unwrap_or(0.0);
                    if f != state.baseline {
                        state.baseline = f;
                        state.end_line(trim);
                    }
                }
                "T*" => state.end_line(trim),
                "Tj" if state.in_text => {
                    if let Some(PdfValue::String(bytes)) = op.operands.first() {
                        state.current.push_str(&self.decode(&state.font, bytes));
                    }
                }
                "TJ" if state.in_text => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        self.show_array(&mut state, items);
                    }
                }
                "'" | "\"" => {
                    state.end_line(trim);
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if state.in_text {
                        if let Some(PdfValue::String(bytes)) = op.operands.get(text_idx) {
                            state.current.push_str(&self.decode(&state.font, bytes));
                        }
                    }
                }
                _ => {}
            }
        }
        state.end_line(trim);

        let text = state.lines.join("\n");
        if self.options.normalize {
            text.nfc().collect()
        } else {
            text
        }
    }

    fn show_array(&self, state: &mut TextState, items: &[PdfValue]) {
        for item in items {
            match item {
                PdfValue::String(bytes) => {
                    state.current.push_str(&self.decode(&state.font, bytes));
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    // Negative adjustments move right; a large one is a word gap.
                    let adjustment = -item.as_f32().unwrap_or(0.0);
                    if adjustment > self.options.space_threshold
                        && !state.current.is_empty()
                        && !state.current.ends_with(char::is_whitespace)
                    {
                        state.current.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, font, bytes)
    }
}

//! Structured text extraction from page content streams.
//!
//! Interprets the text-positioning subset of the operator stream and yields
//! one span per show operator, with an approximate bounding box. The boxes
//! only need to be good enough to paint an opaque fill over the span, so
//! glyph widths are estimated from the font size rather than font metrics.

use lopdf::content::Operation;
use lopdf::Object;

/// Width of an average glyph as a fraction of the font size.
const AVG_GLYPH_WIDTH: f64 = 0.5;

/// Descender allowance below the baseline as a fraction of the font size.
const DESCENT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// One text-showing operator and where it paints.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub bbox: Rect,
    /// Index of the show operator within the page's operation list.
    pub op_index: usize,
}

struct TextState {
    font_size: f64,
    leading: f64,
    cursor: (f64, f64),
    line_start: (f64, f64),
}

impl TextState {
    fn new() -> Self {
        Self {
            font_size: 12.0,
            leading: 0.0,
            cursor: (0.0, 0.0),
            line_start: (0.0, 0.0),
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.line_start = (self.line_start.0 + tx, self.line_start.1 + ty);
        self.cursor = self.line_start;
    }

    fn next_line(&mut self) {
        self.line_start = (self.line_start.0, self.line_start.1 - self.leading);
        self.cursor = self.line_start;
    }
}

/// Walks the operations of one page and collects every text span.
pub fn extract_spans(operations: &[Operation]) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut st = TextState::new();

    for (idx, op) in operations.iter().enumerate() {
        match op.operator.as_str() {
            "BT" => {
                st.cursor = (0.0, 0.0);
                st.line_start = (0.0, 0.0);
            }
            "Tf" => {
                if let Some(size) = op.operands.get(1).and_then(number) {
                    st.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(number) {
                    st.leading = leading;
                }
            }
            "Tm" => {
                // Only the translation part matters for overlay boxes.
                let e = op.operands.get(4).and_then(number).unwrap_or(0.0);
                let f = op.operands.get(5).and_then(number).unwrap_or(0.0);
                st.cursor = (e, f);
                st.line_start = (e, f);
            }
            "Td" => {
                let tx = op.operands.first().and_then(number).unwrap_or(0.0);
                let ty = op.operands.get(1).and_then(number).unwrap_or(0.0);
                st.translate(tx, ty);
            }
            "TD" => {
                let tx = op.operands.first().and_then(number).unwrap_or(0.0);
                let ty = op.operands.get(1).and_then(number).unwrap_or(0.0);
                st.leading = -ty;
                st.translate(tx, ty);
            }
            "T*" => st.next_line(),
            "Tj" => {
                if let Some(text) = string_operand(op.operands.first()) {
                    push_span(&mut spans, &mut st, text, idx);
                }
            }
            "'" => {
                st.next_line();
                if let Some(text) = string_operand(op.operands.first()) {
                    push_span(&mut spans, &mut st, text, idx);
                }
            }
            "\"" => {
                st.next_line();
                if let Some(text) = string_operand(op.operands.get(2)) {
                    push_span(&mut spans, &mut st, text, idx);
                }
            }
            "TJ" => {
                if let Some(Object::Array(parts)) = op.operands.first() {
                    let text: String = parts
                        .iter()
                        .filter_map(|part| match part {
                            Object::String(bytes, _) => Some(decode_bytes(bytes)),
                            _ => None,
                        })
                        .collect();
                    if !text.is_empty() {
                        push_span(&mut spans, &mut st, text, idx);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

fn push_span(spans: &mut Vec<TextSpan>, st: &mut TextState, text: String, op_index: usize) {
    let width = text.chars().count() as f64 * AVG_GLYPH_WIDTH * st.font_size;
    let (x, y) = st.cursor;
    let bbox = Rect {
        x0: x,
        y0: y - DESCENT * st.font_size,
        x1: x + width,
        y1: y + st.font_size,
    };
    st.cursor.0 += width;
    spans.push(TextSpan { text, bbox, op_index });
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn string_operand(obj: Option<&Object>) -> Option<String> {
    match obj {
        Some(Object::String(bytes, _)) => Some(decode_bytes(bytes)),
        _ => None,
    }
}

/// Naive single-byte decode, matching the cheap extractor's treatment of
/// simple fonts. The watermark phrase is plain ASCII.
fn decode_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

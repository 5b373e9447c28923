//! White-fill redaction of watermark text spans.
//!
//! Two-step per page: `scan_page` marks matching spans, `apply` commits all
//! marks at once by dropping the matching show operators from the content
//! stream and painting an opaque rectangle over each marked box. Images are
//! untouched.

use std::collections::HashSet;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};

use crate::document::replace_page_content;
use crate::document::spans::{extract_spans, Rect};
use crate::error::Result;
use crate::scrub::pattern::TEXT_PATTERN;

/// Marked-up redactions for one page, ready to commit.
pub struct PageRedaction {
    page_id: ObjectId,
    drop_ops: HashSet<usize>,
    rects: Vec<Rect>,
}

impl PageRedaction {
    pub fn span_count(&self) -> usize {
        self.rects.len()
    }
}

/// Scans one page's spans against the watermark pattern. Returns `None`
/// when nothing on the page matches.
pub fn scan_page(doc: &Document, page_id: ObjectId) -> Result<Option<PageRedaction>> {
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    let spans = extract_spans(&content.operations);

    let mut drop_ops = HashSet::new();
    let mut rects = Vec::new();
    for span in spans {
        if TEXT_PATTERN.is_match(&span.text) {
            drop_ops.insert(span.op_index);
            rects.push(span.bbox);
        }
    }

    if rects.is_empty() {
        return Ok(None);
    }
    Ok(Some(PageRedaction {
        page_id,
        drop_ops,
        rects,
    }))
}

/// Commits all marks on a page in one pass. Returns the spans redacted.
pub fn apply(doc: &mut Document, plan: &PageRedaction) -> Result<usize> {
    let data = doc.get_page_content(plan.page_id)?;
    let content = Content::decode(&data)?;

    let mut operations = Vec::with_capacity(content.operations.len() + 5 * plan.rects.len());
    for (idx, op) in content.operations.into_iter().enumerate() {
        if plan.drop_ops.contains(&idx) {
            // The ' and " forms also advance the line; keep that movement
            // so the following text does not shift.
            if op.operator == "'" || op.operator == "\"" {
                operations.push(Operation::new("T*", vec![]));
            }
            continue;
        }
        operations.push(op);
    }

    for rect in &plan.rects {
        operations.extend(white_fill(rect));
    }

    let encoded = Content { operations }.encode()?;
    replace_page_content(doc, plan.page_id, encoded)?;
    Ok(plan.rects.len())
}

fn white_fill(rect: &Rect) -> Vec<Operation> {
    let x = rect.x0.floor() as i64;
    let y = rect.y0.floor() as i64;
    let w = (rect.x1 - rect.x0).ceil() as i64 + 1;
    let h = (rect.y1 - rect.y0).ceil() as i64 + 1;
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "rg",
            vec![Object::Integer(1), Object::Integer(1), Object::Integer(1)],
        ),
        Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

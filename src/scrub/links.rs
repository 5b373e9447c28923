//! Removal of hyperlink annotations pointing at the watermark domain.
//!
//! Links survive text redaction because they live in the page's annotation
//! array, not in the content stream; a cleaned page can still carry a
//! clickable rectangle. This pass deletes matching annotations outright.

use lopdf::{Document, Object, ObjectId};

use crate::document::resolve_dict;
use crate::error::Result;
use crate::scrub::pattern::uri_matches;

/// Where a page keeps its annotation array.
enum AnnotsHolder {
    /// `/Annots` is an inline array in the page dictionary.
    Inline(ObjectId),
    /// `/Annots` is a reference to an array object.
    Indirect(ObjectId),
}

struct AnnotEdit {
    holder: AnnotsHolder,
    kept: Vec<Object>,
    dropped_ids: Vec<ObjectId>,
    dropped: usize,
}

/// Deletes every link annotation whose action URI contains the watermark
/// domain. Returns the number of annotations removed.
pub fn strip_watermark_links(doc: &mut Document) -> Result<usize> {
    let mut edits: Vec<AnnotEdit> = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let page = match doc.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(_) => continue,
        };
        let annots_obj = match page.get(b"Annots") {
            Ok(obj) => obj,
            Err(_) => continue,
        };

        let (holder, entries) = match annots_obj {
            Object::Array(entries) => (AnnotsHolder::Inline(page_id), entries),
            Object::Reference(array_id) => {
                match doc.get_object(*array_id).and_then(|obj| obj.as_array()) {
                    Ok(entries) => (AnnotsHolder::Indirect(*array_id), entries),
                    Err(_) => continue,
                }
            }
            _ => continue,
        };

        let mut kept = Vec::with_capacity(entries.len());
        let mut dropped_ids = Vec::new();
        let mut dropped = 0;
        for entry in entries {
            if is_watermark_link(doc, entry) {
                dropped += 1;
                if let Ok(id) = entry.as_reference() {
                    dropped_ids.push(id);
                }
            } else {
                kept.push(entry.clone());
            }
        }

        if dropped > 0 {
            edits.push(AnnotEdit {
                holder,
                kept,
                dropped_ids,
                dropped,
            });
        }
    }

    let mut removed = 0;
    for edit in edits {
        match edit.holder {
            AnnotsHolder::Inline(page_id) => {
                let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
                page.set("Annots", edit.kept);
            }
            AnnotsHolder::Indirect(array_id) => {
                if let Some(slot) = doc.objects.get_mut(&array_id) {
                    *slot = Object::Array(edit.kept);
                }
            }
        }
        for id in edit.dropped_ids {
            doc.objects.remove(&id);
        }
        removed += edit.dropped;
    }

    Ok(removed)
}

fn is_watermark_link(doc: &Document, entry: &Object) -> bool {
    let annot = match resolve_dict(doc, entry) {
        Some(dict) => dict,
        None => return false,
    };

    let is_link = annot
        .get(b"Subtype")
        .ok()
        .and_then(|obj| match obj {
            Object::Name(name) => Some(name.as_slice() == &b"Link"[..]),
            _ => None,
        })
        .unwrap_or(false);
    if !is_link {
        return false;
    }

    let action = match annot.get(b"A").ok().and_then(|obj| resolve_dict(doc, obj)) {
        Some(dict) => dict,
        None => return false,
    };

    match action.get(b"URI").map(|obj| crate::document::resolve(doc, obj)) {
        Ok(Object::String(bytes, _)) => uri_matches(&String::from_utf8_lossy(bytes)),
        _ => false,
    }
}

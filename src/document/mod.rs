//! PDF capability wrapper over `lopdf`.
//!
//! The rest of the crate consumes documents through this module: open,
//! enumerate pages, extract text (plain and structured), and save with
//! structural cleanup and stream compression.

pub mod spans;

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::Result;

/// An open PDF plus the path it came from.
pub struct PdfFile {
    doc: Document,
    path: PathBuf,
}

impl PdfFile {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Page numbers and object ids in document order.
    pub fn pages(&self) -> Vec<(u32, ObjectId)> {
        self.doc.get_pages().into_iter().collect()
    }

    /// Cheap plain-text extraction for one page, via the library's naive
    /// decoder. Used as the pre-check before the structured span scan.
    pub fn plain_text(&self, page_no: u32) -> Result<String> {
        Ok(self.doc.extract_text(&[page_no])?)
    }

    /// Whether any page yields non-whitespace text. Gates OCR.
    pub fn has_any_text(&self) -> bool {
        self.doc
            .get_pages()
            .keys()
            .any(|page_no| match self.doc.extract_text(&[*page_no]) {
                Ok(text) => !text.trim().is_empty(),
                Err(_) => false,
            })
    }

    /// Saves with unreferenced objects pruned and streams compressed.
    pub fn save_clean(&mut self, path: &Path) -> Result<()> {
        self.doc.prune_objects();
        self.doc.compress();
        self.doc.save(path)?;
        Ok(())
    }
}

/// Follows a reference one level; non-references come back unchanged.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Resolves an object (or reference) to a dictionary, if it is one.
pub(crate) fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, obj).as_dict().ok()
}

/// Swaps in a fresh content stream for a page. The previous stream objects
/// become unreferenced and fall out at the next `save_clean`.
pub(crate) fn replace_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    data: Vec<u8>,
) -> Result<()> {
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), data));
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Reference(stream_id));
    Ok(())
}

//! Shared fixture helpers: minimal one-page PDFs built with lopdf.
#![allow(dead_code)]

use std::path::Path;

use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// Page content carrying the watermark phrase plus one normal line.
pub const WATERMARKED_CONTENT: &[u8] =
    b"BT /F1 12 Tf 72 720 Td (OceanofPDF.com) Tj 0 -40 Td (In my younger years) Tj ET";

/// Page content with no watermark anywhere.
pub const CLEAN_CONTENT: &[u8] = b"BT /F1 12 Tf 72 720 Td (Chapter One) Tj ET";

/// Builds a single-page document; `link_uri` adds one link annotation.
pub fn build_pdf(content: &[u8], link_uri: Option<&str>) -> Document {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));

    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id),
        },
    };

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];
    let mut page_dict = dictionary! {
        "Type" => "Page",
        "MediaBox" => media_box,
        "Contents" => Object::Reference(content_id),
        "Resources" => resources,
    };

    if let Some(uri) = link_uri {
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![
                Object::Integer(72),
                Object::Integer(700),
                Object::Integer(200),
                Object::Integer(735),
            ],
            "A" => dictionary! {
                "Type" => "Action",
                "S" => "URI",
                "URI" => Object::String(uri.as_bytes().to_vec(), StringFormat::Literal),
            },
        });
        page_dict.set("Annots", vec![Object::Reference(annot_id)]);
    }

    let page_id = doc.add_object(page_dict);

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });

    if let Ok(page_obj) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page_obj.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

pub fn write_pdf(path: &Path, content: &[u8], link_uri: Option<&str>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut doc = build_pdf(content, link_uri);
    doc.save(path).unwrap();
}

/// True when any text span in the document still matches the watermark.
pub fn has_watermark_spans(path: &Path) -> bool {
    let doc = Document::load(path).unwrap();
    for (_, page_id) in doc.get_pages() {
        let data = doc.get_page_content(page_id).unwrap();
        let content = lopdf::content::Content::decode(&data).unwrap();
        let spans = pdfsweep::document::spans::extract_spans(&content.operations);
        if spans
            .iter()
            .any(|span| pdfsweep::scrub::pattern::TEXT_PATTERN.is_match(&span.text))
        {
            return true;
        }
    }
    false
}

/// Number of annotations left across all pages.
pub fn annotation_count(path: &Path) -> usize {
    let doc = Document::load(path).unwrap();
    let mut count = 0;
    for (_, page_id) in doc.get_pages() {
        let page = match doc.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(_) => continue,
        };
        let annots = match page.get(b"Annots") {
            Ok(Object::Array(entries)) => entries.len(),
            Ok(Object::Reference(id)) => doc
                .get_object(*id)
                .ok()
                .and_then(|obj| obj.as_array().ok())
                .map(|entries| entries.len())
                .unwrap_or(0),
            _ => 0,
        };
        count += annots;
    }
    count
}

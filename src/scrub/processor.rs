//! Per-document content transform with atomic file replacement.
//!
//! All mutation happens on a sibling temp file until the final rename, so a
//! failure anywhere leaves the original bytes and timestamps untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::PdfFile;
use crate::error::Result;
use crate::fsops::timestamps::FileTimes;
use crate::scrub::links::strip_watermark_links;
use crate::scrub::pattern::TEXT_PATTERN;
use crate::scrub::redact;

/// What one content pass did to one document.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOutcome {
    pub changed: bool,
    pub text_hits: usize,
    pub link_hits: usize,
}

impl CleanOutcome {
    pub fn hits(&self) -> usize {
        self.text_hits + self.link_hits
    }
}

/// Runs the link and text passes over one file and swaps the cleaned copy
/// over the original. In dry-run mode the counts are reported and nothing
/// is written.
pub fn process_pdf(path: &Path, links_only: bool, dry_run: bool) -> Result<CleanOutcome> {
    let temp = temp_path(path);
    match clean_and_swap(path, &temp, links_only, dry_run) {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if temp.exists() {
                let _ = fs::remove_file(&temp);
            }
            Err(err)
        }
    }
}

fn clean_and_swap(path: &Path, temp: &Path, links_only: bool, dry_run: bool) -> Result<CleanOutcome> {
    let times = FileTimes::capture(path);
    let mut pdf = PdfFile::load(path)?;

    let link_hits = strip_watermark_links(pdf.doc_mut())?;

    let mut text_hits = 0;
    if !links_only {
        for (page_no, page_id) in pdf.pages() {
            if !page_needs_scan(&pdf, page_no) {
                continue;
            }
            if let Some(plan) = redact::scan_page(pdf.doc(), page_id)? {
                text_hits += redact::apply(pdf.doc_mut(), &plan)?;
            }
        }
    }

    let outcome = CleanOutcome {
        changed: text_hits + link_hits > 0,
        text_hits,
        link_hits,
    };

    if dry_run {
        return Ok(outcome);
    }

    if !outcome.changed {
        // a stray temp from an earlier interrupted run
        if temp.exists() {
            fs::remove_file(temp)?;
        }
        return Ok(outcome);
    }

    pdf.save_clean(temp)?;
    drop(pdf);

    // same-volume rename, atomic on the filesystems we care about
    fs::rename(temp, path)?;
    times.restore(path);

    debug!(
        "cleaned {}: {} text spans, {} links",
        path.display(),
        text_hits,
        link_hits
    );
    Ok(outcome)
}

/// Cheap pre-check: only pages whose plain text trips the pattern get the
/// expensive span scan. A failed extraction falls through to the scan.
fn page_needs_scan(pdf: &PdfFile, page_no: u32) -> bool {
    match pdf.plain_text(page_no) {
        Ok(text) => TEXT_PATTERN.is_match(&text),
        Err(_) => true,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_a_sibling_with_tmp_suffix() {
        let temp = temp_path(Path::new("/library/book.pdf"));
        assert_eq!(temp, PathBuf::from("/library/book.pdf.tmp"));
    }
}

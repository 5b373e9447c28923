//! OCR invocation through the external `ocrmypdf` executable.
//!
//! Documents that already carry extractable text are left alone. Everything
//! here is best-effort: a missing executable or a failed run is logged and
//! the file keeps its non-searchable content.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::document::PdfFile;
use crate::error::{Error, Result};
use crate::fsops::timestamps::FileTimes;

/// Makes a document text-searchable, replacing it in place.
///
/// Returns `true` when the file ends up searchable (either it already was,
/// or OCR succeeded), `false` on any failure.
pub async fn ocr_pdf(path: &Path) -> bool {
    match ensure_searchable(path).await {
        Ok(applied) => {
            if applied {
                debug!("OCR applied to {}", path.display());
            } else {
                debug!("{} already has text, OCR skipped", path.display());
            }
            true
        }
        Err(err) => {
            warn!("OCR failed for {}: {}", path.display(), err);
            false
        }
    }
}

/// Returns whether OCR actually ran (false means the text was already there).
async fn ensure_searchable(path: &Path) -> Result<bool> {
    {
        let pdf = PdfFile::load(path)?;
        if pdf.has_any_text() {
            return Ok(false);
        }
    }

    let temp = ocr_temp_path(path);
    let run = run_ocrmypdf(path, &temp).await;
    if run.is_err() && temp.exists() {
        let _ = fs::remove_file(&temp);
    }
    run?;

    let times = FileTimes::capture(path);
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    times.restore(path);
    Ok(true)
}

async fn run_ocrmypdf(input: &Path, output: &Path) -> Result<()> {
    let status = Command::new("ocrmypdf")
        .arg("--skip-text")
        .arg("--optimize")
        .arg("1")
        .arg("--output-type")
        .arg("pdf")
        .arg("--quiet")
        .arg(input)
        .arg(output)
        .status()
        .await
        .map_err(|err| Error::Ocr(format!("could not launch ocrmypdf: {}", err)))?;

    if !status.success() {
        return Err(Error::Ocr(format!("ocrmypdf exited with {}", status)));
    }
    Ok(())
}

fn ocr_temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(".ocr.pdf");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_temp_path_is_a_sibling() {
        assert_eq!(
            ocr_temp_path(Path::new("/shelf/book.pdf")),
            PathBuf::from("/shelf/book.ocr.pdf")
        );
    }

    #[tokio::test]
    async fn unreadable_input_reports_failure() {
        assert!(!ocr_pdf(Path::new("/no/such/file.pdf")).await);
    }
}

//! Per-file orchestration: transform, rename, OCR, staging, bookkeeping.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde_json::json;
use tracing::warn;

use crate::config::RunConfig;
use crate::journal::{EventKind, Journal};
use crate::ocr::ocr_pdf;
use crate::rename::executor::rename_if_needed;
use crate::scrub::processor::process_pdf;
use crate::staging::stage_for_upload;

/// Sink for per-file outcome lines. Lines go through the live progress bar
/// when one is up so they do not tear it.
pub enum Reporter {
    Plain,
    Bar(ProgressBar),
}

impl Reporter {
    pub fn line(&self, msg: impl AsRef<str>) {
        match self {
            Reporter::Plain => println!("{}", msg.as_ref()),
            Reporter::Bar(pb) => pb.println(msg.as_ref()),
        }
    }
}

/// Outcome record for one file; aggregated by the batch driver.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub cleaned: u32,
    pub renamed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub ocr: u32,
    pub uploaded: u32,
    pub error: Option<String>,
    pub original_name: Option<String>,
}

impl FileOutcome {
    fn failure(original_name: &str, error: String) -> Self {
        Self {
            failed: 1,
            error: Some(error),
            original_name: Some(original_name.to_string()),
            ..Self::default()
        }
    }
}

/// Runs the full per-file sequence. Transform and rename failures
/// short-circuit into a failure outcome; OCR, staging and journal problems
/// are logged but never fail the file.
pub async fn process_single_pdf(
    pdf: &Path,
    config: &RunConfig,
    mut journal: Option<&mut Journal>,
    reporter: &Reporter,
) -> FileOutcome {
    let original_name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf.display().to_string());

    // resume check comes first so skipped files cost nothing
    if let Some(journal) = journal.as_deref_mut() {
        if journal.is_processed(pdf) {
            reporter.line(format!("⏭️  Skipped (already processed): {}", original_name));
            journal.record(
                EventKind::Skipped,
                pdf,
                json!({"reason": "already_processed"}),
            );
            return FileOutcome {
                skipped: 1,
                ..FileOutcome::default()
            };
        }
    }

    let outcome = match process_pdf(pdf, config.links_only, config.dry_run) {
        Ok(outcome) => outcome,
        Err(err) => {
            let error = err.to_string();
            reporter.line(format!("‼️ Failed: {} | {}", original_name, error));
            if let Some(journal) = journal.as_deref_mut() {
                journal.record(
                    EventKind::Failed,
                    pdf,
                    json!({"error": error.clone(), "stage": "cleaning"}),
                );
            }
            return FileOutcome::failure(&original_name, error);
        }
    };

    let mut did_rename = false;
    let mut new_path: PathBuf = pdf.to_path_buf();
    if !config.no_rename {
        match rename_if_needed(pdf, config.dry_run, config.rename_retries).await {
            Ok((renamed, path)) => {
                did_rename = renamed;
                new_path = path;
            }
            Err(err) => {
                let error = err.to_string();
                reporter.line(format!("‼️ Rename failed: {} | {}", original_name, error));
                if let Some(journal) = journal.as_deref_mut() {
                    journal.record(
                        EventKind::Failed,
                        pdf,
                        json!({"error": error.clone(), "stage": "renaming"}),
                    );
                }
                return FileOutcome::failure(&original_name, error);
            }
        }
    }

    let mut result = FileOutcome {
        renamed: u32::from(did_rename),
        ..FileOutcome::default()
    };

    if outcome.changed {
        result.cleaned = 1;
        let status = if config.dry_run { "Would clean" } else { "Cleaned" };
        let rename_note = if did_rename {
            format!(" & Renamed -> {}", new_path.file_name().unwrap_or_default().to_string_lossy())
        } else {
            String::new()
        };
        reporter.line(format!(
            "♻️ {}: {} (hits={}){}",
            status,
            original_name,
            outcome.hits(),
            rename_note
        ));
        if let Some(journal) = journal.as_deref_mut() {
            journal.record(
                EventKind::Cleaned,
                &new_path,
                json!({
                    "original_name": original_name,
                    "text_hits": outcome.text_hits,
                    "link_hits": outcome.link_hits,
                    "renamed": did_rename,
                }),
            );
        }
    } else if did_rename {
        let status = if config.dry_run { "Would rename" } else { "Renamed" };
        reporter.line(format!(
            "ℹ️ {}: {} -> {}",
            status,
            original_name,
            new_path.file_name().unwrap_or_default().to_string_lossy()
        ));
        if let Some(journal) = journal.as_deref_mut() {
            journal.record(
                EventKind::Renamed,
                &new_path,
                json!({"original_name": original_name}),
            );
        }
    }

    if config.ocr && !config.dry_run {
        let success = ocr_pdf(&new_path).await;
        if success {
            result.ocr = 1;
            reporter.line(format!(
                "🔍 OCR processed: {}",
                new_path.file_name().unwrap_or_default().to_string_lossy()
            ));
        }
        if let Some(journal) = journal.as_deref_mut() {
            journal.record(EventKind::Ocr, &new_path, json!({"success": success}));
        }
    }

    if let Some(notebook) = &config.staging_notebook {
        if !config.dry_run {
            match stage_for_upload(&new_path, notebook) {
                Ok(dest) => {
                    result.uploaded = 1;
                    reporter.line(format!("☁️ Staged for upload: {}", dest.display()));
                    if let Some(journal) = journal.as_deref_mut() {
                        journal.record(
                            EventKind::Upload,
                            &new_path,
                            json!({"notebook": notebook, "success": true}),
                        );
                    }
                }
                Err(err) => {
                    warn!("staging copy failed for {}: {}", new_path.display(), err);
                    if let Some(journal) = journal.as_deref_mut() {
                        journal.record(
                            EventKind::Upload,
                            &new_path,
                            json!({"notebook": notebook, "success": false}),
                        );
                    }
                }
            }
        }
    }

    if !config.dry_run {
        if let Some(journal) = journal.as_deref_mut() {
            journal.mark_processed(&new_path);
        }
    }

    result
}

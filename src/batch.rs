//! Batch driver: discovery, iteration, counters and the end-of-run summary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::fsops::walk::{collect_pdfs, stream_pdfs};
use crate::journal::Journal;
use crate::process::{process_single_pdf, FileOutcome, Reporter};
use crate::error::Result;

const TICK_MS: u64 = 80;
const ERROR_LIST_CAP: usize = 10;
const FOLDER_DISPLAY_WIDTH: usize = 80;

/// Run-level counters plus the error-text → filenames grouping.
#[derive(Debug, Default)]
pub struct RunStats {
    pub processed: u64,
    pub cleaned: u64,
    pub renamed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub ocr: u64,
    pub uploaded: u64,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl RunStats {
    pub fn absorb(&mut self, outcome: FileOutcome) {
        self.processed += 1;
        self.cleaned += u64::from(outcome.cleaned);
        self.renamed += u64::from(outcome.renamed);
        self.failed += u64::from(outcome.failed);
        self.skipped += u64::from(outcome.skipped);
        self.ocr += u64::from(outcome.ocr);
        self.uploaded += u64::from(outcome.uploaded);

        if outcome.failed > 0 {
            let error = outcome.error.unwrap_or_else(|| "unknown error".into());
            let name = outcome.original_name.unwrap_or_else(|| "?".into());
            self.errors.entry(error).or_default().push(name);
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            2
        } else {
            0
        }
    }
}

pub struct BatchDriver {
    config: RunConfig,
    cancel: CancelToken,
    journal: Option<Journal>,
}

impl BatchDriver {
    pub fn new(config: RunConfig, cancel: CancelToken) -> Result<Self> {
        let journal = match &config.log_dir {
            Some(dir) => {
                let journal = Journal::open(dir)?;
                println!("✓ Logging enabled: {}", journal.log_path().display());
                println!("✓ Resume file: {}", journal.resume_path().display());
                Some(journal)
            }
            None => None,
        };

        Ok(Self {
            config,
            cancel,
            journal,
        })
    }

    /// Processes every candidate under the targets and prints the summary.
    /// Returns the process exit code.
    pub async fn run(&mut self, targets: &[PathBuf]) -> i32 {
        let stats = if self.config.no_progress {
            self.run_streaming(targets).await
        } else {
            self.run_eager(targets).await
        };

        self.print_summary(&stats);
        stats.exit_code()
    }

    /// Streaming mode: process each file the moment it is found.
    async fn run_streaming(&mut self, targets: &[PathBuf]) -> RunStats {
        println!("Starting streaming processing...\n");

        let mut stats = RunStats::default();
        let reporter = Reporter::Plain;
        let mut current_folder: Option<PathBuf> = None;

        for target in targets {
            for pdf in stream_pdfs(target, self.cancel.clone()) {
                if let Some(folder) = pdf.parent() {
                    if current_folder.as_deref() != Some(folder) {
                        current_folder = Some(folder.to_path_buf());
                        println!("\nProcessing folder: {}", shorten(folder));
                    }
                }

                let outcome =
                    process_single_pdf(&pdf, &self.config, self.journal.as_mut(), &reporter).await;
                stats.absorb(outcome);
            }
        }

        stats
    }

    /// Standard mode: scan everything first, then process behind a bar with
    /// local files ahead of cloud-synced ones.
    async fn run_eager(&mut self, targets: &[PathBuf]) -> RunStats {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(TICK_MS));
        spinner.set_message("Scanning for PDFs...");

        let scan = collect_pdfs(
            targets,
            &self.config.cloud_patterns,
            &self.cancel,
            Some(&spinner),
        );
        spinner.finish_and_clear();

        let status = if self.cancel.is_cancelled() {
            "aborted"
        } else {
            "complete"
        };
        println!("✓ Scan {}: {} PDFs found", status, scan.total());
        if !scan.cloud.is_empty() {
            println!(
                "ℹ️  {} cloud-synced files will be processed last",
                scan.cloud.len()
            );
        }

        let candidates = scan.into_ordered();
        let mut stats = RunStats::default();

        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(bar_style());
        pb.enable_steady_tick(Duration::from_millis(TICK_MS));
        let reporter = Reporter::Bar(pb.clone());

        for pdf in candidates {
            pb.set_message(
                pdf.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            let outcome =
                process_single_pdf(&pdf, &self.config, self.journal.as_mut(), &reporter).await;
            stats.absorb(outcome);
            pb.inc(1);
        }
        pb.finish_and_clear();

        stats
    }

    fn print_summary(&self, stats: &RunStats) {
        let mode = if self.config.dry_run { "DRY RUN" } else { "DONE" };
        println!(
            "\n{}: {} processed | {} cleaned | {} renamed | {} failed",
            mode, stats.processed, stats.cleaned, stats.renamed, stats.failed
        );
        if stats.skipped > 0 {
            println!("  ↳ {} skipped (already processed)", stats.skipped);
        }
        if stats.ocr > 0 {
            println!("  ↳ {} OCR processed", stats.ocr);
        }
        if stats.uploaded > 0 {
            println!("  ↳ {} staged for upload", stats.uploaded);
        }

        if !stats.errors.is_empty() {
            println!("\nFailure summary:");
            for (reason, files) in &stats.errors {
                println!("\n{}", reason);
                for file in files.iter().take(ERROR_LIST_CAP) {
                    println!("  - {}", file);
                }
                if files.len() > ERROR_LIST_CAP {
                    println!("  ... and {} more", files.len() - ERROR_LIST_CAP);
                }
            }
        }

        if let Some(journal) = &self.journal {
            println!("\n📋 Log file: {}", journal.log_path().display());
            println!("📋 Resume file: {}", journal.resume_path().display());
        }

        info!(
            "run finished: {} processed, {} failed",
            stats.processed, stats.failed
        );
    }
}

/// Keeps folder lines to one terminal row, trimming from the left.
fn shorten(path: &Path) -> String {
    let text = path.display().to_string();
    if text.len() <= FOLDER_DISPLAY_WIDTH {
        return text;
    }
    let tail_start = text.len() - (FOLDER_DISPLAY_WIDTH - 3);
    // back off to a char boundary in case the cut lands mid-codepoint
    let mut start = tail_start;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(" {spinner} {msg}")
        .unwrap()
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("Processing {msg:<24} [{bar:30}] {pos}/{len} | ETA {eta}")
        .unwrap()
        .progress_chars("=>-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_absorb_counts_and_groups_errors() {
        let mut stats = RunStats::default();
        stats.absorb(FileOutcome {
            cleaned: 1,
            renamed: 1,
            ..FileOutcome::default()
        });
        stats.absorb(FileOutcome {
            failed: 1,
            error: Some("broken xref".into()),
            original_name: Some("a.pdf".into()),
            ..FileOutcome::default()
        });
        stats.absorb(FileOutcome {
            failed: 1,
            error: Some("broken xref".into()),
            original_name: Some("b.pdf".into()),
            ..FileOutcome::default()
        });

        assert_eq!(stats.processed, 3);
        assert_eq!(stats.cleaned, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors["broken xref"], vec!["a.pdf", "b.pdf"]);
        assert_eq!(stats.exit_code(), 2);
    }

    #[test]
    fn exit_code_is_zero_without_failures() {
        let mut stats = RunStats::default();
        stats.absorb(FileOutcome::default());
        assert_eq!(stats.exit_code(), 0);
    }

    #[test]
    fn shorten_keeps_short_paths_and_trims_long_ones() {
        assert_eq!(shorten(Path::new("/short/path")), "/short/path");

        let long = format!("/{}", "x".repeat(120));
        let shortened = shorten(Path::new(&long));
        assert_eq!(shortened.len(), FOLDER_DISPLAY_WIDTH);
        assert!(shortened.starts_with("..."));
    }
}

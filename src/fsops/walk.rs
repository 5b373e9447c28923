//! PDF discovery: eager bucketed collection and a streaming walk.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::cancel::CancelToken;
use crate::fsops::cloud::is_cloud_path;

/// Result of an eager scan: local files first, cloud-synced files last.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub local: Vec<PathBuf>,
    pub cloud: Vec<PathBuf>,
}

impl ScanOutcome {
    pub fn total(&self) -> usize {
        self.local.len() + self.cloud.len()
    }

    /// All candidates in processing order (local before cloud).
    pub fn into_ordered(self) -> Vec<PathBuf> {
        let mut all = self.local;
        all.extend(self.cloud);
        all
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Walks every target up front, bucketing candidates by cloud
/// classification. The spinner, when given, shows the directory currently
/// being scanned and the running count.
pub fn collect_pdfs(
    targets: &[PathBuf],
    cloud_patterns: &[String],
    cancel: &CancelToken,
    spinner: Option<&ProgressBar>,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for target in targets {
        if cancel.is_cancelled() {
            break;
        }

        if target.is_file() {
            if is_pdf(target) {
                bucket(&mut outcome, target.clone(), cloud_patterns);
                report(spinner, target.parent().unwrap_or(target), outcome.total());
            }
            continue;
        }

        for entry in WalkDir::new(target).into_iter().filter_map(|e| e.ok()) {
            if cancel.is_cancelled() {
                break;
            }
            if entry.file_type().is_dir() {
                report(spinner, entry.path(), outcome.total());
                continue;
            }
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                bucket(&mut outcome, entry.into_path(), cloud_patterns);
            }
        }
    }

    outcome
}

fn bucket(outcome: &mut ScanOutcome, path: PathBuf, cloud_patterns: &[String]) {
    if is_cloud_path(&path, cloud_patterns) {
        outcome.cloud.push(path);
    } else {
        outcome.local.push(path);
    }
}

fn report(spinner: Option<&ProgressBar>, dir: &Path, found: usize) {
    if let Some(pb) = spinner {
        pb.set_message(format!("Scanning {} | PDFs: {}", dir.display(), found));
    }
}

/// Lazily yields each PDF under one target as it is found, depth-first.
/// The cancellation token is polled at every directory and file boundary;
/// candidates already yielded are unaffected by a later cancel.
pub fn stream_pdfs(target: &Path, cancel: CancelToken) -> Box<dyn Iterator<Item = PathBuf>> {
    if target.is_file() {
        let path = target.to_path_buf();
        let hit = is_pdf(&path).then_some(path);
        return Box::new(hit.into_iter());
    }

    if target.is_dir() {
        let iter = WalkDir::new(target)
            .into_iter()
            .take_while(move |_| !cancel.is_cancelled())
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_pdf(path));
        return Box::new(iter);
    }

    Box::new(std::iter::empty())
}

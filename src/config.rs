//! Run configuration assembled from CLI flags plus an optional overlay file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Folder-name fragments that mark a path as managed by a sync client.
///
/// `sync` and `cloud` are generic and will match unrelated folders such as
/// "Synchronize Backups"; that imprecision is accepted, the classification
/// only decides processing order and rename retries.
pub const DEFAULT_CLOUD_PATTERNS: &[&str] = &[
    "onedrive",
    "dropbox",
    "google drive",
    "crossdevice",
    "icloud",
    "box sync",
    "sync",
    "cloud",
];

/// Attempts for a rename that trips over a busy sync client.
pub const DEFAULT_RENAME_RETRIES: u32 = 3;

/// Global settings for one sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Report what would change without writing anything.
    pub dry_run: bool,
    /// Skip text redaction, remove matching hyperlinks only.
    pub links_only: bool,
    /// Skip filename normalization.
    pub no_rename: bool,
    /// Streaming mode: process files as found, no progress bar.
    pub no_progress: bool,
    /// Directory for the event log and resume set; `None` disables both.
    pub log_dir: Option<PathBuf>,
    /// Run `ocrmypdf` on documents without extractable text.
    pub ocr: bool,
    /// Staging notebook name for the upload stub.
    pub staging_notebook: Option<String>,
    /// Lower-cased substrings that classify a path as cloud-synced.
    pub cloud_patterns: Vec<String>,
    /// Retry budget for cloud-busy rename errors.
    pub rename_retries: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            links_only: false,
            no_rename: false,
            no_progress: false,
            log_dir: None,
            ocr: false,
            staging_notebook: None,
            cloud_patterns: DEFAULT_CLOUD_PATTERNS.iter().map(|s| s.to_string()).collect(),
            rename_retries: DEFAULT_RENAME_RETRIES,
        }
    }
}

/// File-backed overrides for the heuristic knobs (JSON or YAML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    pub cloud_patterns: Option<Vec<String>>,
    pub rename_retries: Option<u32>,
}

impl ConfigOverlay {
    /// Loads an overlay file, trying JSON first and YAML second.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

impl RunConfig {
    /// Applies a loaded overlay. Cloud patterns are lower-cased here so the
    /// classifier can match with plain substring containment.
    pub fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(patterns) = overlay.cloud_patterns {
            self.cloud_patterns = patterns.into_iter().map(|p| p.to_lowercase()).collect();
        }
        if let Some(retries) = overlay.rename_retries {
            self.rename_retries = retries;
        }
    }
}

//! Append-only event log and resume set.
//!
//! Both files live in the directory given by `--log`. The event log is one
//! JSON record per line, timestamped per event. The resume set is its own
//! append-only file, one JSON-encoded absolute path per line, replayed into
//! memory at startup; processed files seen there are skipped on later runs.
//! Every write here is best-effort: a journal failure never fails the file
//! that was just processed.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{JournalError, Result};

/// What happened to a file, as recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Cleaned,
    Renamed,
    Failed,
    Skipped,
    Ocr,
    Upload,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventRecord {
    timestamp: String,
    event: EventKind,
    file: String,
    details: Value,
}

pub struct Journal {
    log_path: PathBuf,
    resume_path: PathBuf,
    processed: HashSet<String>,
}

impl Journal {
    /// Opens (creating if needed) the journal directory, starts a fresh
    /// event log for this run and replays the resume set.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| JournalError::CreateDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("sweep_{}.jsonl", stamp));
        let resume_path = dir.join("processed.jsonl");
        let processed = load_resume_set(&resume_path);

        if !processed.is_empty() {
            info!(
                "loaded {} previously processed files, they will be skipped",
                processed.len()
            );
        }

        Ok(Self {
            log_path,
            resume_path,
            processed,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn resume_path(&self) -> &Path {
        &self.resume_path
    }

    pub fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(&absolute_key(path))
    }

    /// Appends one event record. Failures are logged and swallowed.
    pub fn record(&self, event: EventKind, path: &Path, details: Value) {
        let record = EventRecord {
            timestamp: Local::now().to_rfc3339(),
            event,
            file: absolute_key(path),
            details,
        };
        if let Err(err) = append_json_line(&self.log_path, &record) {
            warn!("event log write failed: {}", err);
        }
    }

    /// Adds a path to the resume set and appends it to the resume file.
    pub fn mark_processed(&mut self, path: &Path) {
        let key = absolute_key(path);
        if !self.processed.insert(key.clone()) {
            return;
        }
        if let Err(err) = append_json_line(&self.resume_path, &key) {
            warn!("resume file write failed: {}", err);
        }
    }
}

fn absolute_key(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    absolute.to_string_lossy().into_owned()
}

fn load_resume_set(path: &Path) -> HashSet<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return HashSet::new(),
    };

    let mut set = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("resume file read stopped early: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<String>(&line) {
            Ok(entry) => {
                set.insert(entry);
            }
            Err(err) => warn!("skipping malformed resume entry: {}", err),
        }
    }
    set
}

fn append_json_line<T: Serialize>(path: &Path, value: &T) -> std::result::Result<(), JournalError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JournalError::Append {
            file: path.to_path_buf(),
            source,
        })?;
    let line = serde_json::to_string(value).unwrap_or_default();
    writeln!(file, "{}", line).map_err(|source| JournalError::Append {
        file: path.to_path_buf(),
        source,
    })
}

//! Error types for the sweep pipeline.

use std::io;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

/// Custom result type for sweep operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for sweep operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("rename error: {0}")]
    Rename(#[from] RenameError),

    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// -------------------- Sub-Error Categories --------------------

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenameError {
    #[error("rename gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("rename failed: {0}")]
    Os(#[from] io::Error),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum JournalError {
    #[error("could not create log directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {file}: {source}")]
    Append {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

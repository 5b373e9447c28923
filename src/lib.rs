//! pdfsweep — batch watermark scrubbing and filename normalization for
//! ebook PDFs.
//!
//! The pipeline is strictly sequential: discover candidates, clean each
//! document in place (link removal plus text redaction behind an atomic
//! temp-and-swap), then normalize its filename. Flag-gated extras add a
//! resumable journal, OCR through `ocrmypdf`, and a staging-copy upload
//! stub.

// Configuration and errors
pub mod config;
pub mod error;

// PDF capability wrapper
pub mod document;

// Content transform: watermark links and text spans
pub mod scrub {
    pub mod links;
    pub mod pattern;
    pub mod processor;
    pub mod redact;
}

// Filesystem concerns: discovery, classification, timestamps
pub mod fsops {
    pub mod cloud;
    pub mod timestamps;
    pub mod walk;
}

// Filename normalization
pub mod rename {
    pub mod executor;
    pub mod rules;
}

// Run orchestration
pub mod batch;
pub mod cancel;
pub mod journal;
pub mod ocr;
pub mod process;
pub mod staging;

// Re-exports for crate consumers
pub use batch::{BatchDriver, RunStats};
pub use cancel::CancelToken;
pub use config::{ConfigOverlay, RunConfig};
pub use error::{Error, Result};
pub use journal::{EventKind, Journal};
pub use process::{process_single_pdf, FileOutcome};
pub use scrub::processor::{process_pdf, CleanOutcome};

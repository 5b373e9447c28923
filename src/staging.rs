//! Staging-folder "upload" stub.
//!
//! The notebook service has no public API; finished files are copied into a
//! per-notebook staging directory under the home directory for a later
//! manual upload.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Copies a finished file into `~/notebooklm_staging/<notebook>/`,
/// creating the directory as needed. Returns the staged path.
pub fn stage_for_upload(path: &Path, notebook: &str) -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("home directory could not be determined".into()))?;
    stage_into(&home.join("notebooklm_staging"), path, notebook)
}

fn stage_into(staging_root: &Path, path: &Path, notebook: &str) -> Result<PathBuf> {
    let dir = staging_root.join(notebook);
    fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("{} has no file name", path.display())))?;
    let dest = dir.join(file_name);
    fs::copy(path, &dest)?;
    Ok(dest)
}

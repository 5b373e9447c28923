//! Rename execution with retries for busy sync clients.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::{RenameError, Result};
use crate::fsops::timestamps::FileTimes;
use crate::rename::rules::compute_rename;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Computes and performs the normalization rename for one file.
///
/// Returns `(did_rename, final_path)`. In dry-run mode the collision-free
/// candidate is reported but never reserved; a later real run may pick a
/// different suffix if the directory changed in between.
///
/// OS errors whose message looks like a sync-client stall are retried up to
/// `retries` total attempts with a fixed delay; anything else propagates on
/// the first failure.
pub async fn rename_if_needed(
    path: &Path,
    dry_run: bool,
    retries: u32,
) -> Result<(bool, PathBuf)> {
    let new_path = match compute_rename(path) {
        Some(p) => p,
        None => return Ok((false, path.to_path_buf())),
    };

    let times = FileTimes::capture(path);

    if dry_run {
        return Ok((true, new_path));
    }

    let mut attempt = 0u32;
    loop {
        match fs::rename(path, &new_path) {
            Ok(()) => {
                times.restore(&new_path);
                return Ok((true, new_path));
            }
            Err(err) => {
                attempt += 1;
                if is_cloud_busy(&err) {
                    if attempt < retries {
                        debug!(
                            "rename of {} hit a sync stall (attempt {}/{}), backing off",
                            path.display(),
                            attempt,
                            retries
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                    return Err(RenameError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    }
                    .into());
                }
                return Err(RenameError::Os(err).into());
            }
        }
    }
}

/// Windows sync clients surface stalls as OS errors carrying these phrases.
fn is_cloud_busy(err: &io::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("cloud operation") || msg.contains("time-out")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn clean_name_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Fitzgerald - Gatsby.pdf");
        fs::write(&path, b"x").unwrap();

        let (did_rename, new_path) = rename_if_needed(&path, false, 3).await.unwrap();
        assert!(!did_rename);
        assert_eq!(new_path, path);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn prefixed_name_is_rewritten_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_OceanofPDFs.com_Gatsby_-_Fitzgerald.pdf");
        fs::write(&path, b"x").unwrap();

        let (did_rename, new_path) = rename_if_needed(&path, false, 3).await.unwrap();
        assert!(did_rename);
        assert_eq!(new_path, dir.path().join("Fitzgerald - Gatsby.pdf"));
        assert!(new_path.exists());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn dry_run_reports_without_touching_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Some__Book.pdf");
        fs::write(&path, b"x").unwrap();

        let (did_rename, new_path) = rename_if_needed(&path, true, 3).await.unwrap();
        assert!(did_rename);
        assert_eq!(new_path, dir.path().join("Some Book.pdf"));
        assert!(path.exists());
        assert!(!new_path.exists());
    }

    #[tokio::test]
    async fn missing_source_fails_without_retries() {
        let dir = tempfile::tempdir().unwrap();
        // compute_rename wants a normalizable name; the file is gone by
        // rename time
        let path = dir.path().join("Ghost__Book.pdf");
        fs::write(&path, b"x").unwrap();
        fs::remove_file(&path).unwrap();

        // nonexistent file has no stem change computed against the fs, but
        // normalization still fires; the rename itself must fail fast
        let result = rename_if_needed(&path, false, 3).await;
        assert!(result.is_err());
    }

    #[test]
    fn cloud_busy_detection_is_substring_based() {
        let busy = io::Error::new(io::ErrorKind::Other, "The cloud operation was unsuccessful");
        assert!(is_cloud_busy(&busy));

        let timeout = io::Error::new(io::ErrorKind::Other, "semaphore time-out period expired");
        assert!(is_cloud_busy(&timeout));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        assert!(!is_cloud_busy(&denied));
    }
}

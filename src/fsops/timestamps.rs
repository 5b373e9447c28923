//! Capture and restore of file timestamps around destructive operations.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use tracing::debug;

/// Access, modification and creation times captured before a mutation.
///
/// Capture never fails; an inaccessible file yields an empty triple and
/// restoration becomes a no-op. Creation time is captured where the
/// filesystem reports one but cannot be written back through utimes, so
/// only access and modification times round-trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTimes {
    atime: Option<FileTime>,
    mtime: Option<FileTime>,
    created: Option<FileTime>,
}

impl FileTimes {
    pub fn capture(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                atime: Some(FileTime::from_last_access_time(&meta)),
                mtime: Some(FileTime::from_last_modification_time(&meta)),
                created: FileTime::from_creation_time(&meta),
            },
            Err(_) => Self::default(),
        }
    }

    /// Best-effort: restoration failures are logged and swallowed, never
    /// escalated past the file that was already successfully processed.
    pub fn restore(&self, path: &Path) {
        if let (Some(atime), Some(mtime)) = (self.atime, self.mtime) {
            if let Err(err) = filetime::set_file_times(path, atime, mtime) {
                debug!("could not restore timestamps on {}: {}", path.display(), err);
            }
        }
    }

    pub fn mtime(&self) -> Option<FileTime> {
        self.mtime
    }

    pub fn created(&self) -> Option<FileTime> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_of_missing_file_is_empty_and_restore_is_noop() {
        let times = FileTimes::capture(Path::new("/no/such/file.pdf"));
        assert!(times.mtime().is_none());
        times.restore(Path::new("/no/such/file.pdf"));
    }

    #[test]
    fn times_round_trip_through_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        fs::write(&path, b"first").unwrap();

        let stamp = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_times(&path, stamp, stamp).unwrap();

        let times = FileTimes::capture(&path);
        fs::write(&path, b"rewritten").unwrap();
        times.restore(&path);

        let meta = fs::metadata(&path).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), stamp);
    }
}

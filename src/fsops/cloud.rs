//! Heuristic detection of cloud-synced paths.

use std::path::Path;

/// Whether any of the (lower-cased) patterns occurs anywhere in the path.
///
/// Purely textual; no attempt at real sync-state detection. Files under a
/// matching path are processed last and their renames get a retry budget.
pub fn is_cloud_path(path: &Path, patterns: &[String]) -> bool {
    let haystack = path.to_string_lossy().to_lowercase();
    patterns.iter().any(|p| haystack.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    fn default_patterns() -> Vec<String> {
        RunConfig::default().cloud_patterns
    }

    #[test]
    fn onedrive_matches_in_any_case() {
        let patterns = default_patterns();
        assert!(is_cloud_path(
            Path::new("C:/Users/John/OneDrive/Books/file.pdf"),
            &patterns
        ));
        assert!(is_cloud_path(Path::new("/mnt/ONEDRIVE/file.pdf"), &patterns));
    }

    #[test]
    fn plain_documents_path_is_local() {
        let patterns = default_patterns();
        assert!(!is_cloud_path(
            Path::new("C:/Users/John/Documents/file.pdf"),
            &patterns
        ));
    }

    #[test]
    fn generic_sync_substring_false_positives_are_accepted() {
        let patterns = default_patterns();
        assert!(is_cloud_path(
            Path::new("/home/john/Synchronize Backups/file.pdf"),
            &patterns
        ));
    }

    #[test]
    fn custom_pattern_table_is_honored() {
        let patterns = vec!["megasync".to_string()];
        assert!(is_cloud_path(Path::new("/data/MEGAsync/a.pdf"), &patterns));
        assert!(!is_cloud_path(Path::new("/data/OneDrive/a.pdf"), &patterns));
    }
}

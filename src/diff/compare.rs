//! File comparison logic

use crate::types::{LocalFile, RemoteMetadata, UploadReason};

/// Tolerance window when comparing local and remote modification
/// times, absorbing protocol timestamp rounding (FTP MDTM carries
/// whole seconds at best).
pub const MTIME_TOLERANCE_SECS: f64 = 2.0;

/// Decide whether a local file needs uploading.
///
/// 1. Absent remotely → `New`.
/// 2. Size differs → `SizeMismatch` (timestamps not consulted; a size
///    mismatch is decisive).
/// 3. Same size and both timestamps known: upload only when the local
///    copy is newer beyond the tolerance window.
/// 4. Same size, remote timestamp unknown → unchanged.
///
/// Returns `None` when the file is considered unchanged.
pub fn classify_file(local: &LocalFile, remote: Option<&RemoteMetadata>) -> Option<UploadReason> {
    let remote = match remote {
        Some(remote) => remote,
        None => return Some(UploadReason::New),
    };

    if remote.size != local.size {
        return Some(UploadReason::SizeMismatch);
    }

    match remote.mtime {
        Some(remote_mtime) if local.mtime > remote_mtime + MTIME_TOLERANCE_SECS => {
            Some(UploadReason::NewerLocal)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn local(size: u64, mtime: f64) -> LocalFile {
        LocalFile::new(
            PathBuf::from("/src/file.txt"),
            "file.txt".to_string(),
            size,
            mtime,
        )
    }

    #[test]
    fn test_absent_remote_is_new() {
        let action = classify_file(&local(100, 1_000.0), None);
        assert_eq!(action, Some(UploadReason::New));
    }

    #[test]
    fn test_size_mismatch_is_decisive() {
        // remote is newer, but size wins
        let remote = RemoteMetadata::new(200, Some(9_000.0));
        let action = classify_file(&local(100, 1_000.0), Some(&remote));
        assert_eq!(action, Some(UploadReason::SizeMismatch));
    }

    #[test]
    fn test_same_size_local_newer_beyond_tolerance() {
        let remote = RemoteMetadata::new(100, Some(1_000.0));
        let action = classify_file(&local(100, 1_003.0), Some(&remote));
        assert_eq!(action, Some(UploadReason::NewerLocal));
    }

    #[test]
    fn test_same_size_local_newer_within_tolerance_is_unchanged() {
        let remote = RemoteMetadata::new(100, Some(1_000.0));
        // exactly on the boundary: not strictly greater, no upload
        assert_eq!(classify_file(&local(100, 1_002.0), Some(&remote)), None);
        assert_eq!(classify_file(&local(100, 1_001.5), Some(&remote)), None);
    }

    #[test]
    fn test_same_size_remote_newer_is_unchanged() {
        let remote = RemoteMetadata::new(100, Some(2_000.0));
        assert_eq!(classify_file(&local(100, 1_000.0), Some(&remote)), None);
    }

    #[test]
    fn test_same_size_unknown_remote_mtime_is_unchanged() {
        let remote = RemoteMetadata::new(100, None);
        assert_eq!(classify_file(&local(100, 9_999.0), Some(&remote)), None);
    }

    #[test]
    fn test_just_past_tolerance_boundary() {
        let remote = RemoteMetadata::new(100, Some(1_000.0));
        let action = classify_file(&local(100, 1_002.001), Some(&remote));
        assert_eq!(action, Some(UploadReason::NewerLocal));
    }
}

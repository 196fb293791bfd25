//! Local directory walker

use crate::types::{LocalFile, SyncError};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Callback for reporting scan progress
///
/// Arguments:
/// - `files_scanned`: Total number of files scanned so far
/// - `bytes_scanned`: Total bytes scanned so far
pub type ScanProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Scan a local root and collect every regular file beneath it.
///
/// Produces one `LocalFile` per file reachable by recursive descent,
/// sorted by relative path. Directories are not emitted. Symbolic
/// links are followed; the walker's loop detection keeps cyclic link
/// structures from recursing forever (affected subtrees are skipped
/// with a warning).
///
/// # Errors
/// * `ScanFailed` if the root itself is missing or unreadable
/// * `Config` for an invalid exclude pattern
///
/// Entries that vanish or become unreadable mid-scan are skipped with
/// a warning rather than failing the run.
pub fn scan_local_tree(
    root_path: &Path,
    exclude_patterns: &[String],
    on_progress: Option<&ScanProgressCallback>,
) -> Result<Vec<LocalFile>, SyncError> {
    // Fail fast before any network work happens
    std::fs::read_dir(root_path).map_err(|e| SyncError::ScanFailed {
        path: root_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut override_builder = ignore::overrides::OverrideBuilder::new(root_path);
    for pattern in exclude_patterns {
        // The ignore crate's OverrideBuilder uses ! for exclusion
        let exclude_pattern = format!("!{}", pattern);
        override_builder.add(&exclude_pattern).map_err(|e| {
            SyncError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
        })?;
    }
    let overrides = override_builder
        .build()
        .map_err(|e| SyncError::Config(format!("Failed to build exclude overrides: {}", e)))?;

    // Every file is a sync candidate: no gitignore semantics here,
    // unlike a workstation copy tool
    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .hidden(false)
        .follow_links(true)
        .overrides(overrides)
        .build();

    let mut files = Vec::new();
    let mut scanned_count: u64 = 0;
    let mut scanned_bytes: u64 = 0;

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("Warning: skipping unreadable entry: {}", e);
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };
        if file_type.is_dir() {
            continue;
        }

        // With follow_links the walker resolves link targets, so plain
        // files behind symlinks land here as files
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                eprintln!(
                    "Warning: failed to read metadata for {}: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };
        if !metadata.is_file() {
            // pipes, sockets, devices
            continue;
        }

        let rel_path = match entry.path().strip_prefix(root_path) {
            Ok(rel) => normalize_rel_path(rel),
            Err(_) => {
                eprintln!(
                    "Warning: {} is outside the scan root, skipping",
                    entry.path().display()
                );
                continue;
            }
        };
        if rel_path.is_empty() {
            continue;
        }

        let mtime = match metadata.modified() {
            Ok(time) => match time.duration_since(UNIX_EPOCH) {
                Ok(duration) => duration.as_secs_f64(),
                Err(_) => 0.0,
            },
            Err(e) => {
                eprintln!(
                    "Warning: no modification time for {}: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        scanned_count += 1;
        scanned_bytes += metadata.len();
        if let Some(callback) = on_progress {
            callback(scanned_count, scanned_bytes);
        }

        files.push(LocalFile::new(
            entry.path().to_path_buf(),
            rel_path,
            metadata.len(),
            mtime,
        ));
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

/// Slash-normalize a relative path for remote concatenation.
fn normalize_rel_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

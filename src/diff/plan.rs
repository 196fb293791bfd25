//! Upload and delete planning

use crate::diff::classify_file;
use crate::transport::{ancestor_dirs, join_remote_path, RemoteTransport};
use crate::types::{DeleteItem, LocalFile, RemoteEntry, SyncError, UploadItem};
use std::collections::HashSet;

/// Callback for reporting planning progress
///
/// Arguments: current index (1-based), total file count, current
/// relative path.
pub type PlanProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Classify every local file against the remote store.
///
/// Each file costs one `stat` round-trip (the FTP adapter may add an
/// MDTM round-trip). Files whose remote state cannot be determined are
/// skipped entirely — under uncertainty the planner does no harm. A
/// dead connection fails the whole plan.
pub fn plan_uploads(
    local_files: &[LocalFile],
    remote_root: &str,
    transport: &mut dyn RemoteTransport,
    on_progress: Option<&PlanProgressCallback>,
) -> Result<Vec<UploadItem>, SyncError> {
    let mut items = Vec::new();
    let total = local_files.len();

    for (idx, local) in local_files.iter().enumerate() {
        if let Some(callback) = on_progress {
            callback(idx + 1, total, &local.rel_path);
        }

        let remote_path = join_remote_path(remote_root, &local.rel_path);
        let metadata = match transport.stat(&remote_path) {
            Ok(metadata) => metadata,
            Err(e) if e.is_fatal() => return Err(e),
            Err(_) => continue,
        };

        if let Some(reason) = classify_file(local, metadata.as_ref()) {
            items.push(UploadItem {
                local_path: local.path.clone(),
                remote_path,
                rel_path: local.rel_path.clone(),
                size: local.size,
                reason,
            });
        }
    }

    Ok(items)
}

/// Compute the remote entries to delete: everything under the remote
/// root with no local counterpart.
///
/// The local path set includes every file's ancestor directories, so a
/// directory that still holds (or is about to receive) local files is
/// never scheduled. Items come back deepest-first, putting descendants
/// ahead of the directories that contain them.
pub fn plan_deletes(local_files: &[LocalFile], remote_entries: &[RemoteEntry]) -> Vec<DeleteItem> {
    let mut local_paths: HashSet<String> = HashSet::new();
    for file in local_files {
        for dir in ancestor_dirs(&file.rel_path) {
            local_paths.insert(dir);
        }
        local_paths.insert(file.rel_path.clone());
    }

    let mut items: Vec<DeleteItem> = remote_entries
        .iter()
        .filter(|entry| !local_paths.contains(&entry.rel_path))
        .map(|entry| DeleteItem {
            rel_path: entry.rel_path.clone(),
            remote_path: entry.full_path.clone(),
            is_dir: entry.is_dir,
        })
        .collect();

    items.sort_by(|a, b| {
        let depth_a = a.rel_path.matches('/').count();
        let depth_b = b.rel_path.matches('/').count();
        depth_b.cmp(&depth_a).then_with(|| a.rel_path.cmp(&b.rel_path))
    });

    items
}

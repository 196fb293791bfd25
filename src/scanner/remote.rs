//! Remote tree lister

use crate::transport::{join_remote_path, RemoteTransport};
use crate::types::{RemoteEntry, SyncError};

/// List the full remote subtree under `root`, depth-first.
///
/// Returns a flat sequence of entries (files and directories), sorted
/// by relative path. A listing failure inside a subdirectory skips
/// only that subtree; only a failure on the root itself — or a dead
/// connection — fails the call.
pub fn list_remote_tree(
    transport: &mut dyn RemoteTransport,
    root: &str,
) -> Result<Vec<RemoteEntry>, SyncError> {
    let mut entries = Vec::new();
    let mut pending: Vec<(String, String)> = Vec::new();

    collect_children(transport, root, "", &mut entries, &mut pending)?;

    while let Some((dir_full, dir_rel)) = pending.pop() {
        match collect_children(transport, &dir_full, &dir_rel, &mut entries, &mut pending) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            // directory vanished or is unreadable: skip its subtree
            Err(_) => continue,
        }
    }

    entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(entries)
}

fn collect_children(
    transport: &mut dyn RemoteTransport,
    dir_full: &str,
    dir_rel: &str,
    entries: &mut Vec<RemoteEntry>,
    pending: &mut Vec<(String, String)>,
) -> Result<(), SyncError> {
    for child in transport.list(dir_full)? {
        let full_path = join_remote_path(dir_full, &child.name);
        let rel_path = if dir_rel.is_empty() {
            child.name.clone()
        } else {
            format!("{dir_rel}/{}", child.name)
        };

        if child.is_dir {
            pending.push((full_path.clone(), rel_path.clone()));
        }
        entries.push(RemoteEntry::new(full_path, rel_path, child.is_dir));
    }
    Ok(())
}

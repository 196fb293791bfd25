//! Executor integration tests
//!
//! Runs computed change sets against the in-memory remote store and
//! checks per-item failure isolation, cancellation and delete
//! recursion.

mod common;

use common::MemoryTransport;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use upsync::diff::{plan_deletes, ChangeSet};
use upsync::executor::{execute, CancelFlag, ExecutionEvent, OutcomeStatus};
use upsync::types::{DeleteItem, UploadItem, UploadReason};

const ROOT: &str = "/srv/www";

fn write_local(dir: &TempDir, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, content).expect("write file");
    path
}

fn upload(local_path: PathBuf, rel: &str, size: u64) -> UploadItem {
    UploadItem {
        local_path,
        remote_path: format!("{ROOT}/{rel}"),
        rel_path: rel.to_string(),
        size,
        reason: UploadReason::New,
    }
}

fn delete(rel: &str, is_dir: bool) -> DeleteItem {
    DeleteItem {
        rel_path: rel.to_string(),
        remote_path: format!("{ROOT}/{rel}"),
        is_dir,
    }
}

#[test]
fn test_uploads_land_with_ancestor_directories() {
    let local = tempfile::tempdir().expect("create tempdir");
    let file = write_local(&local, "assets/css/site.css", b"body {}");
    let mut transport = MemoryTransport::new(ROOT);

    let set = ChangeSet::from_parts(vec![upload(file, "assets/css/site.css", 7)], vec![]);
    let outcome = execute(&set, &mut transport, &CancelFlag::new(), None).expect("execute");

    assert_eq!(outcome.uploads_succeeded, 1);
    assert_eq!(outcome.bytes_uploaded, 7);
    assert!(transport.has_file("/srv/www/assets/css/site.css"));
    assert_eq!(
        transport.mkdir_log,
        vec!["/srv/www/assets", "/srv/www/assets/css"]
    );
}

#[test]
fn test_failure_at_position_k_does_not_stop_later_items() {
    let local = tempfile::tempdir().expect("create tempdir");
    let a = write_local(&local, "a.txt", b"aa");
    let b = write_local(&local, "b.txt", b"bb");
    let c = write_local(&local, "c.txt", b"cc");

    let mut transport = MemoryTransport::new(ROOT);
    transport.fail_put.insert("/srv/www/b.txt".to_string());

    let set = ChangeSet::from_parts(
        vec![
            upload(a, "a.txt", 2),
            upload(b, "b.txt", 2),
            upload(c, "c.txt", 2),
        ],
        vec![],
    );
    let outcome = execute(&set, &mut transport, &CancelFlag::new(), None).expect("execute");

    assert_eq!(outcome.uploads_attempted, 3);
    assert_eq!(outcome.uploads_succeeded, 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].rel_path, "b.txt");
    assert!(transport.has_file("/srv/www/a.txt"));
    assert!(!transport.has_file("/srv/www/b.txt"));
    assert!(transport.has_file("/srv/www/c.txt"));
    assert_eq!(outcome.status, OutcomeStatus::Completed);
}

#[test]
fn test_cancellation_before_item_m_leaves_later_items_untouched() {
    let local = tempfile::tempdir().expect("create tempdir");
    let a = write_local(&local, "a.txt", b"aa");
    let b = write_local(&local, "b.txt", b"bb");
    let c = write_local(&local, "c.txt", b"cc");

    let mut transport = MemoryTransport::new(ROOT);
    let cancel = CancelFlag::new();

    // cancel as soon as the first item finishes
    let cancel_from_callback = cancel.clone();
    let callback = move |event: &ExecutionEvent| {
        if let ExecutionEvent::ItemSuccess { index: 1, .. } = event {
            cancel_from_callback.cancel();
        }
    };

    let set = ChangeSet::from_parts(
        vec![
            upload(a, "a.txt", 2),
            upload(b, "b.txt", 2),
            upload(c, "c.txt", 2),
        ],
        vec![],
    );
    let outcome = execute(&set, &mut transport, &cancel, Some(&callback)).expect("execute");

    assert_eq!(outcome.status, OutcomeStatus::Cancelled);
    assert_eq!(outcome.uploads_attempted, 1);
    assert_eq!(outcome.uploads_succeeded, 1);
    assert!(outcome.failures.is_empty());
    assert!(transport.has_file("/srv/www/a.txt"));
    assert!(!transport.has_file("/srv/www/b.txt"));
    assert!(!transport.has_file("/srv/www/c.txt"));
}

#[test]
fn test_delete_of_missing_file_counts_as_success() {
    let mut transport = MemoryTransport::new(ROOT);

    let set = ChangeSet::from_parts(vec![], vec![delete("already-gone.txt", false)]);
    let outcome = execute(&set, &mut transport, &CancelFlag::new(), None).expect("execute");

    assert_eq!(outcome.deletes_attempted, 1);
    assert_eq!(outcome.deletes_succeeded, 1);
    assert!(outcome.failures.is_empty());
}

#[test]
fn test_directory_delete_clears_nested_tree() {
    let mut transport = MemoryTransport::new(ROOT);
    transport.seed_file("/srv/www/old/stale.txt", 4, 1_000.0);
    transport.seed_file("/srv/www/old/nested/deep.txt", 4, 1_000.0);

    let remote_entries =
        upsync::scanner::list_remote_tree(&mut transport, ROOT).expect("list remote");
    let deletes = plan_deletes(&[], &remote_entries);
    let set = ChangeSet::from_parts(vec![], deletes);

    let outcome = execute(&set, &mut transport, &CancelFlag::new(), None).expect("execute");

    assert_eq!(outcome.failures, vec![]);
    assert!(!transport.has_file("/srv/www/old/stale.txt"));
    assert!(!transport.has_file("/srv/www/old/nested/deep.txt"));
    assert!(!transport.has_dir("/srv/www/old/nested"));
    assert!(!transport.has_dir("/srv/www/old"));
    assert!(transport.has_dir(ROOT));
}

#[test]
fn test_upload_failure_list_matches_failed_items_exactly() {
    let local = tempfile::tempdir().expect("create tempdir");
    let a = write_local(&local, "a.txt", b"a");
    let b = write_local(&local, "b.txt", b"b");

    let mut transport = MemoryTransport::new(ROOT);
    transport.fail_put.insert("/srv/www/a.txt".to_string());
    transport.fail_put.insert("/srv/www/b.txt".to_string());

    let set = ChangeSet::from_parts(vec![upload(a, "a.txt", 1), upload(b, "b.txt", 1)], vec![]);
    let outcome = execute(&set, &mut transport, &CancelFlag::new(), None).expect("execute");

    let failed: Vec<&str> = outcome.failures.iter().map(|f| f.rel_path.as_str()).collect();
    assert_eq!(failed, vec!["a.txt", "b.txt"]);
    assert_eq!(outcome.uploads_succeeded, 0);
}

//! Executor for computed change sets

use crate::diff::ChangeSet;
use crate::transport::{ancestor_dirs, join_remote_path, RemoteTransport};
use crate::types::{DeleteItem, SyncError, UploadItem};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked between items.
///
/// An in-flight single-file transfer always runs to completion or
/// protocol failure before cancellation takes effect.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation at the next item boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which kind of operation an item or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Upload,
    Delete,
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Upload => "upload",
            OperationKind::Delete => "delete",
        }
    }
}

/// One failed item, recorded without aborting the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub kind: OperationKind,
    pub rel_path: String,
    pub message: String,
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    /// Every item was attempted
    Completed,

    /// The cancel flag stopped the run early; counters cover only the
    /// items processed before the cut-off
    Cancelled,
}

/// Result summary of one executed change set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub uploads_attempted: usize,
    pub uploads_succeeded: usize,
    pub deletes_attempted: usize,
    pub deletes_succeeded: usize,
    pub bytes_uploaded: u64,
    pub failures: Vec<ItemFailure>,
    pub status: OutcomeStatus,
}

impl Default for SyncOutcome {
    fn default() -> Self {
        Self {
            uploads_attempted: 0,
            uploads_succeeded: 0,
            deletes_attempted: 0,
            deletes_succeeded: 0,
            bytes_uploaded: 0,
            failures: Vec::new(),
            status: OutcomeStatus::Completed,
        }
    }
}

/// Events emitted while executing a change set
#[derive(Debug)]
pub enum ExecutionEvent {
    /// Item execution started
    ItemStart {
        index: usize,
        total: usize,
        kind: OperationKind,
        rel_path: String,
    },
    /// Item execution succeeded
    ItemSuccess {
        index: usize,
        total: usize,
        kind: OperationKind,
        rel_path: String,
        bytes: u64,
    },
    /// Item execution failed but the run continued
    ItemError {
        index: usize,
        total: usize,
        kind: OperationKind,
        rel_path: String,
        message: String,
    },
    /// Run finished (completed or cancelled)
    Complete { outcome: SyncOutcome },
}

/// Optional callback used to receive execution events
pub type ExecutionCallback = dyn Fn(&ExecutionEvent) + Send + Sync;

/// Execute a change set: uploads first, then deletes, each in plan
/// order.
///
/// Per-item failures are recorded in the outcome and never abort the
/// batch. A dead connection (`RemoteUnavailable`) does abort, as a
/// whole-operation error. The cancel flag is honored before each item
/// and yields a partial outcome, not an error.
pub fn execute(
    change_set: &ChangeSet,
    transport: &mut dyn RemoteTransport,
    cancel: &CancelFlag,
    on_event: Option<&ExecutionCallback>,
) -> Result<SyncOutcome, SyncError> {
    let total = change_set.len();
    let mut outcome = SyncOutcome::default();
    let mut index = 0;

    for item in &change_set.uploads {
        if cancel.is_cancelled() {
            return finish(outcome, OutcomeStatus::Cancelled, on_event);
        }
        index += 1;

        emit_event(
            on_event,
            ExecutionEvent::ItemStart {
                index,
                total,
                kind: OperationKind::Upload,
                rel_path: item.rel_path.clone(),
            },
        );

        outcome.uploads_attempted += 1;
        match upload_item(item, transport) {
            Ok(bytes) => {
                outcome.uploads_succeeded += 1;
                outcome.bytes_uploaded += bytes;
                emit_event(
                    on_event,
                    ExecutionEvent::ItemSuccess {
                        index,
                        total,
                        kind: OperationKind::Upload,
                        rel_path: item.rel_path.clone(),
                        bytes,
                    },
                );
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => record_failure(&mut outcome, OperationKind::Upload, item.rel_path.clone(), e, index, total, on_event),
        }
    }

    for item in &change_set.deletes {
        if cancel.is_cancelled() {
            return finish(outcome, OutcomeStatus::Cancelled, on_event);
        }
        index += 1;

        emit_event(
            on_event,
            ExecutionEvent::ItemStart {
                index,
                total,
                kind: OperationKind::Delete,
                rel_path: item.rel_path.clone(),
            },
        );

        outcome.deletes_attempted += 1;
        match delete_item(item, transport) {
            Ok(()) => {
                outcome.deletes_succeeded += 1;
                emit_event(
                    on_event,
                    ExecutionEvent::ItemSuccess {
                        index,
                        total,
                        kind: OperationKind::Delete,
                        rel_path: item.rel_path.clone(),
                        bytes: 0,
                    },
                );
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => record_failure(&mut outcome, OperationKind::Delete, item.rel_path.clone(), e, index, total, on_event),
        }
    }

    finish(outcome, OutcomeStatus::Completed, on_event)
}

/// Upload one file, creating the target's ancestor directories first.
///
/// A genuine directory-creation failure becomes this item's failure
/// and the transfer is not attempted; "already exists" never gets
/// here (the transport reports it as success).
fn upload_item(item: &UploadItem, transport: &mut dyn RemoteTransport) -> Result<u64, SyncError> {
    let root_prefix = item.remote_path.strip_suffix(&item.rel_path).unwrap_or("");
    let root_prefix = if root_prefix == "/" {
        "/"
    } else {
        root_prefix.trim_end_matches('/')
    };

    for dir in ancestor_dirs(&item.rel_path) {
        transport.mkdir_if_absent(&join_remote_path(root_prefix, &dir))?;
    }

    transport.put(&item.local_path, &item.remote_path)
}

fn delete_item(item: &DeleteItem, transport: &mut dyn RemoteTransport) -> Result<(), SyncError> {
    if item.is_dir {
        transport.remove_dir_recursive(&item.remote_path)
    } else {
        transport.remove(&item.remote_path)
    }
}

#[allow(clippy::too_many_arguments)]
fn record_failure(
    outcome: &mut SyncOutcome,
    kind: OperationKind,
    rel_path: String,
    error: SyncError,
    index: usize,
    total: usize,
    on_event: Option<&ExecutionCallback>,
) {
    let message = error.to_string();
    emit_event(
        on_event,
        ExecutionEvent::ItemError {
            index,
            total,
            kind,
            rel_path: rel_path.clone(),
            message: message.clone(),
        },
    );
    outcome.failures.push(ItemFailure {
        kind,
        rel_path,
        message,
    });
}

fn finish(
    mut outcome: SyncOutcome,
    status: OutcomeStatus,
    on_event: Option<&ExecutionCallback>,
) -> Result<SyncOutcome, SyncError> {
    outcome.status = status;
    emit_event(
        on_event,
        ExecutionEvent::Complete {
            outcome: outcome.clone(),
        },
    );
    Ok(outcome)
}

fn emit_event(on_event: Option<&ExecutionCallback>, event: ExecutionEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}

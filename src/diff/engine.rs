//! Change set container and statistics

use crate::types::{DeleteItem, UploadItem, UploadReason};
use serde::Serialize;

/// The computed set of upload and delete operations for one sync run,
/// pending confirmation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    /// Uploads, in execution order
    pub uploads: Vec<UploadItem>,

    /// Deletes, in execution order (descendants before directories)
    pub deletes: Vec<DeleteItem>,

    /// Aggregate statistics about the plan
    pub stats: ChangeStats,
}

impl ChangeSet {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a change set from planned uploads and deletes
    pub fn from_parts(uploads: Vec<UploadItem>, deletes: Vec<DeleteItem>) -> Self {
        let mut set = Self::new();
        for item in uploads {
            set.add_upload(item);
        }
        for item in deletes {
            set.add_delete(item);
        }
        set
    }

    /// Add an upload item and update statistics
    pub fn add_upload(&mut self, item: UploadItem) {
        match item.reason {
            UploadReason::New => self.stats.new_count += 1,
            UploadReason::SizeMismatch => self.stats.size_mismatch_count += 1,
            UploadReason::NewerLocal => self.stats.newer_local_count += 1,
        }
        self.stats.upload_count += 1;
        self.stats.total_upload_bytes += item.size;
        self.uploads.push(item);
    }

    /// Add a delete item and update statistics
    pub fn add_delete(&mut self, item: DeleteItem) {
        self.stats.delete_count += 1;
        self.deletes.push(item);
    }

    /// Keep only the uploads the caller approves of.
    ///
    /// This is the per-file opt-out hook: removing items changes
    /// nothing about how the remainder executes. Statistics are
    /// recomputed.
    pub fn retain_uploads<F>(&mut self, mut keep: F)
    where
        F: FnMut(&UploadItem) -> bool,
    {
        let uploads = std::mem::take(&mut self.uploads);
        let deletes = std::mem::take(&mut self.deletes);
        *self = Self::from_parts(uploads.into_iter().filter(|item| keep(item)).collect(), deletes);
    }

    /// Total number of operations to execute
    pub fn len(&self) -> usize {
        self.uploads.len() + self.deletes.len()
    }

    /// True when there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletes.is_empty()
    }
}

/// Statistics about a change set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeStats {
    /// Number of planned uploads
    pub upload_count: usize,

    /// Number of planned deletes
    pub delete_count: usize,

    /// Uploads classified as new files
    pub new_count: usize,

    /// Uploads classified by size mismatch
    pub size_mismatch_count: usize,

    /// Uploads classified by newer local timestamp
    pub newer_local_count: usize,

    /// Total bytes to upload
    pub total_upload_bytes: u64,
}

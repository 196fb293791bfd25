//! Change items determined by the diff planner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Why a local file was classified as an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadReason {
    /// File does not exist on the remote side
    New,

    /// Remote file exists but its size differs
    SizeMismatch,

    /// Same size, but the local copy is newer beyond the tolerance window
    NewerLocal,
}

impl UploadReason {
    /// Short label for previews and progress messages
    pub fn label(&self) -> &'static str {
        match self {
            UploadReason::New => "new file",
            UploadReason::SizeMismatch => "size mismatch",
            UploadReason::NewerLocal => "newer local copy",
        }
    }
}

/// A planned upload of one local file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadItem {
    /// Absolute local source path
    pub local_path: PathBuf,

    /// Full remote target path
    pub remote_path: String,

    /// Path relative to both roots, slash-separated
    pub rel_path: String,

    /// File size in bytes
    pub size: u64,

    /// Classification that put this file in the plan
    pub reason: UploadReason,
}

/// A planned removal of one remote entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteItem {
    /// Path relative to the remote root, slash-separated
    pub rel_path: String,

    /// Full remote path
    pub remote_path: String,

    /// Whether the entry is a directory (removed recursively)
    pub is_dir: bool,
}

/// Whether remote-only entries are removed during a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Leave remote-only entries in place
    #[default]
    Keep,

    /// Delete remote entries with no local counterpart
    Remove,
}

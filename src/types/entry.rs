//! File records produced by the local scanner and the remote lister

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A regular file found under the local sync root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalFile {
    /// Absolute path on the local filesystem
    pub path: PathBuf,

    /// Path relative to the sync root, slash-separated
    pub rel_path: String,

    /// File size in bytes
    pub size: u64,

    /// Modification time as fractional seconds since the Unix epoch
    pub mtime: f64,
}

impl LocalFile {
    pub fn new(path: PathBuf, rel_path: String, size: u64, mtime: f64) -> Self {
        Self {
            path,
            rel_path,
            size,
            mtime,
        }
    }
}

/// An entry found under the remote sync root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Full remote path
    pub full_path: String,

    /// Path relative to the remote root, slash-separated
    pub rel_path: String,

    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl RemoteEntry {
    pub fn new(full_path: String, rel_path: String, is_dir: bool) -> Self {
        Self {
            full_path,
            rel_path,
            is_dir,
        }
    }
}

/// Metadata for a single remote file, fetched on demand by the planner
///
/// The modification time is optional: the FTP adapter synthesizes it
/// from a secondary MDTM round-trip that minimal servers reject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteMetadata {
    /// File size in bytes
    pub size: u64,

    /// Modification time as fractional epoch seconds, when known
    pub mtime: Option<f64>,
}

impl RemoteMetadata {
    pub fn new(size: u64, mtime: Option<f64>) -> Self {
        Self { size, mtime }
    }
}

//! Remote transport abstraction
//!
//! One capability trait hides the command-set differences between the
//! FTP/FTPS adapter and the SFTP adapter. Planning and execution code
//! depends only on this trait; the concrete adapter is picked once at
//! connection time.

mod connect;
mod ftp;
mod sftp;

pub use connect::open_transport;
pub use ftp::FtpTransport;
pub use sftp::SftpTransport;

use crate::types::{RemoteMetadata, SyncError};
use std::path::Path;

/// One immediate child of a remote directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDirEntry {
    /// Entry name without any path component
    pub name: String,

    /// Whether the entry is a directory
    pub is_dir: bool,

    /// Size in bytes, when the listing exposes it cheaply
    pub size: Option<u64>,
}

/// Capability interface over one authenticated remote session
///
/// All methods take `&mut self`: the underlying session carries
/// server-side state and must never be shared between concurrent
/// operations. Each call is one or more blocking round-trips.
pub trait RemoteTransport {
    /// List the immediate children of a remote directory.
    fn list(&mut self, path: &str) -> Result<Vec<RemoteDirEntry>, SyncError>;

    /// Fetch size and (when available) modification time for one file.
    ///
    /// Returns `Ok(None)` when the path does not exist.
    fn stat(&mut self, path: &str) -> Result<Option<RemoteMetadata>, SyncError>;

    /// Download a remote file over the top of a local path.
    ///
    /// Returns the number of bytes received.
    fn get(&mut self, remote_path: &str, local_path: &Path) -> Result<u64, SyncError>;

    /// Upload a local file over the top of a remote path.
    ///
    /// Returns the number of bytes sent. Partial remote writes are not
    /// rolled back.
    fn put(&mut self, local_path: &Path, remote_path: &str) -> Result<u64, SyncError>;

    /// Create the leaf directory if it does not already exist.
    ///
    /// "Already exists" is success. The caller walks ancestor segments
    /// root-to-leaf, one call per segment.
    fn mkdir_if_absent(&mut self, path: &str) -> Result<(), SyncError>;

    /// Remove a remote file. "Already gone" is success.
    fn remove(&mut self, path: &str) -> Result<(), SyncError>;

    /// Remove an empty remote directory. "Already gone" is success.
    fn remove_dir(&mut self, path: &str) -> Result<(), SyncError>;

    /// Remove a directory and everything beneath it.
    ///
    /// Lists the directory, recurses into subdirectories, removes
    /// files, then removes the emptied directory. The algorithm is the
    /// same on both protocols, so it lives here.
    fn remove_dir_recursive(&mut self, path: &str) -> Result<(), SyncError> {
        let children = match self.list(path) {
            Ok(children) => children,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };

        for child in children {
            let child_path = join_remote_path(path, &child.name);
            if child.is_dir {
                self.remove_dir_recursive(&child_path)?;
            } else {
                self.remove(&child_path)?;
            }
        }

        self.remove_dir(path)
    }
}

/// Join a remote base path and a slash-separated relative path.
pub fn join_remote_path(base: &str, rel: &str) -> String {
    let rel = rel.trim_start_matches('/');
    if base.is_empty() {
        rel.to_string()
    } else if base == "/" {
        format!("/{rel}")
    } else {
        format!("{}/{rel}", base.trim_end_matches('/'))
    }
}

/// Ancestor directories of a relative path, root-to-leaf.
///
/// `"a/b/c.txt"` yields `["a", "a/b"]`; a bare filename yields nothing.
pub fn ancestor_dirs(rel_path: &str) -> Vec<String> {
    let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    let mut dirs = Vec::new();
    let mut prefix = String::new();

    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        dirs.push(prefix.clone());
    }

    dirs
}

//! Shared test double: an in-memory remote store implementing
//! `RemoteTransport`.

// not every test crate uses every helper
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::time::UNIX_EPOCH;
use upsync::transport::RemoteDirEntry;
use upsync::types::{RemoteMetadata, SyncError};
use upsync::RemoteTransport;

/// One file in the in-memory remote tree
#[derive(Debug, Clone)]
pub struct MemoryFile {
    pub size: u64,
    pub mtime: Option<f64>,
    pub content: Vec<u8>,
}

/// In-memory remote store with injectable failures
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pub files: BTreeMap<String, MemoryFile>,
    pub dirs: BTreeSet<String>,
    /// Paths whose stat is rejected with `Denied`
    pub deny_stat: HashSet<String>,
    /// Directories whose listing is rejected with `Denied`
    pub deny_list: HashSet<String>,
    /// Paths whose put is rejected with `TransferFailed`
    pub fail_put: HashSet<String>,
    /// Simulates an FTP server without MDTM support
    pub drop_mtimes: bool,
    /// Simulates a dead session: every call fails
    pub dead: bool,
    pub put_log: Vec<String>,
    pub mkdir_log: Vec<String>,
}

impl MemoryTransport {
    /// Create a store with the given root directory pre-existing.
    pub fn new(root: &str) -> Self {
        let mut transport = Self::default();
        transport.dirs.insert(root.to_string());
        transport
    }

    /// Seed a file, creating ancestor directories implicitly.
    pub fn seed_file(&mut self, full_path: &str, size: u64, mtime: f64) {
        let mut parent = parent_of(full_path);
        while !parent.is_empty() && self.dirs.insert(parent.clone()) {
            parent = parent_of(&parent);
        }
        self.files.insert(
            full_path.to_string(),
            MemoryFile {
                size,
                mtime: Some(mtime),
                content: vec![0u8; size as usize],
            },
        );
    }

    /// Seed an empty directory, creating ancestors implicitly.
    pub fn seed_dir(&mut self, full_path: &str) {
        let mut path = full_path.to_string();
        while !path.is_empty() && self.dirs.insert(path.clone()) {
            path = parent_of(&path);
        }
    }

    pub fn has_file(&self, full_path: &str) -> bool {
        self.files.contains_key(full_path)
    }

    pub fn has_dir(&self, full_path: &str) -> bool {
        self.dirs.contains(full_path)
    }

    fn check_alive(&self) -> Result<(), SyncError> {
        if self.dead {
            Err(SyncError::RemoteUnavailable("session closed".to_string()))
        } else {
            Ok(())
        }
    }
}

fn parent_of(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

impl RemoteTransport for MemoryTransport {
    fn list(&mut self, path: &str) -> Result<Vec<RemoteDirEntry>, SyncError> {
        self.check_alive()?;
        if self.deny_list.contains(path) {
            return Err(SyncError::Denied(path.to_string()));
        }
        if !self.dirs.contains(path) {
            return Err(SyncError::NotFound(path.to_string()));
        }

        let mut entries = Vec::new();
        for dir in &self.dirs {
            if parent_of(dir) == path {
                entries.push(RemoteDirEntry {
                    name: dir.rsplit('/').next().unwrap_or(dir).to_string(),
                    is_dir: true,
                    size: None,
                });
            }
        }
        for (file, meta) in &self.files {
            if parent_of(file) == path {
                entries.push(RemoteDirEntry {
                    name: file.rsplit('/').next().unwrap_or(file).to_string(),
                    is_dir: false,
                    size: Some(meta.size),
                });
            }
        }
        Ok(entries)
    }

    fn stat(&mut self, path: &str) -> Result<Option<RemoteMetadata>, SyncError> {
        self.check_alive()?;
        if self.deny_stat.contains(path) {
            return Err(SyncError::Denied(path.to_string()));
        }
        Ok(self.files.get(path).map(|f| {
            let mtime = if self.drop_mtimes { None } else { f.mtime };
            RemoteMetadata::new(f.size, mtime)
        }))
    }

    fn get(&mut self, remote_path: &str, local_path: &Path) -> Result<u64, SyncError> {
        self.check_alive()?;
        let file = self
            .files
            .get(remote_path)
            .ok_or_else(|| SyncError::NotFound(remote_path.to_string()))?;
        std::fs::write(local_path, &file.content).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;
        Ok(file.content.len() as u64)
    }

    fn put(&mut self, local_path: &Path, remote_path: &str) -> Result<u64, SyncError> {
        self.check_alive()?;
        if self.fail_put.contains(remote_path) {
            return Err(SyncError::TransferFailed {
                path: remote_path.to_string(),
                message: "injected failure".to_string(),
            });
        }
        if !self.dirs.contains(&parent_of(remote_path)) {
            return Err(SyncError::TransferFailed {
                path: remote_path.to_string(),
                message: "no such directory".to_string(),
            });
        }

        let content = std::fs::read(local_path).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;
        let metadata = std::fs::metadata(local_path).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64());

        let size = content.len() as u64;
        self.files.insert(
            remote_path.to_string(),
            MemoryFile {
                size,
                mtime,
                content,
            },
        );
        self.put_log.push(remote_path.to_string());
        Ok(size)
    }

    fn mkdir_if_absent(&mut self, path: &str) -> Result<(), SyncError> {
        self.check_alive()?;
        if self.dirs.contains(path) {
            return Ok(());
        }
        self.dirs.insert(path.to_string());
        self.mkdir_log.push(path.to_string());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), SyncError> {
        self.check_alive()?;
        // already gone counts as success
        self.files.remove(path);
        Ok(())
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), SyncError> {
        self.check_alive()?;
        let has_children = self.dirs.iter().any(|d| parent_of(d) == path)
            || self.files.keys().any(|f| parent_of(f) == path);
        if has_children {
            return Err(SyncError::Denied(format!("{path}: directory not empty")));
        }
        self.dirs.remove(path);
        Ok(())
    }
}

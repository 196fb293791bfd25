//! FTP/FTPS transport adapter
//!
//! The transfer protocol has no single metadata call: size comes from
//! SIZE, the timestamp from an optional MDTM round-trip, and listings
//! are parsed from LIST output in the common unix `ls -l` shape.

use crate::transport::{RemoteDirEntry, RemoteTransport};
use crate::types::{RemoteMetadata, SyncError};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io;
use std::path::Path;
use suppaftp::native_tls::TlsConnector;
use suppaftp::types::FileType;
use suppaftp::{FtpError, NativeTlsConnector, NativeTlsFtpStream, Status};

/// Remote transport over FTP, optionally upgraded to FTPS
pub struct FtpTransport {
    stream: NativeTlsFtpStream,
}

impl FtpTransport {
    /// Connect and authenticate.
    ///
    /// With `secure`, the control connection is upgraded to TLS before
    /// login and data connections are protected, matching the
    /// AUTH TLS + PROT P sequence.
    pub fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        secure: bool,
    ) -> Result<Self, SyncError> {
        let addr = format!("{host}:{port}");
        let mut stream = NativeTlsFtpStream::connect(addr.as_str())
            .map_err(|e| SyncError::RemoteUnavailable(format!("{addr}: {e}")))?;

        if secure {
            let connector = TlsConnector::new()
                .map_err(|e| SyncError::RemoteUnavailable(format!("TLS setup failed: {e}")))?;
            stream = stream
                .into_secure(NativeTlsConnector::from(connector), host)
                .map_err(|e| SyncError::RemoteUnavailable(format!("TLS upgrade failed: {e}")))?;
        }

        stream
            .login(user, password)
            .map_err(|e| SyncError::Denied(format!("login failed: {e}")))?;

        // SIZE replies are only dependable in binary mode
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| map_protocol_error("TYPE", e))?;

        Ok(Self { stream })
    }
}

impl RemoteTransport for FtpTransport {
    fn list(&mut self, path: &str) -> Result<Vec<RemoteDirEntry>, SyncError> {
        let lines = self.stream.list(Some(path)).map_err(|e| match e {
            FtpError::ConnectionError(io) => SyncError::RemoteUnavailable(io.to_string()),
            FtpError::UnexpectedResponse(ref resp) if resp.status == Status::FileUnavailable => {
                SyncError::NotFound(path.to_string())
            }
            other => SyncError::Denied(format!("{path}: {other}")),
        })?;

        Ok(lines.iter().filter_map(|line| parse_list_line(line)).collect())
    }

    fn stat(&mut self, path: &str) -> Result<Option<RemoteMetadata>, SyncError> {
        let size = match self.stream.size(path) {
            Ok(size) => size as u64,
            Err(FtpError::ConnectionError(io)) => {
                return Err(SyncError::RemoteUnavailable(io.to_string()))
            }
            // SIZE failure means the file is not there (550 covers both
            // missing and inaccessible; the planner treats either as new)
            Err(_) => return Ok(None),
        };

        // MDTM is optional; without it only size-based comparison runs
        let mtime = self.stream.mdtm(path).ok().map(mdtm_to_epoch);

        Ok(Some(RemoteMetadata::new(size, mtime)))
    }

    fn get(&mut self, remote_path: &str, local_path: &Path) -> Result<u64, SyncError> {
        let mut data = self
            .stream
            .retr_as_stream(remote_path)
            .map_err(|e| map_transfer_error(remote_path, e))?;

        let copied = File::create(local_path)
            .map_err(|e| SyncError::TransferFailed {
                path: remote_path.to_string(),
                message: e.to_string(),
            })
            .and_then(|mut out| {
                io::copy(&mut data, &mut out).map_err(|e| SyncError::TransferFailed {
                    path: remote_path.to_string(),
                    message: e.to_string(),
                })
            });

        self.stream
            .finalize_retr_stream(data)
            .map_err(|e| map_transfer_error(remote_path, e))?;

        copied
    }

    fn put(&mut self, local_path: &Path, remote_path: &str) -> Result<u64, SyncError> {
        let mut local = File::open(local_path).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;

        self.stream
            .put_file(remote_path, &mut local)
            .map_err(|e| map_transfer_error(remote_path, e))
    }

    fn mkdir_if_absent(&mut self, path: &str) -> Result<(), SyncError> {
        match self.stream.mkdir(path) {
            Ok(()) => Ok(()),
            Err(FtpError::ConnectionError(io)) => Err(SyncError::RemoteUnavailable(io.to_string())),
            Err(err) => {
                // MKD fails on an existing directory; a CWD probe tells
                // "already there" apart from a genuine refusal
                if self.stream.cwd(path).is_ok() {
                    let _ = self.stream.cwd("/");
                    Ok(())
                } else {
                    Err(SyncError::Denied(format!("{path}: {err}")))
                }
            }
        }
    }

    fn remove(&mut self, path: &str) -> Result<(), SyncError> {
        match self.stream.rm(path) {
            Ok(()) => Ok(()),
            Err(e) => map_removal_error(path, e),
        }
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), SyncError> {
        match self.stream.rmdir(path) {
            Ok(()) => Ok(()),
            Err(e) => map_removal_error(path, e),
        }
    }
}

/// Parse one LIST line in unix `ls -l` format.
///
/// Columns: type/mode, links, owner, group, size, month, day,
/// time-or-year, name. Lines that do not fit (e.g. DOS-style listings)
/// are skipped rather than failing the whole listing.
fn parse_list_line(line: &str) -> Option<RemoteDirEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 9 {
        return None;
    }

    let mut name = parts[8..].join(" ");
    if name == "." || name == ".." {
        return None;
    }

    let is_dir = line.starts_with('d');

    // symlink lines carry "name -> target"; keep the link name
    if line.starts_with('l') {
        if let Some(idx) = name.find(" -> ") {
            name.truncate(idx);
        }
    }

    let size = if is_dir { None } else { parts[4].parse::<u64>().ok() };

    Some(RemoteDirEntry { name, is_dir, size })
}

/// MDTM replies are UTC per RFC 3659.
fn mdtm_to_epoch(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

fn map_protocol_error(context: &str, err: FtpError) -> SyncError {
    match err {
        FtpError::ConnectionError(io) => SyncError::RemoteUnavailable(io.to_string()),
        other => SyncError::RemoteUnavailable(format!("{context}: {other}")),
    }
}

fn map_transfer_error(path: &str, err: FtpError) -> SyncError {
    match err {
        FtpError::ConnectionError(io) => SyncError::RemoteUnavailable(io.to_string()),
        other => SyncError::TransferFailed {
            path: path.to_string(),
            message: other.to_string(),
        },
    }
}

/// Deletion is best-effort idempotent: a 550 reply means the entry is
/// already gone. Connectivity loss still surfaces.
fn map_removal_error(path: &str, err: FtpError) -> Result<(), SyncError> {
    match err {
        FtpError::ConnectionError(io) => Err(SyncError::RemoteUnavailable(io.to_string())),
        FtpError::UnexpectedResponse(ref resp) if resp.status == Status::FileUnavailable => Ok(()),
        other => Err(SyncError::Denied(format!("{path}: {other}"))),
    }
}

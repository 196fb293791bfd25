//! SFTP transport adapter
//!
//! The secure-shell file subsystem exposes size and timestamp together
//! in one round-trip, so `stat` and `list` are single calls here.

use crate::transport::{RemoteDirEntry, RemoteTransport};
use crate::types::{RemoteMetadata, SyncError};
use ssh2::{ErrorCode, Session, Sftp};
use std::fs::File;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

// libssh2 SFTP status codes surfaced through ssh2::ErrorCode::SFTP
const SFTP_NO_SUCH_FILE: i32 = 2;
const SFTP_PERMISSION_DENIED: i32 = 3;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote transport over an authenticated SSH session's SFTP channel
pub struct SftpTransport {
    // The session owns the TCP stream; it must stay alive as long as
    // the Sftp handle does.
    _session: Session,
    sftp: Sftp,
}

impl SftpTransport {
    /// Connect, handshake and authenticate with a password.
    pub fn connect(host: &str, port: u16, user: &str, password: &str) -> Result<Self, SyncError> {
        let tcp = open_tcp(host, port)?;

        let mut session = Session::new()
            .map_err(|e| SyncError::RemoteUnavailable(format!("session setup failed: {e}")))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| SyncError::RemoteUnavailable(format!("SSH handshake failed: {e}")))?;

        session
            .userauth_password(user, password)
            .map_err(|e| SyncError::Denied(format!("authentication failed: {e}")))?;
        if !session.authenticated() {
            return Err(SyncError::Denied(format!("authentication failed for {user}")));
        }

        let sftp = session
            .sftp()
            .map_err(|e| SyncError::RemoteUnavailable(format!("SFTP subsystem failed: {e}")))?;

        Ok(Self {
            _session: session,
            sftp,
        })
    }
}

fn open_tcp(host: &str, port: u16) -> Result<TcpStream, SyncError> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| SyncError::RemoteUnavailable(format!("{host}:{port}: {e}")))?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(SyncError::RemoteUnavailable(match last_err {
        Some(e) => format!("{host}:{port}: {e}"),
        None => format!("{host}:{port}: no addresses resolved"),
    }))
}

impl RemoteTransport for SftpTransport {
    fn list(&mut self, path: &str) -> Result<Vec<RemoteDirEntry>, SyncError> {
        let entries = self
            .sftp
            .readdir(Path::new(path))
            .map_err(|e| map_sftp_error(path, e))?;

        Ok(entries
            .into_iter()
            .filter_map(|(entry_path, stat)| {
                let name = entry_path.file_name()?.to_string_lossy().into_owned();
                Some(RemoteDirEntry {
                    name,
                    is_dir: stat.is_dir(),
                    size: stat.size,
                })
            })
            .collect())
    }

    fn stat(&mut self, path: &str) -> Result<Option<RemoteMetadata>, SyncError> {
        match self.sftp.stat(Path::new(path)) {
            Ok(stat) => Ok(Some(RemoteMetadata::new(
                stat.size.unwrap_or(0),
                stat.mtime.map(|m| m as f64),
            ))),
            Err(e) if is_no_such_file(&e) => Ok(None),
            Err(e) => Err(map_sftp_error(path, e)),
        }
    }

    fn get(&mut self, remote_path: &str, local_path: &Path) -> Result<u64, SyncError> {
        let mut remote = self
            .sftp
            .open(Path::new(remote_path))
            .map_err(|e| map_sftp_error(remote_path, e))?;
        let mut local = File::create(local_path).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;

        io::copy(&mut remote, &mut local).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })
    }

    fn put(&mut self, local_path: &Path, remote_path: &str) -> Result<u64, SyncError> {
        let mut local = File::open(local_path).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })?;
        let mut remote = self
            .sftp
            .create(Path::new(remote_path))
            .map_err(|e| map_sftp_error(remote_path, e))?;

        io::copy(&mut local, &mut remote).map_err(|e| SyncError::TransferFailed {
            path: remote_path.to_string(),
            message: e.to_string(),
        })
    }

    fn mkdir_if_absent(&mut self, path: &str) -> Result<(), SyncError> {
        match self.sftp.stat(Path::new(path)) {
            Ok(_) => Ok(()),
            Err(e) if is_no_such_file(&e) => self
                .sftp
                .mkdir(Path::new(path), 0o755)
                .map_err(|e| map_sftp_error(path, e)),
            Err(e) => Err(map_sftp_error(path, e)),
        }
    }

    fn remove(&mut self, path: &str) -> Result<(), SyncError> {
        match self.sftp.unlink(Path::new(path)) {
            Ok(()) => Ok(()),
            Err(e) if is_no_such_file(&e) => Ok(()),
            Err(e) => Err(map_sftp_error(path, e)),
        }
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), SyncError> {
        match self.sftp.rmdir(Path::new(path)) {
            Ok(()) => Ok(()),
            Err(e) if is_no_such_file(&e) => Ok(()),
            Err(e) => Err(map_sftp_error(path, e)),
        }
    }
}

fn is_no_such_file(err: &ssh2::Error) -> bool {
    matches!(err.code(), ErrorCode::SFTP(SFTP_NO_SUCH_FILE))
}

fn map_sftp_error(path: &str, err: ssh2::Error) -> SyncError {
    match err.code() {
        ErrorCode::SFTP(SFTP_NO_SUCH_FILE) => SyncError::NotFound(path.to_string()),
        ErrorCode::SFTP(SFTP_PERMISSION_DENIED) => SyncError::Denied(path.to_string()),
        ErrorCode::SFTP(_) => SyncError::TransferFailed {
            path: path.to_string(),
            message: err.to_string(),
        },
        // session-level failures mean the connection itself is broken
        ErrorCode::Session(_) => SyncError::RemoteUnavailable(err.to_string()),
    }
}

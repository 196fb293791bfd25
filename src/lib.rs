//! # upsync - Remote Directory Synchronization
//!
//! Uploads new or modified files from a local tree to a remote tree
//! over FTP, FTPS or SFTP, optionally deleting remote entries with no
//! local counterpart. Change detection is a size + timestamp
//! heuristic with a 2-second tolerance window; transfers are
//! whole-file and sequential.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod scanner;
pub mod transport;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, ProtocolKind};
pub use diff::{ChangeSet, ChangeStats};
pub use executor::{CancelFlag, SyncOutcome};
pub use transport::RemoteTransport;
pub use types::{DeleteMode, LocalFile, RemoteEntry, SyncError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

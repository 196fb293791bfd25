//! Configuration management

use crate::types::{DeleteMode, SyncError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Wire protocol used to reach the remote tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProtocolKind {
    /// Plaintext FTP
    Ftp,
    /// FTP upgraded to TLS
    Ftps,
    /// SFTP over SSH
    Sftp,
}

impl ProtocolKind {
    /// Well-known port for the protocol
    pub fn default_port(&self) -> u16 {
        match self {
            ProtocolKind::Ftp | ProtocolKind::Ftps => 21,
            ProtocolKind::Sftp => 22,
        }
    }
}

/// Command line interface
#[derive(Parser, Debug)]
#[command(
    name = "upsync",
    version,
    about = "Upload-oriented directory synchronization over FTP, FTPS and SFTP"
)]
pub struct Cli {
    /// Local directory to synchronize from
    pub local_root: PathBuf,

    /// Remote directory to synchronize into (absolute server path)
    pub remote_root: String,

    /// Server hostname
    #[arg(long)]
    pub host: String,

    /// Server port (defaults to the protocol's well-known port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Login user name
    #[arg(long, short = 'u')]
    pub user: String,

    /// Login password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Wire protocol
    #[arg(long, value_enum, default_value_t = ProtocolKind::Sftp)]
    pub protocol: ProtocolKind,

    /// Delete remote files that have no local counterpart
    #[arg(long)]
    pub delete: bool,

    /// Glob patterns to exclude from the local scan (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Compute and show the plan without transferring anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompts
    #[arg(long, short = 'y')]
    pub assume_yes: bool,

    /// Print the computed change set as JSON
    #[arg(long)]
    pub json: bool,
}

/// Global configuration for one sync run
#[derive(Debug, Clone)]
pub struct Config {
    /// Local directory to synchronize from
    pub local_root: PathBuf,

    /// Remote directory to synchronize into
    pub remote_root: String,

    /// Server hostname
    pub host: String,

    /// Server port
    pub port: u16,

    /// Login user name
    pub user: String,

    /// Login password; prompted at connect time when absent
    pub password: Option<String>,

    /// Wire protocol
    pub protocol: ProtocolKind,

    /// How to handle remote-only entries
    pub delete_mode: DeleteMode,

    /// Exclude patterns (globs)
    pub exclude_patterns: Vec<String>,

    /// Show plan, don't execute
    pub dry_run: bool,

    /// Skip confirmation prompts
    pub assume_yes: bool,

    /// Emit the change set as JSON
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_root: PathBuf::new(),
            remote_root: "/".to_string(),
            host: String::new(),
            port: ProtocolKind::Sftp.default_port(),
            user: String::new(),
            password: None,
            protocol: ProtocolKind::Sftp,
            delete_mode: DeleteMode::Keep,
            exclude_patterns: Vec::new(),
            dry_run: false,
            assume_yes: false,
            json: false,
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        if !self.local_root.is_dir() {
            return Err(SyncError::Config(format!(
                "Local root is not a readable directory: {:?}",
                self.local_root
            )));
        }

        // Absolute remote paths keep every transport call independent
        // of server-side working-directory state
        if !self.remote_root.starts_with('/') {
            return Err(SyncError::Config(format!(
                "Remote root must be an absolute path: {}",
                self.remote_root
            )));
        }

        if self.host.is_empty() {
            return Err(SyncError::Config("Host must not be empty".to_string()));
        }

        if self.user.is_empty() {
            return Err(SyncError::Config("User must not be empty".to_string()));
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Config {
            port: cli.port.unwrap_or_else(|| cli.protocol.default_port()),
            local_root: cli.local_root,
            remote_root: cli.remote_root,
            host: cli.host,
            user: cli.user,
            password: cli.password,
            protocol: cli.protocol,
            delete_mode: if cli.delete {
                DeleteMode::Remove
            } else {
                DeleteMode::Keep
            },
            exclude_patterns: cli.exclude,
            dry_run: cli.dry_run,
            assume_yes: cli.assume_yes,
            json: cli.json,
        };

        config.validate()?;
        Ok(config)
    }
}

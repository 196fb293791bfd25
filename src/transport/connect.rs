//! Connection provider
//!
//! Turns validated configuration into an authenticated transport,
//! prompting for the password when it was not supplied up front.

use crate::config::{Config, ProtocolKind};
use crate::transport::{FtpTransport, RemoteTransport, SftpTransport};
use crate::types::SyncError;

/// Open an authenticated transport for the configured protocol.
pub fn open_transport(config: &Config) -> Result<Box<dyn RemoteTransport>, SyncError> {
    let password = match &config.password {
        Some(password) => password.clone(),
        None => prompt_password(&config.user, &config.host)?,
    };

    match config.protocol {
        ProtocolKind::Ftp => Ok(Box::new(FtpTransport::connect(
            &config.host,
            config.port,
            &config.user,
            &password,
            false,
        )?)),
        ProtocolKind::Ftps => Ok(Box::new(FtpTransport::connect(
            &config.host,
            config.port,
            &config.user,
            &password,
            true,
        )?)),
        ProtocolKind::Sftp => Ok(Box::new(SftpTransport::connect(
            &config.host,
            config.port,
            &config.user,
            &password,
        )?)),
    }
}

fn prompt_password(user: &str, host: &str) -> Result<String, SyncError> {
    rpassword::prompt_password(format!("Password for {user}@{host}: "))
        .map_err(|e| SyncError::Config(format!("could not read password: {e}")))
}

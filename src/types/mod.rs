//! Core type definitions for upsync

mod action;
mod entry;
mod error;

pub use action::{DeleteItem, DeleteMode, UploadItem, UploadReason};
pub use entry::{LocalFile, RemoteEntry, RemoteMetadata};
pub use error::SyncError;

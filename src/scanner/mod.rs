//! Tree enumeration: local filesystem walk and remote recursive listing

mod local;
mod remote;

pub use local::{scan_local_tree, ScanProgressCallback};
pub use remote::list_remote_tree;

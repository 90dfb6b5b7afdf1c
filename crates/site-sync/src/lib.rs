//! Site synchronizer for the APK store.
//!
//! Walks the local site directory, drops excluded files, maps every
//! remaining file to its destination on the remote host and uploads the
//! files one at a time through a [`Transport`]. The crate has no network
//! code of its own; `apkshelf-ftp` provides the FTP/FTPS transport.
//!
//! # Pipeline
//!
//! 1. **Validate** the resolved [`SyncConfig`]
//! 2. **Discover** the local tree ([`discover`])
//! 3. **Connect** and prepare the remote root
//! 4. **Transfer** files sequentially ([`transfer_all`])
//! 5. **Close** the connection, whatever happened in 3–4

pub mod config;
pub mod error;
pub mod exclude;
pub mod format;
pub mod layout;
#[cfg(test)]
mod mock;
pub mod scanner;
pub mod sync;
pub mod transfer;
pub mod transport;
pub mod types;

pub use config::{LocalConfig, RemoteConfig, SyncConfig};
pub use error::{ConfigError, SyncError};
pub use exclude::ExclusionPolicy;
pub use format::format_bytes;
pub use layout::{NonPassthroughLayout, RemoteLayout};
pub use scanner::discover;
pub use sync::Synchronizer;
pub use transfer::{Transfer, transfer_all};
pub use transport::{Transport, TransportError, TransportFuture};
pub use types::{FileEntry, SyncEvent, SyncSession, TransferOutcome};

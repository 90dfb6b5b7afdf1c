//! Transport capability the synchronizer uploads through.
//!
//! `apkshelf-ftp` implements it for FTP/FTPS. Keeping it a trait lets
//! the transfer logic be tested against in-memory mocks.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::config::RemoteConfig;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Errors reported by a transport.
///
/// Implementations classify their own failures: a directory that already
/// exists must come back as [`AlreadyExists`](Self::AlreadyExists) so the
/// synchronizer never has to inspect message text.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The server answered with an unexpected reply code.
    #[error("{code} {message}")]
    Reply { code: u32, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not connected")]
    NotConnected,

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Numeric server reply code, when the failure carried one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Reply { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Abstract connection to the remote host.
///
/// Methods take `&self`; implementations keep connection state behind
/// interior mutability. Calls are issued one at a time.
pub trait Transport: Send + Sync {
    /// Opens and authenticates the connection.
    fn connect<'a>(&'a self, remote: &'a RemoteConfig) -> TransportFuture<'a, ()>;

    /// Makes sure `path` and all of its parents exist.
    fn ensure_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()>;

    /// Changes the working directory; later relative paths resolve against it.
    fn change_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()>;

    /// Creates a single directory.
    fn create_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()>;

    /// Uploads the local file to `remote_path`, overwriting it. Returns bytes sent.
    fn upload_from<'a>(
        &'a self,
        local_path: &'a Path,
        remote_path: &'a str,
    ) -> TransportFuture<'a, u64>;

    /// Closes the connection. Must be safe to call when never connected.
    fn close(&self) -> TransportFuture<'_, ()>;
}

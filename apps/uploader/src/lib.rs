//! Shared pieces of the `apkshelf-upload` and `apkshelf-manifest` binaries.

pub mod env;
pub mod report;

use std::future::Future;
use std::io;

use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
///
/// Per-file progress has its own stdout channel (see [`report`]), so only
/// warnings and errors are logged by default.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the `fmt` subscriber on stderr.
///
/// Upload failures and directory warnings reach the console only through
/// here; stdout carries progress and the summary.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Loads `.env` from the working directory, if there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to read .env"),
    }
}

/// Turns interrupt signals into a graceful stop, then a forced one.
///
/// The first signal cancels `cancel` so the run stops after the current
/// file. Returns `true` when a second signal arrives, at which point the
/// caller should exit without waiting for the upload in flight. Returns
/// `false` if listening for signals fails.
pub async fn watch_interrupts<S, F>(cancel: CancellationToken, mut next_signal: S) -> bool
where
    S: FnMut() -> F,
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        warn!(error = %e, "cannot listen for interrupts");
        return false;
    }
    warn!("interrupt received, stopping after the current file (press Ctrl-C again to abort)");
    cancel.cancel();

    match next_signal().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "cannot listen for interrupts");
            false
        }
    }
}

//! Run orchestration: validate, discover, connect, transfer, close.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::scanner::discover;
use crate::transfer::Transfer;
use crate::transport::Transport;
use crate::types::{FileEntry, SyncEvent, SyncSession};

/// Drives one synchronization of the local site to the remote host.
pub struct Synchronizer {
    config: SyncConfig,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,
    cancel: CancellationToken,
}

impl Synchronizer {
    pub fn new(config: SyncConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SyncEvent>> {
        self.events_rx.take()
    }

    /// Token that interrupts the transfer loop before the next file.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Walks the local root and returns the upload list.
    pub async fn discover(&self) -> Result<Vec<FileEntry>, SyncError> {
        let root = self.config.local.root.clone();
        let exclusion = self.config.local.exclusion_policy();
        let layout = self.config.local.remote_layout();

        tokio::task::spawn_blocking({
            let root = root.clone();
            move || discover(&root, &exclusion, &layout)
        })
        .await
        .map_err(|e| SyncError::traversal(root, std::io::Error::other(e)))?
    }

    /// Runs a full synchronization through `transport`.
    ///
    /// Configuration, traversal and connection failures are returned as
    /// errors before any file is uploaded. Once a connection has been
    /// attempted, `transport.close()` runs exactly once regardless of the
    /// outcome.
    pub async fn run(&self, transport: &dyn Transport) -> Result<SyncSession, SyncError> {
        self.config.validate()?;

        info!(root = %self.config.local.root.display(), "scanning files");
        let entries = self.discover().await?;
        let total_bytes: u64 = entries.iter().map(|e| e.size).sum();
        let _ = self.events_tx.send(SyncEvent::Scanned {
            files: entries.len(),
            total_bytes,
        });

        if entries.is_empty() {
            warn!("no files found to upload");
            return Ok(SyncSession::default());
        }
        info!(files = entries.len(), total_bytes, "found files to upload");

        let result = self.run_connected(transport, entries).await;

        match transport.close().await {
            Ok(()) => info!("disconnected"),
            Err(e) => warn!(error = %e, "failed to close connection"),
        }

        result
    }

    async fn run_connected(
        &self,
        transport: &dyn Transport,
        entries: Vec<FileEntry>,
    ) -> Result<SyncSession, SyncError> {
        let remote = &self.config.remote;

        info!(
            host = %remote.host,
            port = remote.port,
            secure = remote.secure,
            "connecting"
        );
        transport
            .connect(remote)
            .await
            .map_err(SyncError::Connection)?;
        info!("connected");

        if !remote.remote_dir.is_empty() {
            info!(dir = %remote.remote_dir, "changing to remote directory");
            transport
                .ensure_dir(&remote.remote_dir)
                .await
                .map_err(SyncError::Connection)?;
            transport
                .change_dir(&remote.remote_dir)
                .await
                .map_err(SyncError::Connection)?;
        }

        let session = Transfer::new(transport)
            .with_cancel(self.cancel.clone())
            .with_events(self.events_tx.clone())
            .run(entries)
            .await;

        info!(
            uploaded = session.uploaded_count,
            failed = session.failed_count(),
            elapsed_secs = session.elapsed.as_secs_f64(),
            "upload finished"
        );

        Ok(session)
    }
}

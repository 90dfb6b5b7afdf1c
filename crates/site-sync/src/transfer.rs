//! Sequential upload of a discovered file list.
//!
//! Files go out one at a time. A failed upload is recorded in the
//! returned [`SyncSession`] and the loop moves on; nothing in here
//! aborts a run.

use std::collections::HashSet;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::format::format_bytes;
use crate::transport::{Transport, TransportError};
use crate::types::{FileEntry, SyncEvent, SyncSession};

/// Uploads `entries` in order through `transport`.
///
/// An empty list returns immediately without touching the transport.
pub async fn transfer_all(transport: &dyn Transport, entries: Vec<FileEntry>) -> SyncSession {
    Transfer::new(transport).run(entries).await
}

/// A single transfer pass over a file list.
///
/// Holds the run-scoped state: the set of remote directories already known
/// to exist, the interrupt token and the optional event sink.
pub struct Transfer<'a> {
    transport: &'a dyn Transport,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<SyncEvent>>,
    known_dirs: HashSet<String>,
}

impl<'a> Transfer<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            cancel: CancellationToken::new(),
            events: None,
            known_dirs: HashSet::new(),
        }
    }

    /// Stops the loop before the next file once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Sends progress events to `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SyncEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs the pass and returns its counters.
    pub async fn run(mut self, entries: Vec<FileEntry>) -> SyncSession {
        let total = entries.len();
        let mut session = SyncSession::new(total);
        if entries.is_empty() {
            return session;
        }

        let started = Instant::now();

        for (index, entry) in entries.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(remaining = total - index, "transfer interrupted");
                session.interrupted = true;
                break;
            }

            if let Some(dir) = entry.remote_dir() {
                self.ensure_remote_dir(dir).await;
            }

            info!(
                local = %entry.local_path.display(),
                remote = %entry.remote_path,
                size = %format_bytes(entry.size),
                "uploading"
            );
            self.emit(SyncEvent::Uploading {
                index: index + 1,
                total,
                local_path: entry.local_path.clone(),
                remote_path: entry.remote_path.clone(),
                size: entry.size,
            });

            match self
                .transport
                .upload_from(&entry.local_path, &entry.remote_path)
                .await
            {
                Ok(_) => {
                    session.record_success(entry.size);
                    info!(
                        remote = %entry.remote_path,
                        "uploaded ({}/{})",
                        session.uploaded_count,
                        total
                    );
                    self.emit(SyncEvent::Uploaded {
                        remote_path: entry.remote_path,
                        uploaded: session.uploaded_count,
                        total,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    error!(local = %entry.local_path.display(), error = %message, "upload failed");
                    self.emit(SyncEvent::Failed {
                        local_path: entry.local_path.clone(),
                        error: message.clone(),
                    });
                    session.record_failure(entry.local_path, message);
                }
            }
        }

        session.elapsed = started.elapsed();
        self.emit(SyncEvent::Finished {
            uploaded: session.uploaded_count,
            failed: session.failed_count(),
            elapsed: session.elapsed,
            interrupted: session.interrupted,
        });

        session
    }

    /// Creates every segment of `dir` from the root inward.
    ///
    /// Failures other than "already exists" are logged and otherwise
    /// ignored; the upload that follows reports the real problem if any.
    async fn ensure_remote_dir(&mut self, dir: &str) {
        let mut current = String::new();

        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            if self.known_dirs.contains(&current) {
                continue;
            }

            match self.transport.create_dir(&current).await {
                Ok(()) => {
                    info!(path = %current, "created remote directory");
                    self.emit(SyncEvent::DirectoryCreated {
                        path: current.clone(),
                    });
                }
                Err(TransportError::AlreadyExists(_)) => {
                    debug!(path = %current, "remote directory exists");
                }
                Err(e) => {
                    warn!(path = %current, error = %e, "could not create remote directory");
                    self.emit(SyncEvent::DirectoryWarning {
                        path: current.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            }

            self.known_dirs.insert(current.clone());
        }
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

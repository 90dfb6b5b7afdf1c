//! Data types for a synchronization run.

use std::path::PathBuf;
use std::time::Duration;

/// A discovered local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub local_path: PathBuf,
    /// Destination relative to the remote root, `/`-separated.
    pub remote_path: String,
    /// Size in bytes at discovery time.
    pub size: u64,
}

impl FileEntry {
    /// Directory part of [`remote_path`](Self::remote_path), if any.
    pub fn remote_dir(&self) -> Option<&str> {
        self.remote_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
    }
}

/// A file that failed to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub file: PathBuf,
    pub error: String,
}

/// Run-scoped counters and failures returned by a transfer.
///
/// `uploaded_count + errors.len()` never exceeds `total_count`, and equals
/// it once a run that was not interrupted has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSession {
    pub uploaded_count: usize,
    pub total_count: usize,
    pub uploaded_bytes: u64,
    pub errors: Vec<TransferOutcome>,
    pub elapsed: Duration,
    /// The loop stopped early because an interrupt was requested.
    pub interrupted: bool,
}

impl SyncSession {
    pub(crate) fn new(total_count: usize) -> Self {
        Self {
            total_count,
            ..Self::default()
        }
    }

    pub(crate) fn record_success(&mut self, size: u64) {
        self.uploaded_count += 1;
        self.uploaded_bytes += size;
    }

    pub(crate) fn record_failure(&mut self, file: PathBuf, error: String) {
        self.errors.push(TransferOutcome { file, error });
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    /// Files that were never attempted.
    pub fn skipped_count(&self) -> usize {
        self.total_count
            .saturating_sub(self.uploaded_count + self.errors.len())
    }

    /// Every file was attempted.
    pub fn is_complete(&self) -> bool {
        self.skipped_count() == 0
    }
}

/// Progress event emitted while synchronizing.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Discovery finished.
    Scanned { files: usize, total_bytes: u64 },
    /// A remote directory was created.
    DirectoryCreated { path: String },
    /// A remote directory could not be created; the upload is still tried.
    DirectoryWarning { path: String, error: String },
    /// An upload is about to start. `index` is 1-based.
    Uploading {
        index: usize,
        total: usize,
        local_path: PathBuf,
        remote_path: String,
        size: u64,
    },
    Uploaded {
        remote_path: String,
        uploaded: usize,
        total: usize,
    },
    Failed { local_path: PathBuf, error: String },
    /// The transfer loop ended.
    Finished {
        uploaded: usize,
        failed: usize,
        elapsed: Duration,
        interrupted: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(remote: &str) -> FileEntry {
        FileEntry {
            local_path: PathBuf::from(remote),
            remote_path: remote.into(),
            size: 1,
        }
    }

    #[test]
    fn remote_dir_of_nested_path() {
        assert_eq!(entry("apks/beta/a.apk").remote_dir(), Some("apks/beta"));
    }

    #[test]
    fn remote_dir_of_root_file() {
        assert_eq!(entry("index.html").remote_dir(), None);
        assert_eq!(entry("/index.html").remote_dir(), None);
    }

    #[test]
    fn session_accounting() {
        let mut session = SyncSession::new(3);
        assert_eq!(session.skipped_count(), 3);
        assert!(!session.is_complete());

        session.record_success(10);
        session.record_failure(PathBuf::from("b"), "boom".into());
        session.record_success(5);

        assert_eq!(session.uploaded_count, 2);
        assert_eq!(session.uploaded_bytes, 15);
        assert_eq!(session.failed_count(), 1);
        assert!(session.is_complete());
    }
}

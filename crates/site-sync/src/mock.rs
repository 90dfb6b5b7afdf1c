//! In-memory transport used by the unit tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use crate::config::RemoteConfig;
use crate::transport::{Transport, TransportError, TransportFuture};

/// Records every call and behaves like a server that overwrites on upload.
#[derive(Default)]
pub(crate) struct MockTransport {
    pub calls: Mutex<Vec<String>>,
    pub dirs: Mutex<HashSet<String>>,
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    /// Upload failures keyed by remote path.
    pub upload_failures: Mutex<HashMap<String, String>>,
    /// `create_dir` failures (other than "already exists") keyed by path.
    pub mkdir_failures: Mutex<HashMap<String, String>>,
    pub fail_connect: Mutex<Option<String>>,
    pub fail_change_dir: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upload(&self, remote_path: &str, message: &str) {
        self.upload_failures
            .lock()
            .unwrap()
            .insert(remote_path.into(), message.into());
    }

    pub fn fail_mkdir(&self, path: &str, message: &str) {
        self.mkdir_failures
            .lock()
            .unwrap()
            .insert(path.into(), message.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Transport for MockTransport {
    fn connect<'a>(&'a self, remote: &'a RemoteConfig) -> TransportFuture<'a, ()> {
        self.record(format!("connect {}", remote.address()));
        Box::pin(async move {
            match self.fail_connect.lock().unwrap().clone() {
                Some(message) => Err(TransportError::Other(message)),
                None => Ok(()),
            }
        })
    }

    fn ensure_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        self.record(format!("ensure_dir {path}"));
        Box::pin(async move { Ok(()) })
    }

    fn change_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        self.record(format!("change_dir {path}"));
        Box::pin(async move {
            match self.fail_change_dir.lock().unwrap().clone() {
                Some(message) => Err(TransportError::Reply { code: 550, message }),
                None => Ok(()),
            }
        })
    }

    fn create_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        self.record(format!("create_dir {path}"));
        Box::pin(async move {
            if let Some(message) = self.mkdir_failures.lock().unwrap().get(path) {
                return Err(TransportError::Reply {
                    code: 553,
                    message: message.clone(),
                });
            }
            if !self.dirs.lock().unwrap().insert(path.to_string()) {
                return Err(TransportError::AlreadyExists(path.to_string()));
            }
            Ok(())
        })
    }

    fn upload_from<'a>(
        &'a self,
        local_path: &'a Path,
        remote_path: &'a str,
    ) -> TransportFuture<'a, u64> {
        self.record(format!("upload {remote_path}"));
        Box::pin(async move {
            if let Some(message) = self.upload_failures.lock().unwrap().get(remote_path) {
                return Err(TransportError::Other(message.clone()));
            }
            let data = std::fs::read(local_path)?;
            let len = data.len() as u64;
            self.files
                .lock()
                .unwrap()
                .insert(remote_path.to_string(), data);
            Ok(len)
        })
    }

    fn close(&self) -> TransportFuture<'_, ()> {
        self.record("close".into());
        Box::pin(async move { Ok(()) })
    }
}

//! `Transport` implementation on top of `suppaftp`.

use std::fs::File;
use std::io::BufReader;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apkshelf_site_sync::{RemoteConfig, Transport, TransportError, TransportFuture};
use native_tls::TlsConnector;
use suppaftp::types::FileType;
use suppaftp::{FtpError, NativeTlsConnector, NativeTlsFtpStream};
use tracing::{debug, info, warn};

use crate::reply::{is_already_exists, parse_reply};

/// Connect, read and write timeout of the control and data connections.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type SharedStream = Arc<Mutex<Option<NativeTlsFtpStream>>>;

/// FTP transport holding one control connection.
///
/// Plain FTP and explicit FTPS (`AUTH TLS`) share the same stream type;
/// the connection is only upgraded when [`RemoteConfig::secure`] is set.
pub struct FtpTransport {
    stream: SharedStream,
    timeout: Duration,
}

impl Default for FtpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FtpTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            stream: Arc::new(Mutex::new(None)),
            timeout,
        }
    }

    /// Returns `true` while a control connection is open.
    pub fn is_connected(&self) -> bool {
        self.stream.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Runs `op` against the open connection on the blocking pool.
    async fn with_stream<T, F>(&self, op: F) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut NativeTlsFtpStream) -> Result<T, TransportError> + Send + 'static,
    {
        let stream = Arc::clone(&self.stream);
        tokio::task::spawn_blocking(move || {
            let mut guard = stream.lock().map_err(|_| poisoned())?;
            let ftp = guard.as_mut().ok_or(TransportError::NotConnected)?;
            op(ftp)
        })
        .await
        .map_err(|e| TransportError::Other(format!("task join error: {e}")))?
    }
}

impl Transport for FtpTransport {
    fn connect<'a>(&'a self, remote: &'a RemoteConfig) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let remote = remote.clone();
            let timeout = self.timeout;
            let ftp = tokio::task::spawn_blocking(move || open_stream(&remote, timeout))
                .await
                .map_err(|e| TransportError::Other(format!("task join error: {e}")))??;

            let previous = self.stream.lock().map_err(|_| poisoned())?.replace(ftp);
            if previous.is_some() {
                warn!("replaced an open FTP connection");
            }
            Ok(())
        })
    }

    fn ensure_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        let path = path.to_string();
        Box::pin(async move {
            self.with_stream(move |ftp| {
                for prefix in dir_prefixes(&path) {
                    match mkdir(ftp, &prefix) {
                        Ok(()) => debug!(path = %prefix, "created directory"),
                        Err(TransportError::AlreadyExists(_)) => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            })
            .await
        })
    }

    fn change_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        let path = path.to_string();
        Box::pin(async move {
            self.with_stream(move |ftp| ftp.cwd(&path).map_err(map_ftp_error))
                .await
        })
    }

    fn create_dir<'a>(&'a self, path: &'a str) -> TransportFuture<'a, ()> {
        let path = path.to_string();
        Box::pin(async move { self.with_stream(move |ftp| mkdir(ftp, &path)).await })
    }

    fn upload_from<'a>(
        &'a self,
        local_path: &'a Path,
        remote_path: &'a str,
    ) -> TransportFuture<'a, u64> {
        let local_path = local_path.to_path_buf();
        let remote_path = remote_path.to_string();
        Box::pin(async move {
            self.with_stream(move |ftp| {
                let mut reader = BufReader::new(File::open(&local_path)?);
                ftp.put_file(&remote_path, &mut reader)
                    .map_err(map_ftp_error)
            })
            .await
        })
    }

    fn close(&self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let Some(mut ftp) = self.stream.lock().map_err(|_| poisoned())?.take() else {
                return Ok(());
            };
            tokio::task::spawn_blocking(move || ftp.quit().map_err(map_ftp_error))
                .await
                .map_err(|e| TransportError::Other(format!("task join error: {e}")))?
        })
    }
}

/// Connects, optionally upgrades to TLS, logs in and selects binary mode.
fn open_stream(
    remote: &RemoteConfig,
    timeout: Duration,
) -> Result<NativeTlsFtpStream, TransportError> {
    let addr = (remote.host.as_str(), remote.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| TransportError::Other(format!("cannot resolve {}", remote.host)))?;

    let mut ftp = NativeTlsFtpStream::connect_timeout(addr, timeout)
        .map_err(map_ftp_error)?
        .passive_stream_builder(move |data_addr| open_data_stream(data_addr, timeout));
    ftp.get_ref().set_read_timeout(Some(timeout))?;
    ftp.get_ref().set_write_timeout(Some(timeout))?;

    if remote.secure {
        let connector = TlsConnector::new()
            .map_err(|e| TransportError::Other(format!("TLS setup failed: {e}")))?;
        ftp = ftp
            .into_secure(NativeTlsConnector::from(connector), &remote.host)
            .map_err(map_ftp_error)?;
        debug!("control connection secured");
    }

    ftp.login(&remote.user, &remote.password)
        .map_err(map_ftp_error)?;
    ftp.transfer_type(FileType::Binary).map_err(map_ftp_error)?;

    info!(addr = %addr, secure = remote.secure, "FTP session ready");
    Ok(ftp)
}

/// Passive data connection with the same timeouts as the control one.
fn open_data_stream(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, FtpError> {
    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(FtpError::ConnectionError)?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;
    Ok(stream)
}

fn mkdir(ftp: &mut NativeTlsFtpStream, path: &str) -> Result<(), TransportError> {
    ftp.mkdir(path).map_err(|err| match err {
        FtpError::UnexpectedResponse(resp) => {
            let (code, message) = parse_reply(&String::from_utf8_lossy(&resp.body));
            if is_already_exists(code, &message) {
                TransportError::AlreadyExists(path.to_string())
            } else {
                TransportError::Reply {
                    code: code.unwrap_or_else(|| resp.status.code()),
                    message,
                }
            }
        }
        other => map_ftp_error(other),
    })
}

fn map_ftp_error(err: FtpError) -> TransportError {
    match err {
        FtpError::ConnectionError(e) => TransportError::Io(e),
        FtpError::UnexpectedResponse(resp) => {
            let (code, message) = parse_reply(&String::from_utf8_lossy(&resp.body));
            TransportError::Reply {
                code: code.unwrap_or_else(|| resp.status.code()),
                message,
            }
        }
        other => TransportError::Other(other.to_string()),
    }
}

fn poisoned() -> TransportError {
    TransportError::Other("FTP connection lock poisoned".into())
}

/// Cumulative prefixes of `path`, root first. A leading `/` is kept.
fn dir_prefixes(path: &str) -> Vec<String> {
    let absolute = path.starts_with('/');
    let mut current = String::new();
    let mut prefixes = Vec::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        prefixes.push(current.clone());
    }

    prefixes
}

//! Resolved synchronizer configuration.
//!
//! Loading (environment, `.env`) is the binary's job; this module only
//! holds the resolved values, their defaults and validation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::exclude::ExclusionPolicy;
use crate::layout::{NonPassthroughLayout, RemoteLayout};

/// Default FTP control port.
pub const DEFAULT_PORT: u16 = 21;

/// Default remote root the site is published under.
pub const DEFAULT_REMOTE_DIR: &str = "/public_html";

/// Default passthrough subdirectory (kept as-is on the remote side).
pub const DEFAULT_PASSTHROUGH_DIR: &str = "apks";

/// Names never published: tooling, VCS metadata, secrets and backups.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    "ftp-upload.js",
    "package.json",
    "package-lock.json",
    ".gitignore",
    "index2.html",
    ".env",
    ".env.example",
    "env-example.txt",
];

/// Extensions never published.
pub const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] = &[".md"];

/// Remote host settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    /// Upgrade the control connection to TLS (explicit FTPS).
    pub secure: bool,
    /// Remote directory every remote path is relative to.
    pub remote_dir: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: String::new(),
            port: DEFAULT_PORT,
            secure: false,
            remote_dir: DEFAULT_REMOTE_DIR.into(),
        }
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("remote_dir", &self.remote_dir)
            .finish()
    }
}

impl RemoteConfig {
    /// `host:port` for the control connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Local tree settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Root of the site on disk.
    pub root: PathBuf,
    /// Subdirectory whose structure is preserved remotely. Empty disables it.
    pub passthrough_dir: String,
    /// What happens to files outside the passthrough subdirectory.
    pub layout: NonPassthroughLayout,
    pub exclude_patterns: Vec<String>,
    pub exclude_extensions: Vec<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            passthrough_dir: DEFAULT_PASSTHROUGH_DIR.into(),
            layout: NonPassthroughLayout::default(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            exclude_extensions: DEFAULT_EXCLUDE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl LocalConfig {
    /// Builds the exclusion policy from the configured lists.
    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy::new(&self.exclude_patterns, &self.exclude_extensions)
    }

    /// Builds the remote path mapping policy.
    pub fn remote_layout(&self) -> RemoteLayout {
        RemoteLayout::new(Some(self.passthrough_dir.as_str()), self.layout)
    }
}

/// Complete configuration for one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub remote: RemoteConfig,
    pub local: LocalConfig,
}

impl SyncConfig {
    /// Checks that everything needed to connect is present.
    ///
    /// All missing credentials are reported at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.remote.host.trim().is_empty() {
            missing.push("host");
        }
        if self.remote.user.trim().is_empty() {
            missing.push("user");
        }
        if self.remote.password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        if self.remote.port == 0 {
            return Err(ConfigError::Invalid {
                field: "port",
                reason: "must be between 1 and 65535".into(),
            });
        }
        if self.local.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "root",
                reason: "local directory is empty".into(),
            });
        }

        Ok(())
    }
}

//! Local-to-remote path mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placement of files that live outside the passthrough subdirectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonPassthroughLayout {
    /// Base name only, directly under the remote root.
    #[default]
    Flatten,
    /// Same relative path as on disk.
    Preserve,
}

impl fmt::Display for NonPassthroughLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flatten => f.write_str("flatten"),
            Self::Preserve => f.write_str("preserve"),
        }
    }
}

impl FromStr for NonPassthroughLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flatten" => Ok(Self::Flatten),
            "preserve" => Ok(Self::Preserve),
            other => Err(format!(
                "unknown layout {other:?}, expected flatten or preserve"
            )),
        }
    }
}

/// Maps relative local paths to remote paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    passthrough_dir: Option<String>,
    other: NonPassthroughLayout,
}

impl Default for RemoteLayout {
    fn default() -> Self {
        Self::new(
            Some(crate::config::DEFAULT_PASSTHROUGH_DIR),
            NonPassthroughLayout::Flatten,
        )
    }
}

impl RemoteLayout {
    /// Creates a layout. A blank `passthrough_dir` disables passthrough.
    pub fn new(passthrough_dir: Option<&str>, other: NonPassthroughLayout) -> Self {
        let passthrough_dir = passthrough_dir
            .map(|d| d.replace('\\', "/").trim_matches('/').to_string())
            .filter(|d| !d.is_empty());
        Self {
            passthrough_dir,
            other,
        }
    }

    pub fn passthrough_dir(&self) -> Option<&str> {
        self.passthrough_dir.as_deref()
    }

    /// Returns `true` if `relative_path` lies inside the passthrough subdirectory.
    pub fn is_passthrough(&self, relative_path: &str) -> bool {
        let normalized = relative_path.replace('\\', "/");
        self.passthrough_dir.as_deref().is_some_and(|dir| {
            normalized
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Computes the forward-slash remote path for a relative local file path.
    pub fn remote_path(&self, relative_path: &str) -> String {
        let normalized = relative_path.replace('\\', "/");
        if self.is_passthrough(&normalized) || self.other == NonPassthroughLayout::Preserve {
            return normalized;
        }
        normalized
            .rsplit('/')
            .next()
            .unwrap_or(&normalized)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_keeps_structure() {
        let layout = RemoteLayout::default();
        assert_eq!(layout.remote_path("apks/a.apk"), "apks/a.apk");
        assert_eq!(layout.remote_path("apks/beta/b.apk"), "apks/beta/b.apk");
    }

    #[test]
    fn passthrough_normalizes_separators() {
        let layout = RemoteLayout::default();
        assert_eq!(layout.remote_path("apks\\beta\\b.apk"), "apks/beta/b.apk");
    }

    #[test]
    fn other_files_are_flattened() {
        let layout = RemoteLayout::default();
        assert_eq!(layout.remote_path("index.html"), "index.html");
        assert_eq!(layout.remote_path("css/site/styles.css"), "styles.css");
    }

    #[test]
    fn prefix_must_be_a_whole_segment() {
        let layout = RemoteLayout::default();
        assert!(!layout.is_passthrough("apks-old/a.apk"));
        assert!(!layout.is_passthrough("apks"));
        assert_eq!(layout.remote_path("apks-old/a.apk"), "a.apk");
    }

    #[test]
    fn preserve_keeps_every_path() {
        let layout = RemoteLayout::new(Some("apks"), NonPassthroughLayout::Preserve);
        assert_eq!(layout.remote_path("css/styles.css"), "css/styles.css");
    }

    #[test]
    fn blank_passthrough_disables_it() {
        let layout = RemoteLayout::new(Some(""), NonPassthroughLayout::Flatten);
        assert_eq!(layout.passthrough_dir(), None);
        assert_eq!(layout.remote_path("apks/a.apk"), "a.apk");
    }

    #[test]
    fn passthrough_dir_is_trimmed() {
        let layout = RemoteLayout::new(Some("/downloads/"), NonPassthroughLayout::Flatten);
        assert_eq!(layout.passthrough_dir(), Some("downloads"));
        assert_eq!(layout.remote_path("downloads/x.apk"), "downloads/x.apk");
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!("Flatten".parse(), Ok(NonPassthroughLayout::Flatten));
        assert_eq!(" preserve ".parse(), Ok(NonPassthroughLayout::Preserve));
        assert!("mirror".parse::<NonPassthroughLayout>().is_err());
        assert_eq!(NonPassthroughLayout::Preserve.to_string(), "preserve");
    }
}

//! Exclusion rules applied during discovery.

use std::collections::HashSet;
use std::path::Path;

use crate::config::{DEFAULT_EXCLUDE_EXTENSIONS, DEFAULT_EXCLUDE_PATTERNS};

/// Decides which relative paths are left out of a sync.
///
/// A path is excluded when it contains any pattern as a substring, when
/// its base name equals a pattern, or when its extension (compared
/// case-insensitively, leading dot included) is in the extension set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    patterns: Vec<String>,
    extensions: HashSet<String>,
}

impl ExclusionPolicy {
    /// Creates a policy from name patterns and extensions.
    ///
    /// Empty patterns are dropped since they would match every path.
    /// Extensions are lowercased and given a leading dot if missing.
    pub fn new<P, E>(
        patterns: impl IntoIterator<Item = P>,
        extensions: impl IntoIterator<Item = E>,
    ) -> Self
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let extensions = extensions
            .into_iter()
            .filter_map(|e| {
                let ext = e.as_ref().trim().to_lowercase();
                match ext.as_str() {
                    "" | "." => None,
                    _ if ext.starts_with('.') => Some(ext),
                    _ => Some(format!(".{ext}")),
                }
            })
            .collect();

        Self {
            patterns,
            extensions,
        }
    }

    /// The rules the APK site has always shipped with.
    pub fn site_defaults() -> Self {
        Self::new(DEFAULT_EXCLUDE_PATTERNS, DEFAULT_EXCLUDE_EXTENSIONS)
    }

    /// Returns `true` if `relative_path` must not be uploaded.
    ///
    /// `relative_path` is relative to the traversal root; both `/` and `\`
    /// separators are accepted.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        let normalized = relative_path.replace('\\', "/");
        let base_name = normalized.rsplit('/').next().unwrap_or(&normalized);

        let by_name = self
            .patterns
            .iter()
            .any(|p| normalized.contains(p.as_str()) || base_name == p);

        by_name || self.excluded_extension(base_name)
    }

    fn excluded_extension(&self, base_name: &str) -> bool {
        if self.extensions.is_empty() {
            return false;
        }
        Path::new(base_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

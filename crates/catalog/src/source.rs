//! Where catalog records come from.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use apkshelf_site_sync::format_bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CatalogError;
use crate::record::{AppRecord, DEFAULT_CATEGORY, DEFAULT_ICON};

/// Boxed future returned by [`CatalogSource::load`].
pub type CatalogFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<AppRecord>, CatalogError>> + Send + 'a>>;

/// Supplies the app records shown by the store.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> CatalogFuture<'_>;
}

/// Reads records from a JSON manifest (an array of [`AppRecord`]).
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for ManifestSource {
    fn load(&self) -> CatalogFuture<'_> {
        Box::pin(async move {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| CatalogError::io(&self.path, e))?;
            let apps: Vec<AppRecord> =
                serde_json::from_str(&content).map_err(|source| CatalogError::Manifest {
                    path: self.path.clone(),
                    source,
                })?;
            debug!(path = %self.path.display(), apps = apps.len(), "manifest loaded");
            Ok(apps)
        })
    }
}

/// Builds records from the `.apk` files found in a folder.
///
/// Names come from the file stem (`task-manager-pro-v1.5.3.apk` becomes
/// "Task Manager Pro", version `1.5.3`); size and date from file metadata.
#[derive(Debug, Clone)]
pub struct ApkDirectorySource {
    dir: PathBuf,
}

impl ApkDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogSource for ApkDirectorySource {
    fn load(&self) -> CatalogFuture<'_> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(&self.dir)
                .await
                .map_err(|e| CatalogError::io(&self.dir, e))?;

            let mut found = Vec::new();
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| CatalogError::io(&self.dir, e))?
            {
                let filename = entry.file_name().to_string_lossy().into_owned();
                if !is_apk(&filename) {
                    continue;
                }
                let metadata = entry
                    .metadata()
                    .await
                    .map_err(|e| CatalogError::io(entry.path(), e))?;
                if !metadata.is_file() {
                    continue;
                }
                let modified = metadata
                    .modified()
                    .ok()
                    .map(|t| DateTime::<Utc>::from(t).date_naive());
                found.push((filename, metadata.len(), modified));
            }
            found.sort_by(|a, b| a.0.cmp(&b.0));

            let apps = found
                .into_iter()
                .zip(1..)
                .map(|((filename, len, modified), id)| {
                    let (name, version) = describe_filename(&filename);
                    AppRecord {
                        id,
                        name,
                        description: String::new(),
                        category: DEFAULT_CATEGORY.into(),
                        version,
                        size: format_bytes(len),
                        icon: DEFAULT_ICON.into(),
                        filename,
                        download_count: 0,
                        last_updated: modified,
                    }
                })
                .collect::<Vec<_>>();

            debug!(dir = %self.dir.display(), apps = apps.len(), "APK folder scanned");
            Ok(apps)
        })
    }
}

fn is_apk(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("apk"))
}

/// Splits an APK file name into a display name and a version.
fn describe_filename(filename: &str) -> (String, String) {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (base, version) = match stem.rsplit_once(['-', '_']) {
        Some((base, tail)) if is_version(tail) => (
            base.to_string(),
            tail.trim_start_matches(['v', 'V']).to_string(),
        ),
        _ => (stem.clone(), String::new()),
    };

    let name = base
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    (name, version)
}

fn is_version(tail: &str) -> bool {
    let digits = tail.trim_start_matches(['v', 'V']);
    digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn names_from_filenames() {
        assert_eq!(
            describe_filename("task-manager-pro-v1.5.3.apk"),
            ("Task Manager Pro".into(), "1.5.3".into())
        );
        assert_eq!(
            describe_filename("photo_editor_2.0.apk"),
            ("Photo Editor".into(), "2.0".into())
        );
        assert_eq!(
            describe_filename("social-connect.apk"),
            ("Social Connect".into(), String::new())
        );
        assert_eq!(describe_filename("v2.apk"), ("V2".into(), String::new()));
    }

    #[test]
    fn apk_extension_is_case_insensitive() {
        assert!(is_apk("game.APK"));
        assert!(!is_apk("game.apk.txt"));
        assert!(!is_apk("apk"));
    }

    #[tokio::test]
    async fn scans_apk_folder() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zeta-v1.0.apk"), vec![0u8; 1536]).unwrap();
        fs::write(dir.path().join("alpha.apk"), b"APK").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip").unwrap();
        fs::create_dir(dir.path().join("old.apk")).unwrap();

        let apps = ApkDirectorySource::new(dir.path()).load().await.unwrap();

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, 1);
        assert_eq!(apps[0].filename, "alpha.apk");
        assert_eq!(apps[0].size, "3 Bytes");
        assert_eq!(apps[1].id, 2);
        assert_eq!(apps[1].name, "Zeta");
        assert_eq!(apps[1].version, "1.0");
        assert_eq!(apps[1].size, "1.5 KB");
        assert!(apps[1].last_updated.is_some());
    }

    #[tokio::test]
    async fn missing_apk_folder_is_an_error() {
        let result = ApkDirectorySource::new("/nonexistent/apks").load().await;
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[tokio::test]
    async fn loads_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(
            &path,
            r#"[{"id": 1, "name": "A", "filename": "a.apk", "category": "games"}]"#,
        )
        .unwrap();

        let apps = ManifestSource::new(&path).load().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].category, "games");
    }

    #[tokio::test]
    async fn malformed_manifest_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ManifestSource::new(&path).load().await;
        assert!(matches!(result, Err(CatalogError::Manifest { .. })));
    }
}

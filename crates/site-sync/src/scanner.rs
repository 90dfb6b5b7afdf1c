//! Local tree discovery.
//!
//! Recursively walks the site directory and produces the upload list.
//! Excluded entries are dropped before they are read, so an excluded
//! directory is never descended into.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::SyncError;
use crate::exclude::ExclusionPolicy;
use crate::layout::RemoteLayout;
use crate::types::FileEntry;

/// Scans `root` recursively and returns the files to upload.
///
/// Entries of each directory are visited in file-name order, so the result
/// is deterministic. Remote paths use `/` as separator on every platform.
pub fn discover(
    root: &Path,
    exclusion: &ExclusionPolicy,
    layout: &RemoteLayout,
) -> Result<Vec<FileEntry>, SyncError> {
    let mut files = Vec::new();
    walk_dir(root, root, exclusion, layout, &mut files)?;

    warn_on_collisions(&files);
    debug!(
        root = %root.display(),
        files = files.len(),
        total_bytes = files.iter().map(|f| f.size).sum::<u64>(),
        "scan complete"
    );

    Ok(files)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    exclusion: &ExclusionPolicy,
    layout: &RemoteLayout,
    files: &mut Vec<FileEntry>,
) -> Result<(), SyncError> {
    let mut entries = std::fs::read_dir(current)
        .map_err(|e| SyncError::traversal(current, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SyncError::traversal(current, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let rel_path = path
            .strip_prefix(root)
            .map_err(|e| SyncError::traversal(&path, std::io::Error::other(e)))?;
        let rel_str = rel_path.to_string_lossy().replace('\\', "/");

        if exclusion.is_excluded(&rel_str) {
            trace!(path = %rel_str, "excluded");
            continue;
        }

        // Follow symlinks like a regular stat; dangling links are skipped.
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if is_dangling_link(&path) => {
                warn!(path = %rel_str, error = %e, "skipping dangling symlink");
                continue;
            }
            Err(e) => return Err(SyncError::traversal(&path, e)),
        };

        if metadata.is_dir() {
            walk_dir(root, &path, exclusion, layout, files)?;
        } else if metadata.is_file() {
            files.push(FileEntry {
                remote_path: layout.remote_path(&rel_str),
                local_path: path,
                size: metadata.len(),
            });
        } else {
            trace!(path = %rel_str, "skipping special file");
        }
    }

    Ok(())
}

fn is_dangling_link(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

/// Flattening can send two local files to the same remote name; the later
/// upload wins on the server.
fn warn_on_collisions(files: &[FileEntry]) {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    for file in files {
        if let Some(first) = seen.insert(&file.remote_path, &file.local_path) {
            warn!(
                remote = %file.remote_path,
                first = %first.display(),
                second = %file.local_path.display(),
                "two local files map to the same remote path"
            );
        }
    }
}

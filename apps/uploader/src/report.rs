//! Console output: progress lines and the final summary.

use std::fmt::Write;

use apkshelf_site_sync::{SyncEvent, SyncSession, format_bytes};

/// One human-readable stdout line per event, or `None` for events not shown.
///
/// Failures and directory warnings are left to the log on stderr, and the
/// failures are listed again in the [`summary`].
pub fn progress_line(event: &SyncEvent) -> Option<String> {
    let line = match event {
        SyncEvent::Scanned { files, total_bytes } => format!(
            "Found {files} files to upload ({})",
            format_bytes(*total_bytes)
        ),
        SyncEvent::DirectoryCreated { path } => format!("Created directory: {path}"),
        SyncEvent::Uploading {
            index,
            total,
            local_path,
            remote_path,
            size,
        } => format!(
            "[{index}/{total}] Uploading: {} -> {remote_path} ({})",
            local_path.display(),
            format_bytes(*size)
        ),
        SyncEvent::DirectoryWarning { .. }
        | SyncEvent::Failed { .. }
        | SyncEvent::Uploaded { .. }
        | SyncEvent::Finished { .. } => return None,
    };
    Some(line)
}

/// Final summary block: counts, elapsed time and every failure.
pub fn summary(session: &SyncSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nUpload summary:");
    let _ = writeln!(
        out,
        "  Uploaded: {} files ({})",
        session.uploaded_count,
        format_bytes(session.uploaded_bytes)
    );
    let _ = writeln!(out, "  Failed:   {} files", session.failed_count());
    if session.interrupted {
        let _ = writeln!(
            out,
            "  Skipped:  {} files (interrupted)",
            session.skipped_count()
        );
    }
    let _ = writeln!(
        out,
        "  Time:     {:.2} seconds",
        session.elapsed.as_secs_f64()
    );

    if !session.errors.is_empty() {
        let _ = writeln!(out, "\nFailed uploads:");
        for failure in &session.errors {
            let _ = writeln!(out, "  {}: {}", failure.file.display(), failure.error);
        }
    }

    out
}

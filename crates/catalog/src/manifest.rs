//! Regeneration of the `apps.json` manifest.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::CatalogError;
use crate::record::AppRecord;

/// Merges a curated manifest with a fresh scan of the APK folder.
///
/// Records whose APK is still present keep their curated fields and get
/// the scanned size (and date, when known). New APKs are appended in scan
/// order, records whose APK disappeared are dropped, and ids are
/// renumbered from 1.
pub fn merge_manifest(existing: Vec<AppRecord>, scanned: Vec<AppRecord>) -> Vec<AppRecord> {
    let mut scanned_by_name: HashMap<String, AppRecord> = scanned
        .iter()
        .map(|app| (app.filename.clone(), app.clone()))
        .collect();

    let mut merged = Vec::with_capacity(scanned.len());

    for mut app in existing {
        let Some(fresh) = scanned_by_name.remove(&app.filename) else {
            info!(filename = %app.filename, "dropping record without APK");
            continue;
        };
        app.size = fresh.size;
        if fresh.last_updated.is_some() {
            app.last_updated = fresh.last_updated;
        }
        merged.push(app);
    }

    for app in scanned {
        if let Some(fresh) = scanned_by_name.remove(&app.filename) {
            info!(filename = %fresh.filename, "adding new APK");
            merged.push(fresh);
        }
    }

    for (app, id) in merged.iter_mut().zip(1..) {
        app.id = id;
    }

    merged
}

/// Writes `apps` as pretty-printed JSON.
pub async fn write_manifest(path: &Path, apps: &[AppRecord]) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(apps).map_err(|source| CatalogError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, json + "\n")
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    info!(path = %path.display(), apps = apps.len(), "manifest written");
    Ok(())
}

//! `apkshelf-manifest`: rebuilds `apps.json` from the APK folder.
//!
//! Curated fields of existing records are kept; new APKs are appended and
//! records whose APK is gone are dropped.

use std::path::PathBuf;

use anyhow::Context;
use apkshelf_catalog::{
    APK_DIR, ApkDirectorySource, CatalogSource, MANIFEST_FILE, ManifestSource, merge_manifest,
    write_manifest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    apkshelf_uploader::init_tracing();
    apkshelf_uploader::load_dotenv();

    let apk_dir =
        PathBuf::from(std::env::var("CATALOG_APK_DIR").unwrap_or_else(|_| APK_DIR.into()));
    let manifest_path =
        PathBuf::from(std::env::var("CATALOG_MANIFEST").unwrap_or_else(|_| MANIFEST_FILE.into()));

    let scanned = ApkDirectorySource::new(&apk_dir)
        .load()
        .await
        .with_context(|| format!("scanning {}", apk_dir.display()))?;

    let existing = if manifest_path.exists() {
        ManifestSource::new(&manifest_path)
            .load()
            .await
            .context("reading existing manifest")?
    } else {
        Vec::new()
    };
    let previous = existing.len();

    let merged = merge_manifest(existing, scanned);
    write_manifest(&manifest_path, &merged)
        .await
        .context("writing manifest")?;

    println!(
        "{}: {} apps (was {previous})",
        manifest_path.display(),
        merged.len()
    );
    Ok(())
}

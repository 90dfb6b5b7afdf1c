//! App catalog for the APK store.
//!
//! The store front-end lists app records, filters them by category and
//! search term, and links each one to its APK under `apks/`. This crate
//! holds that logic with the data source injected through
//! [`CatalogSource`], so it can come from a curated `apps.json` manifest
//! or from a scan of the APK folder.

mod error;
mod filter;
mod manifest;
mod record;
mod source;

pub use error::CatalogError;
pub use filter::{Catalog, CatalogFilter};
pub use manifest::{merge_manifest, write_manifest};
pub use record::{AppRecord, DEFAULT_CATEGORY, DEFAULT_ICON, download_url};
pub use source::{ApkDirectorySource, CatalogFuture, CatalogSource, ManifestSource};

/// Folder (and URL prefix) APK files are served from.
pub const APK_DIR: &str = "apks";

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "apps.json";

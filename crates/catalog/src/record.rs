//! App record model shared with the store front-end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::APK_DIR;

/// Category assigned when none is known.
pub const DEFAULT_CATEGORY: &str = "other";

/// Font Awesome icon class used when none is set.
pub const DEFAULT_ICON: &str = "fas fa-mobile-alt";

/// One app offered for download.
///
/// Field names serialize in camelCase, matching what the site's script
/// reads (`downloadCount`, `lastUpdated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub version: String,
    /// Display size, e.g. `"45.2 MB"`.
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// APK file name inside the APK folder.
    pub filename: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.into()
}

fn default_icon() -> String {
    DEFAULT_ICON.into()
}

/// Site-relative URL the APK is downloaded from.
pub fn download_url(app: &AppRecord) -> String {
    format!("{APK_DIR}/{}", app.filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_front_end_shape() {
        let json = r#"{
            "id": 1,
            "name": "Example Game",
            "description": "An exciting adventure game.",
            "category": "games",
            "version": "2.1.0",
            "size": "45.2 MB",
            "icon": "fas fa-gamepad",
            "filename": "example-game.apk",
            "downloadCount": 1250,
            "lastUpdated": "2024-01-15"
        }"#;
        let app: AppRecord = serde_json::from_str(json).unwrap();
        assert_eq!(app.download_count, 1250);
        assert_eq!(app.last_updated, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(download_url(&app), "apks/example-game.apk");
    }

    #[test]
    fn minimal_record_gets_defaults() {
        let app: AppRecord =
            serde_json::from_str(r#"{"id": 7, "name": "Tool", "filename": "tool.apk"}"#).unwrap();
        assert_eq!(app.category, DEFAULT_CATEGORY);
        assert_eq!(app.icon, DEFAULT_ICON);
        assert!(app.description.is_empty());
        assert_eq!(app.last_updated, None);

        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains("\"downloadCount\":0"));
        assert!(!json.contains("lastUpdated"));
    }
}

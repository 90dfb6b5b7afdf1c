//! Builds a [`SyncConfig`] from environment variables.

use std::path::PathBuf;

use apkshelf_site_sync::config::DEFAULT_PORT;
use apkshelf_site_sync::{ConfigError, NonPassthroughLayout, SyncConfig};
use tracing::warn;

pub const FTP_HOST: &str = "FTP_HOST";
pub const FTP_USER: &str = "FTP_USER";
pub const FTP_PASSWORD: &str = "FTP_PASSWORD";
pub const FTP_PORT: &str = "FTP_PORT";
pub const FTP_SECURE: &str = "FTP_SECURE";
pub const FTP_REMOTE_DIR: &str = "FTP_REMOTE_DIR";
pub const SYNC_LOCAL_DIR: &str = "SYNC_LOCAL_DIR";
pub const SYNC_PASSTHROUGH_DIR: &str = "SYNC_PASSTHROUGH_DIR";
pub const SYNC_LAYOUT: &str = "SYNC_LAYOUT";
pub const SYNC_EXCLUDE: &str = "SYNC_EXCLUDE";
pub const SYNC_EXCLUDE_EXTENSIONS: &str = "SYNC_EXCLUDE_EXTENSIONS";

/// Example `.env` printed when required variables are missing.
pub const ENV_HELP: &str = "\
FTP_HOST=your-ftp-host.com
FTP_USER=your-ftp-username
FTP_PASSWORD=your-ftp-password
FTP_PORT=21 (optional, defaults to 21)
FTP_SECURE=false (optional, set to true for FTPS)
FTP_REMOTE_DIR=/public_html (optional, defaults to /public_html)";

/// Reads the configuration from the process environment.
pub fn load_sync_config() -> Result<SyncConfig, ConfigError> {
    sync_config_from(|key| std::env::var(key).ok())
}

/// Builds the configuration from an arbitrary variable lookup.
///
/// Missing or empty `FTP_HOST`/`FTP_USER`/`FTP_PASSWORD` are reported
/// together, by variable name. Optional values fall back to defaults.
pub fn sync_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SyncConfig, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let missing: Vec<&'static str> = [FTP_HOST, FTP_USER, FTP_PASSWORD]
        .into_iter()
        .filter(|&key| get(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }

    let mut config = SyncConfig::default();
    let remote = &mut config.remote;
    remote.host = get(FTP_HOST).unwrap_or_default().trim().to_string();
    remote.user = get(FTP_USER).unwrap_or_default().trim().to_string();
    remote.password = get(FTP_PASSWORD).unwrap_or_default();

    if let Some(port) = get(FTP_PORT) {
        remote.port = match port.trim().parse::<u16>() {
            Ok(p) if p > 0 => p,
            _ => {
                warn!(value = %port, "invalid FTP_PORT, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };
    }
    remote.secure = get(FTP_SECURE).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    if let Some(dir) = get(FTP_REMOTE_DIR) {
        remote.remote_dir = dir.trim().to_string();
    }

    let local = &mut config.local;
    if let Some(root) = get(SYNC_LOCAL_DIR) {
        local.root = PathBuf::from(root.trim());
    }
    if let Some(dir) = lookup(SYNC_PASSTHROUGH_DIR) {
        // Set but empty disables passthrough.
        local.passthrough_dir = dir.trim().to_string();
    }
    if let Some(layout) = get(SYNC_LAYOUT) {
        let parsed: Result<NonPassthroughLayout, String> = layout.parse();
        local.layout = parsed.map_err(|reason| ConfigError::Invalid {
            field: SYNC_LAYOUT,
            reason,
        })?;
    }
    if let Some(extra) = get(SYNC_EXCLUDE) {
        local.exclude_patterns.extend(split_list(&extra));
    }
    if let Some(extra) = get(SYNC_EXCLUDE_EXTENSIONS) {
        local.exclude_extensions.extend(split_list(&extra));
    }

    config.validate()?;
    Ok(config)
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (FTP_HOST, "ftp.example.com"),
        (FTP_USER, "deploy"),
        (FTP_PASSWORD, "secret"),
    ];

    #[test]
    fn required_only_uses_defaults() {
        let config = sync_config_from(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.remote.host, "ftp.example.com");
        assert_eq!(config.remote.port, 21);
        assert!(!config.remote.secure);
        assert_eq!(config.remote.remote_dir, "/public_html");
        assert_eq!(config.local.root, PathBuf::from("."));
        assert_eq!(config.local.passthrough_dir, "apks");
    }

    #[test]
    fn reports_missing_by_variable_name() {
        let result = sync_config_from(lookup(&[(FTP_HOST, "h"), (FTP_PASSWORD, "  ")]));
        assert_eq!(
            result,
            Err(ConfigError::Missing(vec![FTP_USER, FTP_PASSWORD]))
        );
    }

    #[test]
    fn optional_values_override_defaults() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (FTP_PORT, "2121"),
            (FTP_SECURE, "TRUE"),
            (FTP_REMOTE_DIR, "/www"),
            (SYNC_LOCAL_DIR, "site"),
            (SYNC_LAYOUT, "preserve"),
            (SYNC_EXCLUDE, "target, .DS_Store,,"),
            (SYNC_EXCLUDE_EXTENSIONS, ".map"),
        ]);
        let config = sync_config_from(lookup(&vars)).unwrap();

        assert_eq!(config.remote.port, 2121);
        assert!(config.remote.secure);
        assert_eq!(config.remote.remote_dir, "/www");
        assert_eq!(config.local.root, PathBuf::from("site"));
        assert_eq!(config.local.layout, NonPassthroughLayout::Preserve);
        let patterns = &config.local.exclude_patterns;
        assert_eq!(patterns[patterns.len() - 2..], ["target", ".DS_Store"]);
        assert!(patterns.contains(&"node_modules".to_string()));
        assert_eq!(config.local.exclude_extensions, vec![".md", ".map"]);
    }

    #[test]
    fn bad_port_falls_back() {
        let mut vars = REQUIRED.to_vec();
        vars.push((FTP_PORT, "ftp"));
        assert_eq!(sync_config_from(lookup(&vars)).unwrap().remote.port, 21);
    }

    #[test]
    fn secure_needs_literal_true() {
        let mut vars = REQUIRED.to_vec();
        vars.push((FTP_SECURE, "yes"));
        assert!(!sync_config_from(lookup(&vars)).unwrap().remote.secure);
    }

    #[test]
    fn unknown_layout_is_invalid() {
        let mut vars = REQUIRED.to_vec();
        vars.push((SYNC_LAYOUT, "mirror"));
        assert!(matches!(
            sync_config_from(lookup(&vars)),
            Err(ConfigError::Invalid {
                field: SYNC_LAYOUT,
                ..
            })
        ));
    }

    #[test]
    fn empty_passthrough_disables_it() {
        let mut vars = REQUIRED.to_vec();
        vars.push((SYNC_PASSTHROUGH_DIR, ""));
        let config = sync_config_from(lookup(&vars)).unwrap();
        assert_eq!(config.local.remote_layout().passthrough_dir(), None);
    }
}

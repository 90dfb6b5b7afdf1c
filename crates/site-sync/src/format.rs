//! Human-readable byte counts.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count using base-1024 units.
///
/// At most two decimals are kept and trailing zeros are trimmed, so
/// `1536` renders as `"1.5 KB"` and `1048576` as `"1 MB"`. Sizes beyond
/// the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = ((bytes as f64 / scale as f64) * 100.0).round() / 100.0;
    format!("{value} {}", UNITS[unit])
}

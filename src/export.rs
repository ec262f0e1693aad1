//! Writing form data out as `generated.json`

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::HubError;

/// File name of every export
pub const EXPORT_FILE_NAME: &str = "generated.json";

/// Serialize form data as 2-space indented JSON, without a trailing newline
pub fn to_json_text(data: &Value) -> String {
    // Serializing a Value cannot fail: map keys are always strings
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// Write `data` to `dir/generated.json`, replacing any previous export
pub fn write_export(dir: &Path, data: &Value) -> Result<PathBuf, HubError> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| HubError::io(dir, e))?;
    }

    let path = dir.join(EXPORT_FILE_NAME);
    let text = to_json_text(data);
    fs::write(&path, text.as_bytes()).map_err(|e| HubError::io(&path, e))?;
    info!(path = %path.display(), bytes = text.len(), "exported form data");
    Ok(path)
}

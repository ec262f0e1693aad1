//! Loading schemas from local files

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::entry::SchemaEntry;
use crate::error::{HubError, JsonSyntaxError};

/// Parse `text` as a JSON document named `name`
///
/// Any JSON value is accepted; whether it is a usable schema is only decided
/// when a form is built from it.
pub fn parse_schema(name: &str, text: &str) -> Result<SchemaEntry, HubError> {
    let schema = parse_json(name, text)?;
    debug!(name, bytes = text.len(), "parsed schema");
    Ok(SchemaEntry::new(name, schema))
}

/// Parse `text` as JSON, reporting syntax errors against the source
pub fn parse_json(name: &str, text: &str) -> Result<Value, HubError> {
    serde_json::from_str(text)
        .map_err(|e| JsonSyntaxError::from_serde_error(&e, text, name).into())
}

/// Read a whole file and parse it, naming the entry after the file
pub fn read_schema_file(path: &Path) -> Result<SchemaEntry, HubError> {
    let text = read_text(path)?;
    parse_schema(&file_name(path), &text)
}

/// Read a file to a string, mapping failures to [`HubError::Io`]
pub fn read_text(path: &Path) -> Result<String, HubError> {
    fs::read_to_string(path).map_err(|e| HubError::io(path, e))
}

/// Final path component, falling back to the full path
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

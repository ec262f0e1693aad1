//! Error types with miette diagnostics
//!
//! Every recoverable failure in SchemaHub folds into [`HubError`]. Interactive
//! sessions turn these into notices; one-shot commands render them through
//! miette's fancy handler.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

use crate::schema::validator::FormValidationError;

/// JSON syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("JSON syntax error in {name}: {message}")]
#[diagnostic(code(schemahub::json::syntax))]
pub struct JsonSyntaxError {
    name: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl JsonSyntaxError {
    /// Create a syntax error from a serde_json error
    pub fn from_serde_error(err: &serde_json::Error, source: &str, name: &str) -> Self {
        let offset = line_col_to_offset(source, err.line().max(1), err.column().max(1));
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            name: name.to_string(),
            src: NamedSource::new(name, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    /// Name of the document that failed to parse
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the error within the source
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Failures while talking to the remote listing
#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("request failed: {0}")]
    #[diagnostic(code(schemahub::fetch::http))]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    #[diagnostic(code(schemahub::fetch::status))]
    Status { url: String, status: u16 },

    #[error("{url} did not return JSON: {source}")]
    #[diagnostic(code(schemahub::fetch::decode))]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("listing entry '{0}' has no download_url")]
    #[diagnostic(code(schemahub::fetch::no_download_url))]
    MissingDownloadUrl(String),

    #[error("failed to start async runtime: {0}")]
    #[diagnostic(code(schemahub::fetch::runtime))]
    Runtime(#[source] std::io::Error),
}

/// Top-level error for hub operations
#[derive(Debug, Error, Diagnostic)]
pub enum HubError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] JsonSyntaxError),

    #[error("failed to fetch remote schemas")]
    #[diagnostic(code(schemahub::fetch))]
    Fetch(#[from] FetchError),

    #[error("cannot read {}", path.display())]
    #[diagnostic(code(schemahub::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{name}' is not a usable JSON Schema: {message}")]
    #[diagnostic(
        code(schemahub::schema::invalid),
        help("check the $schema keyword and any $ref targets")
    )]
    InvalidSchema { name: String, message: String },

    #[error("no schema with id {0}")]
    #[diagnostic(code(schemahub::registry::unknown_entry))]
    UnknownEntry(String),

    #[error("no schema selected")]
    #[diagnostic(
        code(schemahub::selection::none),
        help("select a schema from the list first")
    )]
    NoSelection,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] FormValidationError),

    #[error("prompt failed: {0}")]
    #[diagnostic(code(schemahub::prompt))]
    Prompt(#[from] dialoguer::Error),
}

impl HubError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HubError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convert 1-based line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = i + 1;
        }
    }

    if current_line < line {
        return source.len().saturating_sub(1);
    }

    let rest = &source[line_start..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    line_start + column.saturating_sub(1).min(line_len)
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item".to_string());
    }

    if msg_lower.contains("key must be a string") {
        return Some("Object keys must be double-quoted: {\"key\": value}".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The document ends early - check for a missing '}' or ']'".to_string());
    }

    if msg_lower.contains("expected value") {
        return Some("Strings need double quotes; comments are not allowed in JSON".to_string());
    }

    None
}

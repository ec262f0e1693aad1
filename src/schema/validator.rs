//! Form data validation with detailed error reporting

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value;
use thiserror::Error;

use crate::error::HubError;

/// Form data failed validation against its schema
#[derive(Debug, Error, Diagnostic)]
#[error("Form data does not match {schema}: {summary}")]
#[diagnostic(code(schemahub::form::validation_error))]
pub struct FormValidationError {
    schema: String,
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<ViolationDiagnostic>,
}

impl FormValidationError {
    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// A single violation rendered against the form data text
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

/// A single violation of the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the form data ("" for the root)
    pub path: String,
    pub message: String,
    pub hint: String,
    pub help: Option<String>,
}

/// Outcome of validating one form data value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations located at `path` or below it
    pub fn under(&self, path: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| {
                v.path == path
                    || (v.path.starts_with(path) && v.path[path.len()..].starts_with('/'))
            })
            .collect()
    }

    /// Violations that name `field` as a missing required property of `parent`
    pub fn missing_in(&self, parent: &str, field: &str) -> bool {
        let needle = format!("'{}'", field);
        self.violations
            .iter()
            .any(|v| v.path == parent && v.hint == "required field missing" && v.message.contains(&needle))
    }

    /// Turn the report into a diagnostic over the pretty-printed data
    pub fn into_result(self, schema_name: &str, data: &Value) -> Result<(), FormValidationError> {
        if self.is_valid() {
            return Ok(());
        }

        let content = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        let count = self.violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };

        let violations = self
            .violations
            .into_iter()
            .map(|v| ViolationDiagnostic {
                span: find_path_span(&content, &v.path),
                message: v.message,
                hint: v.hint,
                help: v.help,
            })
            .collect();

        Err(FormValidationError {
            schema: schema_name.to_string(),
            summary,
            src: NamedSource::new("form data", content),
            violations,
        })
    }
}

/// A JSON Schema compiled for validating form data
pub struct FormValidator {
    name: String,
    compiled: JsonValidator,
}

impl std::fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator").field("name", &self.name).finish()
    }
}

impl FormValidator {
    /// Compile a schema; fails if the document is not a usable JSON Schema
    pub fn compile(name: &str, schema: &Value) -> Result<Self, HubError> {
        let compiled = validator_for(schema).map_err(|e| HubError::InvalidSchema {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            compiled,
        })
    }

    /// Collect every violation of `data`
    pub fn validate(&self, data: &Value) -> ValidationReport {
        ValidationReport {
            violations: self
                .compiled
                .iter_errors(data)
                .map(|e| error_to_violation(&e))
                .collect(),
        }
    }

    pub fn is_valid(&self, data: &Value) -> bool {
        self.compiled.is_valid(data)
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(error: &JsonSchemaError) -> Violation {
    Violation {
        path: error.instance_path.as_str().to_string(),
        message: format_schema_error(error),
        hint: format_error_hint(error),
        help: generate_help_message(error),
    }
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "form root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: '{}' at {}", prop_str, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, format_enum_options(options))
        }
        ValidationErrorKind::Pattern { pattern } => {
            format!("Value at {} doesn't match pattern: {}", path, pattern)
        }
        ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("Value at {} is too long: maximum {} characters", path, limit)
        }
        ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        ValidationErrorKind::Maximum { limit } => {
            format!("Value at {} is too large: maximum {}", path, limit)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &Value) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "required field missing",
        ValidationErrorKind::Type { .. } => "wrong type",
        ValidationErrorKind::Enum { .. } => "invalid value",
        ValidationErrorKind::Pattern { .. } => "pattern mismatch",
        ValidationErrorKind::MinLength { .. } => "too short",
        ValidationErrorKind::MaxLength { .. } => "too long",
        ValidationErrorKind::Minimum { .. } | ValidationErrorKind::Maximum { .. } => "out of range",
        ValidationErrorKind::AdditionalProperties { .. } => "unknown field",
        _ => "validation error",
    }
    .to_string()
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Fill in the '{}' field", prop_str))
        }
        ValidationErrorKind::Enum { options } => {
            Some(format!("Valid values: {}", format_enum_options(options)))
        }
        ValidationErrorKind::Type { kind } => Some(format!("Expected value of type: {:?}", kind)),
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Find the span for a JSON pointer in pretty-printed JSON
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<String> = json_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();

    let first_line = || -> SourceSpan {
        let len = content.find('\n').unwrap_or(content.len()).max(1);
        (0, len).into()
    };

    let Some(search_key) = parts.last() else {
        return first_line();
    };

    // Array indices point at the owning key
    if search_key.parse::<usize>().is_ok() && parts.len() >= 2 {
        if let Some(span) = find_key_span(content, &parts[parts.len() - 2]) {
            return span;
        }
    }

    find_key_span(content, search_key).unwrap_or_else(first_line)
}

/// Find the span of `"key":` in JSON content
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let search_pattern = format!("\"{}\":", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&search_pattern) {
            let key_start = offset + (line.len() - trimmed.len());
            return Some((key_start, trimmed.len()).into());
        }
        offset += line.len() + 1;
    }
    None
}

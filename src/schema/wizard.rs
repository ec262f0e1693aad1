//! Schema-driven interactive form
//!
//! Walks the fields of a [`FormSession`] and prompts for each one with
//! dialoguer. Every answer is applied to the session immediately, so the
//! validation feedback printed under a field is always current.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde_json::{Number, Value};

use crate::cli::helpers::truncate_str;
use crate::error::HubError;
use crate::schema::fields::{FieldKind, FieldSpec};
use crate::schema::form::FormSession;
use crate::schema::validator::ValidationReport;

/// A schema-driven wizard that fills a form session
pub struct FormWizard {
    theme: ColorfulTheme,
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for every field of the form, applying answers as they come
    pub fn run(&self, form: &mut FormSession) -> Result<(), HubError> {
        println!();
        println!(
            "{} Filling form for {}",
            style("◆").cyan(),
            style(form.schema_name()).bold()
        );
        println!("{}", style("─".repeat(50)).dim());
        println!();

        let fields = form.fields().to_vec();
        self.fill(form, &fields, 0)?;

        println!();
        if form.report().is_valid() {
            println!("{} Form is valid", style("✓").green());
        } else {
            println!(
                "{} Form has {} open issue(s)",
                style("!").yellow(),
                form.report().violations.len()
            );
        }

        Ok(())
    }

    fn fill(&self, form: &mut FormSession, fields: &[FieldSpec], depth: usize) -> Result<(), HubError> {
        for field in fields {
            if let FieldKind::Object { fields: inner } = &field.kind {
                println!(
                    "{}{} {}",
                    "  ".repeat(depth),
                    style("▸").cyan(),
                    style(field.label()).bold()
                );
                self.fill(form, inner, depth + 1)?;
                continue;
            }

            let current = form.get(&field.path).cloned().or_else(|| field.default.clone());
            let answer = self.prompt_field(field, current.as_ref())?;
            print_field_issues(field, apply_answer(form, field, answer));
        }
        Ok(())
    }

    /// Prompt the user for a field value; `None` means "leave unset"
    fn prompt_field(&self, field: &FieldSpec, current: Option<&Value>) -> Result<Option<Value>, HubError> {
        let prompt = format_prompt(field);

        match &field.kind {
            FieldKind::Object { .. } => Ok(None),

            FieldKind::Enum { values } => {
                let items: Vec<String> = values.iter().map(display_value).collect();
                let default_idx = current
                    .and_then(|c| values.iter().position(|v| v == c))
                    .unwrap_or(0);

                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&items)
                    .default(default_idx)
                    .interact()?;

                Ok(values.get(selection).cloned())
            }

            FieldKind::Boolean => {
                let default_val = current.and_then(|c| c.as_bool()).unwrap_or(false);
                let items = &["Yes", "No"];
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(items)
                    .default(if default_val { 0 } else { 1 })
                    .interact()?;

                Ok(Some(Value::Bool(selection == 0)))
            }

            kind => {
                let prompt = match kind {
                    FieldKind::Array { item } if is_list_item(item) => {
                        format!("{} (comma-separated)", prompt)
                    }
                    FieldKind::Array { .. } | FieldKind::Raw => format!("{} (JSON)", prompt),
                    _ => prompt,
                };

                // Pre-filled as editable text, so erasing it leaves the field unset
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(prompt)
                    .allow_empty(!field.required);
                if let Some(initial) = current.map(|c| input_text(kind, c)) {
                    input = input.with_initial_text(initial);
                }

                let text = input
                    .validate_with(|text: &String| -> Result<(), String> {
                        parse_input(kind, text).map(|_| ())
                    })
                    .interact_text()?;

                parse_input(kind, &text).map_err(|message| HubError::InvalidSchema {
                    name: field.name.clone(),
                    message,
                })
            }
        }
    }
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Store an answer in the form; `None` removes any earlier value
fn apply_answer<'f>(
    form: &'f mut FormSession,
    field: &FieldSpec,
    answer: Option<Value>,
) -> &'f ValidationReport {
    match answer {
        Some(value) => form.set(&field.path, value),
        None => form.clear(&field.path),
    }
}

fn print_field_issues(field: &FieldSpec, report: &ValidationReport) {
    let pointer = field.pointer();
    for violation in report.under(&pointer) {
        println!("  {} {}", style("⚠").yellow(), violation.message);
    }
    if report.missing_in(&field.parent_pointer(), &field.name) {
        println!("  {} {} is required", style("⚠").yellow(), field.label());
    }
}

/// Format the prompt for a field
fn format_prompt(field: &FieldSpec) -> String {
    let mut label = field.label();
    if field.required {
        label.push_str(" *");
    }
    if let FieldKind::Text { format: Some(ref f), .. } = field.kind {
        label.push_str(&format!(" [{}]", f));
    }

    match field.description {
        Some(ref desc) => format!("{} ({})", label, style(truncate_str(desc, 50)).dim()),
        None => label,
    }
}

fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

/// Whether array items of this kind can be typed as a comma-separated list
fn is_list_item(kind: &FieldKind) -> bool {
    matches!(
        kind,
        FieldKind::Text { .. }
            | FieldKind::Enum { .. }
            | FieldKind::Integer { .. }
            | FieldKind::Number { .. }
            | FieldKind::Boolean
    )
}

/// Render an existing value back into the text a user would type for it
fn input_text(kind: &FieldKind, value: &Value) -> String {
    match (kind, value) {
        (FieldKind::Array { item }, Value::Array(items)) if is_list_item(item) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        (FieldKind::Text { .. }, Value::String(s)) => s.clone(),
        _ => value.to_string(),
    }
}

/// Convert typed text into a value for `kind`
///
/// Empty input means "unset" and yields `Ok(None)`.
pub fn parse_input(kind: &FieldKind, text: &str) -> Result<Option<Value>, String> {
    if text.is_empty() {
        return Ok(None);
    }

    match kind {
        FieldKind::Array { item } if is_list_item(item) => text
            .split(',')
            .map(|part| parse_scalar(item, part.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Some(Value::Array(items))),
        FieldKind::Array { .. } => match serde_json::from_str::<Value>(text) {
            Ok(v @ Value::Array(_)) => Ok(Some(v)),
            Ok(_) => Err("expected a JSON array".to_string()),
            Err(e) => Err(format!("not valid JSON: {}", e)),
        },
        FieldKind::Raw | FieldKind::Object { .. } => serde_json::from_str::<Value>(text)
            .map(Some)
            .map_err(|e| format!("not valid JSON: {}", e)),
        scalar => parse_scalar(scalar, text).map(Some),
    }
}

fn parse_scalar(kind: &FieldKind, text: &str) -> Result<Value, String> {
    match kind {
        FieldKind::Integer { .. } => text
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| format!("'{}' is not an integer", text)),
        FieldKind::Number { .. } => text
            .parse::<f64>()
            .ok()
            .and_then(number_value)
            .map(Value::Number)
            .ok_or_else(|| format!("'{}' is not a number", text)),
        FieldKind::Boolean => match text.to_lowercase().as_str() {
            "true" | "yes" | "y" => Ok(Value::Bool(true)),
            "false" | "no" | "n" => Ok(Value::Bool(false)),
            _ => Err(format!("'{}' is not yes/no", text)),
        },
        FieldKind::Enum { values } => values
            .iter()
            .find(|v| display_value(v) == text)
            .cloned()
            .ok_or_else(|| format!("'{}' is not one of the allowed values", text)),
        _ => Ok(Value::String(text.to_string())),
    }
}

/// Whole numbers are stored as integers so they export as `5`, not `5.0`
fn number_value(n: f64) -> Option<Number> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text() -> FieldKind {
        FieldKind::Text { min_length: None, max_length: None, format: None }
    }

    #[test]
    fn test_empty_input_is_unset() {
        assert_eq!(parse_input(&text(), ""), Ok(None));
    }

    #[test]
    fn test_scalar_parsing() {
        let int = FieldKind::Integer { minimum: None, maximum: None };
        assert_eq!(parse_input(&int, "42"), Ok(Some(json!(42))));
        assert!(parse_input(&int, "4.2").is_err());

        let num = FieldKind::Number { minimum: None, maximum: None };
        assert_eq!(parse_input(&num, "4.5"), Ok(Some(json!(4.5))));
        assert!(parse_input(&num, "NaN").is_err());
        assert!(parse_input(&num, "inf").is_err());

        assert_eq!(parse_input(&text(), "hello"), Ok(Some(json!("hello"))));
    }

    #[test]
    fn test_list_parsing_uses_item_kind() {
        let tags = FieldKind::Array { item: Box::new(text()) };
        assert_eq!(parse_input(&tags, "a, b ,c"), Ok(Some(json!(["a", "b", "c"]))));

        let counts = FieldKind::Array {
            item: Box::new(FieldKind::Integer { minimum: None, maximum: None }),
        };
        assert_eq!(parse_input(&counts, "1,2"), Ok(Some(json!([1, 2]))));
        assert!(parse_input(&counts, "1,x").is_err());
    }

    #[test]
    fn test_enum_text_matches_display() {
        let kind = FieldKind::Enum { values: vec![json!("red"), json!(3)] };
        assert_eq!(parse_input(&kind, "3"), Ok(Some(json!(3))));
        assert!(parse_input(&kind, "blue").is_err());
    }

    #[test]
    fn test_raw_and_object_arrays_take_json() {
        assert_eq!(
            parse_input(&FieldKind::Raw, r#"{"k": [1]}"#),
            Ok(Some(json!({"k": [1]})))
        );
        let rows = FieldKind::Array { item: Box::new(FieldKind::Raw) };
        assert_eq!(parse_input(&rows, "[1, {}]"), Ok(Some(json!([1, {}]))));
        assert!(parse_input(&rows, "{}").is_err());
    }

    #[test]
    fn test_input_text_round_trips_lists() {
        let tags = FieldKind::Array { item: Box::new(text()) };
        assert_eq!(input_text(&tags, &json!(["a", "b"])), "a, b");
        assert_eq!(input_text(&text(), &json!("plain")), "plain");
        assert_eq!(input_text(&FieldKind::Raw, &json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_whole_numbers_export_without_fraction() {
        let num = FieldKind::Number { minimum: None, maximum: None };
        let price = parse_input(&num, "5").unwrap().unwrap();
        assert_eq!(
            crate::export::to_json_text(&json!({ "price": price })),
            "{\n  \"price\": 5\n}"
        );
        assert_eq!(parse_input(&num, "5.0"), Ok(Some(json!(5))));
        assert_eq!(parse_input(&num, "-2"), Ok(Some(json!(-2))));
        assert_eq!(parse_input(&num, "1e3"), Ok(Some(json!(1000))));
        assert_eq!(input_text(&num, &price), "5");
    }

    #[test]
    fn test_empty_answer_unsets_prefilled_field() {
        let schema = json!({
            "type": "object",
            "properties": {"nickname": {"type": "string", "default": "Ada"}}
        });
        let mut form =
            FormSession::from_schema("p.json", &schema, json!({"nickname": "Ada"})).unwrap();
        let field = form.fields()[0].clone();

        let answer = parse_input(&field.kind, "").unwrap();
        assert!(apply_answer(&mut form, &field, answer).is_valid());
        assert_eq!(form.data(), &json!({}));
    }
}

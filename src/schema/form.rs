//! Form state for one selected schema
//!
//! A [`FormSession`] owns the current form data and the compiled validator.
//! Every edit goes through [`FormSession::set`] or [`FormSession::clear`],
//! which revalidate and hand back the fresh report. That report is the
//! change notification the host reacts to.

use serde_json::{Map, Value};

use crate::core::entry::SchemaEntry;
use crate::error::HubError;
use crate::schema::fields::{extract_fields, FieldSpec};
use crate::schema::validator::{FormValidator, ValidationReport};

#[derive(Debug)]
pub struct FormSession {
    schema_name: String,
    fields: Vec<FieldSpec>,
    validator: FormValidator,
    data: Value,
    report: ValidationReport,
}

impl FormSession {
    /// Start a form for `entry`, seeded with `data`
    pub fn new(entry: &SchemaEntry, data: Value) -> Result<Self, HubError> {
        Self::from_schema(&entry.name, &entry.schema, data)
    }

    pub fn from_schema(name: &str, schema: &Value, data: Value) -> Result<Self, HubError> {
        let validator = FormValidator::compile(name, schema)?;
        let report = validator.validate(&data);
        Ok(Self {
            schema_name: name.to_string(),
            fields: extract_fields(schema),
            validator,
            data,
            report,
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Report from the most recent change
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Write `value` at `path`, creating intermediate objects, then revalidate
    ///
    /// An empty path replaces the whole form value.
    pub fn set(&mut self, path: &[String], value: Value) -> &ValidationReport {
        set_at(&mut self.data, path, value);
        self.revalidate()
    }

    /// Remove the value at `path`, then revalidate
    pub fn clear(&mut self, path: &[String]) -> &ValidationReport {
        match path.split_last() {
            None => self.data = Value::Object(Map::new()),
            Some((last, parents)) => {
                if let Some(Value::Object(map)) = get_at_mut(&mut self.data, parents) {
                    map.shift_remove(last);
                }
            }
        }
        self.revalidate()
    }

    /// Current value at `path`
    pub fn get(&self, path: &[String]) -> Option<&Value> {
        path.iter().try_fold(&self.data, |v, key| v.get(key))
    }

    fn revalidate(&mut self) -> &ValidationReport {
        self.report = self.validator.validate(&self.data);
        &self.report
    }

    /// Final check before export
    pub fn finish(&self) -> Result<(), HubError> {
        self.report
            .clone()
            .into_result(&self.schema_name, &self.data)
            .map_err(HubError::from)
    }
}

fn set_at(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut cursor = root;
    for key in parents {
        cursor = ensure_object(cursor)
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(cursor).insert(last.clone(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just made an object"),
    }
}

fn get_at_mut<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    path.iter().try_fold(root, |v, key| v.get_mut(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn session() -> FormSession {
        let schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string", "minLength": 2}}
                }
            }
        });
        FormSession::from_schema("person.json", &schema, json!({})).unwrap()
    }

    #[test]
    fn test_initial_report_reflects_empty_data() {
        let form = session();
        assert!(!form.report().is_valid());
        assert_eq!(form.fields().len(), 2);
    }

    #[test]
    fn test_set_revalidates() {
        let mut form = session();
        let report = form.set(&path(&["name"]), json!("Ada"));
        assert!(report.is_valid());
        assert_eq!(form.data(), &json!({"name": "Ada"}));
    }

    #[test]
    fn test_set_creates_nested_objects() {
        let mut form = session();
        form.set(&path(&["name"]), json!("Ada"));
        let report = form.set(&path(&["address", "city"]), json!("X"));
        assert_eq!(report.under("/address/city").len(), 1);
        assert_eq!(form.get(&path(&["address", "city"])), Some(&json!("X")));
    }

    #[test]
    fn test_clear_removes_value() {
        let mut form = session();
        form.set(&path(&["name"]), json!("Ada"));
        let report = form.clear(&path(&["name"]));
        assert!(!report.is_valid());
        assert_eq!(form.data(), &json!({}));
    }

    #[test]
    fn test_empty_path_replaces_root() {
        let schema = json!({"type": "integer"});
        let mut form = FormSession::from_schema("n.json", &schema, json!({})).unwrap();
        assert!(!form.report().is_valid());
        assert!(form.set(&[], json!(4)).is_valid());
        assert_eq!(form.into_data(), json!(4));
    }

    #[test]
    fn test_finish_surfaces_diagnostic() {
        let form = session();
        let err = form.finish().unwrap_err();
        assert!(matches!(err, HubError::Validation(_)));
    }
}

//! Field extraction: turns a JSON Schema into an ordered list of form fields

use serde_json::Value;

/// One input control derived from the schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Property name ("value" for a non-object root schema)
    pub name: String,
    /// Property names from the form root down to this field
    pub path: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text {
        min_length: Option<u64>,
        max_length: Option<u64>,
        format: Option<String>,
    },
    Enum {
        values: Vec<Value>,
    },
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Array {
        item: Box<FieldKind>,
    },
    Object {
        fields: Vec<FieldSpec>,
    },
    /// Anything we have no control for; entered as literal JSON
    Raw,
}

impl FieldKind {
    /// Short type label for tables
    pub fn label(&self) -> String {
        match self {
            FieldKind::Text { format: Some(f), .. } => format!("string({})", f),
            FieldKind::Text { .. } => "string".to_string(),
            FieldKind::Enum { .. } => "enum".to_string(),
            FieldKind::Integer { .. } => "integer".to_string(),
            FieldKind::Number { .. } => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Array { item } => format!("{}[]", item.label()),
            FieldKind::Object { .. } => "object".to_string(),
            FieldKind::Raw => "json".to_string(),
        }
    }
}

impl FieldSpec {
    /// JSON pointer of this field within the form data
    pub fn pointer(&self) -> String {
        self.path.iter().map(|p| format!("/{}", escape_pointer(p))).collect()
    }

    /// JSON pointer of the object that owns this field
    pub fn parent_pointer(&self) -> String {
        let parent = &self.path[..self.path.len().saturating_sub(1)];
        parent.iter().map(|p| format!("/{}", escape_pointer(p))).collect()
    }

    /// Human label: the schema title, or the property name in title case
    pub fn label(&self) -> String {
        if let Some(ref title) = self.title {
            return title.clone();
        }
        self.name
            .replace('_', " ")
            .split_whitespace()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    None => String::new(),
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Extract the form fields of a schema in declaration order
///
/// Object schemas yield one field per property. Any other root schema yields
/// a single field covering the whole form value.
pub fn extract_fields(schema: &Value) -> Vec<FieldSpec> {
    if schema.get("properties").and_then(|p| p.as_object()).is_some() {
        return object_fields(schema, &[]);
    }

    match parse_kind(schema, &[]) {
        FieldKind::Object { fields } => fields,
        kind => vec![FieldSpec {
            name: "value".to_string(),
            path: Vec::new(),
            title: str_field(schema, "title"),
            description: str_field(schema, "description"),
            kind,
            required: true,
            default: schema.get("default").cloned(),
        }],
    }
}

fn object_fields(schema: &Value, parent: &[String]) -> Vec<FieldSpec> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let Some(props) = schema.get("properties").and_then(|p| p.as_object()) else {
        return Vec::new();
    };

    props
        .iter()
        .map(|(name, prop)| {
            let mut path = parent.to_vec();
            path.push(name.clone());
            FieldSpec {
                name: name.clone(),
                title: str_field(prop, "title"),
                description: str_field(prop, "description"),
                kind: parse_kind(prop, &path),
                required: required.contains(&name.as_str()),
                default: prop.get("default").cloned(),
                path,
            }
        })
        .collect()
}

fn parse_kind(schema: &Value, path: &[String]) -> FieldKind {
    if let Some(values) = schema.get("enum").and_then(|e| e.as_array()) {
        return FieldKind::Enum {
            values: values.clone(),
        };
    }

    match primary_type(schema).as_deref() {
        Some("string") => FieldKind::Text {
            min_length: schema.get("minLength").and_then(|v| v.as_u64()),
            max_length: schema.get("maxLength").and_then(|v| v.as_u64()),
            format: str_field(schema, "format"),
        },
        Some("integer") => FieldKind::Integer {
            minimum: schema.get("minimum").and_then(|v| v.as_i64()),
            maximum: schema.get("maximum").and_then(|v| v.as_i64()),
        },
        Some("number") => FieldKind::Number {
            minimum: schema.get("minimum").and_then(|v| v.as_f64()),
            maximum: schema.get("maximum").and_then(|v| v.as_f64()),
        },
        Some("boolean") => FieldKind::Boolean,
        Some("array") => {
            let item = schema
                .get("items")
                .map(|items| parse_kind(items, path))
                .unwrap_or(FieldKind::Raw);
            FieldKind::Array {
                item: Box::new(item),
            }
        }
        Some("object") => FieldKind::Object {
            fields: object_fields(schema, path),
        },
        _ => FieldKind::Raw,
    }
}

/// The declared type; for `["string", "null"]` style unions, the first non-null one
fn primary_type(schema: &Value) -> Option<String> {
    match schema.get("type") {
        Some(Value::String(t)) => Some(t.clone()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null")
            .map(String::from),
        _ if schema.get("properties").is_some() => Some("object".to_string()),
        _ => None,
    }
}

fn str_field(schema: &Value, key: &str) -> Option<String> {
    schema.get(key).and_then(|v| v.as_str()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_fields_in_declaration_order() {
        let schema = json!({
            "type": "object",
            "required": ["title"],
            "properties": {
                "title": {"type": "string", "maxLength": 80},
                "count": {"type": "integer", "minimum": 1},
                "ratio": {"type": "number"},
                "done": {"type": "boolean", "default": false}
            }
        });
        let fields = extract_fields(&schema);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "count", "ratio", "done"]);
        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(
            fields[1].kind,
            FieldKind::Integer { minimum: Some(1), maximum: None }
        );
        assert_eq!(fields[3].default, Some(json!(false)));
    }

    #[test]
    fn test_enum_and_nullable_types() {
        let schema = json!({
            "properties": {
                "color": {"enum": ["red", "green", 3]},
                "note": {"type": ["null", "string"]}
            }
        });
        let fields = extract_fields(&schema);
        assert_eq!(
            fields[0].kind,
            FieldKind::Enum { values: vec![json!("red"), json!("green"), json!(3)] }
        );
        assert_eq!(fields[1].kind.label(), "string");
    }

    #[test]
    fn test_nested_objects_carry_paths() {
        let schema = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "required": ["city"],
                    "properties": {"city": {"type": "string"}}
                }
            }
        });
        let fields = extract_fields(&schema);
        let FieldKind::Object { fields: inner } = &fields[0].kind else {
            panic!("expected object field");
        };
        assert_eq!(inner[0].path, vec!["address".to_string(), "city".to_string()]);
        assert_eq!(inner[0].pointer(), "/address/city");
        assert_eq!(inner[0].parent_pointer(), "/address");
        assert!(inner[0].required);
    }

    #[test]
    fn test_array_item_kind() {
        let schema = json!({
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "blobs": {"type": "array"}
            }
        });
        let fields = extract_fields(&schema);
        assert_eq!(fields[0].kind.label(), "string[]");
        assert_eq!(fields[1].kind.label(), "json[]");
    }

    #[test]
    fn test_scalar_root_schema_is_single_field() {
        let fields = extract_fields(&json!({"type": "string", "title": "Motto"}));
        assert_eq!(fields.len(), 1);
        assert!(fields[0].path.is_empty());
        assert_eq!(fields[0].pointer(), "");
        assert_eq!(fields[0].label(), "Motto");
    }

    #[test]
    fn test_unknown_shapes_fall_back_to_raw() {
        let fields = extract_fields(&json!({"properties": {"x": {"$ref": "#/defs/x"}}}));
        assert_eq!(fields[0].kind, FieldKind::Raw);
    }

    #[test]
    fn test_label_title_cases_names() {
        let fields = extract_fields(&json!({"properties": {"first_name": {"type": "string"}}}));
        assert_eq!(fields[0].label(), "First Name");
    }

    #[test]
    fn test_pointer_escapes_segments() {
        let fields = extract_fields(&json!({"properties": {"a/b": {"type": "string"}}}));
        assert_eq!(fields[0].pointer(), "/a~1b");
    }
}

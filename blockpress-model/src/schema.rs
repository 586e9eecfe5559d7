use crate::error::{FieldProblem, FieldViolation};
use crate::localized::as_localized;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares the fields a block type stores.
///
/// The schema is the single source of truth for which paths inside a node's
/// values may carry a localization wrapper. Nothing is localized by shape
/// alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub fields: Vec<FieldDef>,
}

/// One field of a block's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// The stored value may be a per-locale wrapper.
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub required: bool,
    /// Used when the node has no stored value for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// The data type of a field.
///
/// `Group` and `Array` nest further field definitions; their inner fields may
/// be localized independently of the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    RichText,
    Number,
    Bool,
    Select { options: Vec<String> },
    /// Reference to an uploaded file in `collection`.
    Upload { collection: String },
    /// Reference to a record in `collection`.
    Relationship { collection: String },
    Json,
    Group { fields: Vec<FieldDef> },
    /// An ordered list of rows, each shaped by `fields`.
    Array { fields: Vec<FieldDef> },
}

impl FieldDef {
    fn simple(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            localized: false,
            required: false,
            default: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldKind::Text)
    }

    pub fn rich_text(name: &str) -> Self {
        Self::simple(name, FieldKind::RichText)
    }

    pub fn number(name: &str) -> Self {
        Self::simple(name, FieldKind::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::simple(name, FieldKind::Bool)
    }

    pub fn select(name: &str, options: &[&str]) -> Self {
        Self::simple(
            name,
            FieldKind::Select {
                options: options.iter().map(|o| (*o).to_string()).collect(),
            },
        )
    }

    pub fn upload(name: &str, collection: &str) -> Self {
        Self::simple(
            name,
            FieldKind::Upload {
                collection: collection.into(),
            },
        )
    }

    pub fn relationship(name: &str, collection: &str) -> Self {
        Self::simple(
            name,
            FieldKind::Relationship {
                collection: collection.into(),
            },
        )
    }

    pub fn json(name: &str) -> Self {
        Self::simple(name, FieldKind::Json)
    }

    pub fn group(name: &str, fields: Vec<FieldDef>) -> Self {
        Self::simple(name, FieldKind::Group { fields })
    }

    pub fn array(name: &str, fields: Vec<FieldDef>) -> Self {
        Self::simple(name, FieldKind::Array { fields })
    }

    #[must_use]
    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Inner field definitions for `Group` and `Array` kinds.
    pub fn nested(&self) -> Option<&[FieldDef]> {
        match &self.kind {
            FieldKind::Group { fields } | FieldKind::Array { fields } => Some(fields),
            _ => None,
        }
    }
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Paths that may carry a localization wrapper, e.g. `/title` or
    /// `/items/*/label` (`*` stands for any array row).
    pub fn localized_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_localized(&self.fields, "", &mut out);
        out
    }

    /// Fills top-level fields that are absent (or null) with their declared
    /// defaults. Non-object values are replaced by an object first.
    pub fn apply_defaults(&self, values: &mut Value) {
        if !values.is_object() {
            *values = Value::Object(Map::new());
        }
        let Some(obj) = values.as_object_mut() else {
            return;
        };
        for field in &self.fields {
            let Some(default) = &field.default else {
                continue;
            };
            let missing = obj.get(&field.name).is_none_or(Value::is_null);
            if missing {
                obj.insert(field.name.clone(), default.clone());
            }
        }
    }

    /// Reports required fields that are missing and scalar values of the
    /// wrong kind. Every locale variant of a localized field is checked.
    pub fn check_values(&self, values: &Value) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        let empty = Map::new();
        let obj = values.as_object().unwrap_or(&empty);
        check_fields(&self.fields, obj, "", &mut out);
        out
    }
}

fn collect_localized(fields: &[FieldDef], prefix: &str, out: &mut Vec<String>) {
    for f in fields {
        let path = format!("{prefix}/{}", f.name);
        if f.localized {
            out.push(path.clone());
        }
        match &f.kind {
            FieldKind::Group { fields } => collect_localized(fields, &path, out),
            FieldKind::Array { fields } => collect_localized(fields, &format!("{path}/*"), out),
            _ => {}
        }
    }
}

fn check_fields(fields: &[FieldDef], obj: &Map<String, Value>, prefix: &str, out: &mut Vec<FieldViolation>) {
    for field in fields {
        let path = format!("{prefix}/{}", field.name);
        match obj.get(&field.name) {
            None | Some(Value::Null) => {
                if field.required && field.default.is_none() {
                    out.push(FieldViolation {
                        path,
                        problem: FieldProblem::Missing,
                    });
                }
            }
            Some(value) => match as_localized(value).filter(|_| field.localized) {
                Some(variants) => {
                    for (locale, v) in variants {
                        if !v.is_null() {
                            check_value(field, v, &format!("{path}[{locale}]"), out);
                        }
                    }
                }
                None => check_value(field, value, &path, out),
            },
        }
    }
}

fn check_value(field: &FieldDef, value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let wrong = |expected| FieldViolation {
        path: path.to_string(),
        problem: FieldProblem::WrongKind { expected },
    };
    match &field.kind {
        FieldKind::Text if !value.is_string() => out.push(wrong("a string")),
        FieldKind::RichText if !(value.is_string() || value.is_array() || value.is_object()) => {
            out.push(wrong("rich text"))
        }
        FieldKind::Number if !value.is_number() => out.push(wrong("a number")),
        FieldKind::Bool if !value.is_boolean() => out.push(wrong("a boolean")),
        FieldKind::Upload { .. } | FieldKind::Relationship { .. }
            if !(value.is_string() || value.is_number()) =>
        {
            out.push(wrong("a record id"))
        }
        FieldKind::Select { options } => match value.as_str() {
            Some(s) if options.iter().any(|o| o == s) => {}
            Some(s) => out.push(FieldViolation {
                path: path.to_string(),
                problem: FieldProblem::NotAnOption(s.to_string()),
            }),
            None => out.push(wrong("a string")),
        },
        FieldKind::Group { fields } => match value.as_object() {
            Some(inner) => check_fields(fields, inner, path, out),
            None => out.push(wrong("an object")),
        },
        FieldKind::Array { fields } => match value.as_array() {
            Some(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    let row_path = format!("{path}/{i}");
                    match row.as_object() {
                        Some(inner) => check_fields(fields, inner, &row_path, out),
                        None => out.push(FieldViolation {
                            path: row_path,
                            problem: FieldProblem::WrongKind {
                                expected: "an object",
                            },
                        }),
                    }
                }
            }
            None => out.push(wrong("an array")),
        },
        _ => {}
    }
}

use blockpress_model::{FieldDef, FieldKind, FieldSchema, as_localized};
use serde_json::{Map, Value};
use tracing::trace;

/// A requested locale together with everything needed to fall back from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRequest {
    pub requested: String,
    pub fallback_chain: Vec<String>,
    pub default_locale: String,
}

impl LocaleRequest {
    pub fn new(requested: impl Into<String>, fallback_chain: Vec<String>, default_locale: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            fallback_chain,
            default_locale: default_locale.into(),
        }
    }

    /// Request for the default locale itself, with no fallbacks.
    pub fn default_only(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self::new(default_locale.clone(), Vec::new(), default_locale)
    }

    /// Locales in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.requested.as_str())
            .chain(self.fallback_chain.iter().map(String::as_str))
            .chain(std::iter::once(self.default_locale.as_str()))
    }
}

/// Finds the first candidate locale with an entry in `variants`.
///
/// An explicit `null` entry counts as missing; an empty string does not.
pub fn pick_locale<'a>(variants: &'a Map<String, Value>, request: &'a LocaleRequest) -> Option<(&'a str, &'a Value)> {
    request
        .candidates()
        .find_map(|locale| variants.get(locale).filter(|v| !v.is_null()).map(|v| (locale, v)))
}

/// Resolves a single value. Values that are not localization wrappers are
/// returned unchanged.
pub fn resolve(value: &Value, requested: &str, fallback_chain: &[String], default_locale: &str) -> Value {
    let request = LocaleRequest::new(requested, fallback_chain.to_vec(), default_locale);
    resolve_request(value, &request)
}

pub fn resolve_request(value: &Value, request: &LocaleRequest) -> Value {
    let Some(variants) = as_localized(value) else {
        return value.clone();
    };
    match pick_locale(variants, request) {
        Some((_, v)) => v.clone(),
        None => {
            trace!(requested = %request.requested, "no locale variant found, resolving to null");
            Value::Null
        }
    }
}

/// Resolves every localized path the schema declares inside a node's values.
///
/// Fields absent from the schema, and declared fields not marked localized,
/// are copied as-is. Group and array fields are descended into after their
/// own (optional) wrapper is resolved, so a localized array of rows with
/// localized leaves resolves both levels.
pub fn resolve_fields(values: &Value, schema: &FieldSchema, request: &LocaleRequest) -> Value {
    match values.as_object() {
        Some(obj) => Value::Object(resolve_object(obj, &schema.fields, request)),
        None => values.clone(),
    }
}

fn resolve_object(obj: &Map<String, Value>, fields: &[FieldDef], request: &LocaleRequest) -> Map<String, Value> {
    let mut out = obj.clone();
    for field in fields {
        if let Some(value) = obj.get(&field.name) {
            out.insert(field.name.clone(), resolve_field(value, field, request));
        }
    }
    out
}

fn resolve_field(value: &Value, field: &FieldDef, request: &LocaleRequest) -> Value {
    let value = if field.localized {
        resolve_request(value, request)
    } else {
        value.clone()
    };
    match (&field.kind, value) {
        (FieldKind::Group { fields }, Value::Object(obj)) => Value::Object(resolve_object(&obj, fields, request)),
        (FieldKind::Array { fields }, Value::Array(rows)) => Value::Array(
            rows.into_iter()
                .map(|row| match row {
                    Value::Object(obj) => Value::Object(resolve_object(&obj, fields, request)),
                    other => other,
                })
                .collect(),
        ),
        (_, value) => value,
    }
}

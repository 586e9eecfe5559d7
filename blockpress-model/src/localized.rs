//! The persisted localization marker.
//!
//! A localized field is stored as `{"$locales": {"en": ..., "de": ...}}`. The
//! reserved key keeps per-locale maps distinct from ordinary object-valued
//! fields (a group field may legitimately have keys named `en` or `de`).

use serde_json::{Map, Value};

/// Reserved key marking a value as a per-locale map.
pub const LOCALIZED_KEY: &str = "$locales";

/// Returns the per-locale map if `value` is a localization wrapper.
///
/// A wrapper is an object with exactly one key, [`LOCALIZED_KEY`], whose value
/// is itself an object.
pub fn as_localized(value: &Value) -> Option<&Map<String, Value>> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get(LOCALIZED_KEY)?.as_object()
}

pub fn is_localized(value: &Value) -> bool {
    as_localized(value).is_some()
}

/// Builds a localization wrapper from `(locale, value)` pairs.
pub fn localized<I, K>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let locales: Map<String, Value> = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let mut wrapper = Map::with_capacity(1);
    wrapper.insert(LOCALIZED_KEY.to_string(), Value::Object(locales));
    Value::Object(wrapper)
}

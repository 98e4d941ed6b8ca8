//! Assembly helpers shared by the builders.

use serde_json::{Map, Value, json};

/// JSON number from an `f64`; non-finite values become `null` since JSON
/// cannot carry NaN/inf.
pub(crate) fn num(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Merge caller overrides over the assembled option at the top level.
/// A key present in `extra` replaces the built-in section wholesale.
pub(crate) fn merge_extra(option: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (key, value) in extra {
        option.insert(key.clone(), value.clone());
    }
}

/// Standard centered title section, inserted only when a title is set.
pub(crate) fn insert_title(option: &mut Map<String, Value>, title: Option<&str>) {
    if let Some(text) = title {
        option.insert("title".into(), json!({"text": text, "left": "center"}));
    }
}

//! Primitive helpers for walking a deserialized markup tree.

use serde_json::Value;

/// Text content key used for elements that also carry attributes.
const TEXT_KEY: &str = "#text";

/// Prefix of keys holding markup attributes.
const ATTRIBUTE_PREFIX: char = '@';

pub(crate) fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node.as_object()?.get(key)? {
        Value::Null => None,
        found => Some(found),
    }
}

/// Repeated elements arrive as a sequence; a lone element arrives bare.
pub(crate) fn items(node: &Value) -> Vec<&Value> {
    match node {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Scalar text of a node, looking through `#text` wrappers.
pub(crate) fn text(node: &Value) -> Option<String> {
    match node {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(text),
        Value::Null | Value::Array(_) => None,
    }
}

pub(crate) fn is_attribute(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

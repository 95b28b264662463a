//! Depth-first enumeration of every node below a root.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::expr::join;

/// Coarse type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Array,
    Object,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" | "bool" => Ok(Self::Boolean),
            "null" => Ok(Self::Null),
            other => Err(format!("unknown node kind: {other}")),
        }
    }
}

/// One node visited by [`enumerate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub path: String,
    pub kind: NodeKind,
    /// `None` for containers.
    pub value: Option<&'a Value>,
}

/// Depth-first iterator over all nodes below a root.
///
/// Call [`enumerate`] again for a fresh pass. A clone continues independently
/// from the same position.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(String, &'a Value)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        push_children(&mut self.stack, &path, node);
        let kind = NodeKind::of(node);
        let value = if kind.is_container() { None } else { Some(node) };
        Some(Entry { path, kind, value })
    }
}

/// Visits every node reachable from `root` (the root itself excluded).
///
/// Mapping keys are visited in insertion order and sequence elements by index.
pub fn enumerate(root: &Value) -> Walk<'_> {
    let mut stack = Vec::new();
    push_children(&mut stack, "", root);
    Walk { stack }
}

fn push_children<'a>(stack: &mut Vec<(String, &'a Value)>, parent: &str, node: &'a Value) {
    // Pushed in reverse so the first child pops first.
    match node {
        Value::Object(map) => {
            for (key, child) in map.iter().rev() {
                stack.push((join(parent, key), child));
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate().rev() {
                stack.push((join(parent, &index.to_string()), child));
            }
        }
        _ => {}
    }
}

/// Leaves whose value matches `target`.
///
/// With `exact`, values must be equal (numbers compare numerically). Otherwise
/// a string target matches string leaves case-insensitively by substring, and
/// any other pairing matches by substring of the stringified forms.
pub fn find_by_value<'a>(
    root: &'a Value,
    target: &'a Value,
    exact: bool,
) -> impl Iterator<Item = Entry<'a>> {
    enumerate(root).filter(move |entry| {
        entry
            .value
            .is_some_and(|value| value_matches(value, target, exact))
    })
}

/// Nodes with the given kind tag.
pub fn find_by_type(root: &Value, kind: NodeKind) -> impl Iterator<Item = Entry<'_>> {
    enumerate(root).filter(move |entry| entry.kind == kind)
}

fn value_matches(candidate: &Value, target: &Value, exact: bool) -> bool {
    if exact {
        return match (candidate, target) {
            (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
            _ => candidate == target,
        };
    }
    match (candidate, target) {
        (Value::String(c), Value::String(t)) => c.to_lowercase().contains(&t.to_lowercase()),
        _ => stringify(candidate).contains(&stringify(target)),
    }
}

/// Plain text form: strings unquoted, everything else as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths(root: &Value) -> Vec<String> {
        enumerate(root).map(|entry| entry.path).collect()
    }

    #[test]
    fn enumerates_depth_first_in_insertion_order() {
        let root = json!({
            "z": {"b": 1, "a": [true, null]},
            "y": "s"
        });
        assert_eq!(paths(&root), ["z", "z.b", "z.a", "z.a.0", "z.a.1", "y"]);
        assert_eq!(paths(&root), paths(&root));
    }

    #[test]
    fn containers_carry_no_value() {
        let root = json!({"a": [1]});
        let entries: Vec<Entry<'_>> = enumerate(&root).collect();
        assert_eq!(entries[0].kind, NodeKind::Array);
        assert_eq!(entries[0].value, None);
        assert_eq!(entries[1].kind, NodeKind::Number);
        assert_eq!(entries[1].value, Some(&json!(1)));
    }

    #[test]
    fn fuzzy_value_match_ignores_case() {
        let root = json!({"name": "Active Inventory", "code": "OCTG"});
        let target = json!("inventory");
        let hits: Vec<String> = find_by_value(&root, &target, false)
            .map(|entry| entry.path)
            .collect();
        assert_eq!(hits, ["name"]);
    }

    #[test]
    fn exact_value_match_compares_numbers_numerically() {
        let root = json!({"a": 10, "b": 10.0, "c": "10"});
        let target = json!(10);
        let hits: Vec<String> = find_by_value(&root, &target, true)
            .map(|entry| entry.path)
            .collect();
        assert_eq!(hits, ["a", "b"]);
    }

    #[test]
    fn fuzzy_match_on_stringified_numbers() {
        let root = json!({"a": 51.4, "b": "x51.4y"});
        let target = json!(51.4);
        let hits: Vec<String> = find_by_value(&root, &target, false)
            .map(|entry| entry.path)
            .collect();
        assert_eq!(hits, ["a", "b"]);
    }

    #[test]
    fn find_by_type_filters_tags() {
        let root = json!({"a": [1, "x"], "b": {"c": "y"}});
        let hits: Vec<String> = find_by_type(&root, NodeKind::String)
            .map(|entry| entry.path)
            .collect();
        assert_eq!(hits, ["a.1", "b.c"]);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Array".parse::<NodeKind>(), Ok(NodeKind::Array));
        assert!("tuple".parse::<NodeKind>().is_err());
    }
}

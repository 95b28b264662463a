//! Copy-on-write get/set/delete over nested [`Value`]s.
//!
//! Every operation leaves its input untouched. Writes clone the whole root and
//! mutate the clone. Addressing misses never panic: [`get`] returns `None`,
//! [`set`] and [`delete`] return an unmodified copy.
//!
//! Writing past the end of a sequence pads the gap with `null`, but the gap may
//! hold at most [`MAX_INDEX_GAP`] padding slots. A farther index is treated as
//! unreachable.

use serde_json::{Map, Value};

use crate::error::{PathError, Result};
use crate::expr::{PathExpression, Segment};

/// Largest number of `null` slots a single write may insert before its index.
pub const MAX_INDEX_GAP: usize = 1024;

/// Returns the value at `path`, or `None` once any step is missing, `null`, or
/// not a container.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    get_at(root, &PathExpression::parse(path))
}

pub fn get_at<'a>(root: &'a Value, path: &PathExpression) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

/// Returns a new root with `value` written at `path`.
///
/// Unreachable paths yield an unmodified copy of `root`.
pub fn set(root: &Value, path: &str, value: Value) -> Value {
    try_set(root, path, value).unwrap_or_else(|_| root.clone())
}

/// Like [`set`], but reports an unreachable path instead of swallowing it.
pub fn try_set(root: &Value, path: &str, value: Value) -> Result<Value> {
    try_set_at(root, &PathExpression::parse(path), value)
}

pub fn try_set_at(root: &Value, path: &PathExpression, value: Value) -> Result<Value> {
    let mut out = root.clone();
    write_at(&mut out, path.segments(), value, 0).map_err(|depth| PathError::Unreachable {
        path: path.to_string(),
        segment: path.segments()[depth].to_string(),
    })?;
    Ok(out)
}

/// Returns a new root with the leaf at `path` removed.
///
/// Sequence elements are removed positionally, so later elements shift down.
/// An unreachable parent, a missing key, or an out-of-bounds index leaves the
/// copy unchanged.
pub fn delete(root: &Value, path: &str) -> Value {
    delete_at(root, &PathExpression::parse(path))
}

pub fn delete_at(root: &Value, path: &PathExpression) -> Value {
    let mut out = root.clone();
    if let Some((last, parents)) = path.split_last()
        && let Some(parent) = get_mut(&mut out, parents)
    {
        remove_child(parent, last);
    }
    out
}

fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key.as_str()),
        (Value::Object(map), Segment::Index(index)) => map.get(index.to_string().as_str()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

fn get_mut<'a>(root: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    segments.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), segment) => map.get_mut(segment.as_key().as_str()),
        (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
        _ => None,
    })
}

fn remove_child(parent: &mut Value, segment: &Segment) {
    match (parent, segment) {
        (Value::Object(map), segment) => {
            map.shift_remove(segment.as_key().as_str());
        }
        (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
            items.remove(*index);
        }
        _ => {}
    }
}

/// Writes `value` below `node`. On failure returns the index of the segment
/// that could not be applied.
fn write_at(
    node: &mut Value,
    segments: &[Segment],
    value: Value,
    depth: usize,
) -> std::result::Result<(), usize> {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return Ok(());
    };
    if node.is_null() {
        *node = empty_container(first);
    }
    let slot = match node {
        Value::Object(map) => map.entry(first.as_key()).or_insert(Value::Null),
        Value::Array(items) => {
            let &Segment::Index(index) = first else {
                return Err(depth);
            };
            if index >= items.len() {
                let len = index
                    .checked_add(1)
                    .filter(|len| *len <= items.len().saturating_add(MAX_INDEX_GAP + 1))
                    .ok_or(depth)?;
                items.resize(len, Value::Null);
            }
            &mut items[index]
        }
        _ => return Err(depth),
    };
    write_at(slot, rest, value, depth + 1)
}

/// A container suited to hold `next`: a sequence for an index, else a mapping.
fn empty_container(next: &Segment) -> Value {
    if next.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

//! Row construction and grand-total filtering.

use formbind_model::{Column, ColumnKind, DataRow};
use serde_json::{Number, Value};
use tracing::debug;

use crate::node::is_attribute;

/// Positional values of one output record, depth-first in document order.
///
/// Markup attributes are not positional values and are skipped.
pub(crate) fn record_values(record: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    collect_leaves(record, &mut out);
    out
}

fn collect_leaves(node: &Value, out: &mut Vec<Value>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                if !is_attribute(key) {
                    collect_leaves(child, out);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_leaves(child, out);
            }
        }
        leaf => out.push(leaf.clone()),
    }
}

/// Zips positional values against `order`. Missing values become `""`;
/// surplus values are dropped.
pub(crate) fn zip_row(order: &[&Column], values: Vec<Value>) -> DataRow {
    let mut values = values.into_iter();
    order
        .iter()
        .map(|column| {
            let value = values.next().unwrap_or(Value::Null);
            (column.key.clone(), coerce_cell(column.kind, value))
        })
        .collect()
}

/// Normalizes a raw cell to a scalar. Key figures become numbers when their
/// text parses as one.
pub(crate) fn coerce_cell(kind: ColumnKind, value: Value) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::String(String::new()),
        (ColumnKind::KeyFigure, Value::String(text)) => parse_number(&text)
            .map(Value::Number)
            .unwrap_or(Value::String(text)),
        (_, Value::Bool(flag)) => Value::String(flag.to_string()),
        (_, other) => other,
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Drops rows whose concatenated text contains `marker`.
pub(crate) fn drop_aggregates(rows: Vec<DataRow>, marker: &str) -> Vec<DataRow> {
    if marker.is_empty() {
        return rows;
    }
    let before = rows.len();
    let kept: Vec<DataRow> = rows
        .into_iter()
        .filter(|row| !row.concatenated().contains(marker))
        .collect();
    debug!(
        dropped = before - kept.len(),
        kept = kept.len(),
        "filtered aggregate rows"
    );
    kept
}

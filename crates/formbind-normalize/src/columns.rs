//! Column derivation: keys, classification, and synthetic key columns.

use std::collections::BTreeSet;

use formbind_model::{Column, ColumnKind, NormalizeError, Result};
use serde_json::Value;
use tracing::debug;

use crate::node::{child, text};

/// Suffix of the fallback key used for a synthetic column.
const SYNTHETIC_KEY_SUFFIX: &str = "_KEY";

/// A base column and the synthetic key column derived from it, if any.
#[derive(Debug, Clone)]
pub(crate) struct PlannedColumn {
    pub base: Column,
    pub synthetic: Option<Column>,
}

/// Columns in metadata order, before ranking.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    /// Order in which positional record values are laid out: every base column,
    /// then every synthetic key column.
    pub fn collection_order(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .map(|planned| &planned.base)
            .chain(self.columns.iter().filter_map(|planned| planned.synthetic.as_ref()))
            .collect()
    }
}

/// Hands out unique column keys.
#[derive(Debug, Default)]
pub(crate) struct KeyAllocator {
    assigned: BTreeSet<String>,
}

impl KeyAllocator {
    /// Uses the key derived from `label`; on collision falls back to
    /// `fallback` once. A second collision is an error.
    pub fn allocate(&mut self, label: &str, fallback: &str) -> Result<String> {
        let derived = derive_key(label);
        let key = if !derived.is_empty() && !self.assigned.contains(&derived) {
            derived
        } else if !fallback.is_empty() && !self.assigned.contains(fallback) {
            debug!(label, derived = %derived, fallback, "column key collision, using field identifier");
            fallback.to_string()
        } else {
            return Err(NormalizeError::DuplicateColumnKey {
                key: if derived.is_empty() {
                    fallback.to_string()
                } else {
                    derived
                },
                label: label.to_string(),
            });
        };
        self.assigned.insert(key.clone());
        Ok(key)
    }

    /// Claims an exact key with no fallback.
    pub fn claim(&mut self, key: &str, label: &str) -> Result<String> {
        if key.is_empty() || !self.assigned.insert(key.to_string()) {
            return Err(NormalizeError::DuplicateColumnKey {
                key: key.to_string(),
                label: label.to_string(),
            });
        }
        Ok(key.to_string())
    }
}

/// Strips every non-alphanumeric character from a display label.
pub fn derive_key(label: &str) -> String {
    label.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Builds the column plan from `META.columnMetadata` entries.
pub(crate) fn plan_from_metadata(entries: &[&Value], label_suffix: &str) -> Result<ColumnPlan> {
    let mut keys = KeyAllocator::default();
    let mut plan = ColumnPlan::default();
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            return Err(NormalizeError::invalid(
                format!("META.columnMetadata[{index}]"),
                "an element",
            ));
        }
        let field_identifier = child(entry, "fieldIdentifier")
            .and_then(text)
            .unwrap_or_default();
        let label = child(entry, "label")
            .and_then(text)
            .unwrap_or_else(|| field_identifier.clone());
        let tag = child(entry, "type").and_then(text).unwrap_or_default();
        let kind = ColumnKind::from_tag(&tag).ok_or_else(|| NormalizeError::UnknownColumnType {
            label: label.clone(),
            tag: tag.clone(),
        })?;

        let key = keys.allocate(&label, &field_identifier)?;
        let base = Column::new(key, label.clone(), kind);
        let synthetic = match child(entry, "expanded") {
            Some(_) => {
                let synthetic_label = format!("{label}{label_suffix}");
                let fallback = if field_identifier.is_empty() {
                    String::new()
                } else {
                    format!("{field_identifier}{SYNTHETIC_KEY_SUFFIX}")
                };
                let key = keys.allocate(&synthetic_label, &fallback)?;
                Some(Column::synthetic(key, synthetic_label))
            }
            None => None,
        };
        plan.columns.push(PlannedColumn { base, synthetic });
    }
    Ok(plan)
}

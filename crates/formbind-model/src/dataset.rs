//! Normalized tabular dataset types.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Role of a column in the source report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    /// Categorical grouping column.
    Characteristic,
    /// Numeric measure column.
    KeyFigure,
}

impl ColumnKind {
    /// Classifies a report type tag (`CHA` or `KF`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "CHA" => Some(Self::Characteristic),
            "KF" => Some(Self::KeyFigure),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Characteristic => "CHA",
            Self::KeyFigure => "KF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique within a dataset.
    pub key: String,
    pub display_label: String,
    pub kind: ColumnKind,
    /// Extra column carrying the code behind an expanded characteristic.
    #[serde(default)]
    pub is_synthetic_key: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, display_label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            display_label: display_label.into(),
            kind,
            is_synthetic_key: false,
        }
    }

    pub fn synthetic(key: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            is_synthetic_key: true,
            ..Self::new(key, display_label, ColumnKind::Characteristic)
        }
    }

    pub fn is_characteristic(&self) -> bool {
        self.kind == ColumnKind::Characteristic
    }

    /// Characteristic that takes part in primary-axis ranking.
    pub fn is_rankable(&self) -> bool {
        self.is_characteristic() && !self.is_synthetic_key
    }
}

/// One record: column key to scalar (string, number, or empty string).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow {
    cells: Map<String, Value>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.cells.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Text form of a cell; missing cells read as empty.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(cell_text).unwrap_or_default()
    }

    /// All cell texts joined in column order, used for aggregate detection.
    pub fn concatenated(&self) -> String {
        self.cells.values().map(cell_text).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Value)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Plain text of a scalar cell. `null` reads as empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDataset {
    pub columns: Vec<Column>,
    pub rows: Vec<DataRow>,
    /// Highest-cardinality characteristic; `None` when there is none.
    pub primary_axis_key: Option<String>,
    /// Distinct values per ranked characteristic, primary axis excluded.
    pub distinct_values_by_column: BTreeMap<String, BTreeSet<String>>,
}

impl NormalizedDataset {
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn characteristics(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_characteristic())
    }

    pub fn key_figures(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|column| column.kind == ColumnKind::KeyFigure)
    }

    pub fn primary_axis(&self) -> Option<&Column> {
        self.primary_axis_key
            .as_deref()
            .and_then(|key| self.column(key))
    }

    pub fn distinct_values(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.distinct_values_by_column.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub description: String,
    /// Unset when the report's load date could not be parsed.
    pub loaded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReport {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub dataset: NormalizedDataset,
}

/// Wire form of a normalization result: the report, or a lone `{ "error" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizeOutcome {
    Report(Box<NormalizedReport>),
    Failure { error: String },
}

impl NormalizeOutcome {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Report(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl From<Result<NormalizedReport, NormalizeError>> for NormalizeOutcome {
    fn from(result: Result<NormalizedReport, NormalizeError>) -> Self {
        match result {
            Ok(report) => Self::Report(Box::new(report)),
            Err(error) => Self::Failure {
                error: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_type_tags() {
        assert_eq!(ColumnKind::from_tag("CHA"), Some(ColumnKind::Characteristic));
        assert_eq!(ColumnKind::from_tag(" kf "), Some(ColumnKind::KeyFigure));
        assert_eq!(ColumnKind::from_tag("UNIT"), None);
    }

    #[test]
    fn row_concatenation_uses_cell_text() {
        let row: DataRow = [
            ("A".to_string(), json!("Overall")),
            ("B".to_string(), json!(" Result")),
            ("C".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(row.concatenated(), "Overall Result");
        assert_eq!(row.text("missing"), "");
    }

    #[test]
    fn failure_serializes_as_single_error_field() {
        let outcome = NormalizeOutcome::from(Err(NormalizeError::missing("values")));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, json!({"error": "missing values in report document"}));
    }
}

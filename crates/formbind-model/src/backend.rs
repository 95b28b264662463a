//! Tabular payload produced by the report transport layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One header cell describing a chart column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderEntry {
    /// `CHA` or `KF`.
    #[serde(rename = "type")]
    pub column_type: String,
    pub label: String,
    pub field_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendData {
    pub header: Vec<HeaderEntry>,
    #[serde(default)]
    pub chart_data: Vec<Map<String, Value>>,
}

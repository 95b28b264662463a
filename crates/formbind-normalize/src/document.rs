//! Normalization of a deserialized report export.

use formbind_model::{NormalizeError, NormalizeOutcome, NormalizedReport, Result};
use serde_json::Value;
use tracing::debug;

use crate::columns::plan_from_metadata;
use crate::metadata::extract_metadata;
use crate::node::{child, items, text};
use crate::options::NormalizeOptions;
use crate::rank::assemble;
use crate::rows::{drop_aggregates, record_values, zip_row};

/// Turns a report tree into metadata plus a ranked dataset.
///
/// Expected shape:
///
/// ```text
/// root.values.metadata             { description, load_date }
/// root.values.META.columnMetadata  [{ label, fieldIdentifier, type, expanded? }]
/// root.values.OUTPUT.item          [record]
/// root.error                       present on report failure
/// ```
///
/// # Errors
///
/// Returns [`NormalizeError`] when the report carries an error indicator, when
/// a required node is absent, or when columns cannot be keyed or classified.
pub fn normalize_document(document: &Value, options: &NormalizeOptions) -> Result<NormalizedReport> {
    if let Some(error) = child(document, "error") {
        let message = text(error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "unspecified report error".to_string());
        return Err(NormalizeError::ReportError { message });
    }
    let values = child(document, "values").ok_or_else(|| NormalizeError::missing("values"))?;
    let metadata = extract_metadata(values, &options.date_formats);

    let column_metadata = child(values, "META")
        .and_then(|meta| child(meta, "columnMetadata"))
        .ok_or_else(|| NormalizeError::missing("values.META.columnMetadata"))?;
    let plan = plan_from_metadata(&items(column_metadata), &options.synthetic_label_suffix)?;

    let output = child(values, "OUTPUT").ok_or_else(|| NormalizeError::missing("values.OUTPUT"))?;
    let records = child(output, "item").map(items).unwrap_or_default();
    let order = plan.collection_order();
    let rows: Vec<_> = records
        .into_iter()
        .map(|record| zip_row(&order, record_values(record)))
        .collect();
    debug!(
        columns = order.len(),
        records = output_len(output),
        "parsed report layout"
    );
    let rows = drop_aggregates(rows, &options.aggregate_marker);

    Ok(NormalizedReport {
        metadata,
        dataset: assemble(plan, rows),
    })
}

/// Like [`normalize_document`], but folds a failure into the `{ error }` form.
pub fn normalize_outcome(document: &Value, options: &NormalizeOptions) -> NormalizeOutcome {
    normalize_document(document, options).into()
}

fn output_len(output: &Value) -> usize {
    child(output, "item").map_or(0, |item| items(item).len())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_indicator_short_circuits() {
        let doc = json!({"error": "No data available", "values": {}});
        let err = normalize_document(&doc, &NormalizeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::ReportError {
                message: "No data available".to_string()
            }
        );
    }

    #[test]
    fn missing_shape_is_reported() {
        let err = normalize_document(&json!({"values": {"META": {}}}), &NormalizeOptions::default())
            .unwrap_err();
        assert_eq!(err, NormalizeError::missing("values.META.columnMetadata"));
        let outcome = normalize_outcome(&json!("not a tree"), &NormalizeOptions::default());
        assert_eq!(outcome.error(), Some("missing values in report document"));
    }

    #[test]
    fn empty_output_yields_no_rows() {
        let doc = json!({"values": {
            "META": {"columnMetadata": {"label": "Plant", "type": "CHA"}},
            "OUTPUT": ""
        }});
        let report = normalize_document(&doc, &NormalizeOptions::default()).unwrap();
        assert!(report.dataset.rows.is_empty());
        assert_eq!(report.dataset.primary_axis_key.as_deref(), Some("Plant"));
    }
}

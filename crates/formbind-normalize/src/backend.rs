//! Normalization of the `{ header, chartData }` transport payload.

use formbind_model::{BackendData, Column, ColumnKind, NormalizeError, NormalizedDataset, Result};
use serde_json::Value;

use crate::columns::{ColumnPlan, KeyAllocator, PlannedColumn};
use crate::options::NormalizeOptions;
use crate::rank::assemble;
use crate::rows::{drop_aggregates, zip_row};

/// Applies aggregate filtering and primary-axis ranking to backend data.
///
/// Header `fieldName`s are used as column keys verbatim.
///
/// # Errors
///
/// Fails on an unknown `type` tag or a repeated `fieldName`.
pub fn normalize_backend(data: &BackendData, options: &NormalizeOptions) -> Result<NormalizedDataset> {
    let mut keys = KeyAllocator::default();
    let mut plan = ColumnPlan::default();
    for entry in &data.header {
        let kind = ColumnKind::from_tag(&entry.column_type).ok_or_else(|| {
            NormalizeError::UnknownColumnType {
                label: entry.label.clone(),
                tag: entry.column_type.clone(),
            }
        })?;
        let key = keys.claim(&entry.field_name, &entry.label)?;
        plan.columns.push(PlannedColumn {
            base: Column::new(key, entry.label.clone(), kind),
            synthetic: None,
        });
    }

    let order = plan.collection_order();
    let rows: Vec<_> = data
        .chart_data
        .iter()
        .map(|record| {
            let values = order
                .iter()
                .map(|column| record.get(&column.key).cloned().unwrap_or(Value::Null))
                .collect();
            zip_row(&order, values)
        })
        .collect();
    let rows = drop_aggregates(rows, &options.aggregate_marker);
    Ok(assemble(plan, rows))
}

//! Primary-axis ranking and final column assembly.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use formbind_model::{Column, DataRow, NormalizedDataset};
use tracing::debug;

use crate::columns::{ColumnPlan, PlannedColumn};

/// Ranks characteristics by distinct-value count and lays out the final
/// columns with each synthetic key column directly before its base column.
pub(crate) fn assemble(plan: ColumnPlan, rows: Vec<DataRow>) -> NormalizedDataset {
    let mut ranked = Vec::new();
    let mut others = Vec::new();
    for planned in plan.columns {
        if planned.base.is_rankable() {
            let distinct = distinct_values(&rows, &planned.base.key);
            ranked.push(RankedColumn { planned, distinct });
        } else {
            others.push(planned);
        }
    }
    // Stable: equal counts keep metadata order.
    ranked.sort_by_key(|column| Reverse(column.distinct.len()));

    let primary_axis_key = ranked.first().map(|column| column.planned.base.key.clone());
    if let Some(key) = &primary_axis_key {
        debug!(primary_axis = %key, candidates = ranked.len(), "ranked characteristics");
    }

    let mut columns = Vec::new();
    let mut distinct_values_by_column = BTreeMap::new();
    for (rank, column) in ranked.into_iter().enumerate() {
        let RankedColumn { planned, distinct } = column;
        if rank > 0 {
            distinct_values_by_column.insert(planned.base.key.clone(), distinct);
        }
        splice(&mut columns, planned);
    }
    for planned in others {
        splice(&mut columns, planned);
    }

    NormalizedDataset {
        columns,
        rows,
        primary_axis_key,
        distinct_values_by_column,
    }
}

struct RankedColumn {
    planned: PlannedColumn,
    distinct: BTreeSet<String>,
}

fn splice(columns: &mut Vec<Column>, planned: PlannedColumn) {
    columns.extend(planned.synthetic);
    columns.push(planned.base);
}

fn distinct_values(rows: &[DataRow], key: &str) -> BTreeSet<String> {
    rows.iter().map(|row| row.text(key)).collect()
}

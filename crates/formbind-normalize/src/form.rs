//! Builds the three-level lookup consumed by field mappings.

use formbind_model::{FieldMeta, FormMetadata, FormStructure, NormalizedDataset, TransformedData};

/// Indexes every key figure by each characteristic's row value.
///
/// Synthetic key columns are not indexed. When two rows share a
/// characteristic value the later row wins.
pub fn build_form_structure(dataset: &NormalizedDataset) -> FormStructure {
    let mut form = FormStructure::new();
    let key_figures: Vec<&str> = dataset.key_figures().map(|column| column.key.as_str()).collect();
    for characteristic in dataset.columns.iter().filter(|column| column.is_rankable()) {
        for row in &dataset.rows {
            let cha_value = row.text(&characteristic.key);
            for kf in &key_figures {
                if let Some(value) = row.get(kf) {
                    form.insert(
                        characteristic.key.as_str(),
                        cha_value.as_str(),
                        *kf,
                        value.clone(),
                    );
                }
            }
        }
    }
    form
}

/// Display labels for every column.
pub fn build_form_metadata(dataset: &NormalizedDataset) -> FormMetadata {
    dataset
        .columns
        .iter()
        .map(|column| {
            (
                column.key.clone(),
                FieldMeta {
                    label: column.display_label.clone(),
                },
            )
        })
        .collect()
}

pub fn transform_dataset(dataset: &NormalizedDataset) -> TransformedData {
    TransformedData {
        form_structure: build_form_structure(dataset),
        form_metadata: build_form_metadata(dataset),
    }
}

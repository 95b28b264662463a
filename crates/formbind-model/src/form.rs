//! Three-level lookup surface queried by field mappings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `characteristic field -> characteristic value -> key figure field -> scalar`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormStructure {
    fields: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>,
}

impl FormStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` as soon as any of the three levels is absent.
    pub fn lookup(&self, cha_field: &str, cha_value: &str, kf_field: &str) -> Option<&Value> {
        self.fields.get(cha_field)?.get(cha_value)?.get(kf_field)
    }

    /// Stores a value, replacing any earlier one at the same address.
    pub fn insert(
        &mut self,
        cha_field: impl Into<String>,
        cha_value: impl Into<String>,
        kf_field: impl Into<String>,
        value: Value,
    ) {
        self.fields
            .entry(cha_field.into())
            .or_default()
            .entry(cha_value.into())
            .or_default()
            .insert(kf_field.into(), value);
    }

    pub fn characteristic_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Characteristic values recorded under `cha_field`.
    pub fn values_of(&self, cha_field: &str) -> impl Iterator<Item = &str> {
        self.fields
            .get(cha_field)
            .into_iter()
            .flat_map(|values| values.keys().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub label: String,
}

/// Display labels keyed by column key.
pub type FormMetadata = BTreeMap<String, FieldMeta>;

/// Lookup surface plus display metadata, as exchanged with presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedData {
    #[serde(rename = "FormStructure")]
    pub form_structure: FormStructure,
    #[serde(rename = "FormMetadata", default)]
    pub form_metadata: FormMetadata,
}

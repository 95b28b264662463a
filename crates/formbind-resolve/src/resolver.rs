//! Field-by-field resolution of a mapping set.

use formbind_model::{
    DataTransformation, FieldMappingConfig, FormStructure, HybridEntry, HybridEntryType,
    LookupKey, MappedConfig, MappingSet, NormalizedDataset,
};
use formbind_normalize::build_form_structure;
use formbind_path::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FieldFailure, ResolveError, Result};
use crate::transform::TransformRegistry;

/// Output of one resolution call.
///
/// `props` is always complete: failed fields keep their base value and are
/// listed in `failures`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub props: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FieldFailure>,
}

impl Resolution {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// One line per failed field, for display to an end user.
    pub fn error_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.field, failure.message))
            .collect();
        Some(lines.join("\n"))
    }
}

/// Resolves a mapping set against `form`, starting from `base`.
///
/// Entries are processed in key order, each against the properties produced
/// so far, so several `mapped` entries with a `path` can build one composite
/// property. A `base` that is not an object is ignored.
pub fn resolve(
    config: &MappingSet,
    form: &FormStructure,
    base: &Value,
    registry: &TransformRegistry,
) -> Resolution {
    let mut props = match base {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            warn!(
                kind = %NodeKind::of(other),
                "base properties are not an object; starting empty"
            );
            Map::new()
        }
    };
    let mut failures = Vec::new();

    debug!(fields = config.len(), "resolving mapping set");
    for (field, entry) in config {
        match resolve_field(field, entry, form, &props, registry) {
            Ok(Some((target, value))) => {
                props.insert(target, value);
            }
            Ok(None) => {}
            Err(error) => {
                warn!(
                    field = %field,
                    input_type = entry.input_type(),
                    error = %error,
                    "field mapping failed"
                );
                failures.push(FieldFailure::new(field, &error));
            }
        }
    }

    Resolution {
        props: Value::Object(props),
        failures,
    }
}

/// Builds the lookup from `dataset`, then resolves against it.
pub fn resolve_dataset(
    config: &MappingSet,
    dataset: &NormalizedDataset,
    base: &Value,
    registry: &TransformRegistry,
) -> Resolution {
    let form = build_form_structure(dataset);
    resolve(config, &form, base, registry)
}

/// Computes the assignment for one entry; `None` leaves the properties as
/// they are.
fn resolve_field(
    field: &str,
    entry: &FieldMappingConfig,
    form: &FormStructure,
    props: &Map<String, Value>,
    registry: &TransformRegistry,
) -> Result<Option<(String, Value)>> {
    match entry {
        FieldMappingConfig::Manual { manual_value } => Ok(Some((
            field.to_string(),
            manual_value.clone().unwrap_or(Value::Null),
        ))),
        FieldMappingConfig::Mapped { mapped_config } => {
            resolve_mapped(field, mapped_config, form, props)
        }
        FieldMappingConfig::Hybrid {
            hybrid_mapping,
            transformations,
        } => {
            let value = resolve_hybrid(
                hybrid_mapping.as_deref().unwrap_or_default(),
                transformations.as_deref().unwrap_or_default(),
                form,
                registry,
            )?;
            Ok(Some((field.to_string(), value)))
        }
        FieldMappingConfig::Unsupported(raw) => {
            debug!(
                field,
                input_type = raw.get("inputType").and_then(serde_json::Value::as_str),
                "skipping unsupported input type"
            );
            Ok(None)
        }
        FieldMappingConfig::Invalid(invalid) => Err(ResolveError::InvalidConfig {
            message: invalid.error.clone(),
        }),
    }
}

fn resolve_mapped(
    field: &str,
    config: &MappedConfig,
    form: &FormStructure,
    props: &Map<String, Value>,
) -> Result<Option<(String, Value)>> {
    let target = config.field.as_deref().unwrap_or(field);
    let Some(found) = lookup(form, &config.lookup) else {
        debug!(
            field,
            cha_field = %config.lookup.cha_field,
            cha_value = %config.lookup.cha_value,
            kf_field = %config.lookup.kf_field,
            "lookup missed; keeping base value"
        );
        return Ok(None);
    };

    let value = match config.path.as_deref() {
        Some(path) => {
            let current = props.get(target).unwrap_or(&Value::Null);
            formbind_path::try_set(current, path, found.clone())?
        }
        None => found.clone(),
    };
    Ok(Some((target.to_string(), value)))
}

fn resolve_hybrid(
    entries: &[HybridEntry],
    transformations: &[DataTransformation],
    form: &FormStructure,
    registry: &TransformRegistry,
) -> Result<Value> {
    let mut accumulator = Map::new();
    for entry in entries {
        match entry.entry_type {
            HybridEntryType::Manual => {
                accumulator.insert(entry.field.clone(), entry.value_or_null().clone());
            }
            HybridEntryType::Mapped => {
                let key: LookupKey =
                    LookupKey::deserialize(entry.value_or_null()).map_err(|source| {
                        ResolveError::InvalidLookup {
                            entry: entry.field.clone(),
                            source,
                        }
                    })?;
                if let Some(found) = lookup(form, &key) {
                    accumulator.insert(entry.field.clone(), found.clone());
                }
            }
        }
    }

    let mut value = Value::Object(accumulator);
    for transformation in transformations {
        let handler = registry
            .get(transformation.kind)
            .ok_or(ResolveError::UnknownTransform {
                kind: transformation.kind,
            })?;
        value = handler.apply(value, transformation.params_or_null())?;
    }
    Ok(value)
}

fn lookup<'a>(form: &'a FormStructure, key: &LookupKey) -> Option<&'a Value> {
    form.lookup(&key.cha_field, &key.cha_value, &key.kf_field)
}

#[cfg(test)]
mod tests {
    use formbind_model::TransformKind;
    use serde_json::json;

    use super::*;

    fn form() -> FormStructure {
        let mut form = FormStructure::new();
        form.insert("ZSCMCMD", "OCTG", "VALUE002", json!(51.4));
        form.insert("ZSCMCMD", "Valves", "VALUE002", json!(7.5));
        form
    }

    fn config(raw: Value) -> MappingSet {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn manual_ignores_form_contents() {
        let set = config(json!({"title": {"inputType": "manual", "manualValue": [1, 2]}}));
        let out = resolve(
            &set,
            &FormStructure::new(),
            &json!({"title": "old"}),
            &TransformRegistry::new(),
        );
        assert_eq!(out.props, json!({"title": [1, 2]}));
        assert!(out.is_ok());
    }

    #[test]
    fn field_override_redirects_target() {
        let set = config(json!({
            "a": {
                "inputType": "mapped",
                "mappedConfig": {
                    "chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002",
                    "field": "value"
                }
            }
        }));
        let out = resolve(&set, &form(), &Value::Null, &TransformRegistry::new());
        assert_eq!(out.props, json!({"value": 51.4}));
    }

    #[test]
    fn blocked_path_keeps_base_and_records_failure() {
        let set = config(json!({
            "value": {
                "inputType": "mapped",
                "mappedConfig": {
                    "chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002",
                    "path": "inner.x"
                }
            },
            "zlabel": {"inputType": "manual", "manualValue": "ok"}
        }));
        let base = json!({"value": 3});
        let out = resolve(&set, &form(), &base, &TransformRegistry::new());

        assert_eq!(out.props, json!({"value": 3, "zlabel": "ok"}));
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].field, "value");
        assert!(out.error_message().unwrap().starts_with("value: "));
    }

    #[test]
    fn hybrid_skips_missed_lookups() {
        let set = config(json!({
            "summary": {
                "inputType": "hybrid",
                "hybridMapping": [
                    {"field": "title", "type": "manual", "value": "Stock"},
                    {"field": "octg", "type": "mapped",
                     "value": {"chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002"}},
                    {"field": "gone", "type": "mapped",
                     "value": {"chaField": "ZSCMCMD", "chaValue": "None", "kfField": "VALUE002"}}
                ]
            }
        }));
        let out = resolve(&set, &form(), &Value::Null, &TransformRegistry::new());
        assert_eq!(out.props, json!({"summary": {"title": "Stock", "octg": 51.4}}));
    }

    #[test]
    fn hybrid_with_malformed_lookup_fails_that_field() {
        let set = config(json!({
            "summary": {
                "inputType": "hybrid",
                "hybridMapping": [{"field": "x", "type": "mapped", "value": "not a lookup"}]
            }
        }));
        let out = resolve(&set, &form(), &json!({"summary": 0}), &TransformRegistry::new());
        assert_eq!(out.props, json!({"summary": 0}));
        assert!(matches!(out.failures.as_slice(), [failure] if failure.field == "summary"));
    }

    #[test]
    fn transformations_run_in_listed_order() {
        let registry = TransformRegistry::new()
            .with_fn(TransformKind::Format, |value, params| {
                let suffix = params["suffix"].as_str().unwrap_or_default();
                Ok(json!(format!("{}{suffix}", value["title"].as_str().unwrap_or_default())))
            })
            .with_fn(TransformKind::Custom, |value, _| {
                Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
            });
        let set = config(json!({
            "label": {
                "inputType": "hybrid",
                "hybridMapping": [{"field": "title", "type": "manual", "value": "stock"}],
                "transformations": [
                    {"kind": "format", "params": {"suffix": " level"}},
                    {"kind": "custom"}
                ]
            }
        }));
        let out = resolve(&set, &form(), &Value::Null, &registry);
        assert_eq!(out.props, json!({"label": "STOCK LEVEL"}));
    }

    #[test]
    fn invalid_entry_keeps_base_and_neighbours_resolve() {
        let set = config(json!({
            "name": {"inputType": "manual", "manualValue": "Active Inventory"},
            "value": {
                "inputType": "mapped",
                "mappedConfig": {"chaField": "ZSCMCMD", "kfField": "VALUE002"}
            }
        }));
        let base = json!({"value": 1});
        let out = resolve(&set, &form(), &base, &TransformRegistry::new());

        assert_eq!(out.props, json!({"name": "Active Inventory", "value": 1}));
        assert!(matches!(
            out.failures.as_slice(),
            [failure] if failure.field == "value" && failure.message.contains("chaValue")
        ));
    }

    #[test]
    fn manual_without_value_writes_null() {
        let set = config(json!({"a": {"inputType": "manual"}}));
        let out = resolve(&set, &form(), &json!({"a": 1}), &TransformRegistry::new());
        assert_eq!(out.props, json!({"a": null}));
    }

    #[test]
    fn scalar_base_is_replaced_by_empty_object() {
        let set = config(json!({"a": {"inputType": "manual", "manualValue": 1}}));
        let out = resolve(&set, &form(), &json!(42), &TransformRegistry::new());
        assert_eq!(out.props, json!({"a": 1}));
    }
}

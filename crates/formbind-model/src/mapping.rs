//! Field-mapping configuration as authored by users.
//!
//! The JSON shape is the persisted configuration format, so every type here
//! round-trips through `serde_json` unchanged. Optional fields remember whether
//! they were present: an absent field stays absent, an explicit `null` stays
//! `null`. Entries that cannot be read keep their raw JSON, so one bad entry
//! never hides the others in a [`MappingSet`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const INPUT_TYPES: [&str; 3] = ["manual", "mapped", "hybrid"];

/// Address of a scalar inside a [`FormStructure`](crate::FormStructure).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupKey {
    pub cha_field: String,
    pub cha_value: String,
    pub kf_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedConfig {
    #[serde(flatten)]
    pub lookup: LookupKey,
    /// Location inside the target property to write, instead of replacing it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<String>,
    /// Target property; defaults to the key of the mapping entry.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HybridEntryType {
    Manual,
    Mapped,
}

/// One contribution to a hybrid accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridEntry {
    pub field: String,
    #[serde(rename = "type")]
    pub entry_type: HybridEntryType,
    /// Literal for `manual`; a [`LookupKey`] object for `mapped`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

impl HybridEntry {
    /// The entry's value, reading an absent one as `null`.
    pub fn value_or_null(&self) -> &Value {
        self.value.as_ref().unwrap_or(&Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformKind {
    Format,
    Filter,
    Aggregate,
    Custom,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Filter => "filter",
            Self::Aggregate => "aggregate",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformation {
    pub kind: TransformKind,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub params: Option<Value>,
}

impl DataTransformation {
    /// Parameters handed to the transform; absent reads as `null`.
    pub fn params_or_null(&self) -> &Value {
        self.params.as_ref().unwrap_or(&Value::Null)
    }
}

/// An entry that names a known `inputType` but does not match its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidEntry {
    /// The entry exactly as it was read.
    pub raw: Value,
    pub error: String,
}

impl Serialize for InvalidEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// How one output property gets its value.
///
/// Deserialization never fails: an unknown `inputType` becomes
/// [`Unsupported`](Self::Unsupported) and a malformed entry becomes
/// [`Invalid`](Self::Invalid), both keeping the raw JSON for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "inputType",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum FieldMappingConfig {
    Manual {
        #[serde(skip_serializing_if = "Option::is_none")]
        manual_value: Option<Value>,
    },
    Mapped {
        mapped_config: MappedConfig,
    },
    Hybrid {
        #[serde(skip_serializing_if = "Option::is_none")]
        hybrid_mapping: Option<Vec<HybridEntry>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transformations: Option<Vec<DataTransformation>>,
    },
    /// Any other `inputType`; left alone at resolution time.
    #[serde(untagged)]
    Unsupported(Value),
    #[serde(untagged)]
    Invalid(InvalidEntry),
}

/// Strict reading of the known input types.
#[derive(Deserialize)]
#[serde(
    tag = "inputType",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
enum KnownConfig {
    Manual {
        #[serde(default, deserialize_with = "present")]
        manual_value: Option<Value>,
    },
    Mapped {
        mapped_config: MappedConfig,
    },
    Hybrid {
        #[serde(default, deserialize_with = "present")]
        hybrid_mapping: Option<Vec<HybridEntry>>,
        #[serde(default, deserialize_with = "present")]
        transformations: Option<Vec<DataTransformation>>,
    },
}

impl From<KnownConfig> for FieldMappingConfig {
    fn from(known: KnownConfig) -> Self {
        match known {
            KnownConfig::Manual { manual_value } => Self::Manual { manual_value },
            KnownConfig::Mapped { mapped_config } => Self::Mapped { mapped_config },
            KnownConfig::Hybrid {
                hybrid_mapping,
                transformations,
            } => Self::Hybrid {
                hybrid_mapping,
                transformations,
            },
        }
    }
}

impl<'de> Deserialize<'de> for FieldMappingConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_raw)
    }
}

impl FieldMappingConfig {
    /// Reads one entry, classifying it instead of failing.
    pub fn from_raw(raw: Value) -> Self {
        if let Some(input_type) = raw.get("inputType").and_then(Value::as_str)
            && !INPUT_TYPES.contains(&input_type)
        {
            return Self::Unsupported(raw);
        }
        match KnownConfig::deserialize(&raw) {
            Ok(known) => known.into(),
            Err(error) => Self::Invalid(InvalidEntry {
                raw,
                error: error.to_string(),
            }),
        }
    }

    pub fn manual(value: impl Into<Value>) -> Self {
        Self::Manual {
            manual_value: Some(value.into()),
        }
    }

    pub fn mapped(
        cha_field: impl Into<String>,
        cha_value: impl Into<String>,
        kf_field: impl Into<String>,
    ) -> Self {
        Self::Mapped {
            mapped_config: MappedConfig {
                lookup: LookupKey {
                    cha_field: cha_field.into(),
                    cha_value: cha_value.into(),
                    kf_field: kf_field.into(),
                },
                path: None,
                field: None,
            },
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Manual { .. } => "manual",
            Self::Mapped { .. } => "mapped",
            Self::Hybrid { .. } => "hybrid",
            Self::Unsupported(_) => "unsupported",
            Self::Invalid(_) => "invalid",
        }
    }
}

/// Only an absent field defaults to `None`; an explicit `null` is kept.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Mapping entries keyed by output property, processed in key order.
pub type MappingSet = BTreeMap<String, FieldMappingConfig>;

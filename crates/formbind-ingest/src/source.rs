//! Loading report exports and backend payloads from disk.

use std::path::Path;

use formbind_model::{BackendData, TransformedData};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::markup::parse_markup;

/// Encoding of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Markup,
    Json,
}

impl SourceFormat {
    /// Picks the format from the file extension, falling back to the first
    /// non-whitespace character of the content.
    pub fn detect(path: &Path, content: &str) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xml") => Self::Markup,
            Some("json") => Self::Json,
            _ if content.trim_start().starts_with('<') => Self::Markup,
            _ => Self::Json,
        }
    }
}

/// A loaded input, ready for normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A report export document (`values.META`, `values.OUTPUT`, ...).
    Report(Value),
    /// A backend payload with a header and `chartData` records.
    Backend(BackendData),
    /// A dataset that was already transformed into its `FormStructure` lookup.
    Form(TransformedData),
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Report(_) => "report",
            Self::Backend(_) => "backend",
            Self::Form(_) => "form",
        }
    }
}

/// Reads and classifies a source file.
///
/// Markup is always a report export. A JSON document whose top level carries
/// both `header` and `chartData` is a backend payload, one with a
/// `FormStructure` key is transformed data; any other JSON value is treated as
/// an already-deserialized report export.
pub fn load_source(path: &Path) -> Result<Source> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let source = parse_source(path, &content)?;
    debug!(path = %path.display(), kind = source.kind(), "loaded source");
    Ok(source)
}

/// Classifies already-read content. `path` is used for format detection and
/// error messages only.
pub fn parse_source(path: &Path, content: &str) -> Result<Source> {
    match SourceFormat::detect(path, content) {
        SourceFormat::Markup => parse_markup(content).map(Source::Report),
        SourceFormat::Json => {
            let value: Value =
                serde_json::from_str(content).map_err(|e| IngestError::json(path, e))?;
            if is_backend_payload(&value) {
                let data = serde_json::from_value(value).map_err(|e| IngestError::json(path, e))?;
                Ok(Source::Backend(data))
            } else if is_transformed_data(&value) {
                let data = serde_json::from_value(value).map_err(|e| IngestError::json(path, e))?;
                Ok(Source::Form(data))
            } else {
                Ok(Source::Report(value))
            }
        }
    }
}

fn is_backend_payload(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("header") && map.contains_key("chartData"))
}

fn is_transformed_data(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("FormStructure"))
}

/// Reads markup or JSON into a raw value tree without classifying it.
pub fn load_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    match SourceFormat::detect(path, &content) {
        SourceFormat::Markup => parse_markup(&content),
        SourceFormat::Json => serde_json::from_str(&content).map_err(|e| IngestError::json(path, e)),
    }
}

/// Reads a JSON file into any deserializable type.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| IngestError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins_over_content() {
        assert_eq!(
            SourceFormat::detect(Path::new("a.JSON"), "<r/>"),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::detect(Path::new("a.xml"), "{}"),
            SourceFormat::Markup
        );
    }

    #[test]
    fn unknown_extension_sniffs_content() {
        assert_eq!(
            SourceFormat::detect(Path::new("export.txt"), "  \n<r/>"),
            SourceFormat::Markup
        );
        assert_eq!(
            SourceFormat::detect(Path::new("export"), "{\"values\":{}}"),
            SourceFormat::Json
        );
    }

    #[test]
    fn backend_payload_needs_both_keys() {
        let path = Path::new("in.json");
        let backend = parse_source(path, r#"{"header":[],"chartData":[]}"#).unwrap();
        assert!(matches!(backend, Source::Backend(_)));
        let report = parse_source(path, r#"{"header":[]}"#).unwrap();
        assert!(matches!(report, Source::Report(_)));
    }

    #[test]
    fn form_structure_key_marks_transformed_data() {
        let path = Path::new("form.json");
        let source = parse_source(
            path,
            r#"{"FormStructure":{"ZSCMCMD":{"OCTG":{"VALUE002":51.4}}}}"#,
        )
        .unwrap();
        let Source::Form(data) = source else {
            panic!("expected transformed data, got {source:?}");
        };
        assert_eq!(
            data.form_structure.lookup("ZSCMCMD", "OCTG", "VALUE002"),
            Some(&serde_json::json!(51.4))
        );
        assert!(data.form_metadata.is_empty());
    }

    #[test]
    fn malformed_form_structure_is_an_error() {
        let err = parse_source(Path::new("form.json"), r#"{"FormStructure":[1]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let err = parse_source(Path::new("broken.json"), "{").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}

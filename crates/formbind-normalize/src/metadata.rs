//! Report-level metadata: description and load timestamp.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use formbind_model::ReportMetadata;
use serde_json::Value;
use tracing::debug;

use crate::node::{child, text};

/// Reads `values.metadata`. A missing block or an unparseable date is not an
/// error; the affected fields stay empty.
pub(crate) fn extract_metadata(values: &Value, date_formats: &[String]) -> ReportMetadata {
    let Some(metadata) = child(values, "metadata") else {
        return ReportMetadata::default();
    };
    let description = child(metadata, "description")
        .and_then(text)
        .unwrap_or_default();
    let loaded_at = child(metadata, "load_date")
        .and_then(text)
        .and_then(|raw| {
            let parsed = parse_load_date(&raw, date_formats);
            if parsed.is_none() {
                debug!(load_date = %raw, "load date did not match any configured format");
            }
            parsed
        });
    ReportMetadata {
        description,
        loaded_at,
    }
}

/// Parses a locale-formatted timestamp, trying each format in order.
pub fn parse_load_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats.iter().find_map(|format| {
        let format = format.as_ref();
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, format)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    })
}

//! Tunables for report normalization.

use serde::{Deserialize, Serialize};

/// Text that marks a grand-total row in report output.
pub const DEFAULT_AGGREGATE_MARKER: &str = "Overall Result";

/// Appended to a base label to name its synthetic key column.
pub const DEFAULT_SYNTHETIC_LABEL_SUFFIX: &str = " Key";

/// Locale formats tried, in order, when parsing a report load date.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%d%H%M%S",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y%m%d",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Rows whose concatenated text contains this marker are dropped.
    pub aggregate_marker: String,
    /// `chrono` format strings for the load date. Date-only formats yield
    /// midnight.
    pub date_formats: Vec<String>,
    pub synthetic_label_suffix: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            aggregate_marker: DEFAULT_AGGREGATE_MARKER.to_string(),
            date_formats: DEFAULT_DATE_FORMATS
                .iter()
                .map(|format| (*format).to_string())
                .collect(),
            synthetic_label_suffix: DEFAULT_SYNTHETIC_LABEL_SUFFIX.to_string(),
        }
    }
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_aggregate_marker(mut self, marker: impl Into<String>) -> Self {
        self.aggregate_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }
}

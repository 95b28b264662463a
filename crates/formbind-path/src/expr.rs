//! Parsed dotted path expressions.

use std::fmt;

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key.
    Key(String),
    /// Sequence index. Applied to a mapping it is looked up as the key with the
    /// same decimal text.
    Index(usize),
}

impl Segment {
    /// Parses a single segment. All-digit text becomes an index.
    pub fn parse(raw: &str) -> Self {
        if is_index(raw)
            && let Ok(index) = raw.parse::<usize>()
        {
            return Self::Index(index);
        }
        Self::Key(raw.to_string())
    }

    /// Key text used when the segment addresses a mapping.
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

fn is_index(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// A dot-delimited address into nested data.
///
/// There is no escape for a literal `.` inside a key: `"a.b"` always means
/// key `a`, then key `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits off the final segment.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl From<&str> for PathExpression {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Appends a segment to a parent path string. An empty parent denotes the root.
pub(crate) fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

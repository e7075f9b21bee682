//! Route patterns: ordered literal and capture segments.

use smallvec::SmallVec;
use std::fmt;

/// One segment of a [`Pattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Matches only its own (decoded) text.
    Literal(String),
    /// `:name` — matches any segment and records it under `name`.
    Capture(String),
}

/// A route's path template: ordered segments plus an `absolute` flag.
///
/// Parsing is infallible; any string produces a pattern. The raw source is
/// kept for the exact-equality fast path used when a pattern has no
/// captures.
///
/// # Examples
///
/// ```
/// use waymark_match::{Pattern, Segment};
///
/// let p = Pattern::parse("/users/:id");
/// assert!(p.absolute());
/// assert!(p.has_captures());
/// assert_eq!(p.segments().len(), 2);
/// assert_eq!(p.segments()[1], Segment::Capture("id".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    absolute: bool,
    segments: SmallVec<[Segment; 8]>,
    has_captures: bool,
}

impl Pattern {
    /// Parse a pattern from its source string.
    pub fn parse(source: &str) -> Self {
        let split = split_path(source);
        let mut has_captures = false;
        let segments = split
            .parts
            .iter()
            .map(|part| {
                if let Some(name) = part.strip_prefix(':') {
                    has_captures = true;
                    Segment::Capture(name.to_string())
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();

        Self {
            raw: source.to_string(),
            absolute: split.absolute,
            segments,
            has_captures,
        }
    }

    /// The source string this pattern was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the source began with a separator.
    pub fn absolute(&self) -> bool {
        self.absolute
    }

    /// The ordered segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any segment is a capture.
    pub fn has_captures(&self) -> bool {
        self.has_captures
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Result of [`split_path`]: the `absolute` flag and the raw (still
/// encoded) parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPath {
    /// Whether the input began with a separator, before trimming.
    pub absolute: bool,
    /// Segments between separators; still percent-encoded.
    pub parts: Vec<String>,
}

/// Split a path on `/`, discarding leading and trailing separators but
/// recording whether a leading separator was present.
///
/// The input must still be encoded; parts are returned encoded.
pub fn split_path(path: &str) -> SplitPath {
    let absolute = path.starts_with('/');
    let trimmed = path.trim().trim_matches('/');
    let parts = trimmed.split('/').map(str::to_string).collect();
    SplitPath { absolute, parts }
}

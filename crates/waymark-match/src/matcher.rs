//! The match algorithm: pattern × path → match/no-match + params.

use waymark_core::Params;

use crate::decode::percent_decode;
use crate::pattern::{split_path, Pattern, Segment};

/// Result of matching a path against a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MatchResult {
    /// The path does not satisfy the pattern.
    #[default]
    NoMatch,
    /// The path satisfies the pattern.
    Match {
        /// Captured parameters, keyed by capture name in pattern order;
        /// values are percent-decoded path segments.
        params: Params,
    },
}

impl MatchResult {
    /// Whether this is a match.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// The captured params, if any.
    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::Match { params } => Some(params),
            Self::NoMatch => None,
        }
    }
}

/// Match `path` against `pattern`.
///
/// - `None` pattern never matches.
/// - A pattern with no captures matches by exact string equality with the
///   raw path.
/// - Otherwise both sides are split on `/`; segment counts and `absolute`
///   flags must agree, and segments are compared pairwise after decoding.
///   A capture segment always matches and records the decoded path
///   segment; a literal matches only if both decode to the same text.
/// - Malformed percent-encoding in either segment fails that segment.
///
/// Total: never panics, for any inputs.
pub fn match_path(path: &str, pattern: Option<&Pattern>) -> MatchResult {
    let Some(pattern) = pattern else {
        return MatchResult::NoMatch;
    };

    if !pattern.has_captures() {
        return if pattern.raw() == path {
            MatchResult::Match {
                params: Params::new(),
            }
        } else {
            MatchResult::NoMatch
        };
    }

    let path_split = split_path(path);

    if path_split.parts.len() != pattern.segments().len() {
        return MatchResult::NoMatch;
    }

    if path_split.absolute != pattern.absolute() {
        return MatchResult::NoMatch;
    }

    let mut params = Params::new();
    for (segment, part) in pattern.segments().iter().zip(&path_split.parts) {
        let Some(part_decoded) = percent_decode(part) else {
            return MatchResult::NoMatch;
        };

        match segment {
            Segment::Capture(name) => {
                params.insert(name.clone(), part_decoded);
            }
            Segment::Literal(text) => {
                let Some(text_decoded) = percent_decode(text) else {
                    return MatchResult::NoMatch;
                };
                if text_decoded != part_decoded {
                    return MatchResult::NoMatch;
                }
            }
        }
    }

    MatchResult::Match { params }
}

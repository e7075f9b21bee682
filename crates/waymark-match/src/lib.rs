//! Pure path-pattern matching for the Waymark router.
//!
//! [`match_path`] is total: for any path/pattern pair it returns exactly
//! one of [`MatchResult::NoMatch`] or [`MatchResult::Match`] and never
//! panics. It is invoked synchronously for every route on every path
//! change, so it does no I/O and touches no shared state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod decode;
mod matcher;
mod pattern;

pub use decode::percent_decode;
pub use matcher::{match_path, MatchResult};
pub use pattern::{split_path, Pattern, Segment, SplitPath};

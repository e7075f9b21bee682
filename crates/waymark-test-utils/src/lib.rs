//! Test fixtures shared across the Waymark crates.
//!
//! The world takes its host seams as boxed trait objects, so each fixture
//! is a cheap clone over shared interior state: tests keep one clone for
//! inspection and hand the other to the world.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod history;
mod loader;
mod tree;

pub use history::{HistoryCall, RecordingHistory};
pub use loader::StubLoader;
pub use tree::FakeTree;

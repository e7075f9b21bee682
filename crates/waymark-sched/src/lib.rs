//! Cooperative update batching for the Waymark router.
//!
//! Two pieces: the per-node [`UpdateScheduler`], which coalesces state
//! mutations into a deduplicated changed-key list, and the world-side
//! [`TaskQueue`], which arms each dirty node at most once per tick and
//! drains them in arming order with a bounded convergence loop.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod scheduler;
mod tasks;

pub use scheduler::{StateKey, UpdateScheduler};
pub use tasks::{TaskQueue, MAX_UPDATE_PASSES};

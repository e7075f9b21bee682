//! The Waymark router world.
//!
//! [`RouterWorld`] owns every mounted node, the role registry, the
//! broadcast plumbing, and the host seams. Hosts drive it with
//! [`HostEvent`](waymark_core::HostEvent)s through
//! [`dispatch`](RouterWorld::dispatch) and read back
//! [`Notification`](waymark_core::Notification)s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod config;
mod metrics;
mod world;

pub use config::WorldConfig;
pub use metrics::DispatchMetrics;
pub use world::{RouteSpec, RouterWorld};

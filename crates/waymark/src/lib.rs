//! Waymark: a declarative, host-agnostic client-side router core.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Waymark sub-crates. For most users, adding `waymark` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use waymark::prelude::*;
//!
//! // A minimal host: one flat scope where everything contains everything.
//! struct Flat;
//! impl TreeHost for Flat {
//!     fn contains(&self, _ancestor: TreeHandle, _descendant: TreeHandle) -> bool {
//!         true
//!     }
//!     fn children_in_order(&self, _parent: TreeHandle) -> Vec<TreeHandle> {
//!         Vec::new()
//!     }
//!     fn detach_children(&mut self, _node: TreeHandle) -> Vec<PresentationHandle> {
//!         Vec::new()
//!     }
//!     fn attach_children(&mut self, _node: TreeHandle, _children: Vec<PresentationHandle>) {}
//! }
//!
//! struct NoHistory;
//! impl HistoryBridge for NoHistory {
//!     fn push(&mut self, _stamp: NodeId, _url: &str) {}
//!     fn replace(&mut self, _stamp: NodeId, _url: &str) {}
//! }
//!
//! struct NoLoader;
//! impl ModuleLoader for NoLoader {
//!     fn begin(&mut self, _ticket: LoadTicket, _module: &str) {}
//! }
//!
//! let mut world = RouterWorld::new(
//!     WorldConfig::default(),
//!     Box::new(Flat),
//!     Box::new(NoHistory),
//!     Box::new(NoLoader),
//! )
//! .unwrap();
//!
//! world.mount_router(TreeHandle(1), None);
//! let users = world.mount_route(
//!     TreeHandle(2),
//!     RouteSpec {
//!         pattern: Some("/users/:id".into()),
//!         module: None,
//!     },
//! );
//!
//! world
//!     .dispatch(HostEvent::Navigate {
//!         origin: TreeHandle(3),
//!         to: "/users/42".into(),
//!     })
//!     .unwrap();
//! assert_eq!(world.is_active(users), Some(true));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `waymark-core` | IDs, host traits, events, error types |
//! | [`matching`] | `waymark-match` | Patterns and the path matcher |
//! | [`sched`] | `waymark-sched` | Update batching and the task queue |
//! | [`bus`] | `waymark-bus` | Broadcast topics and scoped discovery |
//! | [`node`] | `waymark-node` | Route, switch, router, listener machines |
//! | [`engine`] | `waymark-engine` | The router world and its configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, host traits, events, and errors (`waymark-core`).
///
/// Contains the typed ids, the three host seams
/// ([`types::TreeHost`], [`types::HistoryBridge`], [`types::ModuleLoader`]),
/// and the [`types::HostEvent`]/[`types::Notification`] vocabulary.
pub use waymark_core as types;

/// Patterns and path matching (`waymark-match`).
///
/// [`matching::match_path`] is the total matching function; it never
/// panics and captures named segments into [`types::Params`].
pub use waymark_match as matching;

/// Cooperative update batching (`waymark-sched`).
///
/// Per-node change coalescing ([`sched::UpdateScheduler`]) and the
/// world-side [`sched::TaskQueue`].
pub use waymark_sched as sched;

/// Broadcast topics, subscriber lists, and scoped discovery
/// (`waymark-bus`).
///
/// [`bus::RoleRegistry`] resolves a node's nearest logical ancestor of a
/// role by containment, independent of registration order.
pub use waymark_bus as bus;

/// Node state machines (`waymark-node`).
///
/// [`node::RouteNode`], [`node::SwitchNode`], [`node::RouterNode`], and
/// [`node::ParamsListenerNode`], plus the [`node::Action`] vocabulary
/// they speak.
pub use waymark_node as node;

/// The router world (`waymark-engine`).
///
/// [`engine::RouterWorld`] owns the mounted nodes and drives everything
/// from dispatched host events.
pub use waymark_engine as engine;

/// Common imports for typical Waymark usage.
///
/// ```rust
/// use waymark::prelude::*;
/// ```
pub mod prelude {
    // Ids and host seams
    pub use waymark_core::{
        HistoryBridge, LoadTicket, ModuleLoader, NodeId, Params, PresentationHandle, TreeHandle,
        TreeHost,
    };

    // Events and notifications
    pub use waymark_core::{HostEvent, LoadError, Notification};

    // Errors
    pub use waymark_core::{ConfigError, DispatchError, MountError};

    // Matching
    pub use waymark_match::{match_path, MatchResult, Pattern};

    // World
    pub use waymark_engine::{DispatchMetrics, RouteSpec, RouterWorld, WorldConfig};
}

//! The scoped bus: a flat, tree-position-agnostic broadcast medium plus
//! the discovery protocol that resolves a node's nearest logical ancestor
//! of a given role over it.
//!
//! The transport offers no tree ordering. Discovery therefore never trusts
//! delivery or registration order: every role-holder runs the host's
//! containment test against the requester's position, and among the holders
//! that pass, the innermost one claims the request.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod guard;
mod registry;
mod subscribers;

pub use guard::{BroadcastGuard, Topic};
pub use registry::{Role, RoleRegistry};
pub use subscribers::SubscriberList;

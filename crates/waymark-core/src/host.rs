//! Traits the host environment implements for the router core.
//!
//! The core never touches the real tree, history, or network. Everything
//! platform-specific sits behind these three object-safe seams, which a
//! world owns as boxed trait objects.

use crate::id::{LoadTicket, NodeId, PresentationHandle, TreeHandle};

/// Structural and presentational access to the host tree.
///
/// `contains` is the containment predicate the discovery protocol is built
/// on: it must answer whether `descendant` sits anywhere inside the subtree
/// rooted at `ancestor` (a handle is not contained in itself).
/// `children_in_order` must return direct children in declared document
/// order; switch arbitration depends on that order, never on message
/// arrival order.
pub trait TreeHost {
    /// Whether `descendant` is inside the subtree rooted at `ancestor`.
    fn contains(&self, ancestor: TreeHandle, descendant: TreeHandle) -> bool;

    /// Direct children of `parent` in declared order.
    fn children_in_order(&self, parent: TreeHandle) -> Vec<TreeHandle>;

    /// Detach the presentational children of `node`, returning their
    /// handles in order. Called when a route deactivates (and once at
    /// mount, so an initially-inactive route starts empty).
    fn detach_children(&mut self, node: TreeHandle) -> Vec<PresentationHandle>;

    /// Reattach previously detached children to `node`, in order. Called
    /// when a route activates.
    fn attach_children(&mut self, node: TreeHandle, children: Vec<PresentationHandle>);
}

/// The two history operations the router needs.
///
/// Entries are stamped with the acting router's [`NodeId`] so that pop
/// notifications (delivered back as `HostEvent::HistoryPopped`) can be
/// attributed to the correct navigation scope when several routers coexist.
pub trait HistoryBridge {
    /// Push a new history entry for `url`, stamped with `stamp`.
    fn push(&mut self, stamp: NodeId, url: &str);

    /// Replace the current history entry, stamping it with `stamp`.
    ///
    /// Used once per router at mount: the initial page entry exists before
    /// any navigation event, so it carries no stamp until the router claims
    /// it.
    fn replace(&mut self, stamp: NodeId, url: &str);
}

/// Starts asynchronous module loads on behalf of routes.
///
/// `begin` must not block; the outcome arrives later as
/// `HostEvent::LoadSettled` carrying the same ticket. The core guarantees
/// it never begins a second load for a route while one is in flight.
pub trait ModuleLoader {
    /// Begin loading `module`. The host reports completion via the ticket.
    fn begin(&mut self, ticket: LoadTicket, module: &str);
}

//! Host event and notification types.
//!
//! Events flow inward through `RouterWorld::dispatch`; notifications flow
//! outward and are drained by the host after each dispatch.

use indexmap::IndexMap;

use crate::error::LoadError;
use crate::id::{LoadTicket, NodeId, TreeHandle};

/// Captured path parameters, keyed by capture name in pattern order.
///
/// `IndexMap` preserves pattern order for iteration while comparing
/// structurally (key/value pairs, order-insensitive), which is the
/// equality the update scheduler uses for params-valued state.
pub type Params = IndexMap<String, String>;

/// Outcome of a module load, carried by [`HostEvent::LoadSettled`].
pub type LoadOutcome = Result<(), LoadError>;

/// An external event fed into the world.
///
/// Each dispatch of one event runs synchronously and then drains the
/// cooperative task queue before returning, so the world is quiescent
/// between events.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// A navigation intent (an activated link, or a switch redirect).
    /// `origin` is the tree position the intent came from; the nearest
    /// enclosing router handles it.
    Navigate {
        /// Tree position of the link or redirecting switch.
        origin: TreeHandle,
        /// Target path.
        to: String,
    },
    /// The host history moved to an existing entry (back/forward).
    /// Honored only by the router whose id equals `stamp`.
    HistoryPopped {
        /// The stamp recorded on the entry when it was pushed.
        stamp: NodeId,
        /// The path of the entry now current.
        path: String,
    },
    /// A module load begun earlier settled.
    LoadSettled {
        /// Ticket returned when the load was begun.
        ticket: LoadTicket,
        /// Success or the failure reason.
        outcome: LoadOutcome,
    },
    /// Directly assign a route's path (outside any router broadcast).
    SetRoutePath {
        /// The route to modify.
        node: NodeId,
        /// The new path.
        path: String,
    },
    /// Assign or replace a route's pattern.
    SetRoutePattern {
        /// The route to modify.
        node: NodeId,
        /// The new pattern source string.
        pattern: String,
    },
    /// Assign or replace a route's lazily-loaded module reference.
    SetRouteModule {
        /// The route to modify.
        node: NodeId,
        /// The module reference (opaque to the core).
        module: String,
    },
    /// Assign or replace a switch's redirect target.
    SetSwitchRedirect {
        /// The switch to modify.
        node: NodeId,
        /// Path navigated to when a round completes with no match.
        to: String,
    },
}

/// An outbound value produced during dispatch, drained by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A params listener's nearest route published new parameters.
    ParamsChanged {
        /// The listener the notification is for.
        listener: NodeId,
        /// The route that published.
        route: NodeId,
        /// The captured parameters.
        params: Params,
    },
}

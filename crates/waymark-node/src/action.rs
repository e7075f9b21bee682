//! Deferred effects emitted by node state machines.
//!
//! Nodes never reach into each other or into the host directly. An update
//! pass mutates only the node's own state and returns a list of actions;
//! the owning world executes them, which keeps every cross-node interaction
//! in one place and every node independently testable.

use waymark_core::{NavigationSeq, NodeId, Params, TreeHandle};

/// An effect requested by a node, executed by the owning world.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// A matched route asks its enclosing switch for permission to
    /// activate. The world computes the switch's declared-child view and
    /// feeds the request to arbitration.
    RequestActivation {
        /// The requesting route.
        route: NodeId,
        /// The switch that arbitrates.
        switch: NodeId,
        /// The path that produced the match.
        path: String,
        /// Sequence of the path change driving this request.
        seq: NavigationSeq,
    },
    /// Reattach the route's withheld presentational children.
    AttachSubtree {
        /// The route entering the active state.
        route: NodeId,
    },
    /// Detach the route's presentational children and hold them.
    DetachSubtree {
        /// The route leaving the active state.
        route: NodeId,
    },
    /// Start loading the route's module through the host loader.
    BeginLoad {
        /// The route whose module should load.
        route: NodeId,
        /// The module reference, opaque to the core.
        module: String,
    },
    /// Publish captured parameters to params listeners.
    BroadcastParams {
        /// The route publishing.
        route: NodeId,
        /// The parameters captured from the current path.
        params: Params,
    },
    /// A navigation intent raised from inside the world (a switch
    /// redirect). Queued and handled after the current broadcast settles.
    Navigate {
        /// Tree position the intent originates from.
        origin: TreeHandle,
        /// Target path.
        to: String,
    },
    /// Surface new parameters to the host on behalf of a listener.
    NotifyParams {
        /// The listener to notify.
        listener: NodeId,
        /// The route whose parameters these are.
        route: NodeId,
        /// The parameters.
        params: Params,
    },
}

//! Capability traits over the node kinds.
//!
//! Each trait names one capability a node kind may carry; the world and
//! tests program against these seams instead of concrete node types.

use waymark_bus::Role;
use waymark_core::{NodeId, TreeHandle};
use waymark_match::{MatchResult, Pattern};

/// A node that matches paths against a pattern.
pub trait MatchableNode {
    /// The current pattern, if one is assigned.
    fn pattern(&self) -> Option<&Pattern>;

    /// The result of the most recent match.
    fn current_match(&self) -> &MatchResult;
}

/// A node with an active/inactive presentation state.
pub trait ActivatableNode {
    /// Whether the node's presentational subtree is attached.
    fn is_active(&self) -> bool;
}

/// A node that discovers nearest logical ancestors at mount time.
///
/// The world resolves each role in [`scope_roles`](Self::scope_roles)
/// through the role registry once, right after mount, and hands the
/// answers back via [`bind_scope`](Self::bind_scope). Answers are cached
/// for the node's lifetime, so holders must be mounted before the nodes
/// that discover them (ancestors before descendants).
pub trait ScopedRequester {
    /// Tree position the containment test runs against.
    fn origin(&self) -> TreeHandle;

    /// Roles this node needs resolved.
    fn scope_roles(&self) -> &'static [Role];

    /// Receive the resolution for one role. `None` means no holder
    /// encloses the origin, which is a defined outcome.
    fn bind_scope(&mut self, role: Role, holder: Option<NodeId>);
}

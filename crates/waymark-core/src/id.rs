//! Strongly-typed identifiers and the [`IdAllocator`].

use std::fmt;

/// Identifies a node (route, switch, router, or params listener) within a
/// router world.
///
/// Node ids are allocated by the world's [`IdAllocator`] and are unique for
/// the lifetime of the world, never reused after unmount. A router's own
/// `NodeId` doubles as the stamp written into host history entries so pop
/// notifications can be attributed to the right navigation scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque handle to a position in the host tree.
///
/// The core never interprets handles; it only passes them to
/// [`TreeHost`](crate::host::TreeHost) for containment and child-order
/// queries. Handles are minted by the host, not by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeHandle(pub u64);

impl fmt::Display for TreeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TreeHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque handle to a presentational node held by a deactivated route.
///
/// A route detaches its presentational subtree into a list of these and
/// reattaches the same handles verbatim on activation, preserving subtree
/// state across toggles. The core never inspects their contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresentationHandle(pub u64);

impl fmt::Display for PresentationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PresentationHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonic sequence number for path-changing events.
///
/// Bumped once per navigation, pop, or direct path assignment. Activation
/// requests are stamped with it so a switch can tell requests from two
/// overlapping navigations apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationSeq(pub u64);

impl fmt::Display for NavigationSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NavigationSeq {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies one arbitration round within a switch.
///
/// Incremented whenever round state resets; useful only for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoundId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Correlates a module load begun via [`ModuleLoader`](crate::host::ModuleLoader)
/// with the `LoadSettled` event that reports its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LoadTicket {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonic id source owned by a router world.
///
/// Each world carries its own allocator; nothing is process-global, so two
/// worlds in one process never contend or share id spaces.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1 (0 is reserved as "never
    /// allocated" in diagnostics).
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a fresh [`NodeId`].
    pub fn node_id(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    /// Allocate a fresh [`LoadTicket`].
    pub fn load_ticket(&mut self) -> LoadTicket {
        LoadTicket(self.bump())
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_ids_are_unique_and_monotonic() {
        let mut alloc = IdAllocator::new();
        let a = alloc.node_id();
        let b = alloc.node_id();
        let t = alloc.load_ticket();
        assert!(a < b);
        assert!(b.0 < t.0);
        assert_ne!(a, b);
    }

    #[test]
    fn allocator_never_yields_zero() {
        let mut alloc = IdAllocator::new();
        assert_ne!(alloc.node_id(), NodeId(0));
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(NodeId(7).to_string(), "7");
        assert_eq!(TreeHandle(3).to_string(), "3");
        assert_eq!(NavigationSeq(12).to_string(), "12");
    }
}

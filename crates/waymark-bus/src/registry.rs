//! Role-holder registry and nearest-ancestor resolution.

use indexmap::IndexMap;
use waymark_core::{NodeId, TreeHandle, TreeHost};

/// The three discoverable roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// A route node (discovered by params listeners).
    Route,
    /// A switch node (discovered by routes needing arbitration).
    Switch,
    /// A router node (discovered by routes, links, and redirects).
    Router,
}

/// Registry of role-holders, per role, in registration order.
///
/// Registration order carries no authority: resolution is decided entirely
/// by containment tests (see [`resolve_nearest`](Self::resolve_nearest)),
/// so hosts may build their trees outside-in or inside-out without
/// changing discovery results.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    routes: IndexMap<NodeId, TreeHandle>,
    switches: IndexMap<NodeId, TreeHandle>,
    routers: IndexMap<NodeId, TreeHandle>,
}

impl RoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` as a holder of `role` at tree position `handle`.
    pub fn register(&mut self, role: Role, node: NodeId, handle: TreeHandle) {
        self.holders_mut(role).insert(node, handle);
    }

    /// Remove `node` from every role.
    pub fn unregister(&mut self, node: NodeId) {
        self.routes.shift_remove(&node);
        self.switches.shift_remove(&node);
        self.routers.shift_remove(&node);
    }

    /// Resolve the nearest holder of `role` enclosing `origin`.
    ///
    /// Filters holders by the host containment test, then selects the
    /// innermost: the matching holder contained in every other matching
    /// holder. Ancestor holders of one origin always form a chain, so the
    /// innermost is unique. Sibling holders fail containment and can never
    /// claim. Returns `None` when no holder encloses `origin` — a defined
    /// "no scope" outcome, not an error.
    pub fn resolve_nearest(
        &self,
        role: Role,
        origin: TreeHandle,
        host: &dyn TreeHost,
    ) -> Option<NodeId> {
        let mut nearest: Option<(NodeId, TreeHandle)> = None;

        for (&node, &handle) in self.holders(role) {
            if handle == origin || !host.contains(handle, origin) {
                continue;
            }
            nearest = match nearest {
                None => Some((node, handle)),
                // A candidate inside the current best is nearer to origin.
                Some((best_node, best_handle)) => {
                    if host.contains(best_handle, handle) {
                        Some((node, handle))
                    } else {
                        Some((best_node, best_handle))
                    }
                }
            };
        }

        if nearest.is_none() {
            log::debug!("no {role:?} holder encloses origin {origin}");
        }

        nearest.map(|(node, _)| node)
    }

    /// Tree handle of a registered holder.
    pub fn handle_of(&self, role: Role, node: NodeId) -> Option<TreeHandle> {
        self.holders(role).get(&node).copied()
    }

    /// Registered holders of `role`, in registration order.
    pub fn holders(&self, role: Role) -> &IndexMap<NodeId, TreeHandle> {
        match role {
            Role::Route => &self.routes,
            Role::Switch => &self.switches,
            Role::Router => &self.routers,
        }
    }

    fn holders_mut(&mut self, role: Role) -> &mut IndexMap<NodeId, TreeHandle> {
        match role {
            Role::Route => &mut self.routes,
            Role::Switch => &mut self.switches,
            Role::Router => &mut self.routers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::PresentationHandle;

    /// Containment by explicit parent links.
    struct ChainTree {
        parent: Vec<Option<u64>>,
    }

    impl ChainTree {
        fn new(parent: Vec<Option<u64>>) -> Self {
            Self { parent }
        }
    }

    impl TreeHost for ChainTree {
        fn contains(&self, ancestor: TreeHandle, descendant: TreeHandle) -> bool {
            let mut cursor = self.parent.get(descendant.0 as usize).copied().flatten();
            while let Some(p) = cursor {
                if p == ancestor.0 {
                    return true;
                }
                cursor = self.parent.get(p as usize).copied().flatten();
            }
            false
        }

        fn children_in_order(&self, _parent: TreeHandle) -> Vec<TreeHandle> {
            Vec::new()
        }

        fn detach_children(&mut self, _node: TreeHandle) -> Vec<PresentationHandle> {
            Vec::new()
        }

        fn attach_children(&mut self, _node: TreeHandle, _children: Vec<PresentationHandle>) {}
    }

    #[test]
    fn single_enclosing_holder_resolves() {
        // 0 ← 1 ← 2 (origin)
        let tree = ChainTree::new(vec![None, Some(0), Some(1)]);
        let mut reg = RoleRegistry::new();
        reg.register(Role::Switch, NodeId(10), TreeHandle(0));
        assert_eq!(
            reg.resolve_nearest(Role::Switch, TreeHandle(2), &tree),
            Some(NodeId(10))
        );
    }

    #[test]
    fn sibling_holder_never_claims() {
        // 0 has two children: 1 (holder) and 2 (origin).
        let tree = ChainTree::new(vec![None, Some(0), Some(0)]);
        let mut reg = RoleRegistry::new();
        reg.register(Role::Switch, NodeId(10), TreeHandle(1));
        assert_eq!(reg.resolve_nearest(Role::Switch, TreeHandle(2), &tree), None);
    }

    #[test]
    fn nested_holders_resolve_to_innermost_regardless_of_registration_order() {
        // 0 ← 1 ← 2 (origin); holders at 0 (outer) and 1 (inner).
        let tree = ChainTree::new(vec![None, Some(0), Some(1)]);

        let mut outer_first = RoleRegistry::new();
        outer_first.register(Role::Router, NodeId(10), TreeHandle(0));
        outer_first.register(Role::Router, NodeId(11), TreeHandle(1));
        assert_eq!(
            outer_first.resolve_nearest(Role::Router, TreeHandle(2), &tree),
            Some(NodeId(11))
        );

        let mut inner_first = RoleRegistry::new();
        inner_first.register(Role::Router, NodeId(11), TreeHandle(1));
        inner_first.register(Role::Router, NodeId(10), TreeHandle(0));
        assert_eq!(
            inner_first.resolve_nearest(Role::Router, TreeHandle(2), &tree),
            Some(NodeId(11))
        );
    }

    #[test]
    fn no_holder_is_a_defined_outcome() {
        let tree = ChainTree::new(vec![None, Some(0)]);
        let reg = RoleRegistry::new();
        assert_eq!(reg.resolve_nearest(Role::Route, TreeHandle(1), &tree), None);
    }

    #[test]
    fn holder_at_origin_does_not_claim_itself() {
        let tree = ChainTree::new(vec![None, Some(0)]);
        let mut reg = RoleRegistry::new();
        reg.register(Role::Route, NodeId(10), TreeHandle(1));
        assert_eq!(reg.resolve_nearest(Role::Route, TreeHandle(1), &tree), None);
    }

    #[test]
    fn unregister_removes_from_all_roles() {
        let tree = ChainTree::new(vec![None, Some(0)]);
        let mut reg = RoleRegistry::new();
        reg.register(Role::Switch, NodeId(10), TreeHandle(0));
        reg.register(Role::Router, NodeId(10), TreeHandle(0));
        reg.unregister(NodeId(10));
        assert_eq!(reg.resolve_nearest(Role::Switch, TreeHandle(1), &tree), None);
        assert_eq!(reg.resolve_nearest(Role::Router, TreeHandle(1), &tree), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// On a chain of nested holders, resolution always picks the
            /// innermost one, whatever order the holders registered in.
            #[test]
            fn chain_resolution_ignores_registration_order(
                len in 3usize..9,
                mask in proptest::collection::vec(any::<bool>(), 8),
                rotation in any::<prop::sample::Index>(),
            ) {
                // Chain 0 ← 1 ← ... ← len-1; the origin is the last node.
                let parent: Vec<Option<u64>> = (0..len)
                    .map(|i| i.checked_sub(1).map(|p| p as u64))
                    .collect();
                let tree = ChainTree::new(parent);
                let origin = TreeHandle(len as u64 - 1);

                // Holders at a masked subset of the proper ancestors.
                let holders: Vec<u64> = (0..len as u64 - 1)
                    .filter(|&i| mask[i as usize])
                    .collect();
                let expected = holders.last().map(|&h| NodeId(100 + h));

                let mut forward = RoleRegistry::new();
                for &h in &holders {
                    forward.register(Role::Router, NodeId(100 + h), TreeHandle(h));
                }
                prop_assert_eq!(
                    forward.resolve_nearest(Role::Router, origin, &tree),
                    expected
                );

                let mut rotated = RoleRegistry::new();
                let start = rotation.index(holders.len().max(1));
                for k in 0..holders.len() {
                    let h = holders[(start + k) % holders.len()];
                    rotated.register(Role::Router, NodeId(100 + h), TreeHandle(h));
                }
                prop_assert_eq!(
                    rotated.resolve_nearest(Role::Router, origin, &tree),
                    expected
                );
            }
        }
    }

    #[test]
    fn roles_are_independent() {
        let tree = ChainTree::new(vec![None, Some(0)]);
        let mut reg = RoleRegistry::new();
        reg.register(Role::Switch, NodeId(10), TreeHandle(0));
        assert_eq!(reg.resolve_nearest(Role::Router, TreeHandle(1), &tree), None);
        assert_eq!(
            reg.resolve_nearest(Role::Switch, TreeHandle(1), &tree),
            Some(NodeId(10))
        );
    }
}

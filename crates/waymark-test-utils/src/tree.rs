//! An in-memory host tree with parent links and presentation custody.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use waymark_core::{PresentationHandle, TreeHandle, TreeHost};

#[derive(Debug, Default)]
struct TreeInner {
    parents: IndexMap<TreeHandle, Option<TreeHandle>>,
    children: IndexMap<TreeHandle, Vec<TreeHandle>>,
    presentation: IndexMap<TreeHandle, Vec<PresentationHandle>>,
    detaches: Vec<TreeHandle>,
    attaches: Vec<TreeHandle>,
    next_handle: u64,
    next_presentation: u64,
}

/// A fake host tree.
///
/// Structural nodes are minted with [`add_node`](FakeTree::add_node);
/// presentational children with [`add_presentation`](FakeTree::add_presentation).
/// Every detach and attach is recorded for assertions.
#[derive(Clone, Debug, Default)]
pub struct FakeTree {
    inner: Rc<RefCell<TreeInner>>,
}

impl FakeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a structural node under `parent` (`None` for a root).
    pub fn add_node(&self, parent: Option<TreeHandle>) -> TreeHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_handle += 1;
        let handle = TreeHandle(inner.next_handle);
        inner.parents.insert(handle, parent);
        inner.children.entry(handle).or_default();
        if let Some(parent) = parent {
            inner.children.entry(parent).or_default().push(handle);
        }
        handle
    }

    /// Mint `count` presentational children attached to `node`.
    pub fn add_presentation(&self, node: TreeHandle, count: usize) -> Vec<PresentationHandle> {
        let mut inner = self.inner.borrow_mut();
        let minted: Vec<PresentationHandle> = (0..count)
            .map(|_| {
                inner.next_presentation += 1;
                PresentationHandle(inner.next_presentation)
            })
            .collect();
        inner
            .presentation
            .entry(node)
            .or_default()
            .extend(minted.iter().copied());
        minted
    }

    /// Presentational children currently attached to `node`.
    pub fn attached(&self, node: TreeHandle) -> Vec<PresentationHandle> {
        self.inner
            .borrow()
            .presentation
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    /// How many times `node` had its children detached.
    pub fn detach_count(&self, node: TreeHandle) -> usize {
        self.inner
            .borrow()
            .detaches
            .iter()
            .filter(|&&h| h == node)
            .count()
    }

    /// How many times `node` had children attached.
    pub fn attach_count(&self, node: TreeHandle) -> usize {
        self.inner
            .borrow()
            .attaches
            .iter()
            .filter(|&&h| h == node)
            .count()
    }
}

impl TreeHost for FakeTree {
    fn contains(&self, ancestor: TreeHandle, descendant: TreeHandle) -> bool {
        let inner = self.inner.borrow();
        let mut cursor = inner.parents.get(&descendant).copied().flatten();
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = inner.parents.get(&parent).copied().flatten();
        }
        false
    }

    fn children_in_order(&self, parent: TreeHandle) -> Vec<TreeHandle> {
        self.inner
            .borrow()
            .children
            .get(&parent)
            .cloned()
            .unwrap_or_default()
    }

    fn detach_children(&mut self, node: TreeHandle) -> Vec<PresentationHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.detaches.push(node);
        inner.presentation.shift_remove(&node).unwrap_or_default()
    }

    fn attach_children(&mut self, node: TreeHandle, children: Vec<PresentationHandle>) {
        let mut inner = self.inner.borrow_mut();
        inner.attaches.push(node);
        inner.presentation.entry(node).or_default().extend(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_transitive_and_irreflexive() {
        let tree = FakeTree::new();
        let a = tree.add_node(None);
        let b = tree.add_node(Some(a));
        let c = tree.add_node(Some(b));
        assert!(tree.contains(a, c));
        assert!(tree.contains(b, c));
        assert!(!tree.contains(c, a));
        assert!(!tree.contains(a, a));
    }

    #[test]
    fn detach_attach_round_trips_presentation() {
        let mut tree = FakeTree::new();
        let node = tree.add_node(None);
        let minted = tree.add_presentation(node, 2);

        let detached = tree.detach_children(node);
        assert_eq!(detached, minted);
        assert!(tree.attached(node).is_empty());

        tree.attach_children(node, detached);
        assert_eq!(tree.attached(node), minted);
        assert_eq!(tree.detach_count(node), 1);
        assert_eq!(tree.attach_count(node), 1);
    }

    #[test]
    fn children_keep_declaration_order() {
        let tree = FakeTree::new();
        let parent = tree.add_node(None);
        let first = tree.add_node(Some(parent));
        let second = tree.add_node(Some(parent));
        assert_eq!(tree.children_in_order(parent), vec![first, second]);
    }
}

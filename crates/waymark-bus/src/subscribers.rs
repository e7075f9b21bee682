//! Registration-ordered subscriber lists for broadcast topics.

use indexmap::IndexSet;
use waymark_core::NodeId;

/// Subscribers to one broadcast topic, in registration order.
///
/// Delivery iterates a snapshot of this order; handlers that mutate the
/// list during delivery affect the next broadcast, not the current one.
#[derive(Debug, Default)]
pub struct SubscriberList {
    members: IndexSet<NodeId>,
}

impl SubscriberList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `node`. Re-subscribing keeps the original position.
    pub fn subscribe(&mut self, node: NodeId) {
        self.members.insert(node);
    }

    /// Unsubscribe `node`.
    pub fn unsubscribe(&mut self, node: NodeId) {
        self.members.shift_remove(&node);
    }

    /// Snapshot of the current members, in registration order.
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.members.iter().copied().collect()
    }

    /// Whether `node` is subscribed.
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut list = SubscriberList::new();
        list.subscribe(NodeId(3));
        list.subscribe(NodeId(1));
        list.subscribe(NodeId(2));
        list.subscribe(NodeId(1));
        assert_eq!(list.snapshot(), vec![NodeId(3), NodeId(1), NodeId(2)]);
    }

    #[test]
    fn unsubscribe_removes() {
        let mut list = SubscriberList::new();
        list.subscribe(NodeId(1));
        list.subscribe(NodeId(2));
        list.unsubscribe(NodeId(1));
        assert_eq!(list.snapshot(), vec![NodeId(2)]);
        assert!(!list.contains(NodeId(1)));
    }
}

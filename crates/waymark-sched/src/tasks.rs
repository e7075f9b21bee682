//! The world-side task queue: which nodes need an update pass this tick.

use indexmap::IndexSet;
use waymark_core::NodeId;

/// Cap on update passes for one node within one tick.
///
/// A node whose `update` hook keeps re-dirtying itself would otherwise spin
/// the tick forever; hitting the cap yields
/// [`ScheduleError::ConvergenceExceeded`](waymark_core::ScheduleError).
pub const MAX_UPDATE_PASSES: usize = 64;

/// Nodes armed for an update pass, each at most once, in arming order.
///
/// Arming is idempotent: a node already queued stays at its original
/// position, so a burst of `set_state` calls on one node yields exactly one
/// `update` invocation carrying the union of changed keys. Unmounting a
/// node disarms it — a queued task for a detached node is suppressed, not
/// run.
#[derive(Debug, Default)]
pub struct TaskQueue {
    armed: IndexSet<NodeId>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `node` for an update pass. Returns whether it was newly armed.
    pub fn arm(&mut self, node: NodeId) -> bool {
        self.armed.insert(node)
    }

    /// Remove `node` from the queue (detachment suppression).
    pub fn disarm(&mut self, node: NodeId) {
        self.armed.shift_remove(&node);
    }

    /// Take the next armed node, in arming order.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.armed.shift_remove_index(0)
    }

    /// Whether any node is armed.
    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    /// Number of armed nodes.
    pub fn len(&self) -> usize {
        self.armed.len()
    }

    /// Whether `node` is currently armed.
    pub fn contains(&self, node: NodeId) -> bool {
        self.armed.contains(&node)
    }
}

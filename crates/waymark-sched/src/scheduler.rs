//! Per-node state batching: [`set_state`](UpdateScheduler::set_state) and
//! the changed-key list.

use smallvec::SmallVec;
use std::fmt;

/// Names one piece of node state in a changed-key list.
///
/// Keys are static strings interned per node kind (`"path"`, `"pattern"`,
/// `"params"`, ...); comparison is by content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey(pub &'static str);

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coalesces a node's state mutations into one `update` per tick.
///
/// Mutations go through [`set_state`](Self::set_state), which writes the
/// slot only when the value actually changed (by a caller-chosen equality)
/// and records the key. The owning world drains the keys as a snapshot and
/// invokes the node's `update` hook; the hook may itself call `set_state`,
/// in which case the world loops until the list stays empty (bounded — see
/// [`MAX_UPDATE_PASSES`](crate::MAX_UPDATE_PASSES)).
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    changed: SmallVec<[StateKey; 4]>,
}

impl UpdateScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `*slot` and `next` with `eq`; when different, write the
    /// slot and record `key`. Returns whether a change was recorded (the
    /// caller arms itself in the task queue on `true`).
    pub fn set_state<T>(
        &mut self,
        key: StateKey,
        slot: &mut T,
        next: T,
        eq: impl FnOnce(&T, &T) -> bool,
    ) -> bool {
        if eq(slot, &next) {
            return false;
        }
        *slot = next;
        self.note(key);
        true
    }

    /// [`set_state`](Self::set_state) with default value equality.
    pub fn set_value<T: PartialEq>(&mut self, key: StateKey, slot: &mut T, next: T) -> bool {
        self.set_state(key, slot, next, |a, b| a == b)
    }

    /// Record `key` as changed without touching state. Used when a change
    /// is applied out of band but must still trigger an update pass.
    pub fn note(&mut self, key: StateKey) {
        if !self.changed.contains(&key) {
            self.changed.push(key);
        }
    }

    /// Whether any key is recorded.
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Snapshot and clear the changed-key list.
    pub fn drain(&mut self) -> SmallVec<[StateKey; 4]> {
        std::mem::take(&mut self.changed)
    }
}

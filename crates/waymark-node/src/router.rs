//! The router: navigation scope boundary and history stamp owner.

use waymark_core::{NodeId, TreeHandle};

/// A router marks a navigation scope in the tree. Its own node id is the
/// stamp written into every history entry it pushes, so pop notifications
/// can be attributed: a pop is honored only by the router whose id equals
/// the entry's stamp.
///
/// The router itself is thin. Sequencing, history calls, and path
/// publication are world concerns; the router only remembers the current
/// path for its scope and the initial path awaiting publication.
#[derive(Debug)]
pub struct RouterNode {
    id: NodeId,
    handle: TreeHandle,
    current_path: Option<String>,
    initial_path: Option<String>,
}

impl RouterNode {
    /// Create a router. `initial_path`, if given, is stamped into the
    /// current history entry at mount and published later, once the host
    /// finishes building the subtree.
    pub fn new(id: NodeId, handle: TreeHandle, initial_path: Option<String>) -> Self {
        Self {
            id,
            handle,
            current_path: None,
            initial_path,
        }
    }

    /// The router's node id, doubling as its history stamp.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The router's tree position.
    pub fn handle(&self) -> TreeHandle {
        self.handle
    }

    /// The path currently published to this scope.
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Record a new current path for the scope.
    pub fn set_current_path(&mut self, path: &str) {
        self.current_path = Some(path.to_owned());
    }

    /// Take the initial path awaiting publication, if any. One-shot.
    pub fn take_initial_path(&mut self) -> Option<String> {
        self.initial_path.take()
    }

    /// Whether a popped history entry belongs to this router's scope.
    pub fn owns_stamp(&self, stamp: NodeId) -> bool {
        stamp == self.id
    }
}

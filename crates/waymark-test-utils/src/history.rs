//! A history bridge that records every call.

use std::cell::RefCell;
use std::rc::Rc;

use waymark_core::{HistoryBridge, NodeId};

/// One recorded history operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryCall {
    /// A pushed entry.
    Push {
        /// Stamp of the acting router.
        stamp: NodeId,
        /// The pushed url.
        url: String,
    },
    /// A replaced entry.
    Replace {
        /// Stamp of the acting router.
        stamp: NodeId,
        /// The replacing url.
        url: String,
    },
}

/// Records pushes and replaces in call order.
#[derive(Clone, Debug, Default)]
pub struct RecordingHistory {
    calls: Rc<RefCell<Vec<HistoryCall>>>,
}

impl RecordingHistory {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<HistoryCall> {
        self.calls.borrow().clone()
    }

    /// Only the pushes, in order.
    pub fn pushes(&self) -> Vec<(NodeId, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HistoryCall::Push { stamp, url } => Some((*stamp, url.clone())),
                HistoryCall::Replace { .. } => None,
            })
            .collect()
    }
}

impl HistoryBridge for RecordingHistory {
    fn push(&mut self, stamp: NodeId, url: &str) {
        self.calls.borrow_mut().push(HistoryCall::Push {
            stamp,
            url: url.to_owned(),
        });
    }

    fn replace(&mut self, stamp: NodeId, url: &str) {
        self.calls.borrow_mut().push(HistoryCall::Replace {
            stamp,
            url: url.to_owned(),
        });
    }
}

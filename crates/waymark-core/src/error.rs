//! Error types for the Waymark router, organized by subsystem: module
//! loading, scheduling, bus delivery, world configuration, and the mount
//! and dispatch APIs.

use std::error::Error;
use std::fmt;

use crate::id::NodeId;

/// A module load settled unsuccessfully.
///
/// Carried in `HostEvent::LoadSettled`; the owning route stays active with
/// its subtree attached but never emits a params broadcast for that
/// activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The module reference did not resolve to anything fetchable.
    NotFound,
    /// The module was fetched but failed to load.
    Failed {
        /// Human-readable description from the host loader.
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "module not found"),
            Self::Failed { reason } => write!(f, "module load failed: {reason}"),
        }
    }
}

impl Error for LoadError {}

/// Errors from the cooperative update scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    /// A node's `update` hook kept producing changes past the per-tick
    /// pass cap — a self-retriggering hook that would otherwise spin the
    /// tick forever.
    ConvergenceExceeded {
        /// The node whose update loop failed to settle.
        node: NodeId,
        /// Number of passes executed before giving up.
        passes: usize,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConvergenceExceeded { node, passes } => {
                write!(f, "node {node} failed to converge after {passes} update passes")
            }
        }
    }
}

impl Error for ScheduleError {}

/// Errors from the broadcast bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusError {
    /// A handler broadcast the same topic it was being delivered — a
    /// programming error in the host integration that breaks the
    /// first-claim-wins invariant of the discovery protocol.
    ReentrantBroadcast {
        /// Name of the topic that re-entered.
        topic: &'static str,
    },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReentrantBroadcast { topic } => {
                write!(f, "reentrant broadcast of topic '{topic}'")
            }
        }
    }
}

impl Error for BusError {}

/// World construction validation failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_update_passes` must be at least 1.
    ZeroUpdatePasses,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroUpdatePasses => write!(f, "max_update_passes must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Mount/unmount API misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MountError {
    /// The referenced node id does not exist in this world.
    UnknownNode {
        /// The missing id.
        node: NodeId,
    },
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node } => write!(f, "unknown node {node}"),
        }
    }
}

impl Error for MountError {}

/// Errors surfaced from one `dispatch()` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The update loop did not converge.
    Schedule(ScheduleError),
    /// A broadcast reentrancy violation was detected.
    Bus(BusError),
    /// The event referenced a node that does not exist.
    Mount(MountError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schedule(e) => write!(f, "dispatch failed: {e}"),
            Self::Bus(e) => write!(f, "dispatch failed: {e}"),
            Self::Mount(e) => write!(f, "dispatch failed: {e}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(e) => Some(e),
            Self::Bus(e) => Some(e),
            Self::Mount(e) => Some(e),
        }
    }
}

impl From<ScheduleError> for DispatchError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

impl From<BusError> for DispatchError {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

impl From<MountError> for DispatchError {
    fn from(e: MountError) -> Self {
        Self::Mount(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = ScheduleError::ConvergenceExceeded {
            node: NodeId(3),
            passes: 64,
        };
        assert_eq!(e.to_string(), "node 3 failed to converge after 64 update passes");

        let e = LoadError::Failed {
            reason: "parse error".into(),
        };
        assert_eq!(e.to_string(), "module load failed: parse error");

        let e = BusError::ReentrantBroadcast { topic: "path-changed" };
        assert!(e.to_string().contains("path-changed"));
    }

    #[test]
    fn dispatch_error_sources_chain() {
        let inner = ScheduleError::ConvergenceExceeded {
            node: NodeId(1),
            passes: 8,
        };
        let outer: DispatchError = inner.clone().into();
        let source = outer.source().expect("source");
        assert_eq!(source.to_string(), inner.to_string());
    }
}

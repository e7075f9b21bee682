//! Core types and traits for the Waymark router framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! typed ids, the host seams, the event vocabulary, and the error types
//! used throughout the Waymark workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod host;
pub mod id;

pub use error::{BusError, ConfigError, DispatchError, LoadError, MountError, ScheduleError};
pub use event::{HostEvent, LoadOutcome, Notification, Params};
pub use host::{HistoryBridge, ModuleLoader, TreeHost};
pub use id::{
    IdAllocator, LoadTicket, NavigationSeq, NodeId, PresentationHandle, RoundId, TreeHandle,
};

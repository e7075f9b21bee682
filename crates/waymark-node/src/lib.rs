//! Node state machines for the Waymark router: routes, switches, routers,
//! and params listeners.
//!
//! Each node kind owns only its own state and communicates through
//! [`Action`] values interpreted by the owning world, so every machine is
//! testable in isolation with plain method calls.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod action;
mod listener;
mod route;
mod router;
mod switch;
mod traits;

pub use action::Action;
pub use listener::ParamsListenerNode;
pub use route::{LoadState, RouteNode};
pub use router::RouterNode;
pub use switch::{ActivationReply, ActivationRequest, SwitchNode};
pub use traits::{ActivatableNode, MatchableNode, ScopedRequester};

use waymark_core::NodeId;

/// A mounted node of any kind.
#[derive(Debug)]
pub enum Node {
    /// A route.
    Route(RouteNode),
    /// A switch.
    Switch(SwitchNode),
    /// A router.
    Router(RouterNode),
    /// A params listener.
    Listener(ParamsListenerNode),
}

impl Node {
    /// The node's id, regardless of kind.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Route(n) => n.id(),
            Self::Switch(n) => n.id(),
            Self::Router(n) => n.id(),
            Self::Listener(n) => n.id(),
        }
    }

    /// Kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Route(_) => "route",
            Self::Switch(_) => "switch",
            Self::Router(_) => "router",
            Self::Listener(_) => "params-listener",
        }
    }

    /// The route, if this is one.
    pub fn as_route(&self) -> Option<&RouteNode> {
        match self {
            Self::Route(n) => Some(n),
            _ => None,
        }
    }

    /// The route, mutably, if this is one.
    pub fn as_route_mut(&mut self) -> Option<&mut RouteNode> {
        match self {
            Self::Route(n) => Some(n),
            _ => None,
        }
    }

    /// The switch, mutably, if this is one.
    pub fn as_switch_mut(&mut self) -> Option<&mut SwitchNode> {
        match self {
            Self::Switch(n) => Some(n),
            _ => None,
        }
    }

    /// The router, if this is one.
    pub fn as_router(&self) -> Option<&RouterNode> {
        match self {
            Self::Router(n) => Some(n),
            _ => None,
        }
    }

    /// The router, mutably, if this is one.
    pub fn as_router_mut(&mut self) -> Option<&mut RouterNode> {
        match self {
            Self::Router(n) => Some(n),
            _ => None,
        }
    }

    /// The listener, mutably, if this is one.
    pub fn as_listener_mut(&mut self) -> Option<&mut ParamsListenerNode> {
        match self {
            Self::Listener(n) => Some(n),
            _ => None,
        }
    }
}

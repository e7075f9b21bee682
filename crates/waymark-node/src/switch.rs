//! Exclusive arbitration over sibling routes.

use indexmap::IndexSet;
use waymark_core::{NavigationSeq, NodeId, RoundId, TreeHandle};

use crate::action::Action;

/// One route's bid to activate, stamped with the navigation that drove it.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationRequest {
    /// The requesting route.
    pub route: NodeId,
    /// The path that produced the request.
    pub path: String,
    /// Sequence of the path change driving the request.
    pub seq: NavigationSeq,
}

/// The switch's answer to one request.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationReply {
    /// Whether the requester may activate.
    pub permitted: bool,
    /// A redirect intent, raised at most once per round when the round
    /// completes with nothing permitted.
    pub redirect: Option<Action>,
}

/// A switch: permits at most one of its declared child routes per
/// navigation and optionally redirects when none matched.
///
/// Requests from one navigation share a round. The round rolls over when a
/// request carries a new sequence number, or when a route that already
/// reported in this round reports again (a pattern change can re-drive a
/// request without a new navigation).
#[derive(Debug)]
pub struct SwitchNode {
    id: NodeId,
    handle: TreeHandle,
    round: RoundId,
    round_seq: Option<NavigationSeq>,
    reported: IndexSet<NodeId>,
    any_permitted: bool,
    redirect_fired: bool,
    redirect_to: Option<String>,
}

impl SwitchNode {
    /// Create a switch with no redirect target.
    pub fn new(id: NodeId, handle: TreeHandle) -> Self {
        Self {
            id,
            handle,
            round: RoundId(0),
            round_seq: None,
            reported: IndexSet::new(),
            any_permitted: false,
            redirect_fired: false,
            redirect_to: None,
        }
    }

    /// The switch's node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The switch's tree position.
    pub fn handle(&self) -> TreeHandle {
        self.handle
    }

    /// Current round, for diagnostics.
    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Set or replace the redirect target. Applies from the next
    /// completed round.
    pub fn set_redirect(&mut self, to: String) {
        self.redirect_to = Some(to);
    }

    /// Arbitrate one request.
    ///
    /// The world supplies the declared-child view: `first_match` is the
    /// first declared child route (in tree order) whose pattern matches
    /// the request's path, and `child_count` is the number of declared
    /// child routes. Exactly the requester equal to `first_match` is
    /// permitted. When every child has reported and none was permitted,
    /// the reply carries a redirect intent (once per round).
    pub fn arbitrate(
        &mut self,
        req: &ActivationRequest,
        first_match: Option<NodeId>,
        child_count: usize,
    ) -> ActivationReply {
        if self.round_seq != Some(req.seq) || self.reported.contains(&req.route) {
            self.roll_round(req.seq);
        }
        self.reported.insert(req.route);

        let permitted = first_match == Some(req.route);
        self.any_permitted |= permitted;

        let mut redirect = None;
        if self.reported.len() >= child_count && !self.any_permitted && !self.redirect_fired {
            if let Some(to) = &self.redirect_to {
                self.redirect_fired = true;
                redirect = Some(Action::Navigate {
                    origin: self.handle,
                    to: to.clone(),
                });
            }
        }

        ActivationReply { permitted, redirect }
    }

    fn roll_round(&mut self, seq: NavigationSeq) {
        if self.round_seq.is_some() {
            log::trace!(
                "switch {}: round {} -> {} (seq {seq})",
                self.id,
                self.round,
                RoundId(self.round.0 + 1)
            );
        }
        self.round = RoundId(self.round.0 + 1);
        self.round_seq = Some(seq);
        self.reported.clear();
        self.any_permitted = false;
        self.redirect_fired = false;
    }
}

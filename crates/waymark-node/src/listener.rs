//! Params listeners: nodes that observe a route's captured parameters.

use waymark_bus::Role;
use waymark_core::{NodeId, Params, TreeHandle};
use waymark_sched::{StateKey, UpdateScheduler};

use crate::action::Action;
use crate::traits::ScopedRequester;

const KEY_PARAMS: StateKey = StateKey("params");

/// A listener that surfaces parameter changes to the host.
///
/// When mounted under a route, only that route's publications are
/// accepted; an unscoped listener accepts publications from any route.
/// Changes are detected structurally, so a republication of equal
/// parameters produces no notification.
#[derive(Debug)]
pub struct ParamsListenerNode {
    id: NodeId,
    handle: TreeHandle,
    sched: UpdateScheduler,
    route_scope: Option<NodeId>,
    params: Option<Params>,
    source_route: Option<NodeId>,
}

impl ParamsListenerNode {
    /// Create a listener with no scope bound yet.
    pub fn new(id: NodeId, handle: TreeHandle) -> Self {
        Self {
            id,
            handle,
            sched: UpdateScheduler::new(),
            route_scope: None,
            params: None,
            source_route: None,
        }
    }

    /// The listener's node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The resolved enclosing route, if any.
    pub fn route_scope(&self) -> Option<NodeId> {
        self.route_scope
    }

    /// The parameters last observed.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Accept a publication. Returns whether an update pass is needed.
    pub fn on_params_published(&mut self, route: NodeId, params: &Params) -> bool {
        if self.route_scope.is_some_and(|scope| scope != route) {
            return false;
        }
        self.source_route = Some(route);
        self.sched
            .set_value(KEY_PARAMS, &mut self.params, Some(params.clone()))
    }

    /// Whether an update pass is pending.
    pub fn is_dirty(&self) -> bool {
        self.sched.is_dirty()
    }

    /// Run one update pass over the accumulated changes.
    pub fn run_update(&mut self) -> Vec<Action> {
        let changed = self.sched.drain();
        if !changed.contains(&KEY_PARAMS) {
            return Vec::new();
        }
        match (self.source_route, &self.params) {
            (Some(route), Some(params)) => vec![Action::NotifyParams {
                listener: self.id,
                route,
                params: params.clone(),
            }],
            _ => Vec::new(),
        }
    }
}

impl ScopedRequester for ParamsListenerNode {
    fn origin(&self) -> TreeHandle {
        self.handle
    }

    fn scope_roles(&self) -> &'static [Role] {
        &[Role::Route]
    }

    fn bind_scope(&mut self, role: Role, holder: Option<NodeId>) {
        if role == Role::Route {
            self.route_scope = holder;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    fn listener() -> ParamsListenerNode {
        ParamsListenerNode::new(NodeId(20), TreeHandle(20))
    }

    #[test]
    fn publication_produces_a_notification() {
        let mut l = listener();
        assert!(l.on_params_published(NodeId(1), &params(&[("id", "42")])));
        let actions = l.run_update();
        assert_eq!(
            actions,
            vec![Action::NotifyParams {
                listener: NodeId(20),
                route: NodeId(1),
                params: params(&[("id", "42")]),
            }]
        );
    }

    #[test]
    fn equal_params_are_suppressed() {
        let mut l = listener();
        l.on_params_published(NodeId(1), &params(&[("id", "42")]));
        l.run_update();
        assert!(!l.on_params_published(NodeId(1), &params(&[("id", "42")])));
        assert!(!l.is_dirty());
    }

    #[test]
    fn scoped_listener_ignores_foreign_routes() {
        let mut l = listener();
        l.bind_scope(Role::Route, Some(NodeId(1)));
        assert!(!l.on_params_published(NodeId(2), &params(&[("id", "1")])));
        assert!(l.on_params_published(NodeId(1), &params(&[("id", "1")])));
    }

    #[test]
    fn unscoped_listener_accepts_any_route() {
        let mut l = listener();
        assert!(l.on_params_published(NodeId(7), &params(&[("a", "1")])));
        l.run_update();
        assert!(l.on_params_published(NodeId(8), &params(&[("a", "2")])));
    }

    #[test]
    fn source_route_change_with_equal_params_is_silent() {
        let mut l = listener();
        l.on_params_published(NodeId(7), &params(&[("a", "1")]));
        l.run_update();
        assert!(!l.on_params_published(NodeId(8), &params(&[("a", "1")])));
    }
}

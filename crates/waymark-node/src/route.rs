//! The route state machine: match, arbitrate, activate, load, publish.

use waymark_bus::Role;
use waymark_core::{
    LoadOutcome, LoadTicket, NavigationSeq, NodeId, Params, PresentationHandle, TreeHandle,
};
use waymark_match::{match_path, MatchResult, Pattern};
use waymark_sched::{StateKey, UpdateScheduler};

use crate::action::Action;
use crate::traits::{ActivatableNode, MatchableNode, ScopedRequester};

const KEY_PATH: StateKey = StateKey("path");
const KEY_PATTERN: StateKey = StateKey("pattern");

/// Progress of the route's one-shot module load.
///
/// `Failed` is terminal: a failed load is logged and the route keeps
/// presenting, but it never retries and never publishes parameters for
/// activations in that state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No load has been requested yet.
    NotStarted,
    /// A load was begun and has not settled.
    InFlight(LoadTicket),
    /// The module load settled successfully.
    Loaded,
    /// The module load settled with an error.
    Failed,
}

/// A route: owns a pattern, tracks the current path, and toggles its
/// presentational subtree on match.
///
/// Inactive routes hold their detached children in `pending_children` and
/// reattach the same handles on activation, so subtree state survives
/// toggles. Parameter publication waits for the module load (if any) to
/// settle successfully and is suppressed if the route deactivated in the
/// meantime.
#[derive(Debug)]
pub struct RouteNode {
    id: NodeId,
    handle: TreeHandle,
    sched: UpdateScheduler,
    path: Option<String>,
    pattern: Option<Pattern>,
    module: Option<String>,
    matched: MatchResult,
    active: bool,
    pending_children: Vec<PresentationHandle>,
    switch_scope: Option<NodeId>,
    router_scope: Option<NodeId>,
    load: LoadState,
    last_published: Option<Params>,
    last_seq: NavigationSeq,
}

impl RouteNode {
    /// Create an inactive route. The world detaches the route's children
    /// into it right after construction.
    pub fn new(
        id: NodeId,
        handle: TreeHandle,
        pattern: Option<&str>,
        module: Option<String>,
    ) -> Self {
        Self {
            id,
            handle,
            sched: UpdateScheduler::new(),
            path: None,
            pattern: pattern.map(Pattern::parse),
            module,
            matched: MatchResult::NoMatch,
            active: false,
            pending_children: Vec::new(),
            switch_scope: None,
            router_scope: None,
            load: LoadState::NotStarted,
            last_published: None,
            last_seq: NavigationSeq(0),
        }
    }

    /// The route's node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The route's tree position.
    pub fn handle(&self) -> TreeHandle {
        self.handle
    }

    /// The resolved enclosing switch, if any.
    pub fn switch_scope(&self) -> Option<NodeId> {
        self.switch_scope
    }

    /// The resolved enclosing router, if any.
    pub fn router_scope(&self) -> Option<NodeId> {
        self.router_scope
    }

    /// Current load progress.
    pub fn load_state(&self) -> LoadState {
        self.load
    }

    /// The parameters most recently published, if any.
    pub fn last_published(&self) -> Option<&Params> {
        self.last_published.as_ref()
    }

    /// Assign the path directly. Returns whether an update pass is needed.
    pub fn set_path(&mut self, path: String, seq: NavigationSeq) -> bool {
        let changed = self.sched.set_value(KEY_PATH, &mut self.path, Some(path));
        if changed {
            self.last_seq = seq;
        }
        changed
    }

    /// Accept a path published by a router, if that router is this
    /// route's scope. Returns whether an update pass is needed.
    pub fn on_path_published(&mut self, router: NodeId, path: &str, seq: NavigationSeq) -> bool {
        if self.router_scope != Some(router) {
            return false;
        }
        self.set_path(path.to_owned(), seq)
    }

    /// Replace the pattern. Returns whether an update pass is needed.
    pub fn set_pattern(&mut self, source: &str) -> bool {
        let next = Some(Pattern::parse(source));
        self.sched
            .set_state(KEY_PATTERN, &mut self.pattern, next, |a, b| {
                a.as_ref().map(Pattern::raw) == b.as_ref().map(Pattern::raw)
            })
    }

    /// Replace the module reference. Takes effect at the next activation;
    /// an activation already past the load decision is not re-examined.
    pub fn set_module(&mut self, module: String) {
        self.module = Some(module);
    }

    /// Whether an update pass is pending.
    pub fn is_dirty(&self) -> bool {
        self.sched.is_dirty()
    }

    /// Run one update pass over the accumulated changes.
    pub fn run_update(&mut self) -> Vec<Action> {
        let changed = self.sched.drain();
        let mut actions = Vec::new();
        if !(changed.contains(&KEY_PATH) || changed.contains(&KEY_PATTERN)) {
            return actions;
        }

        self.matched = match self.path.as_deref() {
            Some(path) => match_path(path, self.pattern.as_ref()),
            None => MatchResult::NoMatch,
        };

        // Under a switch, every rematch reports, match or not: the switch
        // can only complete a round (and fire its redirect) once all of
        // its children have reported.
        match self.switch_scope {
            Some(switch) => actions.push(Action::RequestActivation {
                route: self.id,
                switch,
                path: self.path.clone().unwrap_or_default(),
                seq: self.last_seq,
            }),
            None => {
                if self.matched.is_match() {
                    self.enter_active(&mut actions);
                } else {
                    self.enter_inactive(&mut actions);
                }
            }
        }
        actions
    }

    /// Apply a switch's arbitration verdict.
    pub fn on_permission(&mut self, permitted: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        if permitted {
            self.enter_active(&mut actions);
        } else {
            self.enter_inactive(&mut actions);
        }
        actions
    }

    /// Record the start of a module load.
    pub fn begin_load(&mut self, ticket: LoadTicket) {
        self.load = LoadState::InFlight(ticket);
    }

    /// Apply a load outcome. A success publishes parameters only if the
    /// route is still active; a stale ticket is ignored.
    pub fn on_load_settled(&mut self, ticket: LoadTicket, outcome: &LoadOutcome) -> Vec<Action> {
        if self.load != LoadState::InFlight(ticket) {
            log::debug!("route {}: ignoring settle of stale load ticket {ticket}", self.id);
            return Vec::new();
        }

        let mut actions = Vec::new();
        match outcome {
            Ok(()) => {
                self.load = LoadState::Loaded;
                if self.active {
                    self.publish_params(&mut actions);
                }
            }
            Err(err) => {
                self.load = LoadState::Failed;
                log::warn!("route {}: module load failed: {err}", self.id);
            }
        }
        actions
    }

    /// Hand the withheld children to the world for reattachment.
    pub fn take_pending_children(&mut self) -> Vec<PresentationHandle> {
        std::mem::take(&mut self.pending_children)
    }

    /// Hold children detached by the world.
    pub fn hold_children(&mut self, children: Vec<PresentationHandle>) {
        self.pending_children = children;
    }

    /// Parameters captured from the current path.
    pub fn current_params(&self) -> Params {
        self.matched.params().cloned().unwrap_or_default()
    }

    fn enter_active(&mut self, actions: &mut Vec<Action>) {
        if !self.active {
            self.active = true;
            actions.push(Action::AttachSubtree { route: self.id });
        }

        match (&self.module, self.load) {
            (Some(module), LoadState::NotStarted) => actions.push(Action::BeginLoad {
                route: self.id,
                module: module.clone(),
            }),
            // One load at a time; the settle handler publishes.
            (Some(_), LoadState::InFlight(_)) => {}
            // A failed load degrades to presentation without parameters.
            (Some(_), LoadState::Failed) => {}
            (Some(_), LoadState::Loaded) | (None, _) => self.publish_params(actions),
        }
    }

    fn enter_inactive(&mut self, actions: &mut Vec<Action>) {
        if self.active {
            self.active = false;
            // The next activation republishes even if params are unchanged.
            self.last_published = None;
            actions.push(Action::DetachSubtree { route: self.id });
        }
    }

    fn publish_params(&mut self, actions: &mut Vec<Action>) {
        let params = self.current_params();
        if self.last_published.as_ref() == Some(&params) {
            return;
        }
        self.last_published = Some(params.clone());
        actions.push(Action::BroadcastParams {
            route: self.id,
            params,
        });
    }
}

impl MatchableNode for RouteNode {
    fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    fn current_match(&self) -> &MatchResult {
        &self.matched
    }
}

impl ActivatableNode for RouteNode {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl ScopedRequester for RouteNode {
    fn origin(&self) -> TreeHandle {
        self.handle
    }

    fn scope_roles(&self) -> &'static [Role] {
        &[Role::Switch, Role::Router]
    }

    fn bind_scope(&mut self, role: Role, holder: Option<NodeId>) {
        match role {
            Role::Switch => self.switch_scope = holder,
            Role::Router => self.router_scope = holder,
            Role::Route => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::LoadError;

    fn route(pattern: Option<&str>, module: Option<&str>) -> RouteNode {
        RouteNode::new(NodeId(1), TreeHandle(1), pattern, module.map(str::to_owned))
    }

    /// Run update passes until the route is clean, collecting actions.
    fn settle(route: &mut RouteNode) -> Vec<Action> {
        let mut actions = Vec::new();
        while route.is_dirty() {
            actions.extend(route.run_update());
        }
        actions
    }

    // ── activation without a switch ─────────────────────────────────────

    #[test]
    fn matching_path_activates_and_publishes() {
        let mut r = route(Some("/users/:id"), None);
        assert!(r.set_path("/users/42".into(), NavigationSeq(1)));
        let actions = settle(&mut r);

        assert!(r.is_active());
        assert_eq!(actions[0], Action::AttachSubtree { route: NodeId(1) });
        let Action::BroadcastParams { params, .. } = &actions[1] else {
            panic!("expected params broadcast, got {actions:?}");
        };
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn non_matching_path_deactivates() {
        let mut r = route(Some("/users/:id"), None);
        r.set_path("/users/42".into(), NavigationSeq(1));
        settle(&mut r);

        r.set_path("/about".into(), NavigationSeq(2));
        let actions = settle(&mut r);
        assert!(!r.is_active());
        assert_eq!(actions, vec![Action::DetachSubtree { route: NodeId(1) }]);
    }

    #[test]
    fn same_path_twice_is_a_no_op() {
        let mut r = route(Some("/a"), None);
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);
        assert!(!r.set_path("/a".into(), NavigationSeq(2)));
        assert!(settle(&mut r).is_empty());
    }

    #[test]
    fn param_change_while_active_republishes() {
        let mut r = route(Some("/users/:id"), None);
        r.set_path("/users/1".into(), NavigationSeq(1));
        settle(&mut r);

        r.set_path("/users/2".into(), NavigationSeq(2));
        let actions = settle(&mut r);
        // Still active, so no attach; just the new params.
        assert_eq!(actions.len(), 1);
        let Action::BroadcastParams { params, .. } = &actions[0] else {
            panic!("expected params broadcast, got {actions:?}");
        };
        assert_eq!(params.get("id").map(String::as_str), Some("2"));
    }

    #[test]
    fn reactivation_republishes_identical_params() {
        let mut r = route(Some("/a/:x"), None);
        r.set_path("/a/1".into(), NavigationSeq(1));
        settle(&mut r);
        r.set_path("/b".into(), NavigationSeq(2));
        settle(&mut r);

        r.set_path("/a/1".into(), NavigationSeq(3));
        let actions = settle(&mut r);
        assert!(actions.contains(&Action::AttachSubtree { route: NodeId(1) }));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::BroadcastParams { .. })));
    }

    #[test]
    fn pattern_change_triggers_rematch() {
        let mut r = route(Some("/old"), None);
        r.set_path("/new".into(), NavigationSeq(1));
        settle(&mut r);
        assert!(!r.is_active());

        assert!(r.set_pattern("/new"));
        settle(&mut r);
        assert!(r.is_active());
    }

    #[test]
    fn path_before_any_pattern_never_matches() {
        let mut r = route(None, None);
        r.set_path("/anything".into(), NavigationSeq(1));
        assert!(settle(&mut r).is_empty());
        assert!(!r.is_active());
    }

    // ── arbitration requests ────────────────────────────────────────────

    #[test]
    fn switch_scope_defers_activation_to_arbitration() {
        let mut r = route(Some("/a"), None);
        r.bind_scope(Role::Switch, Some(NodeId(9)));
        r.set_path("/a".into(), NavigationSeq(4));
        let actions = settle(&mut r);

        assert!(!r.is_active());
        assert_eq!(
            actions,
            vec![Action::RequestActivation {
                route: NodeId(1),
                switch: NodeId(9),
                path: "/a".into(),
                seq: NavigationSeq(4),
            }]
        );
    }

    #[test]
    fn non_matching_route_under_switch_still_reports() {
        let mut r = route(Some("/a"), None);
        r.bind_scope(Role::Switch, Some(NodeId(9)));
        r.set_path("/zzz".into(), NavigationSeq(1));
        let actions = settle(&mut r);
        assert_eq!(
            actions,
            vec![Action::RequestActivation {
                route: NodeId(1),
                switch: NodeId(9),
                path: "/zzz".into(),
                seq: NavigationSeq(1),
            }]
        );
    }

    #[test]
    fn permission_grants_activation_denial_deactivates() {
        let mut r = route(Some("/a"), None);
        r.bind_scope(Role::Switch, Some(NodeId(9)));
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);

        let granted = r.on_permission(true);
        assert!(r.is_active());
        assert!(granted.contains(&Action::AttachSubtree { route: NodeId(1) }));

        let denied = r.on_permission(false);
        assert!(!r.is_active());
        assert_eq!(denied, vec![Action::DetachSubtree { route: NodeId(1) }]);
    }

    // ── scoped path delivery ────────────────────────────────────────────

    #[test]
    fn published_path_from_foreign_router_is_ignored() {
        let mut r = route(Some("/a"), None);
        r.bind_scope(Role::Router, Some(NodeId(5)));
        assert!(!r.on_path_published(NodeId(6), "/a", NavigationSeq(1)));
        assert!(r.on_path_published(NodeId(5), "/a", NavigationSeq(1)));
    }

    // ── module loading ──────────────────────────────────────────────────

    #[test]
    fn activation_with_module_defers_publication() {
        let mut r = route(Some("/users/:id"), Some("users-page"));
        r.set_path("/users/42".into(), NavigationSeq(1));
        let actions = settle(&mut r);

        assert!(r.is_active());
        assert_eq!(
            actions,
            vec![
                Action::AttachSubtree { route: NodeId(1) },
                Action::BeginLoad {
                    route: NodeId(1),
                    module: "users-page".into()
                },
            ]
        );

        r.begin_load(LoadTicket(7));
        let settled = r.on_load_settled(LoadTicket(7), &Ok(()));
        assert_eq!(settled.len(), 1);
        let Action::BroadcastParams { params, .. } = &settled[0] else {
            panic!("expected params broadcast, got {settled:?}");
        };
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(r.load_state(), LoadState::Loaded);
    }

    #[test]
    fn load_failure_keeps_route_active_without_publication() {
        let mut r = route(Some("/a"), Some("broken"));
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);
        r.begin_load(LoadTicket(7));

        let settled = r.on_load_settled(
            LoadTicket(7),
            &Err(LoadError::Failed {
                reason: "boom".into(),
            }),
        );
        assert!(settled.is_empty());
        assert!(r.is_active());
        assert_eq!(r.load_state(), LoadState::Failed);
    }

    #[test]
    fn failed_load_never_retries_on_reactivation() {
        let mut r = route(Some("/a"), Some("broken"));
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);
        r.begin_load(LoadTicket(7));
        r.on_load_settled(LoadTicket(7), &Err(LoadError::NotFound));

        r.set_path("/b".into(), NavigationSeq(2));
        settle(&mut r);
        r.set_path("/a".into(), NavigationSeq(3));
        let actions = settle(&mut r);
        assert!(!actions.iter().any(|a| matches!(a, Action::BeginLoad { .. })));
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::BroadcastParams { .. })));
    }

    #[test]
    fn settle_after_deactivation_is_suppressed() {
        let mut r = route(Some("/a"), Some("page"));
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);
        r.begin_load(LoadTicket(7));

        r.set_path("/b".into(), NavigationSeq(2));
        settle(&mut r);
        assert!(!r.is_active());

        let settled = r.on_load_settled(LoadTicket(7), &Ok(()));
        assert!(settled.is_empty());
        assert_eq!(r.load_state(), LoadState::Loaded);
    }

    #[test]
    fn in_flight_guard_blocks_second_begin() {
        let mut r = route(Some("/users/:id"), Some("page"));
        r.set_path("/users/1".into(), NavigationSeq(1));
        settle(&mut r);
        r.begin_load(LoadTicket(7));

        // Param change while the load is pending: no second BeginLoad,
        // and publication still waits for the settle.
        r.set_path("/users/2".into(), NavigationSeq(2));
        let actions = settle(&mut r);
        assert!(actions.is_empty());

        let settled = r.on_load_settled(LoadTicket(7), &Ok(()));
        let Action::BroadcastParams { params, .. } = &settled[0] else {
            panic!("expected params broadcast, got {settled:?}");
        };
        assert_eq!(params.get("id").map(String::as_str), Some("2"));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut r = route(Some("/a"), Some("page"));
        r.set_path("/a".into(), NavigationSeq(1));
        settle(&mut r);
        r.begin_load(LoadTicket(7));
        assert!(r.on_load_settled(LoadTicket(99), &Ok(())).is_empty());
        assert_eq!(r.load_state(), LoadState::InFlight(LoadTicket(7)));
    }

    // ── children custody ────────────────────────────────────────────────

    #[test]
    fn children_round_trip_through_custody() {
        let mut r = route(Some("/a"), None);
        r.hold_children(vec![PresentationHandle(3), PresentationHandle(4)]);
        assert_eq!(
            r.take_pending_children(),
            vec![PresentationHandle(3), PresentationHandle(4)]
        );
        assert!(r.take_pending_children().is_empty());
    }
}

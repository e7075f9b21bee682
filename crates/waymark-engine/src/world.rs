//! The router world: node ownership, event dispatch, and settling.
//!
//! All cross-node interaction funnels through here. Nodes return
//! [`Action`] values from their hooks; the world executes them, mediating
//! tree access, history, loads, and broadcast delivery. One `dispatch`
//! call runs the event handler and then settles: armed update tasks are
//! drained, and navigation intents raised along the way (switch
//! redirects) are performed before the call returns, so the world is
//! quiescent between events.

use std::collections::VecDeque;

use indexmap::IndexMap;
use waymark_bus::{BroadcastGuard, Role, RoleRegistry, SubscriberList, Topic};
use waymark_core::{
    ConfigError, DispatchError, HistoryBridge, HostEvent, IdAllocator, LoadOutcome, LoadTicket,
    ModuleLoader, MountError, NavigationSeq, NodeId, Notification, Params, ScheduleError,
    TreeHandle, TreeHost,
};
use waymark_match::match_path;
use waymark_node::{
    ActivatableNode, Action, ActivationRequest, MatchableNode, Node, ParamsListenerNode, RouteNode,
    RouterNode, ScopedRequester, SwitchNode,
};
use waymark_sched::TaskQueue;

use crate::config::WorldConfig;
use crate::metrics::DispatchMetrics;

/// Declarative inputs for mounting a route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteSpec {
    /// The pattern source string, if declared at mount.
    pub pattern: Option<String>,
    /// The lazily-loaded module reference, if declared at mount.
    pub module: Option<String>,
}

/// A complete router instance over one host tree.
pub struct RouterWorld {
    config: WorldConfig,
    ids: IdAllocator,
    nodes: IndexMap<NodeId, Node>,
    routes_by_handle: IndexMap<TreeHandle, NodeId>,
    registry: RoleRegistry,
    path_subscribers: SubscriberList,
    params_subscribers: SubscriberList,
    guard: BroadcastGuard,
    tasks: TaskQueue,
    nav_seq: NavigationSeq,
    loads: IndexMap<LoadTicket, NodeId>,
    pending_navigations: VecDeque<(TreeHandle, String)>,
    notifications: Vec<Notification>,
    metrics: DispatchMetrics,
    host: Box<dyn TreeHost>,
    history: Box<dyn HistoryBridge>,
    loader: Box<dyn ModuleLoader>,
}

impl RouterWorld {
    /// Create a world over the given host seams.
    pub fn new(
        config: WorldConfig,
        host: Box<dyn TreeHost>,
        history: Box<dyn HistoryBridge>,
        loader: Box<dyn ModuleLoader>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ids: IdAllocator::new(),
            nodes: IndexMap::new(),
            routes_by_handle: IndexMap::new(),
            registry: RoleRegistry::new(),
            path_subscribers: SubscriberList::new(),
            params_subscribers: SubscriberList::new(),
            guard: BroadcastGuard::new(),
            tasks: TaskQueue::new(),
            nav_seq: NavigationSeq(0),
            loads: IndexMap::new(),
            pending_navigations: VecDeque::new(),
            notifications: Vec::new(),
            metrics: DispatchMetrics::default(),
            host,
            history,
            loader,
        })
    }

    // ── mounting ────────────────────────────────────────────────────────

    /// Mount a router at `handle`.
    ///
    /// With an `initial_path`, the current history entry is stamped via
    /// replace immediately; the path itself is published later, once the
    /// host has finished building the subtree and calls
    /// [`publish_initial_path`](Self::publish_initial_path).
    pub fn mount_router(&mut self, handle: TreeHandle, initial_path: Option<&str>) -> NodeId {
        let id = self.ids.node_id();
        if let Some(path) = initial_path {
            self.history.replace(id, path);
        }
        let router = RouterNode::new(id, handle, initial_path.map(str::to_owned));
        self.registry.register(Role::Router, id, handle);
        self.nodes.insert(id, Node::Router(router));
        id
    }

    /// Mount a route at `handle`. The route starts inactive: its
    /// presentational children are detached into its custody here.
    ///
    /// The enclosing router and switch (if any) are resolved once, now,
    /// and cached for the route's lifetime. Hosts must mount ancestors
    /// before descendants: a route mounted before its router or switch
    /// binds no scope and never hears that scope's broadcasts.
    pub fn mount_route(&mut self, handle: TreeHandle, spec: RouteSpec) -> NodeId {
        let id = self.ids.node_id();
        let mut route = RouteNode::new(id, handle, spec.pattern.as_deref(), spec.module);
        self.resolve_scopes(&mut route);
        route.hold_children(self.host.detach_children(handle));
        self.registry.register(Role::Route, id, handle);
        self.routes_by_handle.insert(handle, id);
        self.path_subscribers.subscribe(id);
        self.nodes.insert(id, Node::Route(route));
        id
    }

    /// Mount a switch at `handle`.
    pub fn mount_switch(&mut self, handle: TreeHandle, redirect_to: Option<&str>) -> NodeId {
        let id = self.ids.node_id();
        let mut switch = SwitchNode::new(id, handle);
        if let Some(to) = redirect_to {
            switch.set_redirect(to.to_owned());
        }
        self.registry.register(Role::Switch, id, handle);
        self.nodes.insert(id, Node::Switch(switch));
        id
    }

    /// Mount a params listener at `handle`.
    ///
    /// A listener that joins after its route already published pulls the
    /// current parameters immediately, so late joiners are not silent
    /// until the next navigation. As with routes, the enclosing route is
    /// resolved once at mount: mount the route before the listener, or
    /// the listener stays unscoped.
    pub fn mount_params_listener(&mut self, handle: TreeHandle) -> Result<NodeId, DispatchError> {
        let id = self.ids.node_id();
        let mut listener = ParamsListenerNode::new(id, handle);
        self.resolve_scopes(&mut listener);

        let seed: Option<(NodeId, Params)> = listener
            .route_scope()
            .and_then(|route| self.nodes.get(&route).and_then(Node::as_route))
            .and_then(|route| route.last_published().cloned().map(|p| (route.id(), p)));

        self.params_subscribers.subscribe(id);
        self.nodes.insert(id, Node::Listener(listener));

        if let Some((route, params)) = seed {
            self.guard.enter(Topic::ParamsRequest)?;
            if let Some(listener) = self.nodes.get_mut(&id).and_then(Node::as_listener_mut) {
                if listener.on_params_published(route, &params) {
                    self.tasks.arm(id);
                }
            }
            self.guard.exit(Topic::ParamsRequest);
            self.settle()?;
        }
        Ok(id)
    }

    /// Unmount a node of any kind.
    pub fn unmount(&mut self, node: NodeId) -> Result<(), MountError> {
        let removed = self
            .nodes
            .shift_remove(&node)
            .ok_or(MountError::UnknownNode { node })?;
        if let Node::Route(route) = &removed {
            self.routes_by_handle.shift_remove(&route.handle());
        }
        self.registry.unregister(node);
        self.path_subscribers.unsubscribe(node);
        self.params_subscribers.unsubscribe(node);
        self.tasks.disarm(node);
        Ok(())
    }

    // ── dispatch ────────────────────────────────────────────────────────

    /// Dispatch one host event and settle.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<(), DispatchError> {
        self.metrics.events += 1;
        match event {
            HostEvent::Navigate { origin, to } => {
                self.pending_navigations.push_back((origin, to));
            }
            HostEvent::HistoryPopped { stamp, path } => self.handle_pop(stamp, path)?,
            HostEvent::LoadSettled { ticket, outcome } => {
                self.handle_load_settled(ticket, outcome)?
            }
            HostEvent::SetRoutePath { node, path } => {
                let seq = self.bump_seq();
                if self.route_mut(node)?.set_path(path, seq) {
                    self.tasks.arm(node);
                }
            }
            HostEvent::SetRoutePattern { node, pattern } => {
                if self.route_mut(node)?.set_pattern(&pattern) {
                    self.tasks.arm(node);
                }
            }
            HostEvent::SetRouteModule { node, module } => {
                self.route_mut(node)?.set_module(module);
            }
            HostEvent::SetSwitchRedirect { node, to } => {
                self.switch_mut(node)?.set_redirect(to);
            }
        }
        self.settle()
    }

    /// Publish a router's stored initial path to its scope.
    ///
    /// Call after the subtree under the router is fully mounted. A second
    /// call, or a call for a router mounted without an initial path, is a
    /// no-op.
    pub fn publish_initial_path(&mut self, router: NodeId) -> Result<(), DispatchError> {
        let path = {
            let node = self
                .nodes
                .get_mut(&router)
                .and_then(Node::as_router_mut)
                .ok_or(MountError::UnknownNode { node: router })?;
            match node.take_initial_path() {
                Some(path) => {
                    node.set_current_path(&path);
                    path
                }
                None => return Ok(()),
            }
        };
        let seq = self.bump_seq();
        self.publish_path(router, &path, seq)?;
        self.settle()
    }

    /// Drain notifications produced since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ── introspection ───────────────────────────────────────────────────

    /// Whether a route is active. `None` for unknown or non-route nodes.
    pub fn is_active(&self, node: NodeId) -> Option<bool> {
        self.nodes
            .get(&node)
            .and_then(Node::as_route)
            .map(RouteNode::is_active)
    }

    /// The path currently published to a router's scope.
    pub fn current_path(&self, router: NodeId) -> Option<&str> {
        self.nodes
            .get(&router)
            .and_then(Node::as_router)
            .and_then(RouterNode::current_path)
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// The latest navigation sequence number.
    pub fn navigation_seq(&self) -> NavigationSeq {
        self.nav_seq
    }

    // ── event handlers ──────────────────────────────────────────────────

    fn handle_pop(&mut self, stamp: NodeId, path: String) -> Result<(), DispatchError> {
        let owner = self.nodes.values().find_map(|node| {
            node.as_router()
                .filter(|router| router.owns_stamp(stamp))
                .map(RouterNode::id)
        });
        let Some(router_id) = owner else {
            log::debug!("pop with foreign stamp {stamp} ignored");
            return Ok(());
        };
        let seq = self.bump_seq();
        if let Some(router) = self.nodes.get_mut(&router_id).and_then(Node::as_router_mut) {
            router.set_current_path(&path);
        }
        self.publish_path(router_id, &path, seq)
    }

    fn handle_load_settled(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
    ) -> Result<(), DispatchError> {
        let Some(route) = self.loads.shift_remove(&ticket) else {
            log::debug!("settle for unknown load ticket {ticket} ignored");
            return Ok(());
        };
        let actions = match self.nodes.get_mut(&route).and_then(Node::as_route_mut) {
            Some(route) => route.on_load_settled(ticket, &outcome),
            None => {
                log::debug!("settle for unmounted route {route} ignored");
                Vec::new()
            }
        };
        self.execute_all(actions)
    }

    // ── settling ────────────────────────────────────────────────────────

    fn settle(&mut self) -> Result<(), DispatchError> {
        loop {
            while let Some(id) = self.tasks.pop() {
                self.run_node_updates(id)?;
            }
            match self.pending_navigations.pop_front() {
                Some((origin, to)) => self.perform_navigation(origin, &to)?,
                None => return Ok(()),
            }
        }
    }

    fn run_node_updates(&mut self, id: NodeId) -> Result<(), DispatchError> {
        let mut passes = 0;
        loop {
            let actions = match self.nodes.get_mut(&id) {
                Some(Node::Route(route)) if route.is_dirty() => {
                    if passes == self.config.max_update_passes {
                        return Err(ScheduleError::ConvergenceExceeded { node: id, passes }.into());
                    }
                    route.run_update()
                }
                Some(Node::Listener(listener)) if listener.is_dirty() => {
                    if passes == self.config.max_update_passes {
                        return Err(ScheduleError::ConvergenceExceeded { node: id, passes }.into());
                    }
                    listener.run_update()
                }
                // Clean, unmounted, or a kind without update hooks.
                _ => return Ok(()),
            };
            passes += 1;
            self.metrics.update_passes += 1;
            self.execute_all(actions)?;
        }
    }

    fn perform_navigation(&mut self, origin: TreeHandle, to: &str) -> Result<(), DispatchError> {
        let Some(router_id) = self.registry.resolve_nearest(Role::Router, origin, &*self.host)
        else {
            log::debug!("navigation to '{to}' from {origin} dropped: no enclosing router");
            return Ok(());
        };
        let already_current = self
            .nodes
            .get(&router_id)
            .and_then(Node::as_router)
            .is_some_and(|router| router.current_path() == Some(to));
        if already_current {
            log::trace!("navigation to current path '{to}' ignored");
            return Ok(());
        }
        self.metrics.navigations += 1;
        let seq = self.bump_seq();
        self.history.push(router_id, to);
        if let Some(router) = self.nodes.get_mut(&router_id).and_then(Node::as_router_mut) {
            router.set_current_path(to);
        }
        self.publish_path(router_id, to, seq)
    }

    fn publish_path(
        &mut self,
        router: NodeId,
        path: &str,
        seq: NavigationSeq,
    ) -> Result<(), DispatchError> {
        self.metrics.path_broadcasts += 1;
        self.guard.enter(Topic::PathChanged)?;
        for id in self.path_subscribers.snapshot() {
            if let Some(route) = self.nodes.get_mut(&id).and_then(Node::as_route_mut) {
                if route.on_path_published(router, path, seq) {
                    self.tasks.arm(id);
                }
            }
        }
        self.guard.exit(Topic::PathChanged);
        Ok(())
    }

    // ── action execution ────────────────────────────────────────────────

    fn execute_all(&mut self, actions: Vec<Action>) -> Result<(), DispatchError> {
        for action in actions {
            self.execute(action)?;
        }
        Ok(())
    }

    fn execute(&mut self, action: Action) -> Result<(), DispatchError> {
        match action {
            Action::RequestActivation {
                route,
                switch,
                path,
                seq,
            } => self.arbitrate(route, switch, path, seq),
            Action::AttachSubtree { route } => {
                if let Some(route) = self.nodes.get_mut(&route).and_then(Node::as_route_mut) {
                    let handle = route.handle();
                    let children = route.take_pending_children();
                    self.host.attach_children(handle, children);
                }
                Ok(())
            }
            Action::DetachSubtree { route } => {
                if let Some(route) = self.nodes.get_mut(&route).and_then(Node::as_route_mut) {
                    let handle = route.handle();
                    let children = self.host.detach_children(handle);
                    route.hold_children(children);
                }
                Ok(())
            }
            Action::BeginLoad { route, module } => {
                let ticket = self.ids.load_ticket();
                if let Some(route) = self.nodes.get_mut(&route).and_then(Node::as_route_mut) {
                    route.begin_load(ticket);
                }
                self.loads.insert(ticket, route);
                self.metrics.loads_begun += 1;
                self.loader.begin(ticket, &module);
                Ok(())
            }
            Action::BroadcastParams { route, params } => {
                self.metrics.params_broadcasts += 1;
                self.guard.enter(Topic::ParamsChanged)?;
                for id in self.params_subscribers.snapshot() {
                    if let Some(listener) =
                        self.nodes.get_mut(&id).and_then(Node::as_listener_mut)
                    {
                        if listener.on_params_published(route, &params) {
                            self.tasks.arm(id);
                        }
                    }
                }
                self.guard.exit(Topic::ParamsChanged);
                Ok(())
            }
            Action::Navigate { origin, to } => {
                // Raised by a switch redirect; performed after the current
                // broadcast settles.
                self.metrics.redirects += 1;
                self.pending_navigations.push_back((origin, to));
                Ok(())
            }
            Action::NotifyParams {
                listener,
                route,
                params,
            } => {
                self.metrics.notifications += 1;
                self.notifications.push(Notification::ParamsChanged {
                    listener,
                    route,
                    params,
                });
                Ok(())
            }
        }
    }

    /// Feed one activation request through the owning switch.
    ///
    /// The declared-child view is computed here so the switch itself stays
    /// pure: the first declared child route (in tree order) whose pattern
    /// matches the path, and the number of declared child routes.
    fn arbitrate(
        &mut self,
        route: NodeId,
        switch: NodeId,
        path: String,
        seq: NavigationSeq,
    ) -> Result<(), DispatchError> {
        let Some(switch_handle) = self.switch_handle(switch) else {
            log::debug!("activation request for unmounted switch {switch} dropped");
            return Ok(());
        };

        let mut first_match = None;
        let mut child_count = 0;
        for handle in self.host.children_in_order(switch_handle) {
            let Some(&child_id) = self.routes_by_handle.get(&handle) else {
                continue;
            };
            let Some(child) = self.nodes.get(&child_id).and_then(Node::as_route) else {
                continue;
            };
            child_count += 1;
            if first_match.is_none() && match_path(&path, child.pattern()).is_match() {
                first_match = Some(child_id);
            }
        }

        let request = ActivationRequest { route, path, seq };
        let reply = match self.nodes.get_mut(&switch).and_then(Node::as_switch_mut) {
            Some(switch) => switch.arbitrate(&request, first_match, child_count),
            None => return Ok(()),
        };

        let follow_up = self
            .nodes
            .get_mut(&route)
            .and_then(Node::as_route_mut)
            .map(|route| route.on_permission(reply.permitted))
            .unwrap_or_default();
        self.execute_all(follow_up)?;

        if let Some(redirect) = reply.redirect {
            self.execute(redirect)?;
        }
        Ok(())
    }

    // ── helpers ─────────────────────────────────────────────────────────

    fn resolve_scopes(&self, requester: &mut dyn ScopedRequester) {
        for &role in requester.scope_roles() {
            let holder = self
                .registry
                .resolve_nearest(role, requester.origin(), &*self.host);
            requester.bind_scope(role, holder);
        }
    }

    fn bump_seq(&mut self) -> NavigationSeq {
        self.nav_seq = NavigationSeq(self.nav_seq.0 + 1);
        self.nav_seq
    }

    fn switch_handle(&self, switch: NodeId) -> Option<TreeHandle> {
        match self.nodes.get(&switch) {
            Some(Node::Switch(node)) => Some(node.handle()),
            _ => None,
        }
    }

    fn route_mut(&mut self, node: NodeId) -> Result<&mut RouteNode, DispatchError> {
        self.nodes
            .get_mut(&node)
            .and_then(Node::as_route_mut)
            .ok_or(DispatchError::Mount(MountError::UnknownNode { node }))
    }

    fn switch_mut(&mut self, node: NodeId) -> Result<&mut SwitchNode, DispatchError> {
        self.nodes
            .get_mut(&node)
            .and_then(Node::as_switch_mut)
            .ok_or(DispatchError::Mount(MountError::UnknownNode { node }))
    }
}

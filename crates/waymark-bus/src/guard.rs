//! Reentrancy detection for broadcast delivery.

use waymark_core::BusError;

/// A broadcast topic, named for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    /// A router published a new path.
    PathChanged,
    /// A route published captured parameters.
    ParamsChanged,
    /// A listener asked its route to re-publish current parameters.
    ParamsRequest,
}

impl Topic {
    /// Stable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::PathChanged => "path-changed",
            Self::ParamsChanged => "params-changed",
            Self::ParamsRequest => "params-request",
        }
    }
}

/// Tracks the topics currently being delivered.
///
/// Handlers run to completion before the next broadcast, so nesting only
/// happens when a handler synchronously causes another broadcast. Nesting
/// *different* topics is fine; re-entering the topic being handled breaks
/// the first-claim-wins invariant and is rejected as a host-integration
/// programming error.
#[derive(Debug, Default)]
pub struct BroadcastGuard {
    active: Vec<Topic>,
}

impl BroadcastGuard {
    /// Create a guard with no active deliveries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `topic` as being delivered.
    ///
    /// # Errors
    ///
    /// [`BusError::ReentrantBroadcast`] if `topic` is already active.
    /// Asserts in debug builds.
    pub fn enter(&mut self, topic: Topic) -> Result<(), BusError> {
        if self.active.contains(&topic) {
            debug_assert!(false, "reentrant broadcast of topic '{}'", topic.name());
            return Err(BusError::ReentrantBroadcast { topic: topic.name() });
        }
        self.active.push(topic);
        Ok(())
    }

    /// Mark the innermost delivery of `topic` as finished.
    pub fn exit(&mut self, topic: Topic) {
        if let Some(pos) = self.active.iter().rposition(|&t| t == topic) {
            self.active.remove(pos);
        }
    }

    /// Whether any delivery is in progress.
    pub fn is_delivering(&self) -> bool {
        !self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_distinct_topics_are_allowed() {
        let mut guard = BroadcastGuard::new();
        guard.enter(Topic::PathChanged).unwrap();
        guard.enter(Topic::ParamsChanged).unwrap();
        guard.exit(Topic::ParamsChanged);
        guard.exit(Topic::PathChanged);
        assert!(!guard.is_delivering());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "reentrant broadcast"))]
    fn reentering_the_active_topic_is_rejected() {
        let mut guard = BroadcastGuard::new();
        guard.enter(Topic::PathChanged).unwrap();
        let result = guard.enter(Topic::PathChanged);
        // Release builds reach here; debug builds panic on the assert above.
        assert_eq!(
            result,
            Err(waymark_core::BusError::ReentrantBroadcast {
                topic: "path-changed"
            })
        );
    }

    #[test]
    fn exit_then_reenter_is_allowed() {
        let mut guard = BroadcastGuard::new();
        guard.enter(Topic::ParamsChanged).unwrap();
        guard.exit(Topic::ParamsChanged);
        assert!(guard.enter(Topic::ParamsChanged).is_ok());
    }
}

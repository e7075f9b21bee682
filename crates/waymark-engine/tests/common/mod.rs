//! Shared harness for the world integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use waymark_engine::{RouteSpec, RouterWorld, WorldConfig};
use waymark_test_utils::{FakeTree, RecordingHistory, StubLoader};

pub struct Harness {
    pub world: RouterWorld,
    pub tree: FakeTree,
    pub history: RecordingHistory,
    pub loader: StubLoader,
}

/// A world over fresh recording fixtures.
pub fn harness() -> Harness {
    let tree = FakeTree::new();
    let history = RecordingHistory::new();
    let loader = StubLoader::new();
    let world = RouterWorld::new(
        WorldConfig::default(),
        Box::new(tree.clone()),
        Box::new(history.clone()),
        Box::new(loader.clone()),
    )
    .expect("default config is valid");
    Harness {
        world,
        tree,
        history,
        loader,
    }
}

/// A route spec with just a pattern.
pub fn spec(pattern: &str) -> RouteSpec {
    RouteSpec {
        pattern: Some(pattern.to_owned()),
        module: None,
    }
}

/// A route spec with a pattern and a module reference.
pub fn spec_with_module(pattern: &str, module: &str) -> RouteSpec {
    RouteSpec {
        pattern: Some(pattern.to_owned()),
        module: Some(module.to_owned()),
    }
}

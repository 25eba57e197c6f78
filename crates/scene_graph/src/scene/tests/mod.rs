//! Whole-graph behavior tests

mod observers;

use super::{NodeId, SceneGraph};
use crate::foundation::math::Vec3;

/// Root with one child at `(1, 0, 0)` and a grandchild at `(0, 0, 1)`
fn chain() -> (SceneGraph, NodeId, NodeId, NodeId) {
    let mut graph = SceneGraph::new();
    let root = graph.create_node("root");
    let child = graph.create_node("child");
    let grandchild = graph.create_node("grandchild");
    graph.add(root, child).unwrap();
    graph.add(child, grandchild).unwrap();
    graph.set_position(child, Vec3::new(1.0, 0.0, 0.0)).unwrap();
    graph.set_position(grandchild, Vec3::new(0.0, 0.0, 1.0)).unwrap();
    (graph, root, child, grandchild)
}

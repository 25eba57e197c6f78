use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::scene::{NodeEvent, NodeId, NodeObserver, SceneGraph};

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<(NodeId, NodeEvent)>>,
}

impl Recorder {
    fn take(&self) -> Vec<(NodeId, NodeEvent)> {
        self.events.take()
    }
}

impl NodeObserver for Recorder {
    fn on_event(&self, _graph: &SceneGraph, node: NodeId, event: NodeEvent) {
        self.events.borrow_mut().push((node, event));
    }
}

/// Only implements the position hook and reads the graph from it
#[derive(Default)]
struct PositionReader {
    seen: RefCell<Vec<Vec3>>,
}

impl NodeObserver for PositionReader {
    fn updated_position(&self, graph: &SceneGraph, node: NodeId) {
        if let Some(position) = graph.world_position(node) {
            self.seen.borrow_mut().push(position);
        }
    }
}

struct Tagged {
    tag: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl NodeObserver for Tagged {
    fn updated_label(&self, _graph: &SceneGraph, _node: NodeId) {
        self.log.borrow_mut().push(self.tag);
    }
}

#[test]
fn test_setters_notify_matching_event() {
    let mut graph = SceneGraph::new();
    let id = graph.create_node("node");
    let recorder = Rc::new(Recorder::default());
    graph.add_observer(id, &recorder).unwrap();

    graph.set_position(id, Vec3::new(1.0, 0.0, 0.0)).unwrap();
    graph.set_scale(id, Vec3::new(2.0, 2.0, 2.0)).unwrap();
    graph.set_orientation(id, Quat::identity()).unwrap();
    graph.set_label(id, "renamed").unwrap();
    graph.set_visible(id, false).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            (id, NodeEvent::Position),
            (id, NodeEvent::Scale),
            (id, NodeEvent::Orientation),
            (id, NodeEvent::Label),
            (id, NodeEvent::Visibility),
        ]
    );

    graph.set_local_matrix(id, &Mat4::identity()).unwrap();
    assert_eq!(
        recorder.take(),
        vec![
            (id, NodeEvent::Position),
            (id, NodeEvent::Scale),
            (id, NodeEvent::Orientation),
        ]
    );
}

#[test]
fn test_set_from_notifies_position_orientation_scale() {
    let mut graph = SceneGraph::new();
    let source = graph.create_node("source");
    let target = graph.create_node("target");
    graph.set_position(source, Vec3::new(3.0, 0.0, 0.0)).unwrap();
    graph.set_scale(source, Vec3::new(2.0, 2.0, 2.0)).unwrap();

    let recorder = Rc::new(Recorder::default());
    graph.add_observer(target, &recorder).unwrap();
    graph.set_from(target, source).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            (target, NodeEvent::Position),
            (target, NodeEvent::Orientation),
            (target, NodeEvent::Scale),
        ]
    );
    assert_relative_eq!(graph.world_position(target).unwrap(), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_hierarchy_changes_notify_both_ends() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    let recorder = Rc::new(Recorder::default());
    graph.add_observer(parent, &recorder).unwrap();
    graph.add_observer(child, &recorder).unwrap();

    graph.add(parent, child).unwrap();
    assert_eq!(recorder.take(), vec![(child, NodeEvent::Parent), (parent, NodeEvent::Children)]);

    // Duplicate add is silent
    graph.add(parent, child).unwrap();
    assert!(recorder.take().is_empty());

    graph.remove(parent, child).unwrap();
    assert_eq!(recorder.take(), vec![(child, NodeEvent::Parent), (parent, NodeEvent::Children)]);
}

#[test]
fn test_observer_sees_updated_state() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.add(parent, child).unwrap();
    graph.set_position(child, Vec3::new(0.0, 1.0, 0.0)).unwrap();
    assert_relative_eq!(graph.world_position(child).unwrap(), Vec3::new(0.0, 1.0, 0.0));

    let reader = Rc::new(PositionReader::default());
    graph.add_observer(child, &reader).unwrap();
    graph.set_position(child, Vec3::new(0.0, 2.0, 0.0)).unwrap();
    // Other events fall through to the no-op defaults
    graph.set_label(child, "moved").unwrap();

    assert_eq!(*reader.seen.borrow(), vec![Vec3::new(0.0, 2.0, 0.0)]);
}

#[test]
fn test_most_recent_observer_runs_first() {
    let mut graph = SceneGraph::new();
    let id = graph.create_node("node");
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::new(Tagged { tag: "first", log: Rc::clone(&log) });
    let second = Rc::new(Tagged { tag: "second", log: Rc::clone(&log) });
    graph.add_observer(id, &first).unwrap();
    graph.add_observer(id, &second).unwrap();

    graph.set_label(id, "a").unwrap();
    assert_eq!(*log.borrow(), vec!["second", "first"]);
}

#[test]
fn test_observers_are_held_weakly() {
    let mut graph = SceneGraph::new();
    let id = graph.create_node("node");
    let recorder = Rc::new(Recorder::default());
    graph.add_observer(id, &recorder).unwrap();
    assert_eq!(Rc::strong_count(&recorder), 1);
    assert_eq!(graph.get(id).unwrap().observer_count(), 1);

    drop(recorder);
    assert_eq!(graph.get(id).unwrap().observer_count(), 0);
    graph.set_position(id, Vec3::new(1.0, 1.0, 1.0)).unwrap();
}

#[test]
fn test_removed_observer_is_silent() {
    let mut graph = SceneGraph::new();
    let id = graph.create_node("node");
    let recorder = Rc::new(Recorder::default());
    graph.add_observer(id, &recorder).unwrap();
    graph.remove_observer(id, &recorder).unwrap();

    graph.set_visible(id, false).unwrap();
    assert!(recorder.take().is_empty());
}

//! Change notification for nodes
//!
//! Observers are held weakly: registering one never extends its lifetime, and
//! dropped observers are skipped (and pruned on the next registration).

use std::fmt;
use std::rc::{Rc, Weak};

use super::{NodeId, SceneGraph};

/// Property change delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEvent {
    /// `position` was assigned
    Position,
    /// `scale` was assigned
    Scale,
    /// `orientation` was assigned
    Orientation,
    /// `label` was assigned
    Label,
    /// The local visibility flag was assigned
    Visibility,
    /// The node was attached to or detached from a parent
    Parent,
    /// The node's child list changed
    Children,
}

/// Listener for node property changes
///
/// Every method has a no-op default so implementors only override what they
/// care about. [`NodeObserver::on_event`] is the single entry point the graph
/// calls; its default forwards to the specific method. Observers get a shared
/// borrow of the graph and therefore cannot mutate it from a callback.
pub trait NodeObserver {
    /// Catch-all dispatch
    fn on_event(&self, graph: &SceneGraph, node: NodeId, event: NodeEvent) {
        match event {
            NodeEvent::Position => self.updated_position(graph, node),
            NodeEvent::Scale => self.updated_scale(graph, node),
            NodeEvent::Orientation => self.updated_orientation(graph, node),
            NodeEvent::Label => self.updated_label(graph, node),
            NodeEvent::Visibility => self.updated_visibility(graph, node),
            NodeEvent::Parent => self.updated_parent(graph, node),
            NodeEvent::Children => self.updated_children(graph, node),
        }
    }

    /// `position` changed
    fn updated_position(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// `scale` changed
    fn updated_scale(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// `orientation` changed
    fn updated_orientation(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// `label` changed
    fn updated_label(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// Local visibility changed
    fn updated_visibility(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// Parent link changed
    fn updated_parent(&self, _graph: &SceneGraph, _node: NodeId) {}

    /// Child list changed
    fn updated_children(&self, _graph: &SceneGraph, _node: NodeId) {}
}

/// Weak multicast set of listeners
pub struct ObserverRegistry<T: ?Sized> {
    observers: Vec<Weak<T>>,
}

impl<T: ?Sized> ObserverRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register a listener; registering the same listener twice is a no-op
    pub fn add(&mut self, observer: Weak<T>) {
        self.observers.retain(|existing| existing.strong_count() > 0);
        if !self.observers.iter().any(|existing| Weak::ptr_eq(existing, &observer)) {
            self.observers.push(observer);
        }
    }

    /// Unregister a listener by identity
    pub fn remove(&mut self, observer: &Weak<T>) {
        if let Some(index) = self
            .observers
            .iter()
            .rposition(|existing| Weak::ptr_eq(existing, observer))
        {
            self.observers.remove(index);
        }
    }

    /// Call `invocation` for every live listener, most recently added first
    pub fn invoke(&self, mut invocation: impl FnMut(&T)) {
        let live: Vec<Rc<T>> = self.observers.iter().rev().filter_map(Weak::upgrade).collect();
        for observer in &live {
            invocation(&**observer);
        }
    }

    /// Number of listeners still alive
    pub fn len(&self) -> usize {
        self.observers.iter().filter(|observer| observer.strong_count() > 0).count()
    }

    /// Whether no live listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("registered", &self.observers.len())
            .field("live", &self.len())
            .finish()
    }
}

//! Node arena and cache invalidation

use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use super::observer::{NodeEvent, NodeObserver};
use super::{DirtyFlags, Node, SceneError};
use crate::config::SceneConfig;

new_key_type! {
    /// Handle to a node stored in a [`SceneGraph`]
    pub struct NodeId;
}

/// Owner of every node in a scene
///
/// Parents and children refer to each other by [`NodeId`]. Mutation goes
/// through the graph so that each change invalidates exactly the caches that
/// depend on it and reaches the node's observers.
pub struct SceneGraph {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    config: SceneConfig,
}

impl SceneGraph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty graph sized and labelled from `config`
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(config.node_capacity),
            config,
        }
    }

    /// Configuration the graph was created with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ========== Node Storage ==========

    /// Take ownership of a standalone node
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        log::trace!("Inserted node {:?} ({})", id, self.nodes[id].label);
        id
    }

    /// Create a group node with the given label
    pub fn create_node(&mut self, label: impl Into<String>) -> NodeId {
        self.insert(Node::new(label))
    }

    /// Create a group node with the configured default label
    pub fn spawn(&mut self) -> NodeId {
        let label = self.config.default_label.clone();
        self.create_node(label)
    }

    /// Drop a node and its whole subtree from the graph
    ///
    /// The node is first detached from its parent. Returns the number of
    /// nodes removed.
    pub fn destroy(&mut self, id: NodeId) -> Result<usize, SceneError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.remove(parent, id)?;
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        log::debug!("Destroyed {} node(s) rooted at {:?}", removed, id);
        Ok(removed)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether `id` names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in storage order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Nodes without a parent
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    // ========== Invalidation ==========

    /// Mark caches of `id` stale
    ///
    /// Clearing the world matrix also clears every world-dependent cache of
    /// all descendants. Clearing world bounds also clears the world bounds of
    /// all ancestors. Unknown ids are ignored.
    pub fn mark_dirty(&self, id: NodeId, flags: DirtyFlags) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        node.caches.clear(flags);

        if flags.contains(DirtyFlags::WORLD_MATRIX) {
            let mut stack = node.children.clone();
            while let Some(current) = stack.pop() {
                if let Some(descendant) = self.nodes.get(current) {
                    descendant.caches.clear(DirtyFlags::WORLD);
                    stack.extend_from_slice(&descendant.children);
                }
            }
        }

        if flags.contains(DirtyFlags::WORLD_BOUNDS) {
            let mut ancestor = node.parent;
            while let Some(current) = ancestor.and_then(|id| self.nodes.get(id)) {
                current.caches.clear(DirtyFlags::WORLD_BOUNDS);
                ancestor = current.parent;
            }
        }
    }

    /// Signal that the extent reported by a node's kind has changed
    pub fn invalidate_bounds(&self, id: NodeId) {
        self.mark_dirty(id, DirtyFlags::LOCAL_BOUNDS | DirtyFlags::WORLD_BOUNDS);
    }

    // ========== Observers ==========

    /// Register a weakly held observer on a node
    pub fn add_observer<O: NodeObserver + 'static>(
        &mut self,
        id: NodeId,
        observer: &Rc<O>,
    ) -> Result<(), SceneError> {
        let weak = Rc::downgrade(observer) as Weak<dyn NodeObserver>;
        self.node_mut(id)?.observers.add(weak);
        Ok(())
    }

    /// Unregister an observer by identity
    pub fn remove_observer<O: NodeObserver + 'static>(
        &mut self,
        id: NodeId,
        observer: &Rc<O>,
    ) -> Result<(), SceneError> {
        let weak = Rc::downgrade(observer) as Weak<dyn NodeObserver>;
        self.node_mut(id)?.observers.remove(&weak);
        Ok(())
    }

    pub(crate) fn notify(&self, id: NodeId, event: NodeEvent) {
        if let Some(node) = self.nodes.get(id) {
            node.observers.invoke(|observer| observer.on_event(self, id, event));
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("len", &self.nodes.len())
            .field("roots", &self.roots())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node("Camera");

        assert!(graph.contains(id));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(id).map(Node::label), Some("Camera"));
        assert_eq!(graph.roots(), vec![id]);
    }

    #[test]
    fn test_spawn_uses_configured_label() {
        let mut graph = SceneGraph::with_config(SceneConfig::new().with_default_label("Entity"));
        let id = graph.spawn();
        assert_eq!(graph.get(id).map(Node::label), Some("Entity"));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node("root");
        let branch = graph.create_node("branch");
        let leaf = graph.create_node("leaf");
        graph.add(root, branch).unwrap();
        graph.add(branch, leaf).unwrap();

        assert_eq!(graph.destroy(branch).unwrap(), 2);
        assert!(!graph.contains(leaf));
        assert!(graph.get(root).unwrap().children().is_empty());
        assert!(matches!(graph.destroy(branch), Err(SceneError::UnknownNode(_))));
    }

    #[test]
    fn test_mark_dirty_unknown_node_is_ignored() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node("gone");
        graph.destroy(id).unwrap();
        graph.mark_dirty(id, DirtyFlags::all());
        assert!(graph.is_empty());
    }
}

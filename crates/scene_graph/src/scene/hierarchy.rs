//! Parent/child links and context propagation

use super::behavior::NodeBehavior;
use super::observer::NodeEvent;
use super::{DirtyFlags, NodeId, RenderContext, SceneError, SceneGraph};

impl SceneGraph {
    /// Attach `child` as the last child of `parent`
    ///
    /// Adding a node that is already a child of `parent` does nothing. A node
    /// attached elsewhere is detached from its previous parent first. The
    /// child inherits the parent's rendering context.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(child)?;
        let parent_node = self.node(parent)?;
        if parent_node.children.contains(&child) {
            return Ok(());
        }
        let context = parent_node.context.clone();

        debug_assert!(
            parent != child && !self.is_ancestor(child, parent),
            "attaching {:?} under {:?} would create a cycle",
            child,
            parent
        );

        if let Some(previous) = self.node(child)?.parent {
            self.remove(previous, child)?;
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.mark_dirty(child, DirtyFlags::WORLD);
        self.set_context(child, context)?;
        log::trace!("Attached {:?} under {:?}", child, parent);

        self.notify(child, NodeEvent::Parent);
        self.notify(parent, NodeEvent::Children);
        Ok(())
    }

    /// Attach several children in order
    pub fn add_all(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), SceneError> {
        for &child in children {
            self.add(parent, child)?;
        }
        Ok(())
    }

    /// Detach `child` from `parent`
    ///
    /// Nothing happens if `child` is not a child of `parent`. The detached
    /// node stays in the graph as a root.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let Some(index) = self.node(parent)?.children.iter().position(|&id| id == child) else {
            return Ok(());
        };
        if self.nodes.get(child).and_then(|node| node.parent) != Some(parent) {
            return Ok(());
        }

        self.node_mut(parent)?.children.remove(index);
        self.mark_dirty(parent, DirtyFlags::WORLD_BOUNDS);
        self.node_mut(child)?.parent = None;
        self.mark_dirty(child, DirtyFlags::WORLD);
        log::trace!("Detached {:?} from {:?}", child, parent);

        self.notify(child, NodeEvent::Parent);
        self.notify(parent, NodeEvent::Children);
        Ok(())
    }

    /// Detach every child of `parent`
    ///
    /// Each former child becomes a root.
    pub fn remove_all(&mut self, parent: NodeId) -> Result<(), SceneError> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        self.mark_dirty(parent, DirtyFlags::WORLD_BOUNDS);

        for &child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                if node.parent == Some(parent) {
                    node.parent = None;
                }
            }
            self.mark_dirty(child, DirtyFlags::WORLD);
        }
        log::trace!("Detached {} child(ren) from {:?}", children.len(), parent);

        for &child in &children {
            self.notify(child, NodeEvent::Parent);
        }
        self.notify(parent, NodeEvent::Children);
        Ok(())
    }

    /// Bind a rendering context to a node
    ///
    /// When `context` is present and differs from the node's current one, the
    /// node's kind runs its setup once and every current child receives the
    /// same context. Assigning the same context or `None` stores the value
    /// without further effect.
    pub fn set_context(
        &mut self,
        id: NodeId,
        context: Option<RenderContext>,
    ) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        let changed = context.is_some() && node.context != context;
        node.context = context.clone();

        let Some(context) = context.filter(|_| changed) else {
            return Ok(());
        };
        log::debug!(
            "Setting up {} node '{}' for context '{}'",
            node.behavior.kind(),
            node.label,
            context.label()
        );
        node.behavior.setup(&context);

        let children = node.children.clone();
        for child in children {
            self.set_context(child, Some(context.clone()))?;
        }
        Ok(())
    }

    /// Replace the kind of a node
    ///
    /// The new kind is set up immediately if the node already has a context.
    pub fn set_behavior(
        &mut self,
        id: NodeId,
        behavior: impl NodeBehavior + 'static,
    ) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.behavior = Box::new(behavior);
        if let Some(context) = node.context.clone() {
            node.behavior.setup(&context);
        }
        self.invalidate_bounds(id);
        Ok(())
    }

    /// Whether `ancestor` appears on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|node| node.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("parent");
        let first = graph.create_node("first");
        let second = graph.create_node("second");
        graph.add_all(parent, &[first, second]).unwrap();
        (graph, parent, first, second)
    }

    #[test]
    fn test_add_preserves_order_and_ignores_duplicates() {
        let (mut graph, parent, first, second) = family();
        graph.add(parent, first).unwrap();

        assert_eq!(graph.get(parent).unwrap().children(), &[first, second]);
        assert_eq!(graph.get(first).unwrap().parent(), Some(parent));
    }

    #[test]
    fn test_add_reparents() {
        let (mut graph, parent, first, _) = family();
        let other = graph.create_node("other");
        graph.add(other, first).unwrap();

        assert!(!graph.get(parent).unwrap().children().contains(&first));
        assert_eq!(graph.get(first).unwrap().parent(), Some(other));
    }

    #[test]
    fn test_remove_absent_child_is_noop() {
        let (mut graph, parent, first, second) = family();
        let stranger = graph.create_node("stranger");
        graph.remove(parent, stranger).unwrap();
        graph.remove(first, second).unwrap();

        assert_eq!(graph.get(parent).unwrap().children(), &[first, second]);
        assert_eq!(graph.get(second).unwrap().parent(), Some(parent));
    }

    #[test]
    fn test_remove_all_clears_parent_links() {
        let (mut graph, parent, first, second) = family();
        graph.remove_all(parent).unwrap();

        assert!(graph.get(parent).unwrap().children().is_empty());
        assert_eq!(graph.get(first).unwrap().parent(), None);
        assert_eq!(graph.get(second).unwrap().parent(), None);
        assert_eq!(graph.roots().len(), 3);
    }

    #[test]
    fn test_is_ancestor() {
        let (mut graph, parent, first, second) = family();
        let leaf = graph.create_node("leaf");
        graph.add(first, leaf).unwrap();

        assert!(graph.is_ancestor(parent, leaf));
        assert!(graph.is_ancestor(first, leaf));
        assert!(!graph.is_ancestor(second, leaf));
        assert!(!graph.is_ancestor(leaf, leaf));
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let (mut graph, parent, first, _) = family();
        graph.destroy(first).unwrap();

        assert!(matches!(graph.add(parent, first), Err(SceneError::UnknownNode(id)) if id == first));
        assert!(graph.set_context(first, None).is_err());
        assert!(graph.remove_all(first).is_err());
    }
}

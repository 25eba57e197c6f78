//! Traversal, lookup and the per-frame update pass

use super::{Node, NodeId, SceneError, SceneGraph};

impl SceneGraph {
    /// Node ids of `id` followed by its subtree, depth-first pre-order
    ///
    /// Without `recursive` only `id` itself is returned.
    fn preorder(&self, id: NodeId, recursive: bool) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        if !recursive {
            return vec![id];
        }

        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                order.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Descendants of `id` in depth-first pre-order, excluding `id`
    ///
    /// Without `recursive` only the direct children are returned.
    pub fn children(&self, id: NodeId, recursive: bool) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .flat_map(|&child| self.preorder(child, recursive))
            .collect()
    }

    /// Visit `id` and, if `recursive`, its whole subtree in pre-order
    pub fn apply(&self, id: NodeId, recursive: bool, mut visit: impl FnMut(NodeId, &Node)) {
        for current in self.preorder(id, recursive) {
            if let Some(node) = self.nodes.get(current) {
                visit(current, node);
            }
        }
    }

    /// Like [`SceneGraph::apply`] with mutable access to the graph
    ///
    /// The visiting order is fixed before the first call; nodes destroyed
    /// along the way are skipped.
    pub fn apply_mut(
        &mut self,
        id: NodeId,
        recursive: bool,
        mut visit: impl FnMut(&mut SceneGraph, NodeId),
    ) -> Result<(), SceneError> {
        self.node(id)?;
        for current in self.preorder(id, recursive) {
            if self.nodes.contains_key(current) {
                visit(self, current);
            }
        }
        Ok(())
    }

    fn find_descendant(
        &self,
        id: NodeId,
        recursive: bool,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.nodes.get(id)?.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if predicate(node) {
                return Some(current);
            }
            if recursive {
                stack.extend(node.children.iter().rev());
            }
        }
        None
    }

    /// First descendant with the given label, depth-first
    pub fn child_by_label(&self, id: NodeId, label: &str, recursive: bool) -> Option<NodeId> {
        self.find_descendant(id, recursive, |node| node.label == label)
    }

    /// First descendant with the given uid, depth-first
    pub fn child_by_uid(&self, id: NodeId, uid: &str, recursive: bool) -> Option<NodeId> {
        self.find_descendant(id, recursive, |node| node.uid == uid)
    }

    /// Every descendant with the given label, depth-first
    ///
    /// Matching nodes are searched as well, so nested matches are included.
    pub fn children_by_label(&self, id: NodeId, label: &str, recursive: bool) -> Vec<NodeId> {
        self.children(id, recursive)
            .into_iter()
            .filter(|&child| self.nodes.get(child).is_some_and(|node| node.label == label))
            .collect()
    }

    /// Whether the node and every ancestor are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(id)) {
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        current.is_none()
    }

    // ========== Update Pass ==========

    /// Attach a per-frame callback, replacing any previous one
    pub fn set_on_update(
        &mut self,
        id: NodeId,
        callback: impl FnMut(&mut SceneGraph, NodeId) + 'static,
    ) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.on_update = Some(Box::new(callback));
        node.update_revision = node.update_revision.wrapping_add(1);
        Ok(())
    }

    /// Detach the per-frame callback
    pub fn clear_on_update(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.on_update = None;
        node.update_revision = node.update_revision.wrapping_add(1);
        Ok(())
    }

    /// Run one update pass over `root` and its subtree
    ///
    /// Each node runs its kind's update hook and then its callback, parents
    /// before children. A node's children are read after its callback
    /// returns, so children added by the callback are updated in the same
    /// pass.
    pub fn update(&mut self, root: NodeId) -> Result<(), SceneError> {
        self.node(root)?;

        let mut visited = 0usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.behavior.update();

            let revision = node.update_revision;
            if let Some(mut callback) = node.on_update.take() {
                callback(self, id);
                // Put the callback back unless it replaced or cleared itself
                if let Some(node) = self.nodes.get_mut(id) {
                    if node.update_revision == revision {
                        node.on_update = Some(callback);
                    }
                }
            }

            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev());
            }
            visited += 1;
        }

        log::trace!("Update pass from {:?} visited {} node(s)", root, visited);
        Ok(())
    }
}

//! Serializable snapshots of node subtrees

use serde::{Deserialize, Serialize};

use super::{Node, NodeId, SceneError, SceneGraph};
use crate::foundation::math::{Quat, Vec3};

/// Plain data copy of a node and its descendants
///
/// Only identity, transform and visibility are recorded. Kinds, contexts,
/// observers and callbacks belong to the running scene and are not saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node uid at the time of the snapshot
    pub uid: String,
    /// Node label
    pub label: String,
    /// Local position
    pub position: Vec3,
    /// Local orientation
    pub orientation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Local visibility flag
    pub visible: bool,
    /// Child records in order
    #[serde(default)]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    /// Encode as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, Default::default())
            .map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Decode from RON
    pub fn from_ron(source: &str) -> Result<Self, SceneError> {
        ron::from_str(source).map_err(|e| SceneError::Parse(e.to_string()))
    }

    /// Number of nodes in the recorded subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeRecord::node_count).sum::<usize>()
    }
}

impl SceneGraph {
    /// Record `id` and its subtree
    pub fn snapshot(&self, id: NodeId) -> Option<NodeRecord> {
        let node = self.nodes.get(id)?;
        Some(NodeRecord {
            uid: node.uid.clone(),
            label: node.label.clone(),
            position: node.position,
            orientation: node.orientation,
            scale: node.scale,
            visible: node.visible,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.snapshot(child))
                .collect(),
        })
    }

    /// Recreate a recorded subtree as group nodes and return its root
    ///
    /// Recorded uids are kept, so instantiating the same record twice yields
    /// nodes that share uids.
    pub fn instantiate(&mut self, record: &NodeRecord) -> Result<NodeId, SceneError> {
        let node = Node::new(record.label.clone())
            .with_uid(record.uid.clone())
            .with_position(record.position)
            .with_orientation(record.orientation)
            .with_scale(record.scale)
            .with_visible(record.visible);
        let id = self.insert(node);

        for child in &record.children {
            let child = self.instantiate(child)?;
            self.add(id, child)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_tree() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::new("root").with_position(Vec3::new(1.0, 0.0, 0.0)));
        let arm = graph.insert(
            Node::new("arm")
                .with_orientation(Quat::from_axis_angle(&Vec3::z_axis(), 0.5))
                .with_scale(Vec3::new(1.0, 2.0, 1.0)),
        );
        let hidden = graph.insert(Node::new("hidden").with_visible(false));
        graph.add(root, arm).unwrap();
        graph.add(arm, hidden).unwrap();
        (graph, root)
    }

    #[test]
    fn test_snapshot_captures_subtree() {
        let (graph, root) = small_tree();
        let record = graph.snapshot(root).unwrap();

        assert_eq!(record.node_count(), 3);
        assert_eq!(record.label, "root");
        assert_eq!(record.children[0].label, "arm");
        assert!(!record.children[0].children[0].visible);
    }

    #[test]
    fn test_ron_roundtrip_and_instantiate() {
        let (graph, root) = small_tree();
        let record = graph.snapshot(root).unwrap();
        let text = record.to_ron().unwrap();
        let decoded = NodeRecord::from_ron(&text).unwrap();
        assert_eq!(decoded.children[0].uid, record.children[0].uid);

        let mut restored = SceneGraph::new();
        let copy = restored.instantiate(&decoded).unwrap();
        let hidden = restored.child_by_label(copy, "hidden", true).unwrap();

        assert_eq!(restored.len(), 3);
        assert!(!restored.is_visible(hidden));
        assert_relative_eq!(
            restored.world_matrix(hidden).unwrap(),
            graph.world_matrix(graph.child_by_label(root, "hidden", true).unwrap()).unwrap(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_from_ron_reports_parse_errors() {
        assert!(matches!(NodeRecord::from_ron("(label: 3)"), Err(SceneError::Parse(_))));
    }
}

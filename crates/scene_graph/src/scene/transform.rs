//! Transform mutation, world-space queries and bounds

use super::observer::NodeEvent;
use super::{Bounds, DirtyFlags, NodeId, SceneError, SceneGraph};
use crate::foundation::math::{self, directions, Mat3, Mat4, Quat, Transform, Vec3};

impl SceneGraph {
    // ========== Local Transform ==========

    /// Set the position relative to the parent
    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.position = position;
        self.mark_dirty(id, DirtyFlags::POSITION);
        self.notify(id, NodeEvent::Position);
        Ok(())
    }

    /// Set the orientation relative to the parent
    pub fn set_orientation(&mut self, id: NodeId, orientation: Quat) -> Result<(), SceneError> {
        self.node_mut(id)?.orientation = orientation;
        self.mark_dirty(id, DirtyFlags::ORIENTATION);
        self.notify(id, NodeEvent::Orientation);
        Ok(())
    }

    /// Set the scale relative to the parent
    pub fn set_scale(&mut self, id: NodeId, scale: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.scale = scale;
        self.mark_dirty(id, DirtyFlags::SCALE);
        self.notify(id, NodeEvent::Scale);
        Ok(())
    }

    /// Set position, orientation and scale together
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.position = transform.position;
        node.orientation = transform.rotation;
        node.scale = transform.scale;
        self.mark_dirty(id, DirtyFlags::ORIENTATION | DirtyFlags::SCALE);

        self.notify(id, NodeEvent::Position);
        self.notify(id, NodeEvent::Scale);
        self.notify(id, NodeEvent::Orientation);
        Ok(())
    }

    /// Replace the local transform by decomposing a matrix
    ///
    /// A mirrored basis is expressed as a negative X scale. A basis with a
    /// zero-length axis yields non-finite components, which are stored as-is.
    pub fn set_local_matrix(&mut self, id: NodeId, matrix: &Mat4) -> Result<(), SceneError> {
        self.node(id)?;
        let transform = Transform::from_matrix(matrix);
        if !transform.is_well_formed() {
            log::warn!(
                "Local matrix of {:?} has a degenerate basis; decomposed transform is {:?}",
                id,
                transform
            );
        }
        self.set_transform(id, transform)
    }

    /// Copy the local transform of `source` onto `id`
    ///
    /// Observers see `Position`, `Orientation`, `Scale` in that order.
    pub fn set_from(&mut self, id: NodeId, source: NodeId) -> Result<(), SceneError> {
        let transform = self.node(source)?.transform();
        let node = self.node_mut(id)?;
        node.position = transform.position;
        node.orientation = transform.rotation;
        node.scale = transform.scale;
        self.mark_dirty(id, DirtyFlags::ORIENTATION | DirtyFlags::SCALE);

        self.notify(id, NodeEvent::Position);
        self.notify(id, NodeEvent::Orientation);
        self.notify(id, NodeEvent::Scale);
        Ok(())
    }

    /// Place the node at its current position facing `target`
    ///
    /// The node's -Z axis points at `target` with `up` as the vertical hint;
    /// scale is reset to one. Degenerate input leaves the node untouched.
    pub fn look_at(&mut self, id: NodeId, target: Vec3, up: Vec3) -> Result<(), SceneError> {
        let position = self.node(id)?.position;
        match math::look_at_matrix(&position, &target, &up) {
            Some(matrix) => self.set_local_matrix(id, &matrix),
            None => {
                log::warn!(
                    "Ignoring look_at for {:?}: target {:?} and up {:?} are degenerate from {:?}",
                    id,
                    target,
                    up,
                    position
                );
                Ok(())
            }
        }
    }

    /// Set the label
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(id)?.label = label.into();
        self.notify(id, NodeEvent::Label);
        Ok(())
    }

    /// Set the local visibility flag
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.visible = visible;
        self.notify(id, NodeEvent::Visibility);
        Ok(())
    }

    // ========== World Space ==========

    /// Transform from the node's space to world space
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(id)?;
        Some(node.caches.world_matrix.get(|| {
            match node.parent.and_then(|parent| self.world_matrix(parent)) {
                Some(parent_world) => parent_world * node.local_matrix(),
                None => node.local_matrix(),
            }
        }))
    }

    /// Origin of the node in world space
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let world = self.world_matrix(id)?;
        Some(Vec3::new(world[(0, 3)], world[(1, 3)], world[(2, 3)]))
    }

    /// Per-axis scale of the world basis
    pub fn world_scale(&self, id: NodeId) -> Option<Vec3> {
        let world = self.world_matrix(id)?;
        Some(math::decompose_basis(&world.fixed_view::<3, 3>(0, 0).into_owned()).0)
    }

    /// Rotation of the world basis
    pub fn world_orientation(&self, id: NodeId) -> Option<Quat> {
        let node = self.nodes.get(id)?;
        let world = self.world_matrix(id)?;
        Some(node.caches.world_orientation.get(|| {
            math::decompose_basis(&world.fixed_view::<3, 3>(0, 0).into_owned()).1
        }))
    }

    /// Inverse-transpose of the world basis, for transforming normals
    pub fn normal_matrix(&self, id: NodeId) -> Option<Mat3> {
        let node = self.nodes.get(id)?;
        let world = self.world_matrix(id)?;
        Some(node.caches.normal_matrix.get(|| math::normal_matrix(&world)))
    }

    /// Forward (-Z) axis in world space
    pub fn world_forward_direction(&self, id: NodeId) -> Option<Vec3> {
        Some((self.world_orientation(id)? * directions::forward()).normalize())
    }

    /// Up (+Y) axis in world space
    pub fn world_up_direction(&self, id: NodeId) -> Option<Vec3> {
        Some((self.world_orientation(id)? * directions::up()).normalize())
    }

    /// Right (+X) axis in world space
    pub fn world_right_direction(&self, id: NodeId) -> Option<Vec3> {
        Some((self.world_orientation(id)? * directions::right()).normalize())
    }

    // ========== Bounds ==========

    /// Bounds of the node in its parent's space
    pub fn local_bounds(&self, id: NodeId) -> Option<Bounds> {
        self.nodes.get(id).map(|node| node.local_bounds())
    }

    /// Bounds of the node and its whole subtree in world space
    pub fn world_bounds(&self, id: NodeId) -> Option<Bounds> {
        let node = self.nodes.get(id)?;
        Some(node.caches.world_bounds.get(|| {
            let local = node.local_bounds();
            let own = match node.parent.and_then(|parent| self.world_matrix(parent)) {
                Some(parent_world) => local.transformed(&parent_world),
                None => local,
            };
            node.children
                .iter()
                .filter_map(|&child| self.world_bounds(child))
                .fold(own, |merged, child| merged.merge(&child))
        }))
    }
}

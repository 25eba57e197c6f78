//! Scene node data and node-local cached state

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::behavior::{Group, NodeBehavior};
use super::observer::{NodeObserver, ObserverRegistry};
use super::{Bounds, DirtyFlags, NodeId, RenderContext, SceneGraph};
use crate::foundation::cache::ValueCache;
use crate::foundation::math::{self, directions, Mat3, Mat4, Quat, Transform, Vec3};

/// Per-frame callback attached to a node
pub type UpdateFn = Box<dyn FnMut(&mut SceneGraph, NodeId)>;

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> String {
    format!("node-{}", NEXT_UID.fetch_add(1, Ordering::Relaxed))
}

/// Lazily derived state of a node
#[derive(Debug, Default)]
pub(crate) struct NodeCaches {
    pub(crate) scale_matrix: ValueCache<Mat4>,
    pub(crate) rotation_matrix: ValueCache<Mat4>,
    pub(crate) orientation_matrix: ValueCache<Mat3>,
    pub(crate) local_matrix: ValueCache<Mat4>,
    pub(crate) local_bounds: ValueCache<Bounds>,
    pub(crate) world_matrix: ValueCache<Mat4>,
    pub(crate) world_orientation: ValueCache<Quat>,
    pub(crate) normal_matrix: ValueCache<Mat3>,
    pub(crate) world_bounds: ValueCache<Bounds>,
}

impl NodeCaches {
    pub(crate) fn clear(&self, flags: DirtyFlags) {
        if flags.contains(DirtyFlags::SCALE_MATRIX) {
            self.scale_matrix.clear();
        }
        if flags.contains(DirtyFlags::ROTATION_MATRIX) {
            self.rotation_matrix.clear();
        }
        if flags.contains(DirtyFlags::ORIENTATION_MATRIX) {
            self.orientation_matrix.clear();
        }
        if flags.contains(DirtyFlags::LOCAL_MATRIX) {
            self.local_matrix.clear();
        }
        if flags.contains(DirtyFlags::LOCAL_BOUNDS) {
            self.local_bounds.clear();
        }
        if flags.contains(DirtyFlags::WORLD_MATRIX) {
            self.world_matrix.clear();
        }
        if flags.contains(DirtyFlags::WORLD_ORIENTATION) {
            self.world_orientation.clear();
        }
        if flags.contains(DirtyFlags::NORMAL_MATRIX) {
            self.normal_matrix.clear();
        }
        if flags.contains(DirtyFlags::WORLD_BOUNDS) {
            self.world_bounds.clear();
        }
    }

    fn stale(&self) -> DirtyFlags {
        let mut flags = DirtyFlags::empty();
        flags.set(DirtyFlags::SCALE_MATRIX, !self.scale_matrix.is_valid());
        flags.set(DirtyFlags::ROTATION_MATRIX, !self.rotation_matrix.is_valid());
        flags.set(DirtyFlags::ORIENTATION_MATRIX, !self.orientation_matrix.is_valid());
        flags.set(DirtyFlags::LOCAL_MATRIX, !self.local_matrix.is_valid());
        flags.set(DirtyFlags::LOCAL_BOUNDS, !self.local_bounds.is_valid());
        flags.set(DirtyFlags::WORLD_MATRIX, !self.world_matrix.is_valid());
        flags.set(DirtyFlags::WORLD_ORIENTATION, !self.world_orientation.is_valid());
        flags.set(DirtyFlags::NORMAL_MATRIX, !self.normal_matrix.is_valid());
        flags.set(DirtyFlags::WORLD_BOUNDS, !self.world_bounds.is_valid());
        flags
    }
}

/// A node in the scene hierarchy
///
/// Nodes are built standalone with the `with_*` builders, handed to
/// [`SceneGraph::insert`], and mutated through the graph afterwards so that
/// cache invalidation and notifications stay consistent.
pub struct Node {
    pub(crate) uid: String,
    pub(crate) label: String,

    // Local transform components
    pub(crate) position: Vec3,
    pub(crate) orientation: Quat,
    pub(crate) scale: Vec3,

    pub(crate) visible: bool,

    // Hierarchy
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    pub(crate) context: Option<RenderContext>,
    pub(crate) behavior: Box<dyn NodeBehavior>,
    pub(crate) observers: ObserverRegistry<dyn NodeObserver>,
    pub(crate) on_update: Option<UpdateFn>,
    // Bumped whenever the callback slot is assigned
    pub(crate) update_revision: u32,

    pub(crate) caches: NodeCaches,
}

impl Node {
    /// Create a group node with identity transform
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            uid: next_uid(),
            label: label.into(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            visible: true,
            parent: None,
            children: Vec::new(),
            context: None,
            behavior: Box::new(Group),
            observers: ObserverRegistry::new(),
            on_update: None,
            update_revision: 0,
            caches: NodeCaches::default(),
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set all transform components
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.position = transform.position;
        self.orientation = transform.rotation;
        self.scale = transform.scale;
        self
    }

    /// Builder pattern: Set local visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder pattern: Set the node kind
    pub fn with_behavior(mut self, behavior: impl NodeBehavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    pub(crate) fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Process-unique identifier assigned at creation
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Human readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Position relative to the parent
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Orientation relative to the parent
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Scale relative to the parent
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// All three transform components
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.orientation, self.scale)
    }

    /// Local visibility flag, ignoring ancestors
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Parent node, `None` for a root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in traversal order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Rendering context currently bound to the node
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// The node kind
    pub fn behavior(&self) -> &dyn NodeBehavior {
        self.behavior.as_ref()
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Whether a per-frame callback is attached
    pub fn has_update_callback(&self) -> bool {
        self.on_update.is_some()
    }

    /// Caches that will be recomputed on their next read
    pub fn stale_caches(&self) -> DirtyFlags {
        self.caches.stale()
    }

    // ========== Component Matrices ==========

    /// Translation matrix for `position` (not cached)
    pub fn translation_matrix(&self) -> Mat4 {
        math::translation_matrix(&self.position)
    }

    /// Scale matrix for `scale`
    pub fn scale_matrix(&self) -> Mat4 {
        self.caches.scale_matrix.get(|| math::scale_matrix(&self.scale))
    }

    /// Homogeneous rotation matrix for `orientation`
    pub fn rotation_matrix(&self) -> Mat4 {
        self.caches.rotation_matrix.get(|| math::rotation_matrix(&self.orientation))
    }

    /// 3x3 rotation matrix for `orientation`
    pub fn orientation_matrix(&self) -> Mat3 {
        self.caches.orientation_matrix.get(|| math::orientation_matrix(&self.orientation))
    }

    /// Transform relative to the parent
    ///
    /// Composed as Translation * Rotation * Scale.
    pub fn local_matrix(&self) -> Mat4 {
        self.caches.local_matrix.get(|| {
            self.translation_matrix() * self.rotation_matrix() * self.scale_matrix()
        })
    }

    /// Bounds in the parent's space, as reported by the node kind
    pub fn local_bounds(&self) -> Bounds {
        self.caches.local_bounds.get(|| self.behavior.compute_local_bounds(self))
    }

    // ========== Local Directions ==========

    /// Forward (-Z) axis in the parent's space
    pub fn forward_direction(&self) -> Vec3 {
        (self.orientation_matrix() * directions::forward()).normalize()
    }

    /// Up (+Y) axis in the parent's space
    pub fn up_direction(&self) -> Vec3 {
        (self.orientation_matrix() * directions::up()).normalize()
    }

    /// Right (+X) axis in the parent's space
    pub fn right_direction(&self) -> Vec3 {
        (self.orientation_matrix() * directions::right()).normalize()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("uid", &self.uid)
            .field("label", &self.label)
            .field("kind", &self.behavior.kind())
            .field("position", &self.position)
            .field("orientation", &self.orientation)
            .field("scale", &self.scale)
            .field("visible", &self.visible)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("context", &self.context)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

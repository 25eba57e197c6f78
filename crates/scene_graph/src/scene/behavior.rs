//! Node kinds
//!
//! A [`NodeBehavior`] is what distinguishes one kind of node from another:
//! what it allocates when a rendering context arrives, what it does every
//! frame, and how large it is.

use std::fmt;
use std::rc::Rc;

use super::{Bounds, Node, RenderContext};

/// Per-kind hooks of a scene node
pub trait NodeBehavior {
    /// Short name used in logs and `Debug` output
    fn kind(&self) -> &'static str {
        "node"
    }

    /// Called once each time the node receives a new rendering context
    fn setup(&mut self, _context: &RenderContext) {}

    /// Called for the node during every update pass, before its callback
    fn update(&mut self) {}

    /// Bounds of the node expressed in its parent's space
    ///
    /// The default is a zero-extent box at the node's position.
    fn compute_local_bounds(&self, node: &Node) -> Bounds {
        Bounds::from_point(node.position())
    }
}

/// Plain grouping node with no content of its own
#[derive(Debug, Clone, Copy, Default)]
pub struct Group;

impl NodeBehavior for Group {
    fn kind(&self) -> &'static str {
        "group"
    }
}

/// Anything that can report an object-space bounding box
pub trait GeometryProvider {
    /// Object-space extent of the geometry
    fn bounds(&self) -> Bounds;
}

impl GeometryProvider for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

/// Node rendering a piece of geometry
///
/// Its local bounds are the geometry's extent moved into the parent's space
/// by the node's local matrix.
pub struct GeometryNode {
    geometry: Rc<dyn GeometryProvider>,
    context: Option<RenderContext>,
    setup_count: u32,
}

impl GeometryNode {
    /// Wrap a geometry provider
    pub fn new(geometry: Rc<dyn GeometryProvider>) -> Self {
        Self {
            geometry,
            context: None,
            setup_count: 0,
        }
    }

    /// The geometry this node draws
    pub fn geometry(&self) -> &Rc<dyn GeometryProvider> {
        &self.geometry
    }

    /// Context the node last prepared its resources for
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Number of times resources were prepared
    pub fn setup_count(&self) -> u32 {
        self.setup_count
    }
}

impl NodeBehavior for GeometryNode {
    fn kind(&self) -> &'static str {
        "geometry"
    }

    fn setup(&mut self, context: &RenderContext) {
        log::debug!(
            "Preparing geometry resources for context '{}' ({}x MSAA)",
            context.label(),
            context.sample_count()
        );
        self.context = Some(context.clone());
        self.setup_count += 1;
    }

    fn compute_local_bounds(&self, node: &Node) -> Bounds {
        self.geometry.bounds().transformed(&node.local_matrix())
    }
}

impl fmt::Debug for GeometryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryNode")
            .field("bounds", &self.geometry.bounds())
            .field("context", &self.context)
            .field("setup_count", &self.setup_count)
            .finish()
    }
}

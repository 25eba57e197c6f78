//! Scene graph
//!
//! Nodes live in a [`SceneGraph`] arena and refer to each other by
//! [`NodeId`]. Each node carries a local transform and a set of lazily
//! computed caches; [`DirtyFlags`] describes which of them a mutation clears.
//! Transform changes invalidate world-space caches downward through the
//! subtree, while world bounds are invalidated upward through the ancestors.

mod behavior;
mod bounds;
mod context;
mod dirty;
mod error;
mod graph;
mod hierarchy;
mod node;
mod observer;
mod query;
mod record;
mod transform;

#[cfg(test)]
mod tests;

pub use behavior::{GeometryNode, GeometryProvider, Group, NodeBehavior};
pub use bounds::Bounds;
pub use context::RenderContext;
pub use dirty::DirtyFlags;
pub use error::SceneError;
pub use graph::{NodeId, SceneGraph};
pub use node::{Node, UpdateFn};
pub use observer::{NodeEvent, NodeObserver, ObserverRegistry};
pub use record::NodeRecord;

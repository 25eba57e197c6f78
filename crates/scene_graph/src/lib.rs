//! # Scene Graph
//!
//! Hierarchical node core for a real-time 3D renderer.
//!
//! ## Features
//!
//! - **Lazy Transforms**: Local, world and normal matrices computed on demand and cached
//! - **Targeted Invalidation**: Transform changes flow down the tree, bounds changes flow up
//! - **Bounds Aggregation**: World-space boxes covering a node and its subtree
//! - **Weak Observers**: Change notification that never keeps a listener alive
//! - **Context Binding**: One-time setup when a node meets a new rendering context
//! - **Snapshots**: Subtrees saved to and restored from RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_graph::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut graph = SceneGraph::new();
//!     let sun = graph.create_node("Sun");
//!     let earth = graph.create_node("Earth");
//!     graph.add(sun, earth)?;
//!
//!     graph.set_position(earth, Vec3::new(10.0, 0.0, 0.0))?;
//!     graph.set_orientation(sun, Quat::from_axis_angle(&Vec3::y_axis(), 0.5))?;
//!
//!     let position = graph.world_position(earth);
//!     println!("Earth is at {:?}", position);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;

/// Common imports for scene graph users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SceneConfig},
        foundation::math::{Mat3, Mat4, Quat, Transform, Vec3},
        scene::{
            Bounds, DirtyFlags, GeometryNode, GeometryProvider, Group, Node, NodeBehavior,
            NodeEvent, NodeId, NodeObserver, NodeRecord, RenderContext, SceneError, SceneGraph,
        },
    };
}

//! Orbit demo application
//!
//! Builds a small sun/earth/moon hierarchy, spins the orbit pivots from
//! per-frame callbacks and logs where everything ends up.
//!
//! Usage: `orbit_demo [config.toml|config.ron]`

use std::rc::Rc;

use scene_graph::foundation::logging;
use scene_graph::foundation::math::constants::DEG_TO_RAD;
use scene_graph::prelude::*;

const FRAMES: u32 = 360;
const REPORT_EVERY: u32 = 90;

/// Degrees per frame for each orbit pivot
const EARTH_ORBIT_STEP: f32 = 1.0;
const MOON_ORBIT_STEP: f32 = 12.0;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Logs visibility changes of the bodies it watches
struct VisibilityLogger;

impl NodeObserver for VisibilityLogger {
    fn updated_visibility(&self, graph: &SceneGraph, node: NodeId) {
        if let Some(body) = graph.get(node) {
            log::info!("{} is now {}", body.label(), if graph.is_visible(node) { "visible" } else { "hidden" });
        }
    }
}

struct Bodies {
    sun: NodeId,
    earth: NodeId,
    moon: NodeId,
    camera: NodeId,
}

fn sphere(radius: f32) -> GeometryNode {
    GeometryNode::new(Rc::new(Bounds::from_center_extents(
        Vec3::zeros(),
        Vec3::new(radius, radius, radius),
    )))
}

/// Spin a pivot about +Y by `degrees` every frame
fn spin(graph: &mut SceneGraph, pivot: NodeId, degrees: f32) -> Result<(), SceneError> {
    graph.set_on_update(pivot, move |graph, id| {
        let step = Quat::from_axis_angle(&Vec3::y_axis(), degrees * DEG_TO_RAD);
        let Some(orientation) = graph.get(id).map(Node::orientation) else {
            return;
        };
        if let Err(e) = graph.set_orientation(id, step * orientation) {
            log::warn!("Failed to advance orbit: {}", e);
        }
    })
}

fn build_scene(graph: &mut SceneGraph) -> Result<Bodies, SceneError> {
    let sun = graph.insert(Node::new("Sun").with_behavior(sphere(2.0)));
    let earth_orbit = graph.create_node("Earth Orbit");
    let earth = graph.insert(
        Node::new("Earth")
            .with_position(Vec3::new(10.0, 0.0, 0.0))
            .with_behavior(sphere(0.5)),
    );
    let moon_orbit = graph.create_node("Moon Orbit");
    let moon = graph.insert(
        Node::new("Moon")
            .with_position(Vec3::new(1.5, 0.0, 0.0))
            .with_scale(Vec3::new(0.3, 0.3, 0.3))
            .with_behavior(sphere(0.5)),
    );

    graph.add(sun, earth_orbit)?;
    graph.add(earth_orbit, earth)?;
    graph.add(earth, moon_orbit)?;
    graph.add(moon_orbit, moon)?;

    spin(graph, earth_orbit, EARTH_ORBIT_STEP)?;
    spin(graph, moon_orbit, MOON_ORBIT_STEP)?;

    // Camera is its own root so the orbit spin does not carry it along
    let camera = graph.insert(Node::new("Camera").with_position(Vec3::new(0.0, 15.0, 25.0)));
    graph.look_at(camera, Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0))?;

    Ok(Bodies { sun, earth, moon, camera })
}

fn report(graph: &SceneGraph, frame: u32, bodies: &Bodies) {
    for id in [bodies.earth, bodies.moon] {
        let (Some(node), Some(position)) = (graph.get(id), graph.world_position(id)) else {
            continue;
        };
        log::info!(
            "frame {:>3}: {:<5} at ({:>7.3}, {:>7.3}, {:>7.3})",
            frame,
            node.label(),
            position.x,
            position.y,
            position.z
        );
    }
    if let Some(bounds) = graph.world_bounds(bodies.sun) {
        log::info!("frame {:>3}: system bounds {:?} .. {:?}", frame, bounds.min, bounds.max);
    }
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from_file(&path)?,
        None => SceneConfig::default(),
    };
    config.validate()?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting orbit demo with {:?}", config);

    let mut graph = SceneGraph::with_config(config);
    let bodies = build_scene(&mut graph)?;

    let watcher = Rc::new(VisibilityLogger);
    graph.add_observer(bodies.moon, &watcher)?;

    graph.set_context(bodies.sun, Some(RenderContext::new("orbit", 4)))?;

    if let Some(forward) = graph.world_forward_direction(bodies.camera) {
        log::info!("Camera looks along {:?}", forward);
    }

    for frame in 0..FRAMES {
        graph.update(bodies.sun)?;
        if frame % REPORT_EVERY == 0 {
            report(&graph, frame, &bodies);
        }
    }

    graph.set_visible(bodies.moon, false)?;
    report(&graph, FRAMES, &bodies);

    if let Some(record) = graph.snapshot(bodies.sun) {
        log::debug!("Final scene:\n{}", record.to_ron()?);
        log::info!("Scene holds {} node(s) under the sun", record.node_count() - 1);
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("Orbit demo failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

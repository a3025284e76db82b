/// Demo scene: a quad spinning in front of the camera, carrying a cube
use std::rc::Rc;

use nalgebra::{Vector2, Vector3};
use rascii_core::{Mat4, Mesh, NodeId, Result, SceneGraph, Transform};

/// Distance of the quad from the camera
const DISTANCE: f32 = 25.0;
/// Offset of the cube from the quad, in the quad's frame
const ORBIT_RADIUS: f32 = 10.0;
/// Radians per second
const SPIN: f32 = 0.6;
const TURN: f32 = 1.5;
/// Units per second
const SPEED: f32 = 8.0;

/// Scene graph with handles to the nodes the application animates
pub struct DemoScene {
    graph: SceneGraph,
    pivot: NodeId,
    cube: NodeId,
}

impl DemoScene {
    pub fn new() -> Result<Self> {
        let mut graph = SceneGraph::new();
        let quad = Mesh::centered_quad().transform(&Mat4::new_scaling(6.0));
        let pivot = graph.spawn(NodeId::ROOT, Self::pivot_start(), Some(Rc::new(quad)))?;
        let cube = graph.spawn(pivot, Self::cube_start(), Some(Rc::new(Mesh::cube(4.0))))?;
        Ok(Self { graph, pivot, cube })
    }

    fn pivot_start() -> Transform {
        Transform::from_position(0.0, 0.0, -DISTANCE)
    }

    fn cube_start() -> Transform {
        Transform::from_position(ORBIT_RADIUS, 0.0, 0.0)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn pivot(&self) -> NodeId {
        self.pivot
    }

    pub fn cube(&self) -> NodeId {
        self.cube
    }

    /// Idle animation: the quad turns about y, taking the cube around it,
    /// and the cube tumbles on its own.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        self.graph
            .transform_mut(self.pivot)?
            .rotate_euler(0.0, SPIN * dt, 0.0);
        self.graph
            .transform_mut(self.cube)?
            .rotate_euler(1.1 * SPIN * dt, 0.7 * SPIN * dt, 0.0);
        Ok(())
    }

    /// `look` turns the quad (x = yaw, y = pitch); `movement` slides it
    /// sideways (x) and away from the camera (y).
    pub fn steer(&mut self, look: Vector2<f32>, movement: Vector2<f32>, dt: f32) -> Result<()> {
        let pivot = self.graph.transform_mut(self.pivot)?;
        pivot.rotate_euler(-look.y * TURN * dt, look.x * TURN * dt, 0.0);
        pivot.translate(Vector3::new(movement.x, 0.0, -movement.y) * SPEED * dt);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        *self.graph.transform_mut(self.pivot)? = Self::pivot_start();
        *self.graph.transform_mut(self.cube)? = Self::cube_start();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rascii_core::{Vec4, Vec4Ext};

    fn cube_center(scene: &DemoScene) -> Vec4 {
        scene.graph().world_transform(scene.cube()).unwrap() * Vec4::point(0.0, 0.0, 0.0)
    }

    #[test]
    fn test_layout() {
        let scene = DemoScene::new().unwrap();
        assert_eq!(scene.graph().node_count(), 3);
        assert_eq!(scene.graph().iter().filter(|(_, node)| node.mesh().is_some()).count(), 2);
        assert!((cube_center(&scene) - Vec4::point(10.0, 0.0, -25.0)).norm() < 1e-5);
    }

    #[test]
    fn test_step_orbits_the_cube() {
        let mut scene = DemoScene::new().unwrap();
        for _ in 0..10 {
            scene.step(0.1).unwrap();
        }
        let center = cube_center(&scene);
        // stays on the circle around the quad
        let offset = center.xyz() - Vector3::new(0.0, 0.0, -25.0);
        assert!((offset.norm() - 10.0).abs() < 1e-4);
        assert!((center.x - 10.0).abs() > 0.1);
    }

    #[test]
    fn test_steer_and_reset() {
        let mut scene = DemoScene::new().unwrap();
        scene.steer(Vector2::zeros(), Vector2::new(0.0, 1.0), 0.5).unwrap();
        let pivot = scene.graph().node(scene.pivot()).unwrap().transform;
        assert!((pivot.position.z - (-29.0)).abs() < 1e-5);

        scene.reset().unwrap();
        let pivot = scene.graph().node(scene.pivot()).unwrap().transform;
        assert_eq!(pivot, Transform::from_position(0.0, 0.0, -25.0));
    }
}

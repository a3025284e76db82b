/// Local transforms for scene graph nodes
use nalgebra::Vector3;

use crate::math::{Mat4, Quat, QuatExt};

/// Position, rotation and scale of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quat,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: Quat, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Quat::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.scale = Vector3::new(sx, sy, sz);
        self
    }

    /// Apply `rotation` after the current one (left multiply).
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
    }

    /// Rotate by delta Euler angles (in radians)
    pub fn rotate_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotate(Quat::euler(pitch, yaw, roll));
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Create the local transformation matrix.
    ///
    /// Translation and scale are written into one matrix which is then
    /// right-multiplied by the rotation: `(T·S) · R`. Scale therefore acts
    /// along the parent's axes after the rotation, not before it.
    pub fn matrix(&self) -> Mat4 {
        let mut translate_scale = Mat4::new_nonuniform_scaling(&self.scale);
        translate_scale[(0, 3)] = self.position.x;
        translate_scale[(1, 3)] = self.position.y;
        translate_scale[(2, 3)] = self.position.z;

        translate_scale * self.rotation.rotation_matrix()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

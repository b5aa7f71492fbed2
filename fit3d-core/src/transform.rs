//! Model transforms and rotation state for animated objects

use nalgebra::{Matrix4, Vector3};
use std::time::Duration;

/// Euler rotation around the three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Advance by an angular velocity (radians per second) over `elapsed`
    pub fn advance(&mut self, velocity: &RotationState, elapsed: Duration) {
        let t = elapsed.as_secs_f32();
        self.rotate(velocity.x * t, velocity.y * t, velocity.z * t);
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix applying X, then Y, then Z
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));
        rz * ry * rx
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Scale, then rotate, then translate
    pub fn model_matrix(
        translation: &Vector3<f32>,
        rotation: &RotationState,
        scale: f32,
    ) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
            * Self::rotation_matrix(rotation)
            * Matrix4::new_scaling(scale)
    }
}

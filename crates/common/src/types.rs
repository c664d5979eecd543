use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Z;
/// World forward axis; an identity rotation looks along it.
pub const WORLD_FORWARD: Vec3 = Vec3::Y;
/// World right axis.
pub const WORLD_RIGHT: Vec3 = Vec3::X;

/// Local placement of a unit or camera: position and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Direction the pose is facing, in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * WORLD_FORWARD
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * WORLD_RIGHT
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * WORLD_UP
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

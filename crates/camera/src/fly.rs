use glam::{Quat, Vec3};
use overlook_common::Pose;
use overlook_input::InputFrame;

use crate::settings::CameraSettings;
use crate::solver::{compute_rotation, compute_translation};

/// Read/write access to the camera's local placement. This is all the
/// solver needs from the host.
pub trait CameraPose {
    fn local_rotation(&self) -> Quat;
    fn local_position(&self) -> Vec3;
    fn set_local_rotation(&mut self, rotation: Quat);
    fn set_local_position(&mut self, position: Vec3);
}

impl CameraPose for Pose {
    fn local_rotation(&self) -> Quat {
        self.rotation
    }

    fn local_position(&self) -> Vec3 {
        self.position
    }

    fn set_local_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn set_local_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

/// Mouse-look fly camera. Owns only its tuning; the pose lives in the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlyCamera {
    pub settings: CameraSettings,
}

impl FlyCamera {
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }

    /// Apply one frame of input: rotation first, then translation along the
    /// new orientation. Reads and writes the pose exactly once each.
    pub fn update<C: CameraPose + ?Sized>(&self, camera: &mut C, input: &InputFrame, dt: f32) -> Pose {
        let rotation = compute_rotation(camera.local_rotation(), input.pan, &self.settings);
        let position = compute_translation(
            camera.local_position(),
            rotation,
            input.movement,
            input.run,
            dt,
            &self.settings,
        );

        camera.set_local_rotation(rotation);
        camera.set_local_position(position);
        Pose { position, rotation }
    }
}

use glam::{Quat, Vec3};
use overlook_camera::CameraPose;
use overlook_host::{CameraHandle, Engine, UnitHandle};

/// The camera unit as seen by the solver: pose reads and writes go to the
/// unit's root node, which carries the camera with it.
pub struct CameraRig<'a, E: Engine + ?Sized> {
    engine: &'a mut E,
    unit: UnitHandle,
}

impl<'a, E: Engine + ?Sized> CameraRig<'a, E> {
    pub fn new(engine: &'a mut E, unit: UnitHandle) -> Self {
        Self { engine, unit }
    }

    /// Place both the unit and its camera component.
    pub fn place(&mut self, camera: CameraHandle, position: Vec3, rotation: Quat) {
        self.engine.set_unit_local_position(self.unit, position);
        self.engine
            .set_camera_local_position(camera, self.unit, position);
        self.engine.set_unit_local_rotation(self.unit, rotation);
        self.engine
            .set_camera_local_rotation(camera, self.unit, rotation);
    }
}

impl<E: Engine + ?Sized> CameraPose for CameraRig<'_, E> {
    fn local_rotation(&self) -> Quat {
        self.engine.unit_local_rotation(self.unit)
    }

    fn local_position(&self) -> Vec3 {
        self.engine.unit_local_position(self.unit)
    }

    fn set_local_rotation(&mut self, rotation: Quat) {
        self.engine.set_unit_local_rotation(self.unit, rotation);
    }

    fn set_local_position(&mut self, position: Vec3) {
        self.engine.set_unit_local_position(self.unit, position);
    }
}

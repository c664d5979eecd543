use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::handles::{
    CameraHandle, GuiHandle, LevelHandle, ShadingEnvironmentHandle, UnitHandle, ViewportHandle,
    WindowHandle, WorldHandle,
};

/// Build and platform description reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub build: String,
    pub build_identifier: String,
    pub platform: String,
    pub sysinfo: String,
}

/// Window placement in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WindowRect {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// How a screen GUI composites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGuiOptions {
    /// Drawn after everything else in the world, on top of the 3D scene.
    pub immediate: bool,
}

/// Everything a world render needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub world: WorldHandle,
    pub camera: CameraHandle,
    pub viewport: ViewportHandle,
    pub shading_environment: ShadingEnvironmentHandle,
    pub window: WindowHandle,
}

/// Application, window, world, level, unit, and camera operations.
///
/// Unit pose accessors address the unit's root node.
pub trait Engine {
    fn app_info(&self) -> AppInfo;

    /// The host's settings file as JSON.
    fn settings(&self) -> serde_json::Value;

    fn argv(&self) -> Vec<String>;

    /// Whether a resource of `kind` named `name` can be loaded.
    fn can_get(&self, kind: &str, name: &str) -> bool;

    fn main_window(&self) -> WindowHandle;
    fn set_show_cursor(&mut self, window: WindowHandle, show: bool, restore_position: bool);
    fn set_clip_cursor(&mut self, window: WindowHandle, clip: bool);
    fn set_mouse_focus(&mut self, window: WindowHandle, focus: bool);
    fn window_rect(&self, window: WindowHandle) -> WindowRect;

    fn new_world(&mut self) -> Option<WorldHandle>;
    fn create_viewport(&mut self, world: WorldHandle, template: &str) -> Option<ViewportHandle>;
    fn create_screen_gui(
        &mut self,
        world: WorldHandle,
        options: ScreenGuiOptions,
    ) -> Option<GuiHandle>;

    fn spawn_unit(&mut self, world: WorldHandle, name: &str, pose: Mat4) -> Option<UnitHandle>;
    fn unit_camera(&self, unit: UnitHandle, index: u32) -> Option<CameraHandle>;
    fn unit_local_rotation(&self, unit: UnitHandle) -> Quat;
    fn unit_local_position(&self, unit: UnitHandle) -> Vec3;
    fn set_unit_local_rotation(&mut self, unit: UnitHandle, rotation: Quat);
    fn set_unit_local_position(&mut self, unit: UnitHandle, position: Vec3);

    fn set_camera_local_rotation(&mut self, camera: CameraHandle, unit: UnitHandle, rotation: Quat);
    fn set_camera_local_position(&mut self, camera: CameraHandle, unit: UnitHandle, position: Vec3);

    /// Unproject a screen point. `depth` runs from 0 (near plane) to 1 (far plane).
    fn screen_to_world(
        &self,
        camera: CameraHandle,
        point: Vec2,
        depth: f32,
        width: f32,
        height: f32,
    ) -> Vec3;

    fn load_level(&mut self, world: WorldHandle, name: &str) -> Option<LevelHandle>;
    fn spawn_background(&mut self, level: LevelHandle);
    fn level_data(&self, level: LevelHandle, key: &str) -> Option<String>;
    fn trigger_level_update(&mut self, level: LevelHandle);

    fn create_shading_environment(
        &mut self,
        world: WorldHandle,
        name: &str,
    ) -> Option<ShadingEnvironmentHandle>;
    fn set_shading_environment(
        &mut self,
        world: WorldHandle,
        environment: ShadingEnvironmentHandle,
        name: &str,
    );

    fn update_world(&mut self, world: WorldHandle, dt: f32);
    fn render_world(&mut self, target: RenderTarget);
    fn release_world(&mut self, world: WorldHandle);

    /// Ask the host to exit after the current frame.
    fn quit(&mut self, exit_code: i32);
}

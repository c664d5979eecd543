use std::collections::{BTreeMap, BTreeSet};

use glam::{Mat4, Quat, Vec2, Vec3};
use overlook_common::Pose;
use overlook_input::{AxisId, ButtonId, Controller, InputDevices, VirtualDevices};
use serde::{Deserialize, Serialize};

use crate::engine::{AppInfo, Engine, RenderTarget, ScreenGuiOptions, WindowRect};
use crate::handles::{
    BitmapHandle, CameraHandle, GuiHandle, LevelHandle, MaterialHandle, ShadingEnvironmentHandle,
    UnitHandle, ViewportHandle, WebViewHandle, WindowHandle, WorldHandle,
};
use crate::overlay::{BitmapRect, Overlay};

/// Creation operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    World,
    Viewport,
    ScreenGui,
    Unit,
    Camera,
    Level,
    ShadingEnvironment,
    Material,
    Bitmap,
    WebView,
}

/// A mutating call made against the headless host, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetShowCursor { show: bool, restore_position: bool },
    SetClipCursor(bool),
    SetMouseFocus(bool),
    NewWorld(WorldHandle),
    CreateViewport { world: WorldHandle, template: String },
    CreateScreenGui { gui: GuiHandle, options: ScreenGuiOptions },
    SpawnUnit { unit: UnitHandle, name: String },
    SetUnitRotation { unit: UnitHandle, rotation: Quat },
    SetUnitPosition { unit: UnitHandle, position: Vec3 },
    SetCameraRotation { camera: CameraHandle, rotation: Quat },
    SetCameraPosition { camera: CameraHandle, position: Vec3 },
    LoadLevel { level: LevelHandle, name: String },
    SpawnBackground(LevelHandle),
    TriggerLevelUpdate(LevelHandle),
    CreateShadingEnvironment { name: String },
    SetShadingEnvironment { environment: ShadingEnvironmentHandle, name: String },
    UpdateWorld { world: WorldHandle, dt: f32 },
    RenderWorld(RenderTarget),
    ReleaseWorld(WorldHandle),
    Quit(i32),
    GuiMaterial { material: MaterialHandle, name: String },
    CreateBitmap { bitmap: BitmapHandle, rect: BitmapRect },
    UpdateBitmap { bitmap: BitmapHandle, rect: BitmapRect },
    DestroyBitmap(BitmapHandle),
    CreateWebView { view: WebViewHandle, url: String },
    RenderWebView(WebViewHandle),
    PickWebView { click: Vec2, origin: Vec3, ray: Vec3 },
    DestroyWebView(WebViewHandle),
}

const MAIN_WINDOW: WindowHandle = WindowHandle(0);
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;
const VERTICAL_FOV_DEGREES: f32 = 60.0;

/// Deterministic in-memory host.
///
/// Keeps unit and camera poses, known resources, and per-level data, and
/// records every mutating call. Cameras project from their unit's pose.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    /// Mouse and keyboard state the session polls.
    pub devices: VirtualDevices,
    info: AppInfo,
    settings: serde_json::Value,
    argv: Vec<String>,
    window_rect: WindowRect,
    resources: BTreeSet<(String, String)>,
    level_data: BTreeMap<String, BTreeMap<String, String>>,
    failing: BTreeSet<Capability>,
    next_handle: u64,
    units: BTreeMap<UnitHandle, Pose>,
    cameras: BTreeMap<CameraHandle, (UnitHandle, Pose)>,
    levels: BTreeMap<LevelHandle, String>,
    live_worlds: BTreeSet<WorldHandle>,
    live_bitmaps: BTreeSet<BitmapHandle>,
    live_web_views: BTreeSet<WebViewHandle>,
    calls: Vec<HostCall>,
    quit_code: Option<i32>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            devices: VirtualDevices::desktop(),
            info: AppInfo {
                build: "headless".into(),
                build_identifier: env!("CARGO_PKG_VERSION").into(),
                platform: std::env::consts::OS.into(),
                sysinfo: std::env::consts::ARCH.into(),
            },
            settings: serde_json::json!({ "renderer": "headless" }),
            argv: Vec::new(),
            window_rect: WindowRect {
                x: 0.0,
                y: 0.0,
                width: 1280.0,
                height: 720.0,
            },
            resources: BTreeSet::new(),
            level_data: BTreeMap::new(),
            failing: BTreeSet::new(),
            next_handle: 1,
            units: BTreeMap::new(),
            cameras: BTreeMap::new(),
            levels: BTreeMap::new(),
            live_worlds: BTreeSet::new(),
            live_bitmaps: BTreeSet::new(),
            live_web_views: BTreeSet::new(),
            calls: Vec::new(),
            quit_code: None,
        }
    }

    /// Make `can_get(kind, name)` succeed.
    pub fn with_resource(mut self, kind: &str, name: &str) -> Self {
        self.resources.insert((kind.to_owned(), name.to_owned()));
        self
    }

    /// Attach data to the level loaded under `level`.
    pub fn with_level_data(mut self, level: &str, key: &str, value: &str) -> Self {
        self.level_data
            .entry(level.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        self
    }

    /// Make creations of this kind return `None`.
    pub fn with_failure(mut self, capability: Capability) -> Self {
        self.failing.insert(capability);
        self
    }

    pub fn with_window_size(mut self, width: f32, height: f32) -> Self {
        self.window_rect.width = width;
        self.window_rect.height = height;
        self
    }

    pub fn with_argv(mut self, argv: Vec<String>) -> Self {
        self.argv = argv;
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Exit code passed to the most recent `quit`.
    pub fn quit_code(&self) -> Option<i32> {
        self.quit_code
    }

    pub fn unit_pose(&self, unit: UnitHandle) -> Option<Pose> {
        self.units.get(&unit).copied()
    }

    pub fn camera_pose(&self, camera: CameraHandle) -> Option<Pose> {
        self.cameras.get(&camera).map(|(_, pose)| *pose)
    }

    pub fn live_world_count(&self) -> usize {
        self.live_worlds.len()
    }

    pub fn live_web_view_count(&self) -> usize {
        self.live_web_views.len()
    }

    pub fn live_bitmap_count(&self) -> usize {
        self.live_bitmaps.len()
    }

    fn issue(&mut self, capability: Capability) -> Option<u64> {
        if self.failing.contains(&capability) {
            tracing::debug!(?capability, "headless creation failure");
            return None;
        }
        let id = self.next_handle;
        self.next_handle += 1;
        Some(id)
    }

    fn unit_pose_or_default(&self, unit: UnitHandle) -> Pose {
        self.units.get(&unit).copied().unwrap_or_default()
    }
}

impl Engine for HeadlessHost {
    fn app_info(&self) -> AppInfo {
        self.info.clone()
    }

    fn settings(&self) -> serde_json::Value {
        self.settings.clone()
    }

    fn argv(&self) -> Vec<String> {
        self.argv.clone()
    }

    fn can_get(&self, kind: &str, name: &str) -> bool {
        self.resources
            .contains(&(kind.to_owned(), name.to_owned()))
    }

    fn main_window(&self) -> WindowHandle {
        MAIN_WINDOW
    }

    fn set_show_cursor(&mut self, _window: WindowHandle, show: bool, restore_position: bool) {
        self.calls.push(HostCall::SetShowCursor {
            show,
            restore_position,
        });
    }

    fn set_clip_cursor(&mut self, _window: WindowHandle, clip: bool) {
        self.calls.push(HostCall::SetClipCursor(clip));
    }

    fn set_mouse_focus(&mut self, _window: WindowHandle, focus: bool) {
        self.calls.push(HostCall::SetMouseFocus(focus));
    }

    fn window_rect(&self, _window: WindowHandle) -> WindowRect {
        self.window_rect
    }

    fn new_world(&mut self) -> Option<WorldHandle> {
        let world = WorldHandle(self.issue(Capability::World)?);
        self.live_worlds.insert(world);
        self.calls.push(HostCall::NewWorld(world));
        Some(world)
    }

    fn create_viewport(&mut self, world: WorldHandle, template: &str) -> Option<ViewportHandle> {
        let viewport = ViewportHandle(self.issue(Capability::Viewport)?);
        self.calls.push(HostCall::CreateViewport {
            world,
            template: template.to_owned(),
        });
        Some(viewport)
    }

    fn create_screen_gui(
        &mut self,
        _world: WorldHandle,
        options: ScreenGuiOptions,
    ) -> Option<GuiHandle> {
        let gui = GuiHandle(self.issue(Capability::ScreenGui)?);
        self.calls.push(HostCall::CreateScreenGui { gui, options });
        Some(gui)
    }

    fn spawn_unit(&mut self, _world: WorldHandle, name: &str, pose: Mat4) -> Option<UnitHandle> {
        let unit = UnitHandle(self.issue(Capability::Unit)?);
        let (_, rotation, position) = pose.to_scale_rotation_translation();
        self.units.insert(unit, Pose { position, rotation });
        self.calls.push(HostCall::SpawnUnit {
            unit,
            name: name.to_owned(),
        });
        Some(unit)
    }

    fn unit_camera(&self, unit: UnitHandle, index: u32) -> Option<CameraHandle> {
        if index != 0 || self.failing.contains(&Capability::Camera) {
            return None;
        }
        self.units.contains_key(&unit).then_some(CameraHandle(unit.0))
    }

    fn unit_local_rotation(&self, unit: UnitHandle) -> Quat {
        self.unit_pose_or_default(unit).rotation
    }

    fn unit_local_position(&self, unit: UnitHandle) -> Vec3 {
        self.unit_pose_or_default(unit).position
    }

    fn set_unit_local_rotation(&mut self, unit: UnitHandle, rotation: Quat) {
        if let Some(pose) = self.units.get_mut(&unit) {
            pose.rotation = rotation;
        }
        self.calls.push(HostCall::SetUnitRotation { unit, rotation });
    }

    fn set_unit_local_position(&mut self, unit: UnitHandle, position: Vec3) {
        if let Some(pose) = self.units.get_mut(&unit) {
            pose.position = position;
        }
        self.calls.push(HostCall::SetUnitPosition { unit, position });
    }

    fn set_camera_local_rotation(&mut self, camera: CameraHandle, unit: UnitHandle, rotation: Quat) {
        self.cameras.entry(camera).or_insert((unit, Pose::default())).1.rotation = rotation;
        self.calls.push(HostCall::SetCameraRotation { camera, rotation });
    }

    fn set_camera_local_position(&mut self, camera: CameraHandle, unit: UnitHandle, position: Vec3) {
        self.cameras.entry(camera).or_insert((unit, Pose::default())).1.position = position;
        self.calls.push(HostCall::SetCameraPosition { camera, position });
    }

    fn screen_to_world(
        &self,
        camera: CameraHandle,
        point: Vec2,
        depth: f32,
        width: f32,
        height: f32,
    ) -> Vec3 {
        // Cameras are spawned as component 0 and share their unit's handle value.
        let pose = self
            .cameras
            .get(&camera)
            .map(|(unit, _)| self.unit_pose_or_default(*unit))
            .unwrap_or_else(|| self.unit_pose_or_default(UnitHandle(camera.0)));

        let ndc = if width > 0.0 && height > 0.0 {
            Vec2::new(point.x / width * 2.0 - 1.0, 1.0 - point.y / height * 2.0)
        } else {
            Vec2::ZERO
        };
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let half = (VERTICAL_FOV_DEGREES.to_radians() * 0.5).tan();
        let local = Vec3::new(ndc.x * half * aspect, 1.0, ndc.y * half);
        let distance = NEAR_PLANE + depth * (FAR_PLANE - NEAR_PLANE);
        pose.position + pose.rotation * (local * distance)
    }

    fn load_level(&mut self, _world: WorldHandle, name: &str) -> Option<LevelHandle> {
        let level = LevelHandle(self.issue(Capability::Level)?);
        self.levels.insert(level, name.to_owned());
        self.calls.push(HostCall::LoadLevel {
            level,
            name: name.to_owned(),
        });
        Some(level)
    }

    fn spawn_background(&mut self, level: LevelHandle) {
        self.calls.push(HostCall::SpawnBackground(level));
    }

    fn level_data(&self, level: LevelHandle, key: &str) -> Option<String> {
        let name = self.levels.get(&level)?;
        self.level_data.get(name)?.get(key).cloned()
    }

    fn trigger_level_update(&mut self, level: LevelHandle) {
        self.calls.push(HostCall::TriggerLevelUpdate(level));
    }

    fn create_shading_environment(
        &mut self,
        _world: WorldHandle,
        name: &str,
    ) -> Option<ShadingEnvironmentHandle> {
        let environment = ShadingEnvironmentHandle(self.issue(Capability::ShadingEnvironment)?);
        self.calls.push(HostCall::CreateShadingEnvironment {
            name: name.to_owned(),
        });
        Some(environment)
    }

    fn set_shading_environment(
        &mut self,
        _world: WorldHandle,
        environment: ShadingEnvironmentHandle,
        name: &str,
    ) {
        self.calls.push(HostCall::SetShadingEnvironment {
            environment,
            name: name.to_owned(),
        });
    }

    fn update_world(&mut self, world: WorldHandle, dt: f32) {
        self.calls.push(HostCall::UpdateWorld { world, dt });
    }

    fn render_world(&mut self, target: RenderTarget) {
        self.calls.push(HostCall::RenderWorld(target));
    }

    fn release_world(&mut self, world: WorldHandle) {
        self.live_worlds.remove(&world);
        self.calls.push(HostCall::ReleaseWorld(world));
    }

    fn quit(&mut self, exit_code: i32) {
        self.quit_code = Some(exit_code);
        self.calls.push(HostCall::Quit(exit_code));
    }
}

impl Overlay for HeadlessHost {
    fn gui_material(&mut self, _gui: GuiHandle, name: &str) -> Option<MaterialHandle> {
        let material = MaterialHandle(self.issue(Capability::Material)?);
        self.calls.push(HostCall::GuiMaterial {
            material,
            name: name.to_owned(),
        });
        Some(material)
    }

    fn gui_resolution(&self, _viewport: ViewportHandle, _window: WindowHandle) -> Vec2 {
        self.window_rect.size()
    }

    fn create_bitmap(
        &mut self,
        _gui: GuiHandle,
        _material: MaterialHandle,
        rect: BitmapRect,
    ) -> Option<BitmapHandle> {
        let bitmap = BitmapHandle(self.issue(Capability::Bitmap)?);
        self.live_bitmaps.insert(bitmap);
        self.calls.push(HostCall::CreateBitmap { bitmap, rect });
        Some(bitmap)
    }

    fn update_bitmap(
        &mut self,
        _gui: GuiHandle,
        bitmap: BitmapHandle,
        _material: MaterialHandle,
        rect: BitmapRect,
    ) {
        self.calls.push(HostCall::UpdateBitmap { bitmap, rect });
    }

    fn destroy_bitmap(&mut self, _gui: GuiHandle, bitmap: BitmapHandle) {
        self.live_bitmaps.remove(&bitmap);
        self.calls.push(HostCall::DestroyBitmap(bitmap));
    }

    fn create_web_view(
        &mut self,
        url: &str,
        _window: WindowHandle,
        _material: MaterialHandle,
    ) -> Option<WebViewHandle> {
        let view = WebViewHandle(self.issue(Capability::WebView)?);
        self.live_web_views.insert(view);
        self.calls.push(HostCall::CreateWebView {
            view,
            url: url.to_owned(),
        });
        Some(view)
    }

    fn render_web_view(&mut self, view: WebViewHandle) {
        self.calls.push(HostCall::RenderWebView(view));
    }

    fn pick_web_view(&mut self, click: Vec2, origin: Vec3, ray: Vec3) {
        self.calls.push(HostCall::PickWebView { click, origin, ray });
    }

    fn destroy_web_view(&mut self, view: WebViewHandle) {
        self.live_web_views.remove(&view);
        self.calls.push(HostCall::DestroyWebView(view));
    }
}

impl InputDevices for HeadlessHost {
    fn button_id(&self, controller: Controller, name: &str) -> Option<ButtonId> {
        self.devices.button_id(controller, name)
    }

    fn axis_id(&self, controller: Controller, name: &str) -> Option<AxisId> {
        self.devices.axis_id(controller, name)
    }

    fn button(&self, controller: Controller, id: ButtonId) -> f32 {
        self.devices.button(controller, id)
    }

    fn pressed(&self, controller: Controller, id: ButtonId) -> bool {
        self.devices.pressed(controller, id)
    }

    fn axis(&self, controller: Controller, id: AxisId) -> Vec2 {
        self.devices.axis(controller, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut host = HeadlessHost::new();
        let a = host.new_world().unwrap();
        let b = host.new_world().unwrap();
        assert_ne!(a, b);
        assert_eq!(host.live_world_count(), 2);
    }

    #[test]
    fn injected_failure_returns_none() {
        let mut host = HeadlessHost::new().with_failure(Capability::World);
        assert!(host.new_world().is_none());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn spawned_unit_takes_pose_from_matrix() {
        let mut host = HeadlessHost::new();
        let world = host.new_world().unwrap();
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let unit = host.spawn_unit(world, "probe", m).unwrap();
        assert_eq!(host.unit_local_position(unit), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(host.unit_local_rotation(unit), Quat::IDENTITY);
    }

    #[test]
    fn unit_camera_only_for_index_zero() {
        let mut host = HeadlessHost::new();
        let world = host.new_world().unwrap();
        let unit = host.spawn_unit(world, "cam", Mat4::IDENTITY).unwrap();
        assert!(host.unit_camera(unit, 0).is_some());
        assert!(host.unit_camera(unit, 1).is_none());
        assert!(host.unit_camera(UnitHandle(999), 0).is_none());
    }

    #[test]
    fn level_data_is_keyed_by_level_name() {
        let mut host = HeadlessHost::new().with_level_data("levels/a", "sky", "dusk");
        let world = host.new_world().unwrap();
        let a = host.load_level(world, "levels/a").unwrap();
        let b = host.load_level(world, "levels/b").unwrap();
        assert_eq!(host.level_data(a, "sky").as_deref(), Some("dusk"));
        assert_eq!(host.level_data(b, "sky"), None);
    }

    #[test]
    fn center_of_screen_projects_along_forward() {
        let mut host = HeadlessHost::new();
        let world = host.new_world().unwrap();
        let unit = host.spawn_unit(world, "cam", Mat4::IDENTITY).unwrap();
        let camera = host.unit_camera(unit, 0).unwrap();
        host.set_unit_local_position(unit, Vec3::new(0.0, 0.0, 3.0));

        let near = host.screen_to_world(camera, Vec2::new(640.0, 360.0), 0.0, 1280.0, 720.0);
        let far = host.screen_to_world(camera, Vec2::new(640.0, 360.0), 1.0, 1280.0, 720.0);
        let ray = (far - near).normalize();
        assert!(ray.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(near.abs_diff_eq(Vec3::new(0.0, NEAR_PLANE, 3.0), 1e-5));
    }

    #[test]
    fn argv_and_window_size_are_reported() {
        let host = HeadlessHost::new()
            .with_argv(vec!["overlook".into(), "--fast".into()])
            .with_window_size(800.0, 600.0);
        assert_eq!(host.argv(), vec!["overlook".to_owned(), "--fast".to_owned()]);
        assert_eq!(host.window_rect(MAIN_WINDOW).size(), Vec2::new(800.0, 600.0));
        assert_eq!(
            host.gui_resolution(ViewportHandle(1), MAIN_WINDOW),
            Vec2::new(800.0, 600.0)
        );
    }

    #[test]
    fn quit_records_exit_code() {
        let mut host = HeadlessHost::new();
        assert_eq!(host.quit_code(), None);
        host.quit(3);
        assert_eq!(host.quit_code(), Some(3));
        assert_eq!(host.calls(), &[HostCall::Quit(3)]);
    }

    #[test]
    fn web_view_lifecycle_is_tracked() {
        let mut host = HeadlessHost::new();
        let view = host
            .create_web_view("about:blank", MAIN_WINDOW, MaterialHandle(1))
            .unwrap();
        assert_eq!(host.live_web_view_count(), 1);
        host.destroy_web_view(view);
        assert_eq!(host.live_web_view_count(), 0);
    }

    #[test]
    fn resources_resolve_by_kind_and_name() {
        let host = HeadlessHost::new().with_resource("shading_environment", "env/a");
        assert!(host.can_get("shading_environment", "env/a"));
        assert!(!host.can_get("texture", "env/a"));
    }
}

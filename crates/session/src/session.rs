use glam::Vec2;
use overlook_camera::FlyCamera;
use overlook_common::Pose;
use overlook_host::{
    BitmapHandle, BitmapRect, CameraHandle, GuiHandle, Host, LevelHandle, MaterialHandle,
    RenderTarget, ScreenGuiOptions, ShadingEnvironmentHandle, UnitHandle, ViewportHandle,
    WebViewHandle, WindowHandle, WorldHandle,
};
use overlook_input::{Bindings, InputFrame, InputReader};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::rig::CameraRig;
use crate::shading::resolve_shading_environment;

/// Host resources owned by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResources {
    pub window: WindowHandle,
    pub world: WorldHandle,
    pub viewport: ViewportHandle,
    pub gui: GuiHandle,
    pub overlay_gui: GuiHandle,
    pub overlay_material: MaterialHandle,
    pub overlay_view: WebViewHandle,
    pub overlay_bitmap: BitmapHandle,
    pub camera_unit: UnitHandle,
    pub camera: CameraHandle,
    pub level: LevelHandle,
    pub shading_environment: ShadingEnvironmentHandle,
    pub shading_environment_name: String,
}

/// A running sample: owns the host and everything created on it.
///
/// The frame driver owns the session and calls [`Session::update`] then
/// [`Session::render`] once per frame.
pub struct Session<H: Host> {
    host: H,
    config: SessionConfig,
    resources: SessionResources,
    reader: InputReader,
    camera: FlyCamera,
    input: InputFrame,
    closing: bool,
    frame: u64,
}

struct WorldParts {
    world: WorldHandle,
    viewport: ViewportHandle,
    gui: GuiHandle,
    overlay_gui: GuiHandle,
    overlay_material: MaterialHandle,
    overlay_view: WebViewHandle,
    overlay_bitmap: BitmapHandle,
}

struct LevelParts {
    level: LevelHandle,
    shading_environment: ShadingEnvironmentHandle,
    shading_environment_name: String,
}

impl<H: Host> Session<H> {
    /// Set up the application, world, overlay, camera, and level.
    pub fn init(mut host: H, config: SessionConfig) -> Result<Self, SessionError> {
        let _span = tracing::info_span!("session_init").entered();
        config.validate()?;
        let bindings = Bindings::resolve(&host, &config.bindings)?;

        setup_application(&mut host);
        let window = host.main_window();
        let parts = create_world(&mut host, window, &config)?;
        let (camera_unit, camera) = create_camera(&mut host, parts.world, &config)?;
        let level = load_level(&mut host, parts.world, &config)?;
        tracing::info!("session ready");

        Ok(Self {
            host,
            reader: InputReader::new(bindings),
            camera: FlyCamera::new(config.camera),
            config,
            resources: SessionResources {
                window,
                world: parts.world,
                viewport: parts.viewport,
                gui: parts.gui,
                overlay_gui: parts.overlay_gui,
                overlay_material: parts.overlay_material,
                overlay_view: parts.overlay_view,
                overlay_bitmap: parts.overlay_bitmap,
                camera_unit,
                camera,
                level: level.level,
                shading_environment: level.shading_environment,
                shading_environment_name: level.shading_environment_name,
            },
            input: InputFrame::default(),
            closing: false,
            frame: 0,
        })
    }

    /// Advance one frame: read input, move the camera, forward clicks to the
    /// overlay, and step the level and world.
    pub fn update(&mut self, dt: f32) {
        if self.closing {
            return;
        }
        let _span = tracing::debug_span!("update", frame = self.frame).entered();

        self.input = self.reader.read(&self.host);
        if self.reader.quit_requested(&self.host) {
            tracing::info!("quit requested");
            self.quit(0);
            return;
        }

        if self.input.looking {
            let mut rig = CameraRig::new(&mut self.host, self.resources.camera_unit);
            let pose = self.camera.update(&mut rig, &self.input, dt);
            tracing::trace!(position = ?pose.position, rotation = ?pose.rotation, "camera");
        }

        if let Some(click) = self.input.click {
            self.pick(click);
        }

        let r = &self.resources;
        self.host.trigger_level_update(r.level);
        self.host.update_world(r.world, dt);
        self.frame += 1;
    }

    /// Composite the overlay and draw the world.
    pub fn render(&mut self) {
        if self.closing {
            return;
        }
        let r = &self.resources;
        let size = self.host.gui_resolution(r.viewport, r.window);
        self.host.render_web_view(r.overlay_view);
        self.host.update_bitmap(
            r.overlay_gui,
            r.overlay_bitmap,
            r.overlay_material,
            BitmapRect {
                position: Vec2::ZERO,
                layer: self.config.overlay.layer,
                size,
            },
        );
        self.host.render_world(RenderTarget {
            world: r.world,
            camera: r.camera,
            viewport: r.viewport,
            shading_environment: r.shading_environment,
            window: r.window,
        });
    }

    /// Release everything the session created and hand the host back.
    pub fn shutdown(mut self) -> H {
        let r = &self.resources;
        self.host.destroy_bitmap(r.overlay_gui, r.overlay_bitmap);
        self.host.destroy_web_view(r.overlay_view);
        self.host.release_world(r.world);
        tracing::info!(frames = self.frame, "session shut down");
        self.quit(0);
        self.host
    }

    /// Stop updating and rendering, and ask the host to exit.
    pub fn quit(&mut self, exit_code: i32) {
        self.closing = true;
        self.host.quit(exit_code);
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Frames completed by [`Session::update`].
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Input read by the most recent update.
    pub fn last_input(&self) -> &InputFrame {
        &self.input
    }

    pub fn camera_pose(&self) -> Pose {
        let unit = self.resources.camera_unit;
        Pose::new(
            self.host.unit_local_position(unit),
            self.host.unit_local_rotation(unit),
        )
    }

    pub fn resources(&self) -> &SessionResources {
        &self.resources
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Cast a ray from the click through the camera and let the overlay hit-test it.
    fn pick(&mut self, click: Vec2) {
        let r = &self.resources;
        let rect = self.host.window_rect(r.window);
        let near = self
            .host
            .screen_to_world(r.camera, click, 0.0, rect.width, rect.height);
        let far = self
            .host
            .screen_to_world(r.camera, click, 1.0, rect.width, rect.height);
        let ray = (far - near).normalize_or_zero();
        tracing::debug!(?click, ?near, ?ray, "web view pick");
        self.host.pick_web_view(click, near, ray);
    }
}

fn setup_application<H: Host>(host: &mut H) {
    let info = host.app_info();
    tracing::info!(
        build = %info.build,
        build_identifier = %info.build_identifier,
        platform = %info.platform,
        "application"
    );
    tracing::info!(sysinfo = %info.sysinfo, "system information");
    tracing::debug!(settings = %host.settings(), "settings");

    let window = host.main_window();
    host.set_show_cursor(window, true, true);
    host.set_clip_cursor(window, false);
    host.set_mouse_focus(window, true);

    tracing::info!(args = ?host.argv(), "arguments");
}

fn create_world<H: Host>(
    host: &mut H,
    window: WindowHandle,
    config: &SessionConfig,
) -> Result<WorldParts, SessionError> {
    let world = host.new_world().ok_or(SessionError::World)?;
    let viewport = host
        .create_viewport(world, &config.viewport_template)
        .ok_or_else(|| SessionError::Viewport(config.viewport_template.clone()))?;
    let gui = host
        .create_screen_gui(world, ScreenGuiOptions { immediate: false })
        .ok_or(SessionError::Gui("screen"))?;
    let overlay_gui = host
        .create_screen_gui(world, ScreenGuiOptions { immediate: true })
        .ok_or(SessionError::Gui("overlay"))?;
    tracing::info!("world created");

    let overlay = &config.overlay;
    let overlay_material = host
        .gui_material(overlay_gui, &overlay.material)
        .ok_or_else(|| SessionError::OverlayMaterial(overlay.material.clone()))?;
    let overlay_view = host
        .create_web_view(&overlay.url, window, overlay_material)
        .ok_or_else(|| SessionError::WebView(overlay.url.clone()))?;
    tracing::info!(url = %overlay.url, "web view created");

    let size = host.gui_resolution(viewport, window);
    let overlay_bitmap = host
        .create_bitmap(
            overlay_gui,
            overlay_material,
            BitmapRect {
                position: Vec2::ZERO,
                layer: overlay.layer,
                size,
            },
        )
        .ok_or(SessionError::OverlayBitmap)?;

    Ok(WorldParts {
        world,
        viewport,
        gui,
        overlay_gui,
        overlay_material,
        overlay_view,
        overlay_bitmap,
    })
}

fn create_camera<H: Host>(
    host: &mut H,
    world: WorldHandle,
    config: &SessionConfig,
) -> Result<(UnitHandle, CameraHandle), SessionError> {
    let name = &config.camera_unit;
    let pose = config.initial_pose;
    let unit = host
        .spawn_unit(world, name, pose.to_mat4())
        .ok_or_else(|| SessionError::CameraUnit(name.clone()))?;
    let camera = host
        .unit_camera(unit, 0)
        .ok_or_else(|| SessionError::CameraComponent(name.clone()))?;

    CameraRig::new(host, unit).place(camera, pose.position, pose.rotation);
    tracing::info!(position = ?pose.position, "camera created");
    Ok((unit, camera))
}

fn load_level<H: Host>(
    host: &mut H,
    world: WorldHandle,
    config: &SessionConfig,
) -> Result<LevelParts, SessionError> {
    let name = &config.level;
    let level = host
        .load_level(world, name)
        .ok_or_else(|| SessionError::Level(name.clone()))?;
    host.spawn_background(level);

    let shading = &config.shading;
    let level_choice = host.level_data(level, &shading.level_key);
    let env_name = resolve_shading_environment(level_choice, &shading.candidates, |n| {
        host.can_get("shading_environment", n)
    })
    .ok_or(SessionError::NoShadingCandidates)?;

    let shading_environment = host
        .create_shading_environment(world, &env_name)
        .ok_or_else(|| SessionError::ShadingEnvironment(env_name.clone()))?;
    host.set_shading_environment(world, shading_environment, &env_name);

    tracing::info!(level = %name, shading_environment = %env_name, "level loaded");
    Ok(LevelParts {
        level,
        shading_environment,
        shading_environment_name: env_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use glam::{Quat, Vec3};
    use overlook_host::{Capability, Engine, HeadlessHost, HostCall};

    const DT: f32 = 0.5;

    fn session() -> Session<HeadlessHost> {
        Session::init(HeadlessHost::new(), SessionConfig::default()).unwrap()
    }

    fn hold_look(s: &mut Session<HeadlessHost>) {
        s.host_mut().devices.mouse.set_button("right", true);
    }

    #[test]
    fn init_creates_world_overlay_and_camera() {
        let s = session();
        let host = s.host();
        assert_eq!(host.live_world_count(), 1);
        assert_eq!(host.live_web_view_count(), 1);
        assert_eq!(host.live_bitmap_count(), 1);
        assert!(host.calls().contains(&HostCall::CreateWebView {
            view: s.resources().overlay_view,
            url: "http://www.google.com".into(),
        }));
        assert!(host.calls().contains(&HostCall::SpawnUnit {
            unit: s.resources().camera_unit,
            name: "core/appkit/units/camera/camera".into(),
        }));
        assert_eq!(s.camera_pose().position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(s.camera_pose().rotation, Quat::IDENTITY);
        assert!(!s.is_closing());
    }

    #[test]
    fn init_shows_and_releases_cursor() {
        let s = session();
        let calls = s.host().calls();
        assert_eq!(
            &calls[..3],
            &[
                HostCall::SetShowCursor {
                    show: true,
                    restore_position: true
                },
                HostCall::SetClipCursor(false),
                HostCall::SetMouseFocus(true),
            ]
        );
    }

    #[test]
    fn level_shading_environment_wins() {
        let host = HeadlessHost::new().with_level_data(
            "levels/sample",
            "shading_environment",
            "env/from_level",
        );
        let s = Session::init(host, SessionConfig::default()).unwrap();
        assert_eq!(s.resources().shading_environment_name, "env/from_level");
    }

    #[test]
    fn loadable_fallback_environment_is_chosen() {
        let host = HeadlessHost::new()
            .with_resource("shading_environment", "core/rendering/default_outdoor");
        let s = Session::init(host, SessionConfig::default()).unwrap();
        assert_eq!(
            s.resources().shading_environment_name,
            "core/rendering/default_outdoor"
        );
    }

    #[test]
    fn init_fails_fast_on_host_failures() {
        let cases = [
            (Capability::World, "world"),
            (Capability::Camera, "camera component"),
            (Capability::WebView, "web view"),
            (Capability::Level, "level"),
        ];
        for (capability, label) in cases {
            let host = HeadlessHost::new().with_failure(capability);
            let err = match Session::init(host, SessionConfig::default()) {
                Ok(_) => panic!("{label}: init should fail"),
                Err(e) => e,
            };
            let ok = match capability {
                Capability::World => matches!(err, SessionError::World),
                Capability::Camera => matches!(err, SessionError::CameraComponent(_)),
                Capability::WebView => matches!(err, SessionError::WebView(_)),
                Capability::Level => matches!(err, SessionError::Level(_)),
                _ => false,
            };
            assert!(ok, "{label}: unexpected error {err}");
        }
    }

    #[test]
    fn invalid_config_rejected_before_touching_host() {
        let mut config = SessionConfig::default();
        config.camera.mouse_scale = f32::NAN;
        let err = Session::init(HeadlessHost::new(), config).err().unwrap();
        assert!(matches!(err, SessionError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_binding_is_an_input_error() {
        let mut config = SessionConfig::default();
        config.bindings.quit = "pause".into();
        let err = Session::init(HeadlessHost::new(), config).err().unwrap();
        assert!(matches!(err, SessionError::Input(_)));
    }

    #[test]
    fn empty_candidate_list_is_its_own_error() {
        let mut config = SessionConfig::default();
        config.shading.candidates.clear();
        let err = Session::init(HeadlessHost::new(), config).err().unwrap();
        assert!(matches!(err, SessionError::Config(_)));

        let mut host = HeadlessHost::new();
        let world = host.new_world().unwrap();
        let mut config = SessionConfig::default();
        config.shading.candidates.clear();
        let err = load_level(&mut host, world, &config).err().unwrap();
        assert!(matches!(err, SessionError::NoShadingCandidates));
    }

    #[test]
    fn camera_unit_spawns_at_initial_pose() {
        let mut config = SessionConfig::default();
        config.initial_pose = Pose::new(Vec3::new(4.0, -2.0, 1.5), Quat::from_rotation_z(0.3));
        let s = Session::init(HeadlessHost::new(), config.clone()).unwrap();
        let spawned = s.host().unit_pose(s.resources().camera_unit).unwrap();
        assert!(spawned.position.abs_diff_eq(config.initial_pose.position, 1e-6));
        assert!(spawned.rotation.abs_diff_eq(config.initial_pose.rotation, 1e-6));
    }

    #[test]
    fn mouse_motion_is_applied_once() {
        let mut s = session();
        hold_look(&mut s);
        s.host_mut().devices.mouse.set_axis("mouse", Vec2::new(20.0, 0.0));
        s.update(DT);
        assert_eq!(s.last_input().pan, Vec2::new(20.0, 0.0));
        let turned = s.camera_pose().rotation;

        s.host_mut().devices.advance();
        s.update(DT);
        assert!(s.last_input().looking);
        assert_eq!(s.last_input().pan, Vec2::ZERO);
        assert_eq!(s.camera_pose().rotation, turned);
    }

    #[test]
    fn overlay_bitmap_tracks_window_size() {
        let host = HeadlessHost::new().with_window_size(800.0, 600.0);
        let mut s = Session::init(host, SessionConfig::default()).unwrap();
        s.host_mut().take_calls();
        s.render();
        let sized = s.host().calls().iter().any(|c| {
            matches!(c, HostCall::UpdateBitmap { rect, .. } if rect.size == Vec2::new(800.0, 600.0))
        });
        assert!(sized);
    }

    #[test]
    fn camera_stays_put_without_look_button() {
        let mut s = session();
        s.host_mut().devices.keyboard.set_button("w", true);
        s.host_mut().devices.mouse.set_axis("mouse", Vec2::new(40.0, 10.0));
        let before = s.camera_pose();
        s.update(DT);
        assert_eq!(s.camera_pose(), before);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn walking_and_running_forward() {
        let mut s = session();
        hold_look(&mut s);
        s.host_mut().devices.keyboard.set_button("w", true);
        s.update(DT);
        assert!(
            s.camera_pose()
                .position
                .abs_diff_eq(Vec3::new(0.0, 0.5, 3.0), 1e-6)
        );

        s.host_mut().devices.keyboard.set_button("left shift", true);
        s.update(DT);
        assert!(
            s.camera_pose()
                .position
                .abs_diff_eq(Vec3::new(0.0, 2.5, 3.0), 1e-6)
        );
    }

    #[test]
    fn mouse_look_turns_the_camera_unit() {
        let mut s = session();
        hold_look(&mut s);
        s.host_mut().devices.mouse.set_axis("mouse", Vec2::new(20.0, 0.0));
        s.update(DT);
        let forward = s.camera_pose().forward();
        assert!(forward.x > 0.0);
        assert!(forward.z.abs() < 1e-6);
    }

    #[test]
    fn update_steps_level_then_world() {
        let mut s = session();
        s.host_mut().take_calls();
        s.update(DT);
        let r = s.resources().clone();
        assert_eq!(
            s.host().calls(),
            &[
                HostCall::TriggerLevelUpdate(r.level),
                HostCall::UpdateWorld {
                    world: r.world,
                    dt: DT
                },
            ]
        );
    }

    #[test]
    fn click_is_forwarded_as_a_pick_ray() {
        let mut s = session();
        s.host_mut().take_calls();
        s.host_mut()
            .devices
            .mouse
            .set_axis("cursor", Vec2::new(640.0, 360.0));
        s.host_mut().devices.mouse.set_button("left", true);
        s.update(DT);

        let pick = s
            .host()
            .calls()
            .iter()
            .find_map(|c| match c {
                HostCall::PickWebView { click, origin, ray } => Some((*click, *origin, *ray)),
                _ => None,
            })
            .expect("pick call");
        assert_eq!(pick.0, Vec2::new(640.0, 360.0));
        assert!((pick.2.length() - 1.0).abs() < 1e-5);
        assert!(pick.2.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(pick.1.z > 2.9);
    }

    #[test]
    fn render_composites_overlay_before_world() {
        let mut s = session();
        s.host_mut().take_calls();
        s.render();
        let calls = s.host().calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], HostCall::RenderWebView(_)));
        match &calls[1] {
            HostCall::UpdateBitmap { rect, .. } => {
                assert_eq!(rect.size, Vec2::new(1280.0, 720.0));
                assert_eq!(rect.layer, 10);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert!(matches!(calls[2], HostCall::RenderWorld(_)));
    }

    #[test]
    fn quit_key_closes_session() {
        let mut s = session();
        s.host_mut().take_calls();
        s.host_mut().devices.keyboard.set_button("esc", true);
        s.update(DT);
        assert!(s.is_closing());
        assert_eq!(s.host().quit_code(), Some(0));
        assert_eq!(s.host().calls(), &[HostCall::Quit(0)]);

        s.update(DT);
        s.render();
        assert_eq!(s.host().calls().len(), 1);
        assert_eq!(s.frame_count(), 0);
    }

    #[test]
    fn shutdown_releases_everything() {
        let s = session();
        let host = s.shutdown();
        assert_eq!(host.live_world_count(), 0);
        assert_eq!(host.live_web_view_count(), 0);
        assert_eq!(host.live_bitmap_count(), 0);
        assert_eq!(host.quit_code(), Some(0));
        assert!(matches!(host.calls().last(), Some(HostCall::Quit(0))));
    }
}

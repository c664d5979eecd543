//! Host capability surface: everything the sample asks of the engine.
//!
//! The sample never reaches the engine any other way. [`HeadlessHost`] is an
//! in-memory implementation that records what it was asked to do.
//!
//! # Invariants
//! - Handles are opaque and only meaningful to the host that issued them.
//! - Creation calls return `None` on failure; callers decide how to fail.

mod engine;
mod handles;
mod headless;
mod overlay;

pub use engine::{AppInfo, Engine, RenderTarget, ScreenGuiOptions, WindowRect};
pub use handles::{
    BitmapHandle, CameraHandle, GuiHandle, LevelHandle, MaterialHandle, ShadingEnvironmentHandle,
    UnitHandle, ViewportHandle, WebViewHandle, WindowHandle, WorldHandle,
};
pub use headless::{Capability, HeadlessHost, HostCall};
pub use overlay::{BitmapRect, Overlay};

use overlook_input::InputDevices;

/// Full capability set a session runs against.
pub trait Host: Engine + Overlay + InputDevices {}

impl<T: Engine + Overlay + InputDevices> Host for T {}

pub fn crate_info() -> &'static str {
    "overlook-host v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_host<H: Host>(_: &H) {}

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("host"));
    }

    #[test]
    fn headless_is_a_host() {
        assert_host(&HeadlessHost::new());
    }
}

//! Sample session: sets up a world, a fly camera, and a web-view overlay on
//! the host, then drives them one frame at a time.
//!
//! # Invariants
//! - The session is the only owner of host resources it creates, and
//!   releases them in [`Session::shutdown`].
//! - One `update` then one `render` per frame; both are no-ops once closing.
//! - A host creation failure aborts initialization; nothing is retried.

mod config;
mod error;
mod rig;
mod session;
mod shading;

pub use config::{ConfigError, OverlayConfig, SessionConfig, ShadingConfig};
pub use error::SessionError;
pub use rig::CameraRig;
pub use session::{Session, SessionResources};
pub use shading::resolve_shading_environment;

pub fn crate_info() -> &'static str {
    "overlook-session v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("session"));
    }
}

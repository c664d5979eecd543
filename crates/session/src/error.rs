use overlook_input::InputError;

use crate::config::ConfigError;

/// Errors that abort session startup.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("input bindings: {0}")]
    Input(#[from] InputError),
    #[error("failed to create world")]
    World,
    #[error("failed to create viewport from template {0:?}")]
    Viewport(String),
    #[error("failed to create {0} gui")]
    Gui(&'static str),
    #[error("failed to create overlay material {0:?}")]
    OverlayMaterial(String),
    #[error("failed to create web view for {0:?}")]
    WebView(String),
    #[error("failed to create overlay bitmap")]
    OverlayBitmap,
    #[error("failed to spawn camera unit {0:?}")]
    CameraUnit(String),
    #[error("camera unit {0:?} has no camera component")]
    CameraComponent(String),
    #[error("failed to load level {0:?}")]
    Level(String),
    #[error("no shading environment candidates configured")]
    NoShadingCandidates,
    #[error("failed to create shading environment {0:?}")]
    ShadingEnvironment(String),
}

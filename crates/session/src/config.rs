use std::path::Path;

use glam::{Quat, Vec3};
use overlook_camera::{CameraSettings, PitchLimitsError};
use overlook_common::Pose;
use overlook_input::BindingNames;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("pitch limits: {0}")]
    PitchLimits(#[from] PitchLimitsError),
    #[error("{0}")]
    Invalid(String),
}

/// The web page drawn over the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub url: String,
    /// GUI material the web view renders into.
    pub material: String,
    /// Draw order of the overlay bitmap.
    pub layer: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            url: "http://www.google.com".into(),
            material: "html5_resources/web_view_2d".into(),
            layer: 10,
        }
    }
}

/// Where the shading environment comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Level data key naming the level's own environment.
    pub level_key: String,
    /// Fallbacks, most preferred first.
    pub candidates: Vec<String>,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            level_key: "shading_environment".into(),
            candidates: vec![
                "core/stingray_renderer/environments/midday/midday".into(),
                "core/rendering/default_outdoor".into(),
            ],
        }
    }
}

/// Everything the session needs besides the host.
///
/// Missing fields take their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub camera: CameraSettings,
    pub bindings: BindingNames,
    pub viewport_template: String,
    pub camera_unit: String,
    pub initial_pose: Pose,
    pub level: String,
    pub overlay: OverlayConfig,
    pub shading: ShadingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            bindings: BindingNames::default(),
            viewport_template: "default".into(),
            camera_unit: "core/appkit/units/camera/camera".into(),
            initial_pose: Pose::new(Vec3::new(0.0, 0.0, 3.0), Quat::IDENTITY),
            level: "levels/sample".into(),
            overlay: OverlayConfig::default(),
            shading: ShadingConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        cam.pitch_limits.validate()?;
        let speeds = [
            ("mouse_scale", cam.mouse_scale),
            ("yaw_speed", cam.yaw_speed),
            ("pitch_speed", cam.pitch_speed),
            ("translation_speed", cam.translation_speed),
            ("run_multiplier", cam.run_multiplier),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "camera.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.initial_pose.rotation.is_normalized() {
            return Err(ConfigError::Invalid(
                "initial_pose.rotation must be a unit quaternion".into(),
            ));
        }
        if self.shading.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "shading.candidates must name at least one environment".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlook_camera::PitchLimits;
    use std::io::Write;

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_validate() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_pose.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(config.overlay.layer, 10);
    }

    #[test]
    fn yaml_round_trip_keeps_settings() {
        let mut config = SessionConfig::default();
        config.camera.pitch_limits = PitchLimits::new(-60.0, 75.0).unwrap();
        config.level = "levels/lobby".into();

        let yaml = config.to_yaml().unwrap();
        let file = write_temp(".yaml", &yaml);
        let loaded = SessionConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let file = write_temp(".json", r#"{ "overlay": { "url": "about:blank" } }"#);
        let loaded = SessionConfig::load(file.path()).unwrap();
        assert_eq!(loaded.overlay.url, "about:blank");
        assert_eq!(loaded.overlay.layer, 10);
        assert_eq!(loaded.camera, CameraSettings::default());
    }

    #[test]
    fn bad_pitch_limits_in_file_rejected() {
        let body = "camera:\n  pitch_limits:\n    min: 10.0\n    max: -10.0\n";
        let file = write_temp(".yml", body);
        assert!(matches!(
            SessionConfig::load(file.path()),
            Err(ConfigError::PitchLimits(PitchLimitsError::Inverted { .. }))
        ));
    }

    #[test]
    fn unknown_extension_rejected() {
        let file = write_temp(".toml", "level = 'x'");
        assert!(matches!(
            SessionConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn negative_speed_rejected() {
        let mut config = SessionConfig::default();
        config.camera.run_multiplier = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_candidates_rejected() {
        let mut config = SessionConfig::default();
        config.shading.candidates.clear();
        assert!(config.validate().is_err());
    }
}

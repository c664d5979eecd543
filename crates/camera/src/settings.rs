use serde::{Deserialize, Serialize};

/// Errors from validating pitch limits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PitchLimitsError {
    #[error("pitch limit {0} is outside [-90, 90] degrees")]
    OutOfRange(f32),
    #[error("pitch min {min} must be below max {max}")]
    Inverted { min: f32, max: f32 },
    #[error("pitch range [{min}, {max}] must contain the horizon (0 degrees)")]
    ExcludesHorizon { min: f32, max: f32 },
}

/// Pitch range in degrees relative to the horizon. Negative looks down.
///
/// The range must contain the horizon: the clamp only checks `max` above it
/// and `min` below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchLimits {
    min: f32,
    max: f32,
}

impl Default for PitchLimits {
    fn default() -> Self {
        Self {
            min: -90.0,
            max: 90.0,
        }
    }
}

impl PitchLimits {
    pub fn new(min: f32, max: f32) -> Result<Self, PitchLimitsError> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    /// Check the range. Limits built by deserialization must pass this before use.
    pub fn validate(&self) -> Result<(), PitchLimitsError> {
        for v in [self.min, self.max] {
            // NaN fails the range check too.
            if !(-90.0..=90.0).contains(&v) {
                return Err(PitchLimitsError::OutOfRange(v));
            }
        }
        if self.min >= self.max {
            return Err(PitchLimitsError::Inverted {
                min: self.min,
                max: self.max,
            });
        }
        if self.min > 0.0 || self.max < 0.0 {
            return Err(PitchLimitsError::ExcludesHorizon {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn min_degrees(&self) -> f32 {
        self.min
    }

    pub fn max_degrees(&self) -> f32 {
        self.max
    }

    pub fn min_radians(&self) -> f32 {
        self.min.to_radians()
    }

    pub fn max_radians(&self) -> f32 {
        self.max.to_radians()
    }
}

/// Tuning for mouse-look and movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians of rotation per device unit of mouse motion.
    pub mouse_scale: f32,
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub pitch_limits: PitchLimits,
    /// Units per second while walking.
    pub translation_speed: f32,
    /// Speed factor applied while the run modifier is held.
    pub run_multiplier: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            mouse_scale: 0.01,
            yaw_speed: 1.0,
            pitch_speed: 1.0,
            pitch_limits: PitchLimits::default(),
            translation_speed: 1.0,
            run_multiplier: 4.0,
        }
    }
}

impl CameraSettings {
    pub fn speed_multiplier(&self, run: bool) -> f32 {
        if run { self.run_multiplier } else { 1.0 }
    }
}

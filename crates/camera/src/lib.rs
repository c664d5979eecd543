//! First-person camera: mouse-look orientation solver and WASD translation.
//!
//! # Invariants
//! - The orientation stays a unit quaternion after every update.
//! - An idle mouse never changes the orientation.
//! - Pitch never passes the configured limits, measured from the horizon.
//!   Limits always contain the horizon; [`PitchLimits::validate`] enforces it.
//! - The solver only touches the camera through [`CameraPose`].

mod fly;
mod settings;
mod solver;

pub use fly::{CameraPose, FlyCamera};
pub use settings::{CameraSettings, PitchLimits, PitchLimitsError};
pub use solver::{
    clamp_pitch, compute_rotation, compute_translation, elevation_degrees, renormalize,
};

pub fn crate_info() -> &'static str {
    "overlook-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}

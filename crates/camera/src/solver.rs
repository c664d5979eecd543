use glam::{Quat, Vec2, Vec3};
use overlook_common::{WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};

use crate::settings::{CameraSettings, PitchLimits};

/// Squared-length drift tolerated before a quaternion is renormalized.
const DRIFT_TOLERANCE: f32 = 1e-6;

/// Rotate `previous` by one frame of mouse motion.
///
/// Yaw turns about world up, pitch about the camera's own right axis taken
/// from `previous`, so no roll builds up. Both increments are world-space and
/// are left-multiplied onto `previous`. The result is pitch-clamped and unit
/// length. A zero `pan` returns `previous` untouched.
pub fn compute_rotation(previous: Quat, pan: Vec2, settings: &CameraSettings) -> Quat {
    if pan == Vec2::ZERO {
        return previous;
    }

    // Positive x turns right, positive y looks down.
    let yaw = pan.x * settings.mouse_scale * settings.yaw_speed;
    let pitch = pan.y * settings.mouse_scale * settings.pitch_speed;

    let q_yaw = Quat::from_axis_angle(WORLD_UP, -yaw);
    let right = (previous * WORLD_RIGHT).normalize();
    let q_pitch = Quat::from_axis_angle(right, -pitch);

    let q_frame = q_yaw * q_pitch;
    let rotated = q_frame * previous;

    renormalize(clamp_pitch(rotated, settings.pitch_limits))
}

/// Pull `rotation` back inside `limits`.
///
/// The angle between the camera's up and world up is unsigned, so the sign of
/// the forward vector's z picks which limit applies. The correction turns
/// about the camera's own x axis.
pub fn clamp_pitch(rotation: Quat, limits: PitchLimits) -> Quat {
    let tilt = tilt_from_up(rotation);
    let above_horizon = (rotation * WORLD_FORWARD).z > 0.0;

    let adjustment = if above_horizon {
        (limits.max_radians() - tilt).min(0.0)
    } else {
        (limits.min_radians() + tilt).max(0.0)
    };

    if adjustment != 0.0 {
        tracing::trace!(adjustment, above_horizon, "pitch clamped");
        rotation * Quat::from_axis_angle(WORLD_RIGHT, adjustment)
    } else {
        rotation
    }
}

/// Move `position` by this frame's intent, expressed in the camera's frame.
pub fn compute_translation(
    position: Vec3,
    rotation: Quat,
    movement: Vec3,
    run: bool,
    dt: f32,
    settings: &CameraSettings,
) -> Vec3 {
    let speed = settings.translation_speed * settings.speed_multiplier(run);
    position + rotation * (movement * speed * dt)
}

/// Signed pitch in degrees: positive above the horizon, negative below.
pub fn elevation_degrees(rotation: Quat) -> f32 {
    let tilt = tilt_from_up(rotation).to_degrees();
    if (rotation * WORLD_FORWARD).z > 0.0 {
        tilt
    } else {
        -tilt
    }
}

/// Normalize only once floating-point drift is measurable.
pub fn renormalize(rotation: Quat) -> Quat {
    if (rotation.length_squared() - 1.0).abs() > DRIFT_TOLERANCE {
        rotation.normalize()
    } else {
        rotation
    }
}

fn tilt_from_up(rotation: Quat) -> f32 {
    (rotation * WORLD_UP).dot(WORLD_UP).clamp(-1.0, 1.0).acos()
}

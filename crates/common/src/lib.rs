//! Shared types for the overlook sample.
//!
//! # Conventions
//! - Right-handed coordinates: +X right, +Y forward, +Z up.
//! - Quaternions follow glam's Hamilton product: `a * b` applies `b` first.

pub mod types;

pub use types::{Pose, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};

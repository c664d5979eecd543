//! Input: host input devices, named bindings, and per-frame snapshots.
//!
//! # Invariants
//! - Devices are only polled once per frame, by [`InputReader::read`].
//! - An [`InputFrame`] is never carried over to the next frame.

pub mod bindings;
pub mod devices;
pub mod frame;
pub mod virtual_devices;

pub use bindings::{BindingNames, Bindings, InputError};
pub use devices::{AxisId, ButtonId, Controller, InputDevices};
pub use frame::{InputFrame, InputReader};
pub use virtual_devices::{VirtualController, VirtualDevices};

pub fn crate_info() -> &'static str {
    "overlook-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}

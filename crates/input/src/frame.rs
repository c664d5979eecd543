use glam::{Vec2, Vec3};

use crate::bindings::Bindings;
use crate::devices::{Controller, InputDevices};

/// One frame's worth of user intent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Raw mouse motion this frame, in device units.
    pub pan: Vec2,
    /// Local-space movement intent: x strafes, y moves forward. Unit length or zero.
    pub movement: Vec3,
    /// Run modifier held.
    pub run: bool,
    /// Look button held; the camera only moves while this is set.
    pub looking: bool,
    /// Cursor position if the select button went down this frame.
    pub click: Option<Vec2>,
}

/// Turns device state into an [`InputFrame`] using resolved bindings.
#[derive(Debug, Clone, Copy)]
pub struct InputReader {
    bindings: Bindings,
}

impl InputReader {
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Poll the devices for this frame.
    ///
    /// Clicks are captured regardless of the look button. Everything else
    /// stays at rest unless the look button is fully held.
    pub fn read<D: InputDevices + ?Sized>(&self, devices: &D) -> InputFrame {
        let b = &self.bindings;
        let click = devices
            .pressed(Controller::Mouse, b.select)
            .then(|| devices.axis(Controller::Mouse, b.cursor));
        if let Some(pos) = click {
            tracing::debug!(x = pos.x, y = pos.y, "click");
        }

        if devices.button(Controller::Mouse, b.look) < 1.0 {
            return InputFrame {
                click,
                ..InputFrame::default()
            };
        }

        let key = |id| devices.button(Controller::Keyboard, id);
        let movement = Vec3::new(
            key(b.strafe_right) - key(b.strafe_left),
            key(b.forward) - key(b.back),
            0.0,
        )
        .normalize_or_zero();

        InputFrame {
            pan: devices.axis(Controller::Mouse, b.pan),
            movement,
            run: key(b.run) > 0.0,
            looking: true,
            click,
        }
    }

    /// Quit key went down this frame.
    pub fn quit_requested<D: InputDevices + ?Sized>(&self, devices: &D) -> bool {
        devices.pressed(Controller::Keyboard, self.bindings.quit)
    }
}

use glam::Vec2;

use crate::devices::{AxisId, ButtonId, Controller, InputDevices};

/// In-memory controller with named buttons and axes.
///
/// Ids are positions in the name lists. Press edges are tracked until
/// [`VirtualController::advance`] ends the frame, which also zeroes
/// relative axes.
#[derive(Debug, Clone, Default)]
pub struct VirtualController {
    buttons: Vec<String>,
    axes: Vec<String>,
    values: Vec<f32>,
    pressed: Vec<bool>,
    axis_values: Vec<Vec2>,
    relative: Vec<bool>,
}

impl VirtualController {
    pub fn new(buttons: &[&str], axes: &[&str]) -> Self {
        Self {
            buttons: buttons.iter().map(|s| (*s).to_owned()).collect(),
            axes: axes.iter().map(|s| (*s).to_owned()).collect(),
            values: vec![0.0; buttons.len()],
            pressed: vec![false; buttons.len()],
            axis_values: vec![Vec2::ZERO; axes.len()],
            relative: vec![false; axes.len()],
        }
    }

    /// Mark axes that report per-frame motion rather than a position.
    pub fn with_relative_axes(mut self, names: &[&str]) -> Self {
        for name in names {
            if let Some(AxisId(i)) = self.axis_id(name) {
                self.relative[i as usize] = true;
            }
        }
        self
    }

    pub fn button_id(&self, name: &str) -> Option<ButtonId> {
        self.buttons
            .iter()
            .position(|b| b == name)
            .map(|i| ButtonId(i as u32))
    }

    pub fn axis_id(&self, name: &str) -> Option<AxisId> {
        self.axes
            .iter()
            .position(|a| a == name)
            .map(|i| AxisId(i as u32))
    }

    /// Set a button up or down. Going down records a press for this frame.
    /// Returns false if the controller has no such button.
    pub fn set_button(&mut self, name: &str, down: bool) -> bool {
        let Some(ButtonId(i)) = self.button_id(name) else {
            return false;
        };
        let i = i as usize;
        let was_down = self.values[i] >= 1.0;
        self.values[i] = if down { 1.0 } else { 0.0 };
        if down && !was_down {
            self.pressed[i] = true;
        }
        true
    }

    /// Returns false if the controller has no such axis.
    pub fn set_axis(&mut self, name: &str, value: Vec2) -> bool {
        let Some(AxisId(i)) = self.axis_id(name) else {
            return false;
        };
        self.axis_values[i as usize] = value;
        true
    }

    /// End the frame: clear press edges and zero relative axes.
    pub fn advance(&mut self) {
        self.pressed.fill(false);
        for (value, relative) in self.axis_values.iter_mut().zip(&self.relative) {
            if *relative {
                *value = Vec2::ZERO;
            }
        }
    }

    fn value(&self, id: ButtonId) -> f32 {
        self.values.get(id.0 as usize).copied().unwrap_or(0.0)
    }

    fn was_pressed(&self, id: ButtonId) -> bool {
        self.pressed.get(id.0 as usize).copied().unwrap_or(false)
    }

    fn axis_value(&self, id: AxisId) -> Vec2 {
        self.axis_values
            .get(id.0 as usize)
            .copied()
            .unwrap_or(Vec2::ZERO)
    }
}

/// A desktop mouse and keyboard backed by [`VirtualController`]s.
#[derive(Debug, Clone, Default)]
pub struct VirtualDevices {
    pub mouse: VirtualController,
    pub keyboard: VirtualController,
}

const MOUSE_BUTTONS: &[&str] = &["left", "right", "middle"];
const MOUSE_AXES: &[&str] = &["cursor", "mouse", "wheel"];
const MOUSE_RELATIVE_AXES: &[&str] = &["mouse", "wheel"];
const KEYBOARD_BUTTONS: &[&str] = &[
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z", "space", "enter", "esc", "tab", "left ctrl", "left shift",
    "left alt", "right ctrl", "right shift", "right alt",
];

impl VirtualDevices {
    /// Mouse and keyboard with the usual desktop button names.
    pub fn desktop() -> Self {
        Self {
            mouse: VirtualController::new(MOUSE_BUTTONS, MOUSE_AXES)
                .with_relative_axes(MOUSE_RELATIVE_AXES),
            keyboard: VirtualController::new(KEYBOARD_BUTTONS, &[]),
        }
    }

    pub fn controller(&self, controller: Controller) -> &VirtualController {
        match controller {
            Controller::Mouse => &self.mouse,
            Controller::Keyboard => &self.keyboard,
        }
    }

    pub fn controller_mut(&mut self, controller: Controller) -> &mut VirtualController {
        match controller {
            Controller::Mouse => &mut self.mouse,
            Controller::Keyboard => &mut self.keyboard,
        }
    }

    /// End the frame on every controller.
    pub fn advance(&mut self) {
        self.mouse.advance();
        self.keyboard.advance();
    }
}

impl InputDevices for VirtualDevices {
    fn button_id(&self, controller: Controller, name: &str) -> Option<ButtonId> {
        self.controller(controller).button_id(name)
    }

    fn axis_id(&self, controller: Controller, name: &str) -> Option<AxisId> {
        self.controller(controller).axis_id(name)
    }

    fn button(&self, controller: Controller, id: ButtonId) -> f32 {
        self.controller(controller).value(id)
    }

    fn pressed(&self, controller: Controller, id: ButtonId) -> bool {
        self.controller(controller).was_pressed(id)
    }

    fn axis(&self, controller: Controller, id: AxisId) -> Vec2 {
        self.controller(controller).axis_value(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_only_on_transition() {
        let mut c = VirtualController::new(&["x"], &[]);
        let id = c.button_id("x").unwrap();
        assert!(c.set_button("x", true));
        assert!(c.was_pressed(id));
        c.advance();
        c.set_button("x", true);
        assert!(!c.was_pressed(id));
        assert_eq!(c.value(id), 1.0);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut devices = VirtualDevices::desktop();
        assert!(!devices.mouse.set_button("fourth", true));
        assert!(!devices.keyboard.set_axis("mouse", Vec2::ONE));
        assert!(devices.button_id(Controller::Keyboard, "left").is_none());
    }

    #[test]
    fn out_of_range_ids_read_as_rest() {
        let devices = VirtualDevices::desktop();
        assert_eq!(devices.button(Controller::Mouse, ButtonId(99)), 0.0);
        assert_eq!(devices.axis(Controller::Mouse, AxisId(99)), Vec2::ZERO);
    }

    #[test]
    fn mouse_motion_lasts_one_frame() {
        let mut devices = VirtualDevices::desktop();
        devices.mouse.set_axis("mouse", Vec2::new(6.0, -2.0));
        let id = devices.axis_id(Controller::Mouse, "mouse").unwrap();
        assert_eq!(devices.axis(Controller::Mouse, id), Vec2::new(6.0, -2.0));
        devices.advance();
        assert_eq!(devices.axis(Controller::Mouse, id), Vec2::ZERO);
    }

    #[test]
    fn axis_persists_across_advance() {
        let mut devices = VirtualDevices::desktop();
        devices.mouse.set_axis("cursor", Vec2::new(4.0, 2.0));
        devices.advance();
        let id = devices.axis_id(Controller::Mouse, "cursor").unwrap();
        assert_eq!(devices.axis(Controller::Mouse, id), Vec2::new(4.0, 2.0));
    }
}

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input controllers the sample reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Controller {
    Mouse,
    Keyboard,
}

/// Host-assigned index of a button on one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub u32);

/// Host-assigned index of an axis on one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId(pub u32);

/// Polling interface over the host's input controllers.
///
/// Ids are only meaningful for the controller that produced them.
pub trait InputDevices {
    /// Look up a button by its host name, e.g. `"left shift"`.
    fn button_id(&self, controller: Controller, name: &str) -> Option<ButtonId>;

    /// Look up an axis by its host name, e.g. `"mouse"`.
    fn axis_id(&self, controller: Controller, name: &str) -> Option<AxisId>;

    /// Analog button value; `1.0` or more means fully held.
    fn button(&self, controller: Controller, id: ButtonId) -> f32;

    /// True only on the frame the button went down.
    fn pressed(&self, controller: Controller, id: ButtonId) -> bool;

    /// Current axis reading. Relative axes (mouse delta) report this frame's motion.
    fn axis(&self, controller: Controller, id: AxisId) -> Vec2;
}

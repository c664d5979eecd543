use serde::{Deserialize, Serialize};

use crate::devices::{AxisId, ButtonId, Controller, InputDevices};

/// Errors from resolving bindings against the host's devices.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown {controller:?} button: {name:?}")]
    UnknownButton { controller: Controller, name: String },
    #[error("unknown {controller:?} axis: {name:?}")]
    UnknownAxis { controller: Controller, name: String },
}

/// Host names of every control the sample reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingNames {
    /// Mouse button that clicks into the web view.
    pub select: String,
    /// Mouse button that must be held for the camera to move.
    pub look: String,
    /// Mouse axis reporting the cursor position.
    pub cursor: String,
    /// Mouse axis reporting per-frame motion.
    pub pan: String,
    pub forward: String,
    pub back: String,
    pub strafe_left: String,
    pub strafe_right: String,
    pub run: String,
    pub quit: String,
}

impl Default for BindingNames {
    fn default() -> Self {
        Self {
            select: "left".into(),
            look: "right".into(),
            cursor: "cursor".into(),
            pan: "mouse".into(),
            forward: "w".into(),
            back: "s".into(),
            strafe_left: "a".into(),
            strafe_right: "d".into(),
            run: "left shift".into(),
            quit: "esc".into(),
        }
    }
}

/// Bindings resolved to host ids. Resolve once at startup, poll every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub select: ButtonId,
    pub look: ButtonId,
    pub cursor: AxisId,
    pub pan: AxisId,
    pub forward: ButtonId,
    pub back: ButtonId,
    pub strafe_left: ButtonId,
    pub strafe_right: ButtonId,
    pub run: ButtonId,
    pub quit: ButtonId,
}

impl Bindings {
    /// Resolve every name against the devices. The first unknown name is an error.
    pub fn resolve<D: InputDevices + ?Sized>(
        devices: &D,
        names: &BindingNames,
    ) -> Result<Self, InputError> {
        let bindings = Self {
            select: button(devices, Controller::Mouse, &names.select)?,
            look: button(devices, Controller::Mouse, &names.look)?,
            cursor: axis(devices, Controller::Mouse, &names.cursor)?,
            pan: axis(devices, Controller::Mouse, &names.pan)?,
            forward: button(devices, Controller::Keyboard, &names.forward)?,
            back: button(devices, Controller::Keyboard, &names.back)?,
            strafe_left: button(devices, Controller::Keyboard, &names.strafe_left)?,
            strafe_right: button(devices, Controller::Keyboard, &names.strafe_right)?,
            run: button(devices, Controller::Keyboard, &names.run)?,
            quit: button(devices, Controller::Keyboard, &names.quit)?,
        };
        tracing::debug!(?bindings, "input bindings resolved");
        Ok(bindings)
    }
}

fn button<D: InputDevices + ?Sized>(
    devices: &D,
    controller: Controller,
    name: &str,
) -> Result<ButtonId, InputError> {
    devices
        .button_id(controller, name)
        .ok_or_else(|| InputError::UnknownButton {
            controller,
            name: name.to_owned(),
        })
}

fn axis<D: InputDevices + ?Sized>(
    devices: &D,
    controller: Controller,
    name: &str,
) -> Result<AxisId, InputError> {
    devices
        .axis_id(controller, name)
        .ok_or_else(|| InputError::UnknownAxis {
            controller,
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualDevices;

    #[test]
    fn default_names_resolve_on_desktop_devices() {
        let devices = VirtualDevices::desktop();
        let bindings = Bindings::resolve(&devices, &BindingNames::default()).unwrap();
        assert_ne!(bindings.select, bindings.look);
        assert_ne!(bindings.forward, bindings.back);
    }

    #[test]
    fn unknown_button_is_reported_with_its_name() {
        let devices = VirtualDevices::desktop();
        let names = BindingNames {
            run: "hyper".into(),
            ..BindingNames::default()
        };
        let err = Bindings::resolve(&devices, &names).unwrap_err();
        match err {
            InputError::UnknownButton { controller, name } => {
                assert_eq!(controller, Controller::Keyboard);
                assert_eq!(name, "hyper");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_axis_is_reported() {
        let devices = VirtualDevices::desktop();
        let names = BindingNames {
            pan: "trackball".into(),
            ..BindingNames::default()
        };
        assert!(matches!(
            Bindings::resolve(&devices, &names),
            Err(InputError::UnknownAxis { .. })
        ));
    }

    #[test]
    fn keyboard_name_is_not_found_on_mouse() {
        let devices = VirtualDevices::desktop();
        let names = BindingNames {
            look: "w".into(),
            ..BindingNames::default()
        };
        assert!(Bindings::resolve(&devices, &names).is_err());
    }
}

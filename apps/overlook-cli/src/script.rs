use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::Vec2;
use overlook_input::VirtualDevices;
use serde::{Deserialize, Serialize};

/// Device state for one or more consecutive frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFrame {
    /// Mouse buttons held, by host name.
    pub mouse: Vec<String>,
    /// Keyboard keys held, by host name.
    pub keys: Vec<String>,
    /// Mouse motion per frame.
    pub pan: Vec2,
    /// Cursor position; unchanged when absent.
    pub cursor: Option<Vec2>,
    /// How many frames this state lasts. Zero is treated as one.
    pub repeat: u32,
}

/// A sequence of scripted device states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

impl InputScript {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        let script = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
            _ => bail!("unsupported input script format: {}", path.display()),
        };
        Ok(script)
    }

    /// Look around, walk, run, click the overlay, then quit.
    pub fn demo() -> Self {
        let look = |keys: &[&str], pan: Vec2, repeat: u32| ScriptFrame {
            mouse: vec!["right".into()],
            keys: keys.iter().map(|k| (*k).to_owned()).collect(),
            pan,
            cursor: None,
            repeat,
        };
        Self {
            frames: vec![
                look(&["w"], Vec2::ZERO, 30),
                look(&[], Vec2::new(8.0, 0.0), 20),
                look(&["w", "left shift"], Vec2::new(0.0, -3.0), 30),
                ScriptFrame {
                    mouse: vec!["left".into()],
                    cursor: Some(Vec2::new(640.0, 360.0)),
                    ..ScriptFrame::default()
                },
                ScriptFrame::default(),
                ScriptFrame {
                    keys: vec!["esc".into()],
                    ..ScriptFrame::default()
                },
            ],
        }
    }

    /// Frame states with repeats expanded.
    pub fn expanded(&self) -> impl Iterator<Item = &ScriptFrame> {
        self.frames
            .iter()
            .flat_map(|f| std::iter::repeat_n(f, f.repeat.max(1) as usize))
    }
}

/// Applies script frames to devices, releasing whatever the previous frame held.
#[derive(Debug, Default)]
pub struct ScriptPlayer {
    mouse_held: BTreeSet<String>,
    keys_held: BTreeSet<String>,
}

impl ScriptPlayer {
    pub fn apply(&mut self, frame: &ScriptFrame, devices: &mut VirtualDevices) {
        let mouse: BTreeSet<String> = frame.mouse.iter().cloned().collect();
        let keys: BTreeSet<String> = frame.keys.iter().cloned().collect();

        for released in self.mouse_held.difference(&mouse) {
            devices.mouse.set_button(released, false);
        }
        for released in self.keys_held.difference(&keys) {
            devices.keyboard.set_button(released, false);
        }
        for name in &mouse {
            if !devices.mouse.set_button(name, true) {
                tracing::warn!(button = %name, "script names unknown mouse button");
            }
        }
        for name in &keys {
            if !devices.keyboard.set_button(name, true) {
                tracing::warn!(key = %name, "script names unknown key");
            }
        }

        devices.mouse.set_axis("mouse", frame.pan);
        if let Some(cursor) = frame.cursor {
            devices.mouse.set_axis("cursor", cursor);
        }

        self.mouse_held = mouse;
        self.keys_held = keys;
    }
}

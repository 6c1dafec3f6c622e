use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    Other(u32),
}

/// Raw input as produced by the platform layer, one per discrete action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MouseMove { pos: Vec2 },
    MouseDown { pos: Vec2, button: MouseButton },
    MouseUp { pos: Vec2, button: MouseButton },
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// One Unicode code point of entered text.
    Text(char),
}

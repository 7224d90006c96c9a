// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Keyboard and mouse events.

use std::fmt;

use super::EventCategory;
use crate::impl_event;

/// A backend-agnostic key code.
///
/// The numbering follows the widely used GLFW layout (printable keys use their
/// ASCII value, e.g. space is `32`), so scene scripts written against it keep
/// working regardless of the windowing backend. See [`keys`] for names.
pub type KeyCode = i32;

/// Named [`KeyCode`] values.
#[allow(missing_docs)]
pub mod keys {
    use super::KeyCode;

    pub const SPACE: KeyCode = 32;
    pub const APOSTROPHE: KeyCode = 39;
    pub const COMMA: KeyCode = 44;
    pub const MINUS: KeyCode = 45;
    pub const PERIOD: KeyCode = 46;
    pub const SLASH: KeyCode = 47;
    pub const DIGIT_0: KeyCode = 48;
    pub const DIGIT_9: KeyCode = 57;
    pub const SEMICOLON: KeyCode = 59;
    pub const EQUAL: KeyCode = 61;
    pub const A: KeyCode = 65;
    pub const D: KeyCode = 68;
    pub const Q: KeyCode = 81;
    pub const S: KeyCode = 83;
    pub const W: KeyCode = 87;
    pub const Z: KeyCode = 90;
    pub const LEFT_BRACKET: KeyCode = 91;
    pub const BACKSLASH: KeyCode = 92;
    pub const RIGHT_BRACKET: KeyCode = 93;
    pub const GRAVE_ACCENT: KeyCode = 96;
    pub const ESCAPE: KeyCode = 256;
    pub const ENTER: KeyCode = 257;
    pub const TAB: KeyCode = 258;
    pub const BACKSPACE: KeyCode = 259;
    pub const INSERT: KeyCode = 260;
    pub const DELETE: KeyCode = 261;
    pub const RIGHT: KeyCode = 262;
    pub const LEFT: KeyCode = 263;
    pub const DOWN: KeyCode = 264;
    pub const UP: KeyCode = 265;
    pub const PAGE_UP: KeyCode = 266;
    pub const PAGE_DOWN: KeyCode = 267;
    pub const HOME: KeyCode = 268;
    pub const END: KeyCode = 269;
    pub const CAPS_LOCK: KeyCode = 280;
    pub const F1: KeyCode = 290;
    pub const F12: KeyCode = 301;
    pub const LEFT_SHIFT: KeyCode = 340;
    pub const LEFT_CONTROL: KeyCode = 341;
    pub const LEFT_ALT: KeyCode = 342;
    pub const LEFT_SUPER: KeyCode = 343;
    pub const RIGHT_SHIFT: KeyCode = 344;
    pub const RIGHT_CONTROL: KeyCode = 345;
    pub const RIGHT_ALT: KeyCode = 346;
    pub const RIGHT_SUPER: KeyCode = 347;

    /// Highest key code in use.
    pub const LAST: KeyCode = 348;

    /// Key code of an ASCII letter, case-insensitive.
    pub const fn letter(c: char) -> Option<KeyCode> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(upper as KeyCode)
        } else {
            None
        }
    }

    /// Key code of a decimal digit on the main row.
    pub const fn digit(n: u8) -> Option<KeyCode> {
        if n <= 9 {
            Some(DIGIT_0 + n as KeyCode)
        } else {
            None
        }
    }

    /// Key code of function key `F<n>` for `n` in `1..=12`.
    pub const fn function(n: u8) -> Option<KeyCode> {
        if n >= 1 && n <= 12 {
            Some(F1 + n as KeyCode - 1)
        } else {
            None
        }
    }
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}

/// A key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressed {
    /// The key that was pressed.
    pub key_code: KeyCode,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl KeyPressed {
    /// Creates an unhandled key press.
    pub fn new(key_code: KeyCode) -> Self {
        Self {
            key_code,
            handled: false,
        }
    }
}

impl fmt::Display for KeyPressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPressed: {}", self.key_code)
    }
}

impl_event!(KeyPressed, EventCategory::Keyboard);

/// A key went up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReleased {
    /// The key that was released.
    pub key_code: KeyCode,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl KeyReleased {
    /// Creates an unhandled key release.
    pub fn new(key_code: KeyCode) -> Self {
        Self {
            key_code,
            handled: false,
        }
    }
}

impl fmt::Display for KeyReleased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyReleased: {}", self.key_code)
    }
}

impl_event!(KeyReleased, EventCategory::Keyboard);

/// The cursor moved, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoved {
    /// Cursor x position.
    pub x: f32,
    /// Cursor y position.
    pub y: f32,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl MouseMoved {
    /// Creates an unhandled cursor move.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            handled: false,
        }
    }
}

impl fmt::Display for MouseMoved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseMoved: {}, {}", self.x, self.y)
    }
}

impl_event!(MouseMoved, EventCategory::Mouse);

/// The mouse wheel was scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScrolled {
    /// Horizontal scroll delta.
    pub delta_x: f32,
    /// Vertical scroll delta.
    pub delta_y: f32,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl MouseScrolled {
    /// Creates an unhandled scroll.
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            handled: false,
        }
    }
}

impl fmt::Display for MouseScrolled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseScrolled: {}, {}", self.delta_x, self.delta_y)
    }
}

impl_event!(MouseScrolled, EventCategory::Mouse);

/// A mouse button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonPressed {
    /// The button that was pressed.
    pub button: MouseButton,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl MouseButtonPressed {
    /// Creates an unhandled button press.
    pub fn new(button: MouseButton) -> Self {
        Self {
            button,
            handled: false,
        }
    }
}

impl fmt::Display for MouseButtonPressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseButtonPressed: {:?}", self.button)
    }
}

impl_event!(MouseButtonPressed, EventCategory::Mouse);

/// A mouse button went up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonReleased {
    /// The button that was released.
    pub button: MouseButton,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl MouseButtonReleased {
    /// Creates an unhandled button release.
    pub fn new(button: MouseButton) -> Self {
        Self {
            button,
            handled: false,
        }
    }
}

impl fmt::Display for MouseButtonReleased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseButtonReleased: {:?}", self.button)
    }
}

impl_event!(MouseButtonReleased, EventCategory::Mouse);

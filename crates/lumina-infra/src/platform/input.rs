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

//! Translation from `winit` window events to Lumina events.
//!
//! This module is the only place that knows `winit`'s event shapes. Everything
//! downstream sees [`PlatformEvent`]s, which in turn become concrete bus
//! events through [`PlatformEvent::queue_into`].

use lumina_core::event::{
    keys, KeyCode as LuminaKeyCode, KeyPressed, KeyReleased, MouseButton, MouseButtonPressed,
    MouseButtonReleased, MouseMoved, MouseScrolled, WindowClose, WindowResize,
};
use lumina_core::{Event, EventBus};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A platform signal the engine reacts to, independent of the windowing
/// backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// The drawable area changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// The user asked to close the window.
    CloseRequested,
    /// A key went down (auto-repeat excluded).
    KeyPressed(LuminaKeyCode),
    /// A key went up.
    KeyReleased(LuminaKeyCode),
    /// The cursor moved to a new position in window coordinates.
    MouseMoved {
        /// Cursor x-coordinate.
        x: f32,
        /// Cursor y-coordinate.
        y: f32,
    },
    /// A mouse button went down.
    MouseButtonPressed(MouseButton),
    /// A mouse button went up.
    MouseButtonReleased(MouseButton),
    /// The wheel or trackpad scrolled.
    MouseScrolled {
        /// Horizontal delta.
        delta_x: f32,
        /// Vertical delta.
        delta_y: f32,
    },
}

impl PlatformEvent {
    /// Converts into the matching concrete bus event.
    pub fn into_event(self) -> Box<dyn Event> {
        match self {
            PlatformEvent::Resized { width, height } => Box::new(WindowResize::new(width, height)),
            PlatformEvent::CloseRequested => Box::new(WindowClose::new()),
            PlatformEvent::KeyPressed(key) => Box::new(KeyPressed::new(key)),
            PlatformEvent::KeyReleased(key) => Box::new(KeyReleased::new(key)),
            PlatformEvent::MouseMoved { x, y } => Box::new(MouseMoved::new(x, y)),
            PlatformEvent::MouseButtonPressed(button) => Box::new(MouseButtonPressed::new(button)),
            PlatformEvent::MouseButtonReleased(button) => Box::new(MouseButtonReleased::new(button)),
            PlatformEvent::MouseScrolled { delta_x, delta_y } => {
                Box::new(MouseScrolled::new(delta_x, delta_y))
            }
        }
    }

    /// Enqueues the matching bus event for the next dispatch pass.
    pub fn queue_into(self, bus: &EventBus) {
        bus.queue_boxed(self.into_event());
    }
}

/// Translates a `winit::event::WindowEvent` into a [`PlatformEvent`].
///
/// Returns `None` for events the engine does not react to, for key
/// auto-repeats, and for keys without a Lumina key code.
pub fn translate_winit_event(event: &WindowEvent) -> Option<PlatformEvent> {
    match event {
        WindowEvent::Resized(size) => Some(PlatformEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::CloseRequested => Some(PlatformEvent::CloseRequested),
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let PhysicalKey::Code(code) = key_event.physical_key else {
                return None;
            };
            let key = map_key_code(code)?;
            match key_event.state {
                ElementState::Pressed if !key_event.repeat => Some(PlatformEvent::KeyPressed(key)),
                ElementState::Released => Some(PlatformEvent::KeyReleased(key)),
                _ => None,
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(PlatformEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            match state {
                ElementState::Pressed => Some(PlatformEvent::MouseButtonPressed(button)),
                ElementState::Released => Some(PlatformEvent::MouseButtonReleased(button)),
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy): (f32, f32) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
            };
            if dx != 0.0 || dy != 0.0 {
                Some(PlatformEvent::MouseScrolled {
                    delta_x: dx,
                    delta_y: dy,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Maps a physical `winit` key to its Lumina key code.
pub fn map_key_code(code: KeyCode) -> Option<LuminaKeyCode> {
    match code {
        KeyCode::KeyA => keys::letter('A'),
        KeyCode::KeyB => keys::letter('B'),
        KeyCode::KeyC => keys::letter('C'),
        KeyCode::KeyD => keys::letter('D'),
        KeyCode::KeyE => keys::letter('E'),
        KeyCode::KeyF => keys::letter('F'),
        KeyCode::KeyG => keys::letter('G'),
        KeyCode::KeyH => keys::letter('H'),
        KeyCode::KeyI => keys::letter('I'),
        KeyCode::KeyJ => keys::letter('J'),
        KeyCode::KeyK => keys::letter('K'),
        KeyCode::KeyL => keys::letter('L'),
        KeyCode::KeyM => keys::letter('M'),
        KeyCode::KeyN => keys::letter('N'),
        KeyCode::KeyO => keys::letter('O'),
        KeyCode::KeyP => keys::letter('P'),
        KeyCode::KeyQ => keys::letter('Q'),
        KeyCode::KeyR => keys::letter('R'),
        KeyCode::KeyS => keys::letter('S'),
        KeyCode::KeyT => keys::letter('T'),
        KeyCode::KeyU => keys::letter('U'),
        KeyCode::KeyV => keys::letter('V'),
        KeyCode::KeyW => keys::letter('W'),
        KeyCode::KeyX => keys::letter('X'),
        KeyCode::KeyY => keys::letter('Y'),
        KeyCode::KeyZ => keys::letter('Z'),
        KeyCode::Digit0 => keys::digit(0),
        KeyCode::Digit1 => keys::digit(1),
        KeyCode::Digit2 => keys::digit(2),
        KeyCode::Digit3 => keys::digit(3),
        KeyCode::Digit4 => keys::digit(4),
        KeyCode::Digit5 => keys::digit(5),
        KeyCode::Digit6 => keys::digit(6),
        KeyCode::Digit7 => keys::digit(7),
        KeyCode::Digit8 => keys::digit(8),
        KeyCode::Digit9 => keys::digit(9),
        KeyCode::F1 => keys::function(1),
        KeyCode::F2 => keys::function(2),
        KeyCode::F3 => keys::function(3),
        KeyCode::F4 => keys::function(4),
        KeyCode::F5 => keys::function(5),
        KeyCode::F6 => keys::function(6),
        KeyCode::F7 => keys::function(7),
        KeyCode::F8 => keys::function(8),
        KeyCode::F9 => keys::function(9),
        KeyCode::F10 => keys::function(10),
        KeyCode::F11 => keys::function(11),
        KeyCode::F12 => keys::function(12),
        KeyCode::Space => Some(keys::SPACE),
        KeyCode::Quote => Some(keys::APOSTROPHE),
        KeyCode::Comma => Some(keys::COMMA),
        KeyCode::Minus => Some(keys::MINUS),
        KeyCode::Period => Some(keys::PERIOD),
        KeyCode::Slash => Some(keys::SLASH),
        KeyCode::Semicolon => Some(keys::SEMICOLON),
        KeyCode::Equal => Some(keys::EQUAL),
        KeyCode::BracketLeft => Some(keys::LEFT_BRACKET),
        KeyCode::Backslash => Some(keys::BACKSLASH),
        KeyCode::BracketRight => Some(keys::RIGHT_BRACKET),
        KeyCode::Backquote => Some(keys::GRAVE_ACCENT),
        KeyCode::Escape => Some(keys::ESCAPE),
        KeyCode::Enter => Some(keys::ENTER),
        KeyCode::Tab => Some(keys::TAB),
        KeyCode::Backspace => Some(keys::BACKSPACE),
        KeyCode::Insert => Some(keys::INSERT),
        KeyCode::Delete => Some(keys::DELETE),
        KeyCode::ArrowRight => Some(keys::RIGHT),
        KeyCode::ArrowLeft => Some(keys::LEFT),
        KeyCode::ArrowDown => Some(keys::DOWN),
        KeyCode::ArrowUp => Some(keys::UP),
        KeyCode::PageUp => Some(keys::PAGE_UP),
        KeyCode::PageDown => Some(keys::PAGE_DOWN),
        KeyCode::Home => Some(keys::HOME),
        KeyCode::End => Some(keys::END),
        KeyCode::CapsLock => Some(keys::CAPS_LOCK),
        KeyCode::ShiftLeft => Some(keys::LEFT_SHIFT),
        KeyCode::ControlLeft => Some(keys::LEFT_CONTROL),
        KeyCode::AltLeft => Some(keys::LEFT_ALT),
        KeyCode::SuperLeft => Some(keys::LEFT_SUPER),
        KeyCode::ShiftRight => Some(keys::RIGHT_SHIFT),
        KeyCode::ControlRight => Some(keys::RIGHT_CONTROL),
        KeyCode::AltRight => Some(keys::RIGHT_ALT),
        KeyCode::SuperRight => Some(keys::RIGHT_SUPER),
        _ => None,
    }
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

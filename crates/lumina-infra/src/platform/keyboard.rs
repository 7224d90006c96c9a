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

use lumina_core::event::KeyCode;

use super::PlatformEvent;

/// Number of key slots tracked; codes outside `0..MAX_KEYS` read as up.
pub const MAX_KEYS: usize = 1024;

/// Polled keyboard state with edge detection.
///
/// Call [`begin_frame`](Self::begin_frame) once per frame before feeding the
/// frame's key events; `is_key_pressed`/`is_key_released` then report the
/// keys whose state changed since the previous frame.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    current: Vec<bool>,
    previous: Vec<bool>,
}

impl KeyboardState {
    /// All keys up.
    pub fn new() -> Self {
        Self {
            current: vec![false; MAX_KEYS],
            previous: vec![false; MAX_KEYS],
        }
    }

    /// Snapshots the current state as the previous frame's.
    pub fn begin_frame(&mut self) {
        self.previous.copy_from_slice(&self.current);
    }

    /// Records a key going down or up. Out-of-range codes are ignored.
    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        if let Some(slot) = Self::slot(key).and_then(|i| self.current.get_mut(i)) {
            *slot = down;
        }
    }

    /// Feeds a translated platform event; non-keyboard events are ignored.
    pub fn apply(&mut self, event: &PlatformEvent) {
        match *event {
            PlatformEvent::KeyPressed(key) => self.set_key(key, true),
            PlatformEvent::KeyReleased(key) => self.set_key(key, false),
            _ => {}
        }
    }

    /// Whether `key` is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        Self::read(&self.current, key)
    }

    /// Whether `key` went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        Self::read(&self.current, key) && !Self::read(&self.previous, key)
    }

    /// Whether `key` went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        !Self::read(&self.current, key) && Self::read(&self.previous, key)
    }

    fn slot(key: KeyCode) -> Option<usize> {
        usize::try_from(key).ok().filter(|&i| i < MAX_KEYS)
    }

    fn read(states: &[bool], key: KeyCode) -> bool {
        Self::slot(key)
            .and_then(|i| states.get(i).copied())
            .unwrap_or(false)
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

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

//! Window and application lifecycle events.

use std::fmt;

use super::EventCategory;
use crate::impl_event;

/// The window's framebuffer was resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowResize {
    /// New width in physical pixels.
    pub width: u32,
    /// New height in physical pixels.
    pub height: u32,
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl WindowResize {
    /// Creates an unhandled resize event.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            handled: false,
        }
    }
}

impl fmt::Display for WindowResize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowResize: {}, {}", self.width, self.height)
    }
}

impl_event!(WindowResize, EventCategory::Application);

/// The user asked the window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowClose {
    /// Set by a subscriber to stop further propagation.
    pub handled: bool,
}

impl WindowClose {
    /// Creates an unhandled close event.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for WindowClose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WindowClose")
    }
}

impl_event!(WindowClose, EventCategory::Application);

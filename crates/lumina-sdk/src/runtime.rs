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

use std::cell::Cell;
use std::rc::Rc;

use lumina_core::event::WindowClose;
use lumina_core::{EventBus, ScopedSubscription};
use lumina_data::scene::Scene;
use lumina_infra::platform::{KeyboardState, PlatformEvent};

/// Per-application state shared by the frame loop and the user's code.
///
/// Owns the event bus, the active scene and the polled keyboard. A
/// [`WindowClose`] event reaching the bus requests an exit.
pub struct Runtime {
    bus: EventBus,
    scene: Scene,
    keyboard: KeyboardState,
    exit_requested: Rc<Cell<bool>>,
    _close: ScopedSubscription,
}

impl Runtime {
    /// Creates a runtime with a fresh bus and an empty scene.
    pub fn new() -> Self {
        let bus = EventBus::new();
        let exit_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&exit_requested);
        let close = bus.subscribe(move |_: &mut WindowClose| {
            log::info!("Shutdown requested, exiting event loop...");
            flag.set(true);
        });
        Self {
            bus,
            scene: Scene::new(),
            keyboard: KeyboardState::new(),
            exit_requested,
            _close: close,
        }
    }

    /// The event bus every subsystem publishes on.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The active scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the active scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Replaces the active scene, returning the previous one.
    pub fn set_scene(&mut self, scene: Scene) -> Scene {
        std::mem::replace(&mut self.scene, scene)
    }

    /// Keyboard state as of the current frame.
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Asks the loop to stop after the current frame.
    pub fn request_exit(&self) {
        self.exit_requested.set(true);
    }

    /// Whether an exit has been requested.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.get()
    }

    /// Records a platform event in the keyboard state and queues it on the
    /// bus for the next dispatch pass.
    pub fn handle_platform_event(&mut self, event: PlatformEvent) {
        log::trace!("Platform event: {:?}", event);
        self.keyboard.apply(&event);
        event.queue_into(&self.bus);
    }

    /// Delivers queued events, then updates the scene. Returns the number of
    /// events dispatched.
    pub fn frame(&mut self, delta_time: f32) -> usize {
        let dispatched = self.bus.dispatch_events();
        self.scene.update(delta_time);
        dispatched
    }

    /// Closes the frame so the next one reports key edges relative to this
    /// one.
    pub fn end_frame(&mut self) {
        self.keyboard.begin_frame();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("bus", &self.bus)
            .field("scene", &self.scene)
            .field("exit_requested", &self.exit_requested.get())
            .finish_non_exhaustive()
    }
}

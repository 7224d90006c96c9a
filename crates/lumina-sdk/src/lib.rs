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

//! The public-facing Software Development Kit (SDK) for Lumina.
//!
//! It wires the core primitives into a frame loop with a fixed per-frame
//! order: platform events are queued on the bus as they arrive, then each
//! frame calls `dispatch_events`, updates the scene, and finally runs the
//! user's [`Application::update`].

#![warn(missing_docs)]

mod clock;
mod engine;
mod runtime;
pub mod settings;

pub use clock::FrameClock;
pub use engine::{Application, Engine, HeadlessRun};
pub use runtime::Runtime;
pub use settings::{Settings, SettingsError};

/// Commonly used types for applications built on Lumina.
pub mod prelude {
    pub use crate::{Application, Engine, Runtime, Settings};
    pub use lumina_core::event::{keys, KeyPressed, KeyReleased, WindowClose, WindowResize};
    pub use lumina_core::math::{Quaternion, Vec3};
    pub use lumina_core::{Component, Entity, EventBus, OwnerRef, ScopedSubscription, Transform};
    pub use lumina_data::components::*;
    pub use lumina_data::factory::{ComponentFactory, FactoryContext};
    pub use lumina_data::scene::{build_scene, load_scene, Scene, SceneDefinition};
}

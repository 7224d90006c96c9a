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

//! # Lumina Core
//!
//! Foundational crate containing the runtime object model and the messaging
//! backbone every other Lumina subsystem is built on:
//!
//! - [`event`]: a type-indexed publish/subscribe bus with deferred dispatch and
//!   RAII subscriptions.
//! - [`ecs`]: entities that own polymorphic components keyed by concrete type.
//!
//! Both primitives are single-threaded by construction (`!Send`); foreign
//! threads hand data over through their own synchronised channels.

#![warn(missing_docs)]

pub mod audio;
pub mod ecs;
pub mod event;
pub mod graphics;
pub mod math;

pub use ecs::{Component, ComponentHandle, Entity, OwnerRef, Transform};
pub use event::{Event, EventBus, EventCategory, ScopedSubscription};

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

//! Entity/component composition.
//!
//! An [`Entity`] owns a set of [`Component`]s keyed by their concrete type. Behaviour
//! is assembled at runtime by attaching components rather than through a fixed
//! type hierarchy. Components observe their owner through an [`OwnerRef`], a
//! weak back-reference that must be upgraded (and may fail) before use.
//!
//! This is deliberately not an archetype ECS: storage is a small ordered list
//! per entity, favouring simple and safe lifetimes over iteration throughput.

mod component;
mod entity;
mod transform;

pub use self::component::{Component, OwnerRef};
pub use self::entity::{ComponentHandle, Entity};
pub use self::transform::Transform;

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

use lumina_core::math::{axis_angle_degrees, Vec3};
use lumina_core::{Component, OwnerRef};

/// Spins its owner around a fixed axis at a constant angular speed.
#[derive(Debug, Clone)]
pub struct Rotation {
    /// Axis of rotation; normalized on construction.
    pub axis: Vec3,
    /// Angular speed in degrees per second.
    pub degrees_per_second: f32,
    owner: OwnerRef,
}

impl Rotation {
    /// Creates a rotation around `axis`. A zero axis never rotates.
    pub fn new(axis: Vec3, degrees_per_second: f32) -> Self {
        Self {
            axis: axis.normalize_or_zero(),
            degrees_per_second,
            owner: OwnerRef::detached(),
        }
    }
}

impl Component for Rotation {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    fn update(&mut self, delta_time: f32) {
        let delta = axis_angle_degrees(self.axis, self.degrees_per_second * delta_time);
        self.owner.with_transform_mut(|t| t.rotate(delta));
    }
}

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

/// Which transform property an animator drives, and how.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationParams {
    /// Constant spin around `axis`.
    Rotation {
        /// Axis of rotation.
        axis: Vec3,
        /// Angular speed in degrees per second.
        degrees_per_second: f32,
    },
    /// Sinusoidal bobbing around the original position.
    Position {
        /// Direction of travel.
        direction: Vec3,
        /// Angular frequency of the oscillation.
        speed: f32,
        /// Peak offset from the original position.
        distance: f32,
    },
    /// Uniform pulsing between two scale factors.
    Scale {
        /// Factor at the trough of the wave.
        min_scale: f32,
        /// Factor at the crest of the wave.
        max_scale: f32,
        /// Angular frequency of the oscillation.
        speed: f32,
    },
}

/// Animates one property of its owner's transform over time.
///
/// Position and scale animations are relative to the values the transform
/// had when the animator was attached.
#[derive(Debug, Clone)]
pub struct PropertyAnimator {
    params: AnimationParams,
    elapsed: f32,
    original_position: Vec3,
    original_scale: Vec3,
    owner: OwnerRef,
}

impl PropertyAnimator {
    /// Creates an animator for `params`.
    pub fn new(params: AnimationParams) -> Self {
        Self {
            params,
            elapsed: 0.0,
            original_position: Vec3::ZERO,
            original_scale: Vec3::ONE,
            owner: OwnerRef::detached(),
        }
    }

    /// Spin around `axis` at `degrees_per_second`.
    pub fn rotation(axis: Vec3, degrees_per_second: f32) -> Self {
        Self::new(AnimationParams::Rotation {
            axis: axis.normalize_or_zero(),
            degrees_per_second,
        })
    }

    /// Bob along `direction`.
    pub fn bobbing(direction: Vec3, speed: f32, distance: f32) -> Self {
        Self::new(AnimationParams::Position {
            direction,
            speed,
            distance,
        })
    }

    /// Pulse between `min_scale` and `max_scale`.
    pub fn pulsing(min_scale: f32, max_scale: f32, speed: f32) -> Self {
        Self::new(AnimationParams::Scale {
            min_scale,
            max_scale,
            speed,
        })
    }

    /// The animation being played.
    pub fn params(&self) -> AnimationParams {
        self.params
    }

    /// Seconds of animation played so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Component for PropertyAnimator {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    fn awake(&mut self) {
        match self.owner.transform() {
            Some(transform) => {
                self.original_position = transform.position;
                self.original_scale = transform.scale;
            }
            None => log::error!("PropertyAnimator: awake called without an owner transform."),
        }
    }

    fn update(&mut self, delta_time: f32) {
        if !self.owner.is_alive() {
            return;
        }
        self.elapsed += delta_time;
        let t = self.elapsed;

        match self.params {
            AnimationParams::Rotation {
                axis,
                degrees_per_second,
            } => {
                let delta = axis_angle_degrees(axis, degrees_per_second * delta_time);
                self.owner.with_transform_mut(|tr| tr.rotate(delta));
            }
            AnimationParams::Position {
                direction,
                speed,
                distance,
            } => {
                let position = self.original_position + direction * ((t * speed).sin() * distance);
                self.owner.with_transform_mut(|tr| tr.position = position);
            }
            AnimationParams::Scale {
                min_scale,
                max_scale,
                speed,
            } => {
                let wave = ((t * speed).sin() + 1.0) / 2.0;
                let factor = min_scale + wave * (max_scale - min_scale);
                let scale = self.original_scale * factor;
                self.owner.with_transform_mut(|tr| tr.scale = scale);
            }
        }
    }
}

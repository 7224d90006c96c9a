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

use super::Component;
use crate::math::{Mat4, Quaternion, Vec3};

/// Position, rotation and scale of an entity in world space.
///
/// Every entity carries exactly one transform from construction onwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in world units.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quaternion,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Transform {
    /// Creates a transform from its three parts.
    pub fn new(position: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// A transform that only translates.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Model matrix, applying scale then rotation then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Unit vector the transform faces (local -Z).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Rotates by `rotation` on top of the current orientation.
    pub fn rotate(&mut self, rotation: Quaternion) {
        self.rotation = (rotation * self.rotation).normalize();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Component for Transform {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{axis_angle_degrees, FRAC_PI_2};
    use approx::assert_relative_eq;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quaternion::from_rotation_z(FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = t.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn rotate_accumulates() {
        let mut t = Transform::identity();
        t.rotate(axis_angle_degrees(Vec3::Y, 45.0));
        t.rotate(axis_angle_degrees(Vec3::Y, 45.0));
        assert_relative_eq!(t.forward(), Vec3::NEG_X, epsilon = 1e-5);
    }

    #[test]
    fn from_position_keeps_unit_scale() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.rotation, Quaternion::IDENTITY);
    }
}

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

//! Mathematics primitives shared by every Lumina crate.
//!
//! Vector, quaternion and matrix types come from `glam` and are re-exported
//! under engine names so downstream crates never depend on `glam` directly.
//!
//! All angular functions in this module operate in **radians** unless the name
//! says otherwise (e.g. [`degrees_to_radians`]).

pub use glam::{Mat4, Quat as Quaternion, Vec3};

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;

/// Converts an angle from degrees to radians.
///
/// ```
/// use lumina_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Linear interpolation from `a` to `b` by factor `t`. `t` is not clamped.
///
/// ```
/// use lumina_core::math::lerp;
/// assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
/// ```
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Rotation of `degrees` around `axis`. A zero-length axis yields the identity.
pub fn axis_angle_degrees(axis: Vec3, degrees: f32) -> Quaternion {
    match axis.try_normalize() {
        Some(axis) => Quaternion::from_axis_angle(axis, degrees_to_radians(degrees)),
        None => Quaternion::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_extrapolates_past_one() {
        assert_relative_eq!(lerp(1.0, 3.0, 1.5), 4.0);
    }

    #[test]
    fn axis_angle_handles_degenerate_axis() {
        assert_eq!(axis_angle_degrees(Vec3::ZERO, 90.0), Quaternion::IDENTITY);
    }

    #[test]
    fn axis_angle_rotates_about_normalized_axis() {
        let q = axis_angle_degrees(Vec3::new(0.0, 2.0, 0.0), 90.0);
        let rotated = q * Vec3::X;
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-6);
    }
}

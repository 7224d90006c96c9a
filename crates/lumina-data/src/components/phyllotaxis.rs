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

use lumina_core::math::{Mat4, Vec3, PI};
use lumina_core::{Component, OwnerRef};

/// Largest number of instances generated.
pub const MAX_POINTS: usize = 100_000;

/// Lays out instances of its owner's mesh on a sphere following the golden
/// angle spiral found in sunflower heads.
///
/// The instance matrices are written to the owner's mesh once, on `awake`.
#[derive(Debug, Clone)]
pub struct Phyllotaxis {
    /// Number of instances to generate.
    pub num_points: usize,
    /// Radius of the sphere the points lie on.
    pub radius: f32,
    owner: OwnerRef,
}

impl Phyllotaxis {
    /// Creates a generator for `num_points` points on a sphere of `radius`.
    pub fn new(num_points: usize, radius: f32) -> Self {
        Self {
            num_points,
            radius,
            owner: OwnerRef::detached(),
        }
    }
}

impl Default for Phyllotaxis {
    fn default() -> Self {
        Self::new(2000, 3.0)
    }
}

/// Model matrices for `num_points` instances spread over a sphere.
///
/// Points run from the north pole (`y = radius`) to the south pole, each one
/// a golden angle further around the axis than the last. Instances shrink
/// towards the poles. Counts above [`MAX_POINTS`] are clamped.
pub fn phyllotaxis_matrices(num_points: usize, radius: f32) -> Vec<Mat4> {
    if num_points > MAX_POINTS {
        log::warn!("Phyllotaxis point count {num_points} exceeds the maximum of {MAX_POINTS}; clamping.");
    }
    let num_points = num_points.min(MAX_POINTS);
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    // A single point sits on the pole.
    let last = num_points.saturating_sub(1).max(1) as f32;

    (0..num_points)
        .map(|i| {
            let y = 1.0 - (i as f32 / last) * 2.0;
            let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f32;

            let position = Vec3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y) * radius;
            let scale = 0.08 * radius_at_y;
            Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
        })
        .collect()
}

impl Component for Phyllotaxis {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    fn awake(&mut self) {
        let Some(mesh) = self.owner.upgrade().and_then(|e| e.mesh().cloned()) else {
            log::error!("Phyllotaxis must be attached to an entity with a mesh.");
            return;
        };

        let matrices = phyllotaxis_matrices(self.num_points, self.radius);
        log::info!("Generated {} phyllotaxis instances.", matrices.len());
        mesh.set_instances(matrices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumina_core::graphics::Mesh;
    use lumina_core::Entity;
    use std::rc::Rc;

    #[test]
    fn test_points_lie_on_sphere() {
        let matrices = phyllotaxis_matrices(50, 3.0);
        assert_eq!(matrices.len(), 50);

        for m in &matrices {
            let p = m.transform_point3(Vec3::ZERO);
            assert_relative_eq!(p.length(), 3.0, epsilon = 1e-4);
        }

        // First and last points are the poles.
        let north = matrices[0].transform_point3(Vec3::ZERO);
        let south = matrices[49].transform_point3(Vec3::ZERO);
        assert_relative_eq!(north, Vec3::new(0.0, 3.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(south.y, -3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_equator_instances_are_largest() {
        let matrices = phyllotaxis_matrices(101, 1.0);
        let equator_scale = matrices[50].x_axis.x;
        let pole_scale = matrices[0].x_axis.x;
        assert_relative_eq!(equator_scale, 0.08, epsilon = 1e-3);
        assert_relative_eq!(pole_scale, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(phyllotaxis_matrices(0, 1.0).is_empty());
        assert_eq!(phyllotaxis_matrices(1, 1.0).len(), 1);
    }

    #[test]
    fn test_point_count_is_clamped() {
        assert_eq!(phyllotaxis_matrices(usize::MAX, 1.0).len(), MAX_POINTS);
    }

    #[test]
    fn test_awake_fills_owner_mesh() {
        let mesh = Rc::new(Mesh::new("sphere", 240));
        let entity = Entity::with_mesh("cloud", Rc::clone(&mesh));
        entity.add_component(Phyllotaxis::new(64, 2.0));

        assert_eq!(mesh.instance_count(), 64);
        assert!(mesh.is_instanced());
    }

    #[test]
    fn test_awake_without_mesh_is_harmless() {
        let entity = Entity::named("bare");
        entity.add_component(Phyllotaxis::default());
        assert!(entity.has_component::<Phyllotaxis>());
    }
}

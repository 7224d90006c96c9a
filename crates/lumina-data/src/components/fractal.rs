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

use std::rc::Rc;

use lumina_core::graphics::Mesh;
use lumina_core::math::{Mat4, Vec3};
use lumina_core::{Component, OwnerRef};

/// Deepest sponge generated; each level multiplies the instance count by 20.
pub const MAX_RECURSION_DEPTH: u32 = 4;

/// Edge length of the outermost sponge cube.
const SPONGE_EXTENT: f32 = 3.0;

/// Instances its owner's mesh as a Menger sponge and makes it shimmer.
///
/// `awake` generates `20^recursion_depth` base matrices. Every `update`
/// displaces each instance along its direction from the sponge centre by a
/// phase-shifted sine, writing the result into the owner's mesh.
#[derive(Debug, Clone)]
pub struct Fractal {
    /// Subdivision levels; each level multiplies the instance count by 20.
    pub recursion_depth: u32,
    /// Multiplier applied to each leaf cube's size.
    pub scale_multiplier: f32,
    /// Peak displacement of the vibration.
    pub vibration_amplitude: f32,
    /// Angular frequency of the vibration.
    pub vibration_speed: f32,

    base_matrices: Vec<Mat4>,
    elapsed: f32,
    mesh: Option<Rc<Mesh>>,
    owner: OwnerRef,
}

impl Fractal {
    /// Creates a sponge generator.
    pub fn new(
        recursion_depth: u32,
        scale_multiplier: f32,
        vibration_amplitude: f32,
        vibration_speed: f32,
    ) -> Self {
        Self {
            recursion_depth,
            scale_multiplier,
            vibration_amplitude,
            vibration_speed,
            base_matrices: Vec::new(),
            elapsed: 0.0,
            mesh: None,
            owner: OwnerRef::detached(),
        }
    }

    /// The undisplaced instance matrices produced by `awake`.
    pub fn base_matrices(&self) -> &[Mat4] {
        &self.base_matrices
    }
}

impl Default for Fractal {
    fn default() -> Self {
        Self::new(3, 1.0, 0.05, 3.0)
    }
}

/// Leaf cube matrices of a Menger sponge centred on the origin.
///
/// Depths above [`MAX_RECURSION_DEPTH`] are clamped.
pub fn menger_sponge(recursion_depth: u32, scale_multiplier: f32) -> Vec<Mat4> {
    if recursion_depth > MAX_RECURSION_DEPTH {
        log::warn!(
            "Fractal depth {recursion_depth} exceeds the maximum of {MAX_RECURSION_DEPTH}; clamping."
        );
    }
    let recursion_depth = recursion_depth.min(MAX_RECURSION_DEPTH);
    let mut matrices = Vec::with_capacity(20usize.pow(recursion_depth));
    subdivide(
        Vec3::ZERO,
        SPONGE_EXTENT,
        recursion_depth,
        scale_multiplier,
        &mut matrices,
    );
    matrices
}

fn subdivide(position: Vec3, scale: f32, depth: u32, multiplier: f32, out: &mut Vec<Mat4>) {
    if depth == 0 {
        out.push(Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale * multiplier)));
        return;
    }

    let child_scale = scale / 3.0;
    for x in -1i32..=1 {
        for y in -1i32..=1 {
            for z in -1i32..=1 {
                // Keep the 8 corners and 12 edges; drop face centres and the core.
                if x.abs() + y.abs() + z.abs() >= 2 {
                    let offset = Vec3::new(x as f32, y as f32, z as f32) * child_scale;
                    subdivide(position + offset, child_scale, depth - 1, multiplier, out);
                }
            }
        }
    }
}

impl Component for Fractal {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    fn awake(&mut self) {
        let Some(mesh) = self.owner.upgrade().and_then(|e| e.mesh().cloned()) else {
            log::error!("Fractal must be attached to an entity with a mesh.");
            return;
        };

        self.base_matrices = menger_sponge(self.recursion_depth, self.scale_multiplier);
        log::info!("Generated {} fractal instances.", self.base_matrices.len());
        mesh.set_instances(self.base_matrices.clone());
        self.mesh = Some(mesh);
    }

    fn update(&mut self, delta_time: f32) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        if self.base_matrices.is_empty() || !self.owner.is_alive() {
            return;
        }

        self.elapsed += delta_time;
        let time = self.elapsed * self.vibration_speed;
        let amplitude = self.vibration_amplitude;
        let base = &self.base_matrices;

        mesh.update_instances(|instances| {
            for (i, (dynamic, base)) in instances.iter_mut().zip(base).enumerate() {
                let centre = base.w_axis.truncate();
                let direction = centre.normalize_or_zero();
                let offset = direction * ((time + i as f32 * 0.1).sin() * amplitude);
                *dynamic = Mat4::from_translation(offset) * *base;
            }
        });
    }
}

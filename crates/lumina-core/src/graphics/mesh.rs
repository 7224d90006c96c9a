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

use std::cell::{Ref, RefCell};

use crate::math::Mat4;

/// How the renderer should assemble the mesh's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Indexed triangle list.
    #[default]
    Triangles,
    /// One point per vertex.
    Points,
}

/// A renderable payload shared between entities.
///
/// Several entities may reference the same mesh through an `Rc<Mesh>`, so the
/// per-instance model matrices written by procedural generators sit behind a
/// `RefCell`.
#[derive(Debug, Default)]
pub struct Mesh {
    label: String,
    vertex_count: usize,
    render_mode: RenderMode,
    instances: RefCell<Vec<Mat4>>,
}

impl Mesh {
    /// Creates a triangle mesh description.
    pub fn new(label: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            label: label.into(),
            vertex_count,
            render_mode: RenderMode::Triangles,
            instances: RefCell::new(Vec::new()),
        }
    }

    /// Creates a point-cloud mesh with `point_count` points.
    pub fn point_cloud(label: impl Into<String>, point_count: usize) -> Self {
        Self {
            render_mode: RenderMode::Points,
            ..Self::new(label, point_count)
        }
    }

    /// Debug label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of vertices (or points).
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Primitive assembly mode.
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Replaces the per-instance model matrices.
    pub fn set_instances(&self, matrices: Vec<Mat4>) {
        *self.instances.borrow_mut() = matrices;
    }

    /// Mutates the instance matrices in place.
    pub fn update_instances(&self, f: impl FnOnce(&mut [Mat4])) {
        f(self.instances.borrow_mut().as_mut_slice());
    }

    /// Read access to the instance matrices.
    pub fn instances(&self) -> Ref<'_, [Mat4]> {
        Ref::map(self.instances.borrow(), Vec::as_slice)
    }

    /// Number of instances; zero for a non-instanced mesh.
    pub fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Whether the renderer should draw this mesh instanced.
    pub fn is_instanced(&self) -> bool {
        self.instance_count() > 0
    }
}

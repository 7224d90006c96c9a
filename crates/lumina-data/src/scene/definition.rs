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

//! Declarative scene descriptions stored as RON.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lumina_core::graphics::Mesh;
use lumina_core::math::Vec3;
use lumina_core::{Entity, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Scene;
use crate::factory::{ArgValue, ComponentFactory, FactoryError};

/// The root of a scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// Objects in update order.
    #[serde(default)]
    pub objects: Vec<ObjectDefinition>,
}

/// One entity and the components to attach to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    /// Entity name.
    pub name: String,
    /// Renderable payload. Objects naming the same mesh label share it.
    #[serde(default)]
    pub mesh: Option<MeshDefinition>,
    /// Initial position, written `(x, y, z)`.
    #[serde(default)]
    pub position: [f32; 3],
    /// Initial scale.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Components, attached in order after the transform is placed.
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
    /// Marks the object as the scene's active camera.
    #[serde(default)]
    pub active_camera: bool,
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

/// A mesh payload description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshDefinition {
    /// A triangle mesh.
    Triangles {
        /// Identifies the geometry; equal labels share one mesh.
        label: String,
        /// Vertex count.
        vertex_count: usize,
    },
    /// A point cloud.
    Points {
        /// Identifies the geometry; equal labels share one mesh.
        label: String,
        /// Number of points.
        count: usize,
    },
}

impl MeshDefinition {
    fn label(&self) -> &str {
        match self {
            MeshDefinition::Triangles { label, .. } | MeshDefinition::Points { label, .. } => label,
        }
    }

    fn build(&self) -> Mesh {
        match self {
            MeshDefinition::Triangles {
                label,
                vertex_count,
            } => Mesh::new(label.as_str(), *vertex_count),
            MeshDefinition::Points { label, count } => Mesh::point_cloud(label.as_str(), *count),
        }
    }
}

/// A component by factory name with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Name registered with the [`ComponentFactory`].
    pub kind: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<ArgValue>,
}

/// Errors raised while loading or assembling a scene.
#[derive(Debug, Error)]
pub enum SceneLoadError {
    /// The scene file could not be read.
    #[error("failed to read scene file '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The text is not a valid scene definition.
    #[error("invalid scene definition: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A component of an object could not be built.
    #[error("object '{object}': {source}")]
    Component {
        /// The object being assembled.
        object: String,
        /// What the factory reported.
        #[source]
        source: FactoryError,
    },
}

impl SceneDefinition {
    /// Parses a definition from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(text)?)
    }

    /// Serializes the definition as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

/// Assembles live entities from `definition`.
///
/// Each object's transform is placed before its components are attached, so
/// animators capture the authored position and scale as their baseline. The
/// first failing component aborts the build.
pub fn build_scene(
    definition: &SceneDefinition,
    factory: &ComponentFactory,
) -> Result<Scene, SceneLoadError> {
    let mut scene = Scene::new();
    let mut meshes: HashMap<String, Rc<Mesh>> = HashMap::new();

    for object in &definition.objects {
        let entity = match &object.mesh {
            Some(mesh) => {
                let mesh = meshes
                    .entry(mesh.label().to_owned())
                    .or_insert_with(|| Rc::new(mesh.build()));
                Entity::with_mesh(object.name.as_str(), Rc::clone(mesh))
            }
            None => Entity::named(object.name.as_str()),
        };

        if let Some(transform) = entity.get_component::<Transform>() {
            let mut transform = transform.borrow_mut();
            transform.position = Vec3::from_array(object.position);
            transform.scale = Vec3::from_array(object.scale);
        }

        for component in &object.components {
            factory
                .attach(&entity, &component.kind, &component.args)
                .map_err(|source| SceneLoadError::Component {
                    object: object.name.clone(),
                    source,
                })?;
        }

        if object.active_camera && !scene.set_active_camera(Rc::clone(&entity)) {
            log::warn!("Object '{}' is marked as active camera but has none.", object.name);
        }
        scene.add_object(entity);
    }

    Ok(scene)
}

/// Reads a RON scene file and assembles it with `factory`.
pub fn load_scene(path: impl AsRef<Path>, factory: &ComponentFactory) -> Result<Scene, SceneLoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SceneLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition = SceneDefinition::from_ron_str(&text)?;
    let scene = build_scene(&definition, factory)?;
    log::info!("Scene loaded from {}: {} object(s).", path.display(), scene.len());
    Ok(scene)
}

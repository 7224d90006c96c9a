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

//! The scene container and its declarative description.

mod definition;

pub use definition::*;

use std::rc::Rc;

use lumina_core::Entity;

use crate::components::Camera;

/// An ordered collection of live entities updated together each frame.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Rc<Entity>>,
    active_camera: Option<Rc<Entity>>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object` to the scene. It is updated after every object added
    /// before it.
    pub fn add_object(&mut self, object: Rc<Entity>) {
        self.objects.push(object);
    }

    /// The scene's entities, in insertion order.
    pub fn objects(&self) -> &[Rc<Entity>] {
        &self.objects
    }

    /// Finds the first object with the given name.
    pub fn find(&self, name: &str) -> Option<&Rc<Entity>> {
        self.objects.iter().find(|o| o.name() == name)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.active_camera = None;
    }

    /// Makes `camera` the one renderers look through.
    ///
    /// Returns `false`, leaving the selection unchanged, if the entity has no
    /// [`Camera`].
    pub fn set_active_camera(&mut self, camera: Rc<Entity>) -> bool {
        if !camera.has_component::<Camera>() {
            log::warn!("Entity '{}' has no Camera and cannot be made active.", camera.name());
            return false;
        }
        self.active_camera = Some(camera);
        true
    }

    /// The explicitly selected camera, or else the first object carrying a
    /// [`Camera`].
    pub fn active_camera(&self) -> Option<Rc<Entity>> {
        self.active_camera.clone().or_else(|| self.find_camera())
    }

    /// The first object carrying a [`Camera`].
    pub fn find_camera(&self) -> Option<Rc<Entity>> {
        self.objects
            .iter()
            .find(|o| o.has_component::<Camera>())
            .cloned()
    }

    /// Updates every object with the same `delta_time`.
    pub fn update(&self, delta_time: f32) {
        for object in &self.objects {
            object.update(delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::Component;
    use std::cell::Cell;

    struct Ticker(Rc<Cell<u32>>);

    impl Component for Ticker {
        fn update(&mut self, _delta_time: f32) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_update_reaches_every_object() {
        let ticks = Rc::new(Cell::new(0));
        let mut scene = Scene::new();
        for name in ["a", "b", "c"] {
            let entity = Entity::named(name);
            entity.add_component(Ticker(Rc::clone(&ticks)));
            scene.add_object(entity);
        }

        scene.update(0.016);
        scene.update(0.016);
        assert_eq!(ticks.get(), 6);
        assert_eq!(scene.len(), 3);
        assert!(scene.find("b").is_some());
    }

    #[test]
    fn test_camera_lookup() {
        let mut scene = Scene::new();
        scene.add_object(Entity::named("ground"));
        assert!(scene.active_camera().is_none());

        let first = Entity::named("first");
        first.add_component(Camera::default());
        let second = Entity::named("second");
        second.add_component(Camera::default());
        scene.add_object(Rc::clone(&first));
        scene.add_object(Rc::clone(&second));

        let found = scene.active_camera().expect("camera");
        assert!(Rc::ptr_eq(&found, &first));

        assert!(scene.set_active_camera(Rc::clone(&second)));
        assert!(!scene.set_active_camera(Entity::named("plain")));
        let active = scene.active_camera().expect("camera");
        assert!(Rc::ptr_eq(&active, &second));
    }
}

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

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{Component, OwnerRef, Transform};
use crate::graphics::Mesh;

/// Shared handle to a component attached to an entity.
pub type ComponentHandle<T> = Rc<RefCell<T>>;

/// One attached component, stored twice over the same allocation: once as
/// `Any` for typed lookup and once as `dyn Component` for the hooks.
struct ComponentSlot {
    type_id: TypeId,
    type_name: &'static str,
    erased: Rc<dyn Any>,
    hooks: Rc<RefCell<dyn Component>>,
}

/// A composition root: a [`Transform`], an optional shared [`Mesh`] and any
/// number of components keyed by concrete type.
///
/// Entities live behind an `Rc` so components can hold a weak [`OwnerRef`]
/// back to them. Dropping the last `Rc` drops every attached component, and
/// with them any [`ScopedSubscription`](crate::event::ScopedSubscription) they
/// own.
pub struct Entity {
    name: String,
    mesh: Option<Rc<Mesh>>,
    // Attachment order is update order.
    components: RefCell<Vec<ComponentSlot>>,
}

impl Entity {
    /// Creates an anonymous entity with an identity transform.
    pub fn new() -> Rc<Self> {
        Self::build(String::new(), None)
    }

    /// Creates a named entity with an identity transform.
    pub fn named(name: impl Into<String>) -> Rc<Self> {
        Self::build(name.into(), None)
    }

    /// Creates a named entity that renders `mesh`.
    pub fn with_mesh(name: impl Into<String>, mesh: Rc<Mesh>) -> Rc<Self> {
        Self::build(name.into(), Some(mesh))
    }

    fn build(name: String, mesh: Option<Rc<Mesh>>) -> Rc<Self> {
        let entity = Rc::new(Self {
            name,
            mesh,
            components: RefCell::new(Vec::new()),
        });
        entity.add_component(Transform::default());
        entity
    }

    /// Debug name; empty for anonymous entities.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The renderable payload, if any.
    pub fn mesh(&self) -> Option<&Rc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Attaches `component`, replacing any component of the same type.
    ///
    /// The component receives its owner reference and runs
    /// [`awake`](Component::awake) before it becomes visible to
    /// [`get_component`](Self::get_component). A replaced component is dropped
    /// and never updated again. The returned handle can be used to configure
    /// the component further.
    pub fn add_component<T: Component>(self: &Rc<Self>, component: T) -> ComponentHandle<T> {
        let handle = Rc::new(RefCell::new(component));
        {
            let mut component = handle.borrow_mut();
            component.attach(OwnerRef::new(self));
            component.awake();
        }

        let erased: Rc<dyn Any> = handle.clone();
        let hooks: Rc<RefCell<dyn Component>> = handle.clone();
        let slot = ComponentSlot {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            erased,
            hooks,
        };

        let replaced = {
            let mut components = self.components.borrow_mut();
            let previous = components
                .iter()
                .position(|s| s.type_id == slot.type_id)
                .map(|index| components.remove(index));
            components.push(slot);
            previous
        };

        match &replaced {
            Some(old) => log::debug!("Entity '{}': replaced {}.", self.name, old.type_name),
            None => log::debug!("Entity '{}': attached {}.", self.name, type_name::<T>()),
        }
        // Dropped outside the borrow: the old component may own guards or
        // touch this entity on drop.
        drop(replaced);

        handle
    }

    /// Looks up the component of type `T`.
    pub fn get_component<T: Component>(&self) -> Option<ComponentHandle<T>> {
        let erased = self
            .components
            .borrow()
            .iter()
            .find(|s| s.type_id == TypeId::of::<T>())
            .map(|s| Rc::clone(&s.erased))?;
        erased.downcast::<RefCell<T>>().ok()
    }

    /// Whether a component of type `T` is attached.
    pub fn has_component<T: Component>(&self) -> bool {
        self.components
            .borrow()
            .iter()
            .any(|s| s.type_id == TypeId::of::<T>())
    }

    /// Detaches and returns the component of type `T`.
    ///
    /// The transform is required for the entity's whole life and cannot be
    /// removed; asking for it returns `None`.
    pub fn remove_component<T: Component>(&self) -> Option<ComponentHandle<T>> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            log::warn!("Entity '{}': the Transform cannot be removed.", self.name);
            return None;
        }
        let slot = {
            let mut components = self.components.borrow_mut();
            let index = components
                .iter()
                .position(|s| s.type_id == TypeId::of::<T>())?;
            components.remove(index)
        };
        log::debug!("Entity '{}': removed {}.", self.name, slot.type_name);
        slot.erased.downcast::<RefCell<T>>().ok()
    }

    /// Number of attached components, the transform included.
    pub fn component_count(&self) -> usize {
        self.components.borrow().len()
    }

    /// Type names of the attached components, in update order.
    pub fn component_names(&self) -> Vec<&'static str> {
        self.components.borrow().iter().map(|s| s.type_name).collect()
    }

    /// Runs [`Component::update`] on every attached component, in attachment
    /// order.
    ///
    /// The component list is snapshotted first, so components may add, replace
    /// or remove siblings during the pass: removed or replaced components are
    /// skipped, new ones start updating next frame. A component whose cell is
    /// already borrowed (it is being accessed re-entrantly) is skipped for this
    /// call.
    pub fn update(&self, delta_time: f32) {
        let snapshot: Vec<(TypeId, Rc<RefCell<dyn Component>>)> = self
            .components
            .borrow()
            .iter()
            .map(|s| (s.type_id, Rc::clone(&s.hooks)))
            .collect();

        for (type_id, hooks) in snapshot {
            if !self.is_attached(type_id, &hooks) {
                continue;
            }
            match hooks.try_borrow_mut() {
                Ok(mut component) => component.update(delta_time),
                Err(_) => log::warn!(
                    "Entity '{}': skipped update of a component that is already borrowed.",
                    self.name
                ),
            }
        }
    }

    fn is_attached(&self, type_id: TypeId, hooks: &Rc<RefCell<dyn Component>>) -> bool {
        self.components
            .borrow()
            .iter()
            .any(|s| s.type_id == type_id && Rc::ptr_eq(&s.hooks, hooks))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("mesh", &self.mesh.as_ref().map(|m| m.label().to_owned()))
            .field("components", &self.component_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventBus, KeyPressed, ScopedSubscription};
    use crate::math::Vec3;
    use std::cell::Cell;

    /// Records every hook it receives into a shared journal.
    struct Probe {
        label: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn new(label: &'static str, journal: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                label,
                journal: Rc::clone(journal),
            }
        }
    }

    impl Component for Probe {
        fn awake(&mut self) {
            self.journal.borrow_mut().push(format!("{}:awake", self.label));
        }

        fn update(&mut self, delta_time: f32) {
            self.journal
                .borrow_mut()
                .push(format!("{}:update:{delta_time}", self.label));
        }
    }

    #[derive(Default)]
    struct Counter {
        updates: u32,
        last_dt: f32,
    }

    impl Component for Counter {
        fn update(&mut self, delta_time: f32) {
            self.updates += 1;
            self.last_dt = delta_time;
        }
    }

    #[derive(Default)]
    struct Other {
        updates: u32,
    }

    impl Component for Other {
        fn update(&mut self, _delta_time: f32) {
            self.updates += 1;
        }
    }

    #[test]
    fn new_entity_has_transform() {
        let entity = Entity::named("root");
        assert!(entity.has_component::<Transform>());
        assert_eq!(entity.component_count(), 1);
        assert!(entity.mesh().is_none());
    }

    #[test]
    fn awake_runs_before_first_update() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let entity = Entity::new();
        entity.add_component(Probe::new("p", &journal));
        assert_eq!(*journal.borrow(), vec!["p:awake"]);

        entity.update(0.5);
        entity.update(0.25);
        assert_eq!(
            *journal.borrow(),
            vec!["p:awake", "p:update:0.5", "p:update:0.25"]
        );
    }

    #[test]
    fn get_component_returns_absent_for_missing_type() {
        let entity = Entity::new();
        assert!(entity.get_component::<Counter>().is_none());
    }

    #[test]
    fn re_adding_a_type_replaces_it() {
        let entity = Entity::new();
        let first = entity.add_component(Counter::default());
        first.borrow_mut().updates = 10;

        let second = entity.add_component(Counter::default());
        assert_eq!(entity.component_count(), 2);

        let current = entity
            .get_component::<Counter>()
            .expect("counter should be attached");
        assert!(Rc::ptr_eq(&current, &second));
        assert_eq!(current.borrow().updates, 0);

        entity.update(1.0);
        assert_eq!(first.borrow().updates, 10);
        assert_eq!(second.borrow().updates, 1);
    }

    #[test]
    fn update_fans_out_same_delta_to_all() {
        let entity = Entity::new();
        let counter = entity.add_component(Counter::default());
        let other = entity.add_component(Other::default());

        entity.update(0.016);

        assert_eq!(counter.borrow().updates, 1);
        assert_eq!(counter.borrow().last_dt, 0.016);
        assert_eq!(other.borrow().updates, 1);
    }

    #[test]
    fn update_follows_attachment_order() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let entity = Entity::new();

        struct Second(Probe);
        impl Component for Second {
            fn update(&mut self, dt: f32) {
                self.0.update(dt);
            }
        }

        entity.add_component(Probe::new("first", &journal));
        entity.add_component(Second(Probe::new("second", &journal)));
        journal.borrow_mut().clear();

        entity.update(1.0);
        assert_eq!(
            *journal.borrow(),
            vec!["first:update:1", "second:update:1"]
        );
    }

    /// Replaces `Other` on its owner during its own update.
    struct Replacer {
        owner: OwnerRef,
    }

    impl Component for Replacer {
        fn attach(&mut self, owner: OwnerRef) {
            self.owner = owner;
        }

        fn update(&mut self, _delta_time: f32) {
            if let Some(entity) = self.owner.upgrade() {
                entity.add_component(Other { updates: 100 });
            }
        }
    }

    #[test]
    fn replacing_a_sibling_mid_update_is_safe() {
        let entity = Entity::new();
        entity.add_component(Replacer {
            owner: OwnerRef::detached(),
        });
        let stale = entity.add_component(Other::default());

        entity.update(1.0);

        // The stale instance was replaced before its turn and is skipped.
        assert_eq!(stale.borrow().updates, 0);
        let fresh = entity.get_component::<Other>().expect("other should exist");
        assert_eq!(fresh.borrow().updates, 100);
    }

    #[test]
    fn components_added_mid_update_start_next_frame() {
        let entity = Entity::new();
        entity.add_component(Replacer {
            owner: OwnerRef::detached(),
        });

        entity.update(1.0);
        let added = entity.get_component::<Other>().expect("other should exist");
        assert_eq!(added.borrow().updates, 100);
    }

    #[test]
    fn remove_component_detaches_but_keeps_transform() {
        let entity = Entity::new();
        entity.add_component(Counter::default());

        assert!(entity.remove_component::<Counter>().is_some());
        assert!(entity.remove_component::<Counter>().is_none());
        assert!(entity.remove_component::<Transform>().is_none());
        assert!(entity.has_component::<Transform>());
    }

    #[test]
    fn borrowed_component_is_skipped_not_panicking() {
        let entity = Entity::new();
        let counter = entity.add_component(Counter::default());

        let held = counter.borrow();
        entity.update(1.0);
        drop(held);

        assert_eq!(counter.borrow().updates, 0);
        entity.update(1.0);
        assert_eq!(counter.borrow().updates, 1);
    }

    /// Moves its owner each frame, skipping silently once the owner is gone.
    struct Mover {
        owner: OwnerRef,
    }

    impl Component for Mover {
        fn attach(&mut self, owner: OwnerRef) {
            self.owner = owner;
        }

        fn update(&mut self, delta_time: f32) {
            self.owner
                .with_transform_mut(|t| t.position.x += delta_time);
        }
    }

    #[test]
    fn component_reaches_owner_transform() {
        let entity = Entity::new();
        entity.add_component(Mover {
            owner: OwnerRef::detached(),
        });

        entity.update(2.0);

        let transform = entity.get_component::<Transform>().expect("transform");
        assert_eq!(transform.borrow().position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn component_outliving_owner_skips_work() {
        let entity = Entity::new();
        let mover = entity.add_component(Mover {
            owner: OwnerRef::detached(),
        });
        drop(entity);

        assert!(!mover.borrow().owner.is_alive());
        mover.borrow_mut().update(1.0);
    }

    /// Owns a subscription for as long as it is attached.
    struct Listener {
        _subscription: ScopedSubscription,
    }

    impl Component for Listener {}

    #[test]
    fn dropping_entity_releases_component_subscriptions() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let entity = Entity::new();

        let h = Rc::clone(&hits);
        entity.add_component(Listener {
            _subscription: bus.subscribe(move |_: &mut KeyPressed| h.set(h.get() + 1)),
        });

        bus.publish(&mut KeyPressed::new(1));
        drop(entity);
        bus.publish(&mut KeyPressed::new(2));

        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 0);
    }

    #[test]
    fn entity_with_mesh_shares_payload() {
        let mesh = Rc::new(Mesh::new("sphere", 512));
        let a = Entity::with_mesh("a", Rc::clone(&mesh));
        let b = Entity::with_mesh("b", Rc::clone(&mesh));

        assert!(Rc::ptr_eq(a.mesh().expect("mesh"), b.mesh().expect("mesh")));
        assert_eq!(Rc::strong_count(&mesh), 3);
    }
}

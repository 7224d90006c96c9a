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

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Entity, Transform};

/// A unit of per-frame behaviour attached to an [`Entity`].
///
/// Every hook has a no-op default, so a component only implements what it
/// needs. Per attachment the hooks run in a fixed order:
///
/// 1. [`attach`](Self::attach) hands over the owner back-reference,
/// 2. [`awake`](Self::awake) runs exactly once,
/// 3. [`update`](Self::update) runs once per frame until the component is
///    replaced or its entity is dropped.
pub trait Component: Any {
    /// Receives the weak back-reference to the owning entity.
    ///
    /// Components that need their owner store it; the rest ignore it.
    fn attach(&mut self, owner: OwnerRef) {
        let _ = owner;
    }

    /// Called once, right after attachment and before the first update.
    fn awake(&mut self) {}

    /// Called once per simulation frame.
    fn update(&mut self, delta_time: f32) {
        let _ = delta_time;
    }
}

/// A non-owning reference from a component back to its entity.
///
/// It never keeps the entity alive. Upgrade it for the duration of a single
/// hook and skip the work when the upgrade fails. Event callbacks should
/// capture an `OwnerRef` rather than an `Rc<Entity>`: a strong capture held by
/// a component's own subscription keeps the entity alive forever.
#[derive(Clone, Default)]
pub struct OwnerRef {
    entity: Weak<Entity>,
}

impl OwnerRef {
    pub(crate) fn new(entity: &Rc<Entity>) -> Self {
        Self {
            entity: Rc::downgrade(entity),
        }
    }

    /// A reference that is not attached to any entity.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Returns the owner if it is still alive.
    pub fn upgrade(&self) -> Option<Rc<Entity>> {
        self.entity.upgrade()
    }

    /// Whether the owner is still alive.
    pub fn is_alive(&self) -> bool {
        self.entity.strong_count() > 0
    }

    /// A copy of the owner's transform, if the owner and its transform exist.
    pub fn transform(&self) -> Option<Transform> {
        let owner = self.upgrade()?;
        let transform = owner.get_component::<Transform>()?;
        let value = transform.try_borrow().ok().map(|t| *t);
        value
    }

    /// Runs `f` on the owner's transform.
    ///
    /// Returns `None` without calling `f` when the owner is gone, has no
    /// transform, or the transform is already borrowed.
    pub fn with_transform_mut<R>(&self, f: impl FnOnce(&mut Transform) -> R) -> Option<R> {
        let owner = self.upgrade()?;
        let transform = owner.get_component::<Transform>()?;
        let mut guard = transform.try_borrow_mut().ok()?;
        Some(f(&mut *guard))
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerRef")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn detached_reference_reports_absence() {
        let owner = OwnerRef::detached();
        assert!(!owner.is_alive());
        assert!(owner.upgrade().is_none());
        assert!(owner.transform().is_none());
        assert!(owner.with_transform_mut(|_| ()).is_none());
    }

    #[test]
    fn reference_observes_without_owning() {
        let entity = Entity::new();
        let owner = OwnerRef::new(&entity);
        assert!(owner.is_alive());

        owner.with_transform_mut(|t| t.position = Vec3::ONE);
        assert_eq!(owner.transform().map(|t| t.position), Some(Vec3::ONE));

        drop(entity);
        assert!(!owner.is_alive());
        assert!(owner.transform().is_none());
    }
}

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

use std::any::TypeId;
use std::rc::Weak;

use super::bus::{BusShared, SubscriptionHandle};

#[derive(Debug)]
struct Entry {
    handle: SubscriptionHandle,
    type_id: TypeId,
    bus: Weak<BusShared>,
}

/// Owns exactly one registered callback and removes it when dropped.
///
/// Returned by [`EventBus::subscribe`](super::EventBus::subscribe). Store it in
/// whatever owns the interest in the event (a component, a controller, ...);
/// when that owner is dropped, the callback goes with it. The guard is
/// move-only, and assigning a new guard over an old one unsubscribes the old
/// one. [`Default`] produces an empty guard that owns nothing.
///
/// A guard that outlives its bus simply does nothing when dropped.
#[derive(Debug, Default)]
#[must_use = "dropping a ScopedSubscription unsubscribes its callback immediately"]
pub struct ScopedSubscription {
    entry: Option<Entry>,
}

impl ScopedSubscription {
    pub(crate) fn new(handle: SubscriptionHandle, type_id: TypeId, bus: Weak<BusShared>) -> Self {
        Self {
            entry: Some(Entry {
                handle,
                type_id,
                bus,
            }),
        }
    }

    /// An empty guard that owns no subscription.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this guard currently owns a subscription.
    pub fn is_active(&self) -> bool {
        self.entry.is_some()
    }

    /// The handle of the owned subscription, if any.
    pub fn handle(&self) -> Option<SubscriptionHandle> {
        self.entry.as_ref().map(|entry| entry.handle)
    }
}

impl Drop for ScopedSubscription {
    fn drop(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        if let Some(bus) = entry.bus.upgrade() {
            bus.unsubscribe(entry.handle, entry.type_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventBus, KeyPressed, WindowResize};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_subscription(bus: &EventBus, counter: &Rc<Cell<u32>>) -> ScopedSubscription {
        let c = Rc::clone(counter);
        bus.subscribe(move |_: &mut KeyPressed| c.set(c.get() + 1))
    }

    #[test]
    fn empty_guard_owns_nothing() {
        let guard = ScopedSubscription::empty();
        assert!(!guard.is_active());
        assert_eq!(guard.handle(), None);
    }

    #[test]
    fn moving_transfers_ownership() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));

        let original = counting_subscription(&bus, &counter);
        let handle = original.handle();
        let moved = original;

        assert_eq!(moved.handle(), handle);
        bus.publish(&mut KeyPressed::new(1));
        assert_eq!(counter.get(), 1);

        drop(moved);
        bus.publish(&mut KeyPressed::new(2));
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn taking_leaves_an_empty_guard_behind() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));

        let mut slot = counting_subscription(&bus, &counter);
        let taken = std::mem::take(&mut slot);

        assert!(!slot.is_active());
        assert!(taken.is_active());

        // The moved-from guard unsubscribes nothing.
        drop(slot);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 1);

        drop(taken);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 0);
    }

    #[test]
    fn reassignment_releases_previous_subscription() {
        let bus = EventBus::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let mut guard = counting_subscription(&bus, &first);
        assert!(guard.is_active());
        guard = counting_subscription(&bus, &second);

        bus.publish(&mut KeyPressed::new(1));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert!(guard.is_active());
    }

    #[test]
    fn guard_outliving_bus_drops_quietly() {
        let guard = {
            let bus = EventBus::new();
            bus.subscribe(|_: &mut WindowResize| {})
        };
        assert!(guard.is_active());
        drop(guard);
    }

    #[test]
    fn guards_for_other_types_are_independent() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));
        let _keys = counting_subscription(&bus, &counter);
        let resize = bus.subscribe(|_: &mut WindowResize| {});

        drop(resize);

        assert_eq!(bus.subscriber_count::<WindowResize>(), 0);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 1);
    }
}

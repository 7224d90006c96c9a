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
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::subscription::ScopedSubscription;
use super::Event;

/// Opaque token identifying one registered callback.
///
/// Handles increase monotonically for the whole process, so ordering handles
/// is the same as ordering registrations.
pub type SubscriptionHandle = u64;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(0);

type ErasedCallback = Rc<dyn Fn(&mut dyn Event)>;

/// Per-event-type callbacks, ordered by handle.
#[derive(Default)]
struct SubscriberRegistry {
    subscribers: HashMap<TypeId, BTreeMap<SubscriptionHandle, ErasedCallback>>,
}

impl SubscriberRegistry {
    fn insert(&mut self, type_id: TypeId, handle: SubscriptionHandle, callback: ErasedCallback) {
        self.subscribers
            .entry(type_id)
            .or_default()
            .insert(handle, callback);
    }

    fn remove(&mut self, handle: SubscriptionHandle, type_id: TypeId) -> Option<ErasedCallback> {
        let callbacks = self.subscribers.get_mut(&type_id)?;
        let removed = callbacks.remove(&handle);
        if callbacks.is_empty() {
            self.subscribers.remove(&type_id);
        }
        removed
    }

    fn contains(&self, type_id: TypeId, handle: SubscriptionHandle) -> bool {
        self.subscribers
            .get(&type_id)
            .is_some_and(|callbacks| callbacks.contains_key(&handle))
    }

    /// Copies the callbacks registered for `type_id`, in handle order.
    fn snapshot(&self, type_id: TypeId) -> Vec<(SubscriptionHandle, ErasedCallback)> {
        self.subscribers
            .get(&type_id)
            .map(|callbacks| {
                callbacks
                    .iter()
                    .map(|(handle, callback)| (*handle, Rc::clone(callback)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn count(&self, type_id: TypeId) -> usize {
        self.subscribers.get(&type_id).map_or(0, BTreeMap::len)
    }
}

/// State shared between an [`EventBus`] and the guards it hands out.
pub(crate) struct BusShared {
    registry: RefCell<SubscriberRegistry>,
    queue: RefCell<Vec<Box<dyn Event>>>,
    dispatching: Cell<bool>,
}

impl BusShared {
    /// Removes one registry entry. Unknown handles are ignored.
    pub(crate) fn unsubscribe(&self, handle: SubscriptionHandle, type_id: TypeId) {
        let removed = self.registry.borrow_mut().remove(handle, type_id);
        // The callback may own guards of its own; they must drop after the
        // registry borrow is released.
        if removed.is_some() {
            log::debug!("Unsubscribed handle {handle}.");
        }
        drop(removed);
    }
}

/// Marks a dispatch pass as running until dropped, unwinding included.
struct DispatchPass<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchPass<'a> {
    fn begin(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchPass<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// A type-indexed publish/subscribe event bus.
///
/// Subscribers register for one concrete event type and are notified in
/// registration order. Events are delivered either synchronously with
/// [`publish`](Self::publish) or deferred with [`queue_event`](Self::queue_event)
/// until the next [`dispatch_events`](Self::dispatch_events) pass.
///
/// The bus is a cheap handle: clones refer to the same registry and queue. It
/// is deliberately `!Send`; producers running on other threads must hand their
/// data to the simulation thread through their own synchronised buffer.
#[derive(Clone)]
pub struct EventBus {
    shared: Rc<BusShared>,
}

impl EventBus {
    /// Creates a bus with no subscribers and an empty queue.
    pub fn new() -> Self {
        log::info!("EventBus initialized.");
        Self {
            shared: Rc::new(BusShared {
                registry: RefCell::new(SubscriberRegistry::default()),
                queue: RefCell::new(Vec::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// Registers `callback` for events of exactly type `E`.
    ///
    /// The callback stays registered for as long as the returned guard lives.
    pub fn subscribe<E, F>(&self, callback: F) -> ScopedSubscription
    where
        E: Event,
        F: Fn(&mut E) + 'static,
    {
        let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
        let type_id = TypeId::of::<E>();

        let erased: ErasedCallback = Rc::new(move |event: &mut dyn Event| {
            if let Some(event) = event.as_any_mut().downcast_mut::<E>() {
                callback(&mut *event);
            }
        });
        self.shared
            .registry
            .borrow_mut()
            .insert(type_id, handle, erased);

        log::debug!("Subscribed handle {handle} to {}.", type_name::<E>());
        ScopedSubscription::new(handle, type_id, Rc::downgrade(&self.shared))
    }

    /// Delivers `event` immediately to every subscriber of its concrete type.
    ///
    /// Stops as soon as a callback marks the event handled. Publishing a type
    /// nobody listens to does nothing.
    pub fn publish<E: Event>(&self, event: &mut E) {
        self.publish_dyn(event);
    }

    /// Type-erased form of [`publish`](Self::publish); routing uses the
    /// concrete type behind the trait object.
    pub fn publish_dyn(&self, event: &mut dyn Event) {
        let type_id = Any::type_id(event.as_any());
        let callbacks = self.shared.registry.borrow().snapshot(type_id);
        if callbacks.is_empty() {
            return;
        }

        log::trace!("Publishing {} to {} subscriber(s).", event.name(), callbacks.len());

        for (handle, callback) in callbacks {
            // Skip callbacks that an earlier callback unsubscribed.
            if !self.shared.registry.borrow().contains(type_id, handle) {
                continue;
            }
            callback(&mut *event);
            if event.is_handled() {
                break;
            }
        }
    }

    /// Enqueues `event` for the next [`dispatch_events`](Self::dispatch_events)
    /// pass. No callback runs now.
    pub fn queue_event<E: Event>(&self, event: E) {
        self.queue_boxed(Box::new(event));
    }

    /// Type-erased form of [`queue_event`](Self::queue_event).
    pub fn queue_boxed(&self, event: Box<dyn Event>) {
        self.shared.queue.borrow_mut().push(event);
    }

    /// Delivers every queued event in FIFO order and returns how many were
    /// drained.
    ///
    /// The queue is swapped out before delivery, so events queued by callbacks
    /// during this pass are held for the next one. Calling this from inside a
    /// callback is a no-op.
    pub fn dispatch_events(&self) -> usize {
        if self.shared.dispatching.get() {
            log::warn!("dispatch_events called re-entrantly; ignoring nested pass.");
            return 0;
        }

        let pending = std::mem::take(&mut *self.shared.queue.borrow_mut());
        if pending.is_empty() {
            return 0;
        }

        let _pass = DispatchPass::begin(&self.shared.dispatching);
        let count = pending.len();
        for mut event in pending {
            self.publish_dyn(event.as_mut());
        }

        count
    }

    /// Number of callbacks currently registered for `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.shared.registry.borrow().count(TypeId::of::<E>())
    }

    /// Number of events waiting for the next dispatch pass.
    pub fn pending_len(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    /// Drops every queued event without delivering it.
    pub fn clear_queue(&self) {
        let dropped = std::mem::take(&mut *self.shared.queue.borrow_mut());
        if !dropped.is_empty() {
            log::debug!("Discarded {} undelivered event(s).", dropped.len());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("EventBus")
            .field("event_types", &registry.subscribers.len())
            .field("pending", &self.shared.queue.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{
        keys, KeyPressed, KeyReleased, MouseButton, MouseButtonPressed, MouseMoved,
        WindowResize,
    };
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn publish_reaches_subscribers_in_registration_order() {
        let bus = EventBus::new();
        let log = new_log();

        let l = Rc::clone(&log);
        let _a = bus.subscribe(move |e: &mut KeyPressed| l.borrow_mut().push(format!("a{}", e.key_code)));
        let l = Rc::clone(&log);
        let _b = bus.subscribe(move |e: &mut KeyPressed| l.borrow_mut().push(format!("b{}", e.key_code)));

        bus.publish(&mut KeyPressed::new(7));

        assert_eq!(*log.borrow(), vec!["a7", "b7"]);
    }

    #[test]
    fn publish_matches_exact_type_only() {
        let bus = EventBus::new();
        let pressed = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(0));

        let p = Rc::clone(&pressed);
        let _a = bus.subscribe(move |_: &mut KeyPressed| p.set(p.get() + 1));
        let r = Rc::clone(&released);
        let _b = bus.subscribe(move |_: &mut KeyReleased| r.set(r.get() + 1));

        bus.publish(&mut KeyReleased::new(keys::A));

        assert_eq!(pressed.get(), 0);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        let mut event = MouseMoved::new(3.0, 4.0);
        bus.publish(&mut event);
        assert!(!event.handled);
    }

    #[test]
    fn handled_event_stops_propagation() {
        let bus = EventBus::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let f = Rc::clone(&first);
        let _a = bus.subscribe(move |e: &mut KeyPressed| {
            f.set(f.get() + 1);
            e.handled = true;
        });
        let s = Rc::clone(&second);
        let _b = bus.subscribe(move |_: &mut KeyPressed| s.set(s.get() + 1));

        let mut event = KeyPressed::new(keys::SPACE);
        bus.publish(&mut event);

        assert!(event.handled);
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn queued_events_wait_for_dispatch_and_keep_fifo_order() {
        let bus = EventBus::new();
        let log = new_log();

        let l = Rc::clone(&log);
        let _keys = bus.subscribe(move |e: &mut KeyPressed| l.borrow_mut().push(e.to_string()));
        let l = Rc::clone(&log);
        let _resize = bus.subscribe(move |e: &mut WindowResize| l.borrow_mut().push(e.to_string()));

        bus.queue_event(KeyPressed::new(1));
        bus.queue_event(WindowResize::new(800, 600));
        bus.queue_event(KeyPressed::new(2));

        assert!(log.borrow().is_empty());
        assert_eq!(bus.pending_len(), 3);

        assert_eq!(bus.dispatch_events(), 3);
        assert_eq!(
            *log.borrow(),
            vec!["KeyPressed: 1", "WindowResize: 800, 600", "KeyPressed: 2"]
        );
        assert_eq!(bus.pending_len(), 0);
    }

    #[test]
    fn events_queued_during_dispatch_go_to_next_pass() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let inner_bus = bus.clone();
        let _sub = bus.subscribe(move |e: &mut KeyPressed| {
            c.set(c.get() + 1);
            inner_bus.queue_event(KeyPressed::new(e.key_code + 1));
        });

        bus.queue_event(KeyPressed::new(0));
        assert_eq!(bus.dispatch_events(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(bus.pending_len(), 1);

        assert_eq!(bus.dispatch_events(), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn nested_dispatch_is_ignored() {
        let bus = EventBus::new();
        let nested_result = Rc::new(Cell::new(usize::MAX));

        let n = Rc::clone(&nested_result);
        let inner_bus = bus.clone();
        let _sub = bus.subscribe(move |_: &mut WindowResize| {
            inner_bus.queue_event(WindowResize::new(1, 1));
            n.set(inner_bus.dispatch_events());
        });

        bus.queue_event(WindowResize::new(2, 2));
        bus.dispatch_events();

        assert_eq!(nested_result.get(), 0);
        assert_eq!(bus.pending_len(), 1);
    }

    #[test]
    fn panicking_callback_does_not_wedge_dispatch() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));

        let c = Rc::clone(&calls);
        let _sub = bus.subscribe(move |e: &mut KeyPressed| {
            c.set(c.get() + 1);
            if e.key_code == keys::ESCAPE {
                panic!("callback failure");
            }
        });

        bus.queue_event(KeyPressed::new(keys::ESCAPE));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bus.dispatch_events()));
        assert!(result.is_err());

        bus.queue_event(KeyPressed::new(keys::A));
        assert_eq!(bus.dispatch_events(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn dropping_guard_unsubscribes() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let guard = bus.subscribe(move |_: &mut MouseButtonPressed| c.set(c.get() + 1));
        assert_eq!(bus.subscriber_count::<MouseButtonPressed>(), 1);

        drop(guard);
        bus.publish(&mut MouseButtonPressed::new(MouseButton::Left));

        assert_eq!(count.get(), 0);
        assert_eq!(bus.subscriber_count::<MouseButtonPressed>(), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let guard = bus.subscribe(|_: &mut KeyPressed| {});
        let handle = guard.handle().expect("guard should be active");

        bus.shared.unsubscribe(handle, TypeId::of::<KeyPressed>());
        bus.shared.unsubscribe(handle, TypeId::of::<KeyPressed>());
        drop(guard);

        assert_eq!(bus.subscriber_count::<KeyPressed>(), 0);
    }

    #[test]
    fn callback_unsubscribed_mid_pass_is_skipped() {
        let bus = EventBus::new();
        let second_calls = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<ScopedSubscription>>> = Rc::new(RefCell::new(None));

        let v = Rc::clone(&victim);
        let _first = bus.subscribe(move |_: &mut KeyPressed| {
            v.borrow_mut().take();
        });
        let s = Rc::clone(&second_calls);
        *victim.borrow_mut() = Some(bus.subscribe(move |_: &mut KeyPressed| s.set(s.get() + 1)));

        bus.publish(&mut KeyPressed::new(1));

        assert_eq!(second_calls.get(), 0);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 1);
    }

    #[test]
    fn callback_subscribed_mid_pass_waits_for_next_publish() {
        let bus = EventBus::new();
        let late_calls = Rc::new(Cell::new(0));
        let late_guard: Rc<RefCell<Option<ScopedSubscription>>> = Rc::new(RefCell::new(None));

        let inner_bus = bus.clone();
        let g = Rc::clone(&late_guard);
        let l = Rc::clone(&late_calls);
        let _first = bus.subscribe(move |_: &mut KeyPressed| {
            if g.borrow().is_none() {
                let l = Rc::clone(&l);
                *g.borrow_mut() = Some(inner_bus.subscribe(move |_: &mut KeyPressed| l.set(l.get() + 1)));
            }
        });

        bus.publish(&mut KeyPressed::new(1));
        assert_eq!(late_calls.get(), 0);

        bus.publish(&mut KeyPressed::new(2));
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn callback_may_drop_its_own_guard() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));
        let own: Rc<RefCell<Option<ScopedSubscription>>> = Rc::new(RefCell::new(None));

        let o = Rc::clone(&own);
        let c = Rc::clone(&calls);
        *own.borrow_mut() = Some(bus.subscribe(move |_: &mut KeyPressed| {
            c.set(c.get() + 1);
            o.borrow_mut().take();
        }));

        bus.publish(&mut KeyPressed::new(1));
        bus.publish(&mut KeyPressed::new(2));

        assert_eq!(calls.get(), 1);
        assert_eq!(bus.subscriber_count::<KeyPressed>(), 0);
    }

    #[test]
    fn clear_queue_discards_pending_events() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _sub = bus.subscribe(move |_: &mut KeyPressed| c.set(c.get() + 1));

        bus.queue_event(KeyPressed::new(1));
        bus.clear_queue();

        assert_eq!(bus.dispatch_events(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn publish_dyn_routes_on_concrete_type() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _sub = bus.subscribe(move |_: &mut WindowResize| c.set(c.get() + 1));

        let mut boxed: Box<dyn Event> = Box::new(WindowResize::new(10, 20));
        bus.publish_dyn(boxed.as_mut());

        assert_eq!(calls.get(), 1);
    }
}

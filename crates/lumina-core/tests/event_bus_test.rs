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

//! Integration tests for routing, deferred dispatch and subscription lifetimes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lumina_core::event::{
    keys, KeyPressed, KeyReleased, MouseButton, MouseButtonPressed, MouseMoved, WindowResize,
};
use lumina_core::{Event, EventBus, ScopedSubscription};

#[test]
fn test_handled_key_press_stops_second_subscriber() {
    let bus = EventBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let b_counter = Rc::new(Cell::new(0));

    // A subscribes first and consumes the event.
    let a_calls = Rc::clone(&calls);
    let _a = bus.subscribe(move |e: &mut KeyPressed| {
        a_calls.borrow_mut().push(("A", e.key_code));
        e.set_handled(true);
    });

    // B subscribes second.
    let b_calls = Rc::clone(&calls);
    let b_count = Rc::clone(&b_counter);
    let _b = bus.subscribe(move |e: &mut KeyPressed| {
        b_calls.borrow_mut().push(("B", e.key_code));
        b_count.set(b_count.get() + 1);
    });

    bus.queue_event(KeyPressed::new(keys::SPACE));
    assert_eq!(bus.dispatch_events(), 1);

    assert_eq!(*calls.borrow(), vec![("A", 32)]);
    assert_eq!(b_counter.get(), 0);
}

#[test]
fn test_unhandled_key_press_reaches_all_in_order() {
    let bus = EventBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let guards: Vec<ScopedSubscription> = ["A", "B", "C"]
        .into_iter()
        .map(|label| {
            let calls = Rc::clone(&calls);
            bus.subscribe(move |e: &mut KeyPressed| calls.borrow_mut().push((label, e.key_code)))
        })
        .collect();

    bus.queue_event(KeyPressed::new(keys::SPACE));
    bus.dispatch_events();

    assert_eq!(*calls.borrow(), vec![("A", 32), ("B", 32), ("C", 32)]);
    drop(guards);
    assert_eq!(bus.subscriber_count::<KeyPressed>(), 0);
}

#[test]
fn test_routing_ignores_other_types_in_same_category() {
    let bus = EventBus::new();
    let pressed = Rc::new(Cell::new(0));
    let released = Rc::new(Cell::new(0));

    let p = Rc::clone(&pressed);
    let _pressed = bus.subscribe(move |_: &mut KeyPressed| p.set(p.get() + 1));
    let r = Rc::clone(&released);
    let _released = bus.subscribe(move |_: &mut KeyReleased| r.set(r.get() + 1));

    bus.publish(&mut KeyReleased::new(keys::A));
    bus.publish(&mut KeyReleased::new(keys::D));
    bus.publish(&mut MouseMoved::new(1.0, 2.0));

    assert_eq!(pressed.get(), 0);
    assert_eq!(released.get(), 2);
}

#[test]
fn test_mixed_queue_is_delivered_fifo() {
    let bus = EventBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    let _resize = bus.subscribe(move |e: &mut WindowResize| {
        l.borrow_mut().push(format!("resize {}x{}", e.width, e.height))
    });
    let l = Rc::clone(&log);
    let _button = bus.subscribe(move |e: &mut MouseButtonPressed| {
        l.borrow_mut().push(format!("button {:?}", e.button))
    });
    let l = Rc::clone(&log);
    let _key = bus.subscribe(move |e: &mut KeyPressed| l.borrow_mut().push(format!("key {}", e.key_code)));

    bus.queue_event(MouseButtonPressed::new(MouseButton::Left));
    bus.queue_event(WindowResize::new(800, 600));
    bus.queue_event(KeyPressed::new(keys::ESCAPE));
    assert_eq!(bus.pending_len(), 3);

    assert_eq!(bus.dispatch_events(), 3);
    assert_eq!(
        *log.borrow(),
        vec!["button Left", "resize 800x600", "key 256"]
    );
    assert_eq!(bus.pending_len(), 0);
}

#[test]
fn test_chained_events_advance_one_pass_at_a_time() {
    let bus = EventBus::new();
    let resizes = Rc::new(Cell::new(0));

    // Every key press schedules a resize for the following pass.
    let chain = bus.clone();
    let _key = bus.subscribe(move |_: &mut KeyPressed| chain.queue_event(WindowResize::new(1, 1)));
    let r = Rc::clone(&resizes);
    let _resize = bus.subscribe(move |_: &mut WindowResize| r.set(r.get() + 1));

    bus.queue_event(KeyPressed::new(keys::ENTER));
    assert_eq!(bus.dispatch_events(), 1);
    assert_eq!(resizes.get(), 0);

    assert_eq!(bus.dispatch_events(), 1);
    assert_eq!(resizes.get(), 1);

    assert_eq!(bus.dispatch_events(), 0);
}

#[test]
fn test_moved_guard_unsubscribes_exactly_once() {
    let bus = EventBus::new();
    let hits = Rc::new(Cell::new(0));

    let h = Rc::clone(&hits);
    let original = bus.subscribe(move |_: &mut KeyPressed| h.set(h.get() + 1));
    let moved = original;

    // A second subscriber must survive the first guard's release.
    let h = Rc::clone(&hits);
    let _other = bus.subscribe(move |_: &mut KeyPressed| h.set(h.get() + 10));

    bus.publish(&mut KeyPressed::new(keys::W));
    assert_eq!(hits.get(), 11);

    drop(moved);
    bus.publish(&mut KeyPressed::new(keys::W));
    assert_eq!(hits.get(), 21);
    assert_eq!(bus.subscriber_count::<KeyPressed>(), 1);
}

#[test]
fn test_guards_stored_in_owner_struct() {
    struct Controller {
        presses: Rc<Cell<u32>>,
        _subscription: ScopedSubscription,
    }

    impl Controller {
        fn new(bus: &EventBus) -> Self {
            let presses = Rc::new(Cell::new(0));
            let p = Rc::clone(&presses);
            Self {
                presses,
                _subscription: bus.subscribe(move |_: &mut KeyPressed| p.set(p.get() + 1)),
            }
        }
    }

    let bus = EventBus::new();
    let controller = Controller::new(&bus);
    bus.publish(&mut KeyPressed::new(keys::S));
    assert_eq!(controller.presses.get(), 1);

    let presses = Rc::clone(&controller.presses);
    drop(controller);
    bus.publish(&mut KeyPressed::new(keys::S));
    assert_eq!(presses.get(), 1);
}

#[test]
fn test_handled_flag_is_per_event() {
    let bus = EventBus::new();
    let seen = Rc::new(Cell::new(0));

    let _first = bus.subscribe(|e: &mut KeyPressed| {
        if e.key_code == keys::ESCAPE {
            e.set_handled(true);
        }
    });
    let s = Rc::clone(&seen);
    let _second = bus.subscribe(move |_: &mut KeyPressed| s.set(s.get() + 1));

    bus.queue_event(KeyPressed::new(keys::ESCAPE));
    bus.queue_event(KeyPressed::new(keys::Q));
    bus.dispatch_events();

    // Only the non-escape press reaches the second subscriber.
    assert_eq!(seen.get(), 1);
}
